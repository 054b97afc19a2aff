use crate::domain::game::{Game, GameId, GroupId};
use crate::domain::ports::GameStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store of running games, one per group.
///
/// Uses `Arc<RwLock<HashMap<GroupId, Game>>>` so the engine and its timeout
/// tasks can share the same map.
#[derive(Default, Clone)]
pub struct InMemoryGameStore {
    games: Arc<RwLock<HashMap<GroupId, Game>>>,
}

impl InMemoryGameStore {
    /// Creates a new, empty in-memory game store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn insert_new(&self, group_id: GroupId, game: Game) -> Result<bool> {
        let mut games = self.games.write().await;
        match games.entry(group_id) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(game);
                Ok(true)
            }
        }
    }

    async fn update_if(&self, group_id: GroupId, game: Game) -> Result<bool> {
        let mut games = self.games.write().await;
        match games.get_mut(&group_id) {
            Some(live) if live.id == game.id => {
                *live = game;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get(&self, group_id: GroupId) -> Result<Option<Game>> {
        let games = self.games.read().await;
        Ok(games.get(&group_id).cloned())
    }

    async fn remove(&self, group_id: GroupId) -> Result<Option<Game>> {
        let mut games = self.games.write().await;
        Ok(games.remove(&group_id))
    }

    async fn remove_if(&self, group_id: GroupId, game_id: GameId) -> Result<Option<Game>> {
        let mut games = self.games.write().await;
        match games.get(&group_id) {
            Some(game) if game.id == game_id => Ok(games.remove(&group_id)),
            _ => Ok(None),
        }
    }
}
