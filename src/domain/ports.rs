use super::game::{Game, GameId, GroupId, UserId};
use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Inserts `game` unless the group already has one. Returns whether it was inserted.
    async fn insert_new(&self, group_id: GroupId, game: Game) -> Result<bool>;
    /// Overwrites the group's game only if it is still the instance `game.id`.
    /// Returns `false` when that game is gone, so an expired game is never revived.
    async fn update_if(&self, group_id: GroupId, game: Game) -> Result<bool>;
    async fn get(&self, group_id: GroupId) -> Result<Option<Game>>;
    async fn remove(&self, group_id: GroupId) -> Result<Option<Game>>;
    /// Removes the group's game only if it is the instance identified by `game_id`.
    async fn remove_if(&self, group_id: GroupId, game_id: GameId) -> Result<Option<Game>>;
}

#[async_trait]
pub trait Moderator: Send + Sync {
    /// Admins and owners are not bannable.
    async fn is_bannable(&self, group_id: GroupId, user_id: UserId) -> Result<bool>;
    async fn ban(&self, group_id: GroupId, user_id: UserId, duration: Duration) -> Result<()>;
}

/// Work run when a timeout fires.
pub type Expiry = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[async_trait]
pub trait TimeoutScheduler: Send + Sync {
    /// Arms a one-shot timeout for the group, replacing any pending one.
    async fn schedule(&self, group_id: GroupId, after: Duration, expiry: Expiry);
    /// Disarms the group's timeout. Returns `false` when nothing was pending.
    async fn cancel(&self, group_id: GroupId) -> bool;
}

pub type GameStoreRef = Arc<dyn GameStore>;
pub type ModeratorBox = Box<dyn Moderator>;
pub type TimeoutSchedulerBox = Box<dyn TimeoutScheduler>;
