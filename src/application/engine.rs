use crate::config::GameConfig;
use crate::domain::game::{CHAMBER_COUNT, Game, GameId, GroupId, Shot, UserId};
use crate::domain::ports::{GameStoreRef, ModeratorBox, TimeoutSchedulerBox};
use crate::error::{GameError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// What happened to a participant who was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Penalty {
    Banned(Duration),
    /// The participant is an admin or owner.
    Immune,
    /// The moderation service refused or errored.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Hit(Penalty),
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartReport {
    pub game_id: GameId,
    pub bullets: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    /// One-based chamber that was fired.
    pub chamber: usize,
    pub outcome: TurnOutcome,
    pub remaining: usize,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStatus {
    pub remaining: usize,
    pub current_loaded: bool,
    /// One-based chamber under the hammer.
    pub chamber: usize,
    pub turns: u32,
    pub elapsed: Duration,
}

/// Runs Russian Roulette games, one per chat group.
///
/// The engine owns the game store and the two collaborators a game needs: a
/// moderator to penalise whoever gets hit, and a scheduler that clears games
/// nobody finishes. Calls for the same group are expected to be serialized by
/// the host.
pub struct RevolverEngine {
    store: GameStoreRef,
    moderator: ModeratorBox,
    scheduler: TimeoutSchedulerBox,
    config: GameConfig,
    rng: Mutex<StdRng>,
    next_id: AtomicU64,
}

impl RevolverEngine {
    /// Creates a new `RevolverEngine` seeded from the OS.
    ///
    /// # Arguments
    ///
    /// * `store` - Where running games live. Shared with timeout tasks.
    /// * `moderator` - Applies the loser's penalty.
    /// * `scheduler` - Expires abandoned games.
    /// * `config` - Timeout and ban tunables. Rejected if it does not validate.
    pub fn new(
        store: GameStoreRef,
        moderator: ModeratorBox,
        scheduler: TimeoutSchedulerBox,
        config: GameConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            moderator,
            scheduler,
            config,
            rng: Mutex::new(StdRng::from_entropy()),
            next_id: AtomicU64::new(1),
        })
    }

    /// Replaces the RNG with a seeded one for reproducible games.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Loads the revolver for a group and arms its timeout.
    ///
    /// A missing or out-of-range bullet count is replaced by a random one.
    /// A rejected start leaves the RNG untouched, so seeded runs stay reproducible.
    pub async fn start(&self, group_id: GroupId, bullets: Option<usize>) -> Result<StartReport> {
        if self.store.get(group_id).await?.is_some() {
            return Err(GameError::AlreadyRunning);
        }

        let game_id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let game = {
            let mut rng = self.rng.lock().await;
            let bullets = match bullets {
                Some(n) if (1..=CHAMBER_COUNT).contains(&n) => n,
                requested => {
                    let n = rng.gen_range(1..=CHAMBER_COUNT);
                    debug!(group_id, ?requested, bullets = n, "using random bullet count");
                    n
                }
            };
            Game::load(game_id, bullets, &mut *rng)?
        };
        let bullets = game.remaining();

        if !self.store.insert_new(group_id, game).await? {
            return Err(GameError::AlreadyRunning);
        }

        let store = Arc::clone(&self.store);
        self.scheduler
            .schedule(
                group_id,
                self.config.timeout(),
                Box::pin(async move {
                    if let Err(e) = expire_game(&store, group_id, game_id).await {
                        warn!(group_id, error = %e, "failed to expire game");
                    }
                }),
            )
            .await;

        info!(group_id, game_id = game_id.0, bullets, "game started");
        Ok(StartReport { game_id, bullets })
    }

    /// Fires the current chamber on behalf of `user_id`.
    ///
    /// The game is persisted (or removed, once empty) before the penalty is
    /// applied, so a slow moderator never observes a stale cylinder. Writes are
    /// conditional on the game still being live: if it timed out while the
    /// turn was in flight, the turn fails with `NoGame`.
    pub async fn take_turn(&self, group_id: GroupId, user_id: UserId) -> Result<TurnReport> {
        let mut game = self
            .store
            .get(group_id)
            .await?
            .ok_or(GameError::NoGame)?;
        let game_id = game.id;

        let chamber = game.current() + 1;
        let shot = game.pull_trigger();
        let remaining = game.remaining();
        let game_over = game.is_empty();
        debug!(group_id, user_id, chamber, ?shot, remaining, "trigger pulled");

        if game_over {
            if self.store.remove_if(group_id, game_id).await?.is_none() {
                debug!(group_id, game_id = game_id.0, "game expired mid-turn");
                return Err(GameError::NoGame);
            }
            self.scheduler.cancel(group_id).await;
            info!(group_id, game_id = game_id.0, turns = game.turns(), "game over");
        } else if !self.store.update_if(group_id, game).await? {
            debug!(group_id, game_id = game_id.0, "game expired mid-turn");
            return Err(GameError::NoGame);
        }

        let outcome = match shot {
            Shot::Hit => TurnOutcome::Hit(self.punish(group_id, user_id).await),
            Shot::Miss => TurnOutcome::Miss,
        };

        Ok(TurnReport {
            chamber,
            outcome,
            remaining,
            game_over,
        })
    }

    /// Reports on the group's game without touching it.
    pub async fn status(&self, group_id: GroupId) -> Result<GameStatus> {
        let game = self.store.get(group_id).await?.ok_or(GameError::NoGame)?;
        Ok(GameStatus {
            remaining: game.remaining(),
            current_loaded: game.current_loaded(),
            chamber: game.current() + 1,
            turns: game.turns(),
            elapsed: SystemTime::now()
                .duration_since(game.started_at())
                .unwrap_or_default(),
        })
    }

    /// Clears the group's game if it is still the instance `game_id`.
    ///
    /// Returns whether a game was removed.
    pub async fn expire(&self, group_id: GroupId, game_id: GameId) -> Result<bool> {
        expire_game(&self.store, group_id, game_id).await
    }

    async fn punish(&self, group_id: GroupId, user_id: UserId) -> Penalty {
        match self.moderator.is_bannable(group_id, user_id).await {
            Ok(true) => {}
            Ok(false) => return Penalty::Immune,
            Err(e) => {
                warn!(group_id, user_id, error = %e, "could not check ban eligibility");
                return Penalty::Failed;
            }
        }

        let duration = {
            let mut rng = self.rng.lock().await;
            let secs = rng.gen_range(self.config.min_ban_secs..=self.config.max_ban_secs);
            Duration::from_secs(secs)
        };
        match self.moderator.ban(group_id, user_id, duration).await {
            Ok(()) => Penalty::Banned(duration),
            Err(e) => {
                warn!(group_id, user_id, error = %e, "ban failed");
                Penalty::Failed
            }
        }
    }
}

async fn expire_game(store: &GameStoreRef, group_id: GroupId, game_id: GameId) -> Result<bool> {
    let removed = store.remove_if(group_id, game_id).await?.is_some();
    if removed {
        info!(group_id, game_id = game_id.0, "game expired");
    }
    Ok(removed)
}
