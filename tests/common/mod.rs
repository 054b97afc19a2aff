#![allow(dead_code)]

use async_trait::async_trait;
use revolver::application::engine::RevolverEngine;
use revolver::config::GameConfig;
use revolver::domain::game::{GroupId, UserId};
use revolver::domain::ports::Moderator;
use revolver::error::{GameError, Result};
use revolver::infrastructure::in_memory::InMemoryGameStore;
use revolver::infrastructure::moderation::SimulatedModerator;
use revolver::infrastructure::scheduler::TokioTimeoutScheduler;
use std::sync::Arc;
use std::time::Duration;

/// A moderator whose ban call always errors.
pub struct FailingModerator;

#[async_trait]
impl Moderator for FailingModerator {
    async fn is_bannable(&self, _group_id: GroupId, _user_id: UserId) -> Result<bool> {
        Ok(true)
    }

    async fn ban(
        &self,
        _group_id: GroupId,
        _user_id: UserId,
        _duration: Duration,
    ) -> Result<()> {
        Err(GameError::Moderation("bot lacks permission".to_string()))
    }
}

pub fn engine_with_moderator(
    moderator: impl Moderator + 'static,
    seed: u64,
) -> Arc<RevolverEngine> {
    Arc::new(
        RevolverEngine::new(
            Arc::new(InMemoryGameStore::new()),
            Box::new(moderator),
            Box::new(TokioTimeoutScheduler::new()),
            GameConfig::default(),
        )
        .unwrap()
        .with_seed(seed),
    )
}

pub fn engine(seed: u64) -> Arc<RevolverEngine> {
    engine_with_moderator(SimulatedModerator::new(), seed)
}

pub fn write_script(lines: &[&str]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}
