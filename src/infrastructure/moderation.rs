use crate::domain::game::{GroupId, UserId};
use crate::domain::ports::Moderator;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// In-process moderator that records bans instead of enforcing them.
///
/// Users registered as privileged (admins, owners) are immune.
#[derive(Default, Clone)]
pub struct SimulatedModerator {
    privileged: HashSet<UserId>,
    bans: Arc<RwLock<HashMap<(GroupId, UserId), Duration>>>,
}

impl SimulatedModerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_privileged(users: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            privileged: users.into_iter().collect(),
            ..Self::default()
        }
    }

    /// The last ban applied to a user in a group, if any.
    pub async fn ban_of(&self, group_id: GroupId, user_id: UserId) -> Option<Duration> {
        self.bans.read().await.get(&(group_id, user_id)).copied()
    }

    pub async fn ban_count(&self) -> usize {
        self.bans.read().await.len()
    }
}

#[async_trait]
impl Moderator for SimulatedModerator {
    async fn is_bannable(&self, _group_id: GroupId, user_id: UserId) -> Result<bool> {
        Ok(!self.privileged.contains(&user_id))
    }

    async fn ban(&self, group_id: GroupId, user_id: UserId, duration: Duration) -> Result<()> {
        info!(group_id, user_id, secs = duration.as_secs(), "ban recorded");
        self.bans.write().await.insert((group_id, user_id), duration);
        Ok(())
    }
}
