use crate::domain::game::GroupId;
use crate::domain::ports::{Expiry, TimeoutScheduler};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

struct Pending {
    token: u64,
    handle: JoinHandle<()>,
}

/// Runs each group's timeout as a sleeping tokio task.
///
/// A fired task deregisters itself, but only if it has not been superseded by
/// a newer schedule for the same group.
#[derive(Default, Clone)]
pub struct TokioTimeoutScheduler {
    pending: Arc<Mutex<HashMap<GroupId, Pending>>>,
    next_token: Arc<AtomicU64>,
}

impl TokioTimeoutScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_pending(&self, group_id: GroupId) -> bool {
        self.pending.lock().await.contains_key(&group_id)
    }
}

#[async_trait]
impl TimeoutScheduler for TokioTimeoutScheduler {
    async fn schedule(&self, group_id: GroupId, after: Duration, expiry: Expiry) {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let pending = Arc::clone(&self.pending);

        // Hold the lock across spawn so the task cannot deregister before it is registered.
        let mut tasks = self.pending.lock().await;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            {
                let mut tasks = pending.lock().await;
                if tasks.get(&group_id).is_some_and(|p| p.token == token) {
                    tasks.remove(&group_id);
                }
            }
            debug!(group_id, "timeout fired");
            expiry.await;
        });

        if let Some(previous) = tasks.insert(group_id, Pending { token, handle }) {
            previous.handle.abort();
        }
    }

    async fn cancel(&self, group_id: GroupId) -> bool {
        match self.pending.lock().await.remove(&group_id) {
            Some(previous) => {
                previous.handle.abort();
                debug!(group_id, "timeout cancelled");
                true
            }
            None => false,
        }
    }
}
