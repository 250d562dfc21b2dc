//! Caller-owned feed subscription handle

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use flix_core::{DomainError, Snowflake};

use super::snapshot::FeedSnapshot;
use super::FeedScope;
use crate::services::error::ServiceResult;

/// Observable lifecycle of a subscription
#[derive(Debug, Clone)]
pub enum FeedState {
    /// Partition streams are being opened or have not all reported yet
    Initializing,
    Streaming(Arc<FeedSnapshot>),
    /// A partition stream or an evaluation failed; nothing further is emitted
    Failed(String),
    Closed,
}

impl FeedState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Streaming(_) => "streaming",
            Self::Failed(_) => "failed",
            Self::Closed => "closed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Closed)
    }
}

/// Sender side of the state channel, shared with the worker.
///
/// Taken out on cancel; every publish happens under the lock, so once
/// `cancel` returns nothing more can be sent.
pub(crate) type Publisher = Arc<Mutex<Option<watch::Sender<FeedState>>>>;

/// Live feed for one viewer and scope.
///
/// Dropping the handle cancels it.
pub struct FeedSubscription {
    id: Uuid,
    viewer_id: Snowflake,
    scope: FeedScope,
    publisher: Publisher,
    state: watch::Receiver<FeedState>,
    task: Option<JoinHandle<()>>,
    last_generation: Option<u64>,
    failure_reported: bool,
}

impl FeedSubscription {
    pub(crate) fn new(
        id: Uuid,
        viewer_id: Snowflake,
        scope: FeedScope,
        publisher: Publisher,
        state: watch::Receiver<FeedState>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            id,
            viewer_id,
            scope,
            publisher,
            state,
            task: Some(task),
            last_generation: None,
            failure_reported: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn viewer_id(&self) -> Snowflake {
        self.viewer_id
    }

    pub fn scope(&self) -> FeedScope {
        self.scope
    }

    /// Current state
    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Wait for the next snapshot newer than the last one returned.
    ///
    /// A failure is returned once as `SubscriptionError`; after that, and
    /// after cancellation, this returns `None`.
    pub async fn next(&mut self) -> Option<ServiceResult<Arc<FeedSnapshot>>> {
        loop {
            {
                let state = self.state.borrow_and_update();
                match &*state {
                    FeedState::Initializing => {}
                    FeedState::Streaming(snapshot) => {
                        if self
                            .last_generation
                            .is_none_or(|seen| snapshot.generation > seen)
                        {
                            self.last_generation = Some(snapshot.generation);
                            return Some(Ok(Arc::clone(snapshot)));
                        }
                    }
                    FeedState::Failed(reason) => {
                        if self.failure_reported {
                            return None;
                        }
                        self.failure_reported = true;
                        return Some(Err(DomainError::SubscriptionError(reason.clone()).into()));
                    }
                    FeedState::Closed => return None,
                }
            }

            if self.state.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Stop the subscription.
    ///
    /// No snapshot is published once this returns. The worker task is
    /// aborted; its partition streams are released when the runtime drops
    /// it (see `shutdown` to wait for that).
    pub fn cancel(&self) {
        let Some(sender) = self.publisher.lock().take() else {
            return;
        };
        sender.send_replace(FeedState::Closed);
        if let Some(task) = &self.task {
            task.abort();
        }
        debug!(subscription_id = %self.id, "Feed subscription cancelled");
    }

    /// Cancel and wait until every partition stream has been released
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if e.is_panic() {
                    warn!(subscription_id = %self.id, "Feed worker panicked");
                }
            }
        }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("id", &self.id)
            .field("viewer_id", &self.viewer_id)
            .field("scope", &self.scope)
            .field("state", &self.state.borrow().name())
            .finish()
    }
}
