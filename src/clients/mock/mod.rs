//! Mock peer for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tonic::Status;

use crate::client_traits::{ExecPeer, Result};
use crate::proto::{App, ExecResult};

/// Scripted reaction of a [`MockPeer`] to every call.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the payload immediately.
    Succeed(Vec<u8>),
    /// Return the payload after a delay.
    SucceedAfter(Duration, Vec<u8>),
    /// Fail immediately with the status.
    Fail(Status),
    /// Fail with the status after a delay.
    FailAfter(Duration, Status),
    /// Never complete; only cancellation ends the call.
    Hang,
}

/// Mock execution peer for testing.
///
/// Records every request it receives and whether an in-flight call was
/// dropped before completing.
pub struct MockPeer {
    endpoint: String,
    behavior: MockBehavior,
    received: RwLock<Vec<Arc<App>>>,
    calls: AtomicUsize,
    cancelled: Arc<AtomicBool>,
}

impl MockPeer {
    pub fn new(endpoint: impl Into<String>, behavior: MockBehavior) -> Self {
        Self {
            endpoint: endpoint.into(),
            behavior,
            received: RwLock::new(Vec::new()),
            calls: AtomicUsize::new(0),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Peer that answers every call with `payload`.
    pub fn succeeding(endpoint: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self::new(endpoint, MockBehavior::Succeed(payload.into()))
    }

    /// Peer that fails every call with `status`.
    pub fn failing(endpoint: impl Into<String>, status: Status) -> Self {
        Self::new(endpoint, MockBehavior::Fail(status))
    }

    /// Peer whose calls never complete.
    pub fn hanging(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, MockBehavior::Hang)
    }

    /// Requests received so far, in arrival order.
    pub async fn received(&self) -> Vec<Arc<App>> {
        self.received.read().await.clone()
    }

    /// Number of calls started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// True once an in-flight call was dropped before it finished.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Flags the peer as cancelled if dropped while still armed.
struct InFlight {
    cancelled: Arc<AtomicBool>,
    armed: bool,
}

impl InFlight {
    fn finish(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.armed {
            self.cancelled.store(true, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl ExecPeer for MockPeer {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn exec(&self, app: Arc<App>) -> Result<ExecResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.write().await.push(app);

        let in_flight = InFlight {
            cancelled: Arc::clone(&self.cancelled),
            armed: true,
        };

        let outcome = match &self.behavior {
            MockBehavior::Succeed(payload) => Ok(ExecResult {
                payload: payload.clone(),
            }),
            MockBehavior::SucceedAfter(delay, payload) => {
                tokio::time::sleep(*delay).await;
                Ok(ExecResult {
                    payload: payload.clone(),
                })
            }
            MockBehavior::Fail(status) => Err(status.clone().into()),
            MockBehavior::FailAfter(delay, status) => {
                tokio::time::sleep(*delay).await;
                Err(status.clone().into())
            }
            MockBehavior::Hang => std::future::pending().await,
        };

        in_flight.finish();
        outcome
    }
}
