//! Fan-out/fan-in dispatch.
//!
//! [`Dispatcher::dispatch`] sends one [`Request`] to every peer at once and
//! waits for all of them:
//!
//! ```text
//!            ┌─ task 0: peer.exec(app) ─┐
//! request ───┼─ task 1: peer.exec(app) ─┼──► outcome channel ──► collect
//!            └─ task N: peer.exec(app) ─┘          │
//!                     ▲                            │ first error
//!                     └──── cancellation token ◄───┘
//! ```
//!
//! Each call runs on its own task and delivers its outcome from that task,
//! so a slow collector never stalls other peers. Outcomes are collected in
//! completion order. The first error raises the request's cancellation
//! token, every call still in flight is dropped, and that error becomes the
//! result of the whole dispatch. Later errors are discarded.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};

use crate::client_traits::{ClientError, ExecPeer};
use crate::proto::ExecResult;
use crate::request::Request;

/// Terminal failure of a dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// First peer call that failed.
    #[error("peer {index} ({endpoint}) failed: {source}")]
    Peer {
        index: usize,
        endpoint: String,
        #[source]
        source: ClientError,
    },

    #[error("deadline of {0:?} exceeded before all peers responded")]
    DeadlineExceeded(Duration),

    /// Cancelled from outside before every peer responded.
    #[error("dispatch cancelled")]
    Cancelled,

    /// Every call finished or vanished without delivering an outcome.
    #[error("only {received} of {expected} peers delivered an outcome")]
    Incomplete { expected: usize, received: usize },
}

impl DispatchError {
    /// Index of the failing peer, for peer errors.
    pub fn peer_index(&self) -> Option<usize> {
        match self {
            DispatchError::Peer { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Successful response of one peer.
#[derive(Debug, Clone)]
pub struct PeerResult {
    /// Position of the peer in the dispatcher's peer list.
    pub index: usize,
    pub endpoint: String,
    pub result: ExecResult,
}

impl fmt::Display for PeerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "peer {} ({}): {}",
            self.index,
            self.endpoint,
            String::from_utf8_lossy(&self.result.payload)
        )
    }
}

/// Outcome of one call, sent from the call's task to the collector.
struct Outcome {
    index: usize,
    endpoint: String,
    result: Result<ExecResult, ClientError>,
}

/// Sends requests to a fixed peer set.
pub struct Dispatcher {
    peers: Vec<Arc<dyn ExecPeer>>,
    deadline: Option<Duration>,
    shutdown: CancellationToken,
}

impl Dispatcher {
    pub fn new(peers: Vec<Arc<dyn ExecPeer>>) -> Self {
        Self {
            peers,
            deadline: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Fail a dispatch that has not finished within `deadline`.
    ///
    /// `None` waits indefinitely for every peer.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Parent token for all requests; cancelling it aborts any dispatch.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Parent token shared by every request of this dispatcher.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Dispatch `request` to every peer under a fresh cancellation context.
    pub async fn dispatch(&self, request: &Request) -> Result<Vec<PeerResult>, DispatchError> {
        self.dispatch_with(request, self.shutdown.child_token()).await
    }

    /// Dispatch `request` to every peer, cancelling through `cancel`.
    ///
    /// `cancel` is raised when the dispatch fails, so callers holding a
    /// clone can observe the failure. Raising it externally aborts the
    /// dispatch with [`DispatchError::Cancelled`].
    pub async fn dispatch_with(
        &self,
        request: &Request,
        cancel: CancellationToken,
    ) -> Result<Vec<PeerResult>, DispatchError> {
        let span = tracing::info_span!(
            "dispatch",
            request_id = %request.request_id(),
            peers = self.peers.len()
        );

        async move {
            if self.peers.is_empty() {
                debug!("No peers, nothing to dispatch");
                return Ok(Vec::new());
            }

            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut calls = JoinSet::new();

            for (index, peer) in self.peers.iter().enumerate() {
                let peer = Arc::clone(peer);
                let app = request.shared();
                let tx = tx.clone();
                let cancel = cancel.clone();

                calls.spawn(
                    async move {
                        let result = tokio::select! {
                            _ = cancel.cancelled() => {
                                debug!("Call cancelled before completion");
                                return;
                            }
                            result = peer.exec(app) => result,
                        };
                        // The collector may already be gone after an earlier failure.
                        let _ = tx.send(Outcome {
                            index,
                            endpoint: peer.endpoint().to_string(),
                            result,
                        });
                    }
                    .in_current_span(),
                );
            }
            // Only call tasks hold senders now, so the channel closes once all of them are done.
            drop(tx);

            debug!("Dispatched to all peers");
            let outcome = self.collect(&mut rx, &cancel).await;

            calls.abort_all();
            outcome
        }
        .instrument(span)
        .await
    }

    /// Wait for one outcome per peer, stopping at the first error.
    async fn collect(
        &self,
        rx: &mut mpsc::UnboundedReceiver<Outcome>,
        cancel: &CancellationToken,
    ) -> Result<Vec<PeerResult>, DispatchError> {
        let expected = self.peers.len();
        let mut results = Vec::with_capacity(expected);

        let deadline = self.deadline;
        let expiry = async move {
            match deadline {
                Some(limit) => {
                    tokio::time::sleep(limit).await;
                    limit
                }
                None => std::future::pending().await,
            }
        };
        tokio::pin!(expiry);

        while results.len() < expected {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    warn!(received = results.len(), expected, "Dispatch cancelled externally");
                    return Err(DispatchError::Cancelled);
                }
                limit = &mut expiry => {
                    warn!(?limit, received = results.len(), expected, "Dispatch deadline exceeded");
                    cancel.cancel();
                    return Err(DispatchError::DeadlineExceeded(limit));
                }
                outcome = rx.recv() => match outcome {
                    Some(Outcome { index, endpoint, result: Ok(result) }) => {
                        debug!(peer = index, endpoint = %endpoint, "Peer succeeded");
                        results.push(PeerResult { index, endpoint, result });
                    }
                    Some(Outcome { index, endpoint, result: Err(source) }) => {
                        error!(peer = index, endpoint = %endpoint, error = %source, "Peer failed, cancelling remaining calls");
                        cancel.cancel();
                        return Err(DispatchError::Peer { index, endpoint, source });
                    }
                    None => {
                        error!(received = results.len(), expected, "Outcome channel closed early");
                        cancel.cancel();
                        return Err(DispatchError::Incomplete { expected, received: results.len() });
                    }
                },
            }
        }

        info!(results = results.len(), "All peers succeeded");
        Ok(results)
    }
}
