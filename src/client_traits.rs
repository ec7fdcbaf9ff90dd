//! Peer call contract.
//!
//! The dispatcher only knows peers through [`ExecPeer`]. The gRPC client
//! and the test double both implement it, so dispatch logic is exercised
//! the same way with or without a network.

use std::sync::Arc;

use async_trait::async_trait;
use tonic::{Code, Status};

use crate::proto::{App, ExecResult};

/// Result type for peer calls.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to one peer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Failed to establish connection to the server.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Transport-level error from tonic.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// gRPC error from the server.
    #[error("grpc error: {0}")]
    Grpc(Box<Status>),
}

impl From<Status> for ClientError {
    fn from(status: Status) -> Self {
        ClientError::Grpc(Box::new(status))
    }
}

impl ClientError {
    /// Returns the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Connection(msg) => msg.clone(),
            ClientError::Transport(e) => e.to_string(),
            ClientError::Grpc(s) => s.message().to_string(),
        }
    }

    /// Returns the gRPC status code if this is a gRPC error.
    pub fn code(&self) -> Option<Code> {
        match self {
            ClientError::Grpc(s) => Some(s.code()),
            _ => None,
        }
    }

    /// Returns the underlying gRPC Status if this is a gRPC error.
    pub fn status(&self) -> Option<&Status> {
        match self {
            ClientError::Grpc(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this is a connection or transport error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ClientError::Connection(_) | ClientError::Transport(_))
    }

    /// Returns true if the server reported the call as cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.code(), Some(Code::Cancelled))
    }
}

/// One remote execution target.
///
/// `exec` receives the request shared by every peer of a dispatch. The
/// dispatcher cancels an in-flight call by dropping its future, so
/// implementations must not rely on running to completion.
#[async_trait]
pub trait ExecPeer: Send + Sync {
    /// Address this peer is bound to.
    fn endpoint(&self) -> &str;

    /// Execute the request on this peer.
    async fn exec(&self, app: Arc<App>) -> Result<ExecResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grpc_error_exposes_status() {
        let err = ClientError::from(Status::unavailable("server down"));
        assert_eq!(err.code(), Some(Code::Unavailable));
        assert_eq!(err.message(), "server down");
        assert!(err.status().is_some());
        assert!(!err.is_connection_error());
    }

    #[test]
    fn test_connection_error_has_no_code() {
        let err = ClientError::Connection("refused".to_string());
        assert_eq!(err.code(), None);
        assert!(err.is_connection_error());
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn test_cancelled_status_detected() {
        assert!(ClientError::from(Status::cancelled("stop")).is_cancelled());
        assert!(!ClientError::from(Status::internal("boom")).is_cancelled());
    }
}
