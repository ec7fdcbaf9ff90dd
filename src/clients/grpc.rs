//! Peer implementation wrapping the tonic DecExec client.

use std::sync::Arc;

use async_trait::async_trait;
use tonic::transport::Channel;
use tracing::debug;

use crate::client_traits::{ClientError, ExecPeer, Result};
use crate::proto::dec_exec_client::DecExecClient;
use crate::proto::{App, ExecResult};
use crate::proto_ext::{correlated_request, AppExt};

/// Execution server reached over gRPC.
#[derive(Clone)]
pub struct GrpcPeer {
    endpoint: String,
    inner: DecExecClient<Channel>,
}

impl GrpcPeer {
    /// Connect to an execution server at the given endpoint.
    ///
    /// The endpoint must carry a scheme, e.g. `http://localhost:50050`.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let channel = Channel::from_shared(endpoint.to_string())
            .map_err(|e| ClientError::Connection(e.to_string()))?
            .connect()
            .await?;

        Ok(Self::from_channel(endpoint, channel))
    }

    /// Create a peer from an existing channel.
    pub fn from_channel(endpoint: impl Into<String>, channel: Channel) -> Self {
        Self {
            endpoint: endpoint.into(),
            inner: DecExecClient::new(channel),
        }
    }
}

#[async_trait]
impl ExecPeer for GrpcPeer {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn exec(&self, app: Arc<App>) -> Result<ExecResult> {
        let correlation_id = app.correlation_id();
        debug!(endpoint = %self.endpoint, correlation_id = %correlation_id, "Sending exec");

        // tonic takes ownership of the message; the shared descriptor stays untouched.
        let request = correlated_request(App::clone(&app), &correlation_id);
        let response = self.inner.clone().exec(request).await?;
        Ok(response.into_inner())
    }
}
