//! Peer registry.
//!
//! Resolves the fixed peer set for one run: peer `i` lives at
//! `{scheme}://{host}:{base_port + i}`. Every peer is connected once at
//! startup. Any failure is fatal, because a partial peer set can never
//! satisfy a request that needs all N servers to answer.

use std::sync::Arc;

use futures::future::try_join_all;
use tonic::transport::Endpoint;
use tracing::{debug, error, info};

use crate::client_traits::{ClientError, ExecPeer};
use crate::clients::GrpcPeer;
use crate::config::PeersConfig;

/// Errors raised while setting up the peer set.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("peer {index} at {endpoint} unreachable: {source}")]
    Connect {
        index: usize,
        endpoint: String,
        #[source]
        source: ClientError,
    },

    #[error("{count} peers starting at port {base} exceed the port range")]
    PortOverflow { base: u16, count: usize },
}

/// Build the endpoint URI of every peer, in peer order.
pub fn endpoints(config: &PeersConfig, count: usize) -> Result<Vec<String>, RegistryError> {
    let overflow = || RegistryError::PortOverflow {
        base: config.base_port,
        count,
    };

    (0..count)
        .map(|index| {
            let offset = u16::try_from(index).map_err(|_| overflow())?;
            let port = config.base_port.checked_add(offset).ok_or_else(overflow)?;
            let endpoint = format!("{}://{}:{}", config.scheme, config.host, port);

            Endpoint::from_shared(endpoint.clone()).map_err(|e| {
                RegistryError::InvalidEndpoint {
                    endpoint: endpoint.clone(),
                    reason: e.to_string(),
                }
            })?;

            Ok(endpoint)
        })
        .collect()
}

/// The connected peer set.
pub struct PeerRegistry {
    peers: Vec<Arc<dyn ExecPeer>>,
}

impl PeerRegistry {
    /// Connect to `count` sequentially addressed peers.
    ///
    /// Connections are attempted concurrently; the first failure aborts the
    /// whole setup.
    pub async fn connect(config: &PeersConfig, count: usize) -> Result<Self, RegistryError> {
        let endpoints = endpoints(config, count)?;

        let peers = try_join_all(endpoints.into_iter().enumerate().map(
            |(index, endpoint)| async move {
                debug!(peer = index, endpoint = %endpoint, "Connecting");
                match GrpcPeer::connect(&endpoint).await {
                    Ok(peer) => {
                        info!(peer = index, endpoint = %endpoint, "Connected to peer");
                        Ok(Arc::new(peer) as Arc<dyn ExecPeer>)
                    }
                    Err(source) => {
                        error!(peer = index, endpoint = %endpoint, error = %source, "Peer connection failed");
                        Err(RegistryError::Connect {
                            index,
                            endpoint,
                            source,
                        })
                    }
                }
            },
        ))
        .await?;

        Ok(Self { peers })
    }

    /// Wrap already constructed peers.
    pub fn from_peers(peers: Vec<Arc<dyn ExecPeer>>) -> Self {
        Self { peers }
    }

    pub fn peers(&self) -> &[Arc<dyn ExecPeer>] {
        &self.peers
    }

    pub fn into_peers(self) -> Vec<Arc<dyn ExecPeer>> {
        self.peers
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
