//! decexec - fan-out client for decentralized execution servers
//!
//! Sends one execution request to every server of a fixed peer set in
//! parallel. All servers receive the same request, including a shared
//! correlation id, so they can recognise their independent executions as
//! one logical request. The first failing server aborts the whole request.
//!
//! ## Flow
//! ```text
//! PeerRegistry ──► RequestBuilder ──► Dispatcher ──┬──► peer 0 ──┐
//!  (N endpoints)    (one App, one id)  (JoinSet)   ├──► peer 1 ──┼──► outcome channel ──► aggregate
//!                                                  └──► peer N ──┘     (first error cancels the rest)
//! ```

pub mod client_traits;
pub mod clients;
pub mod config;
pub mod dispatch;
pub mod proto_ext;
pub mod registry;
pub mod request;
pub mod utils;

pub mod proto {
    tonic::include_proto!("decexec");
}

pub use client_traits::{ClientError, ExecPeer};
pub use dispatch::{DispatchError, Dispatcher, PeerResult};
pub use registry::{PeerRegistry, RegistryError};
pub use request::{Request, RequestBuilder};
