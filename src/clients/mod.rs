//! Peer client implementations.

pub mod grpc;
pub mod mock;

pub use grpc::GrpcPeer;
pub use mock::{MockBehavior, MockPeer};
