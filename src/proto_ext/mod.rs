//! Extension traits for proto types.

pub mod app;
pub mod grpc;
pub mod uuid;

pub use app::AppExt;
pub use grpc::{correlated_request, CORRELATION_ID_HEADER};
pub use uuid::{ProtoUuidExt, UuidExt};
