//! gRPC utilities for correlation ID propagation.

/// gRPC metadata key carrying the request's correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Create a tonic Request with `x-correlation-id` gRPC metadata.
///
/// Propagates the correlation_id into gRPC request headers so that
/// server-side middleware can tag spans before protobuf deserialization.
pub fn correlated_request<T>(msg: T, correlation_id: &str) -> tonic::Request<T> {
    let mut req = tonic::Request::new(msg);
    if !correlation_id.is_empty() {
        if let Ok(val) = correlation_id.parse() {
            req.metadata_mut().insert(CORRELATION_ID_HEADER, val);
        }
    }
    req
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_header_set() {
        let req = correlated_request((), "abc-123");
        let value = req.metadata().get(CORRELATION_ID_HEADER).unwrap();
        assert_eq!(value.to_str().unwrap(), "abc-123");
    }

    #[test]
    fn test_empty_correlation_adds_no_header() {
        let req = correlated_request((), "");
        assert!(req.metadata().get(CORRELATION_ID_HEADER).is_none());
    }
}
