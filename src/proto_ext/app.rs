//! Accessors for the `App` request message.

use crate::proto::App;
use crate::proto_ext::ProtoUuidExt;

/// Extension trait for App proto type.
pub trait AppExt {
    /// Correlation id of the request, if one was set.
    fn request_uuid(&self) -> Option<uuid::Uuid>;

    /// Correlation id rendered for logs and metadata; empty when unset.
    fn correlation_id(&self) -> String {
        self.request_uuid()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

impl AppExt for App {
    fn request_uuid(&self) -> Option<uuid::Uuid> {
        self.request_id.as_ref().map(ProtoUuidExt::to_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto_ext::UuidExt;

    #[test]
    fn test_request_uuid_round_trips_through_app() {
        let id = uuid::Uuid::new_v4();
        let app = App {
            request_id: Some(id.to_proto_uuid()),
            ..Default::default()
        };

        assert_eq!(app.request_uuid(), Some(id));
        assert_eq!(app.correlation_id(), id.to_string());
    }

    #[test]
    fn test_missing_request_id_is_empty_correlation() {
        let app = App::default();
        assert_eq!(app.request_uuid(), None);
        assert!(app.correlation_id().is_empty());
    }
}
