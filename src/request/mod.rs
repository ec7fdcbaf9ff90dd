//! Request construction.
//!
//! One [`Request`] is built per logical execution and handed to every peer.
//! It owns a freshly generated correlation id and an immutable [`App`]
//! descriptor behind an `Arc`, so concurrent calls share it without locking.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::{
    RequestConfig, DEFAULT_APP_NAME, DEFAULT_FUNC_NAME, DEFAULT_IN_FILE, DEFAULT_OUT_FILE,
};
use crate::proto::App;
use crate::proto_ext::UuidExt;

/// An immutable request shared by every peer of one dispatch.
#[derive(Debug, Clone)]
pub struct Request {
    id: Uuid,
    app: Arc<App>,
}

impl Request {
    /// Correlation id shared by all calls of this request.
    pub fn request_id(&self) -> Uuid {
        self.id
    }

    /// The descriptor sent to every peer.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Shared handle to the descriptor for one more concurrent call.
    pub fn shared(&self) -> Arc<App> {
        Arc::clone(&self.app)
    }
}

/// Builder for [`Request`].
///
/// A new v4 correlation id is generated by [`build`](Self::build) unless one
/// was pinned with [`request_id`](Self::request_id).
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    app_name: String,
    func_name: String,
    client_id: String,
    app_uid: u64,
    in_files: Vec<String>,
    out_files: Vec<String>,
    args: Vec<Vec<u8>>,
    request_id: Option<Uuid>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            func_name: DEFAULT_FUNC_NAME.to_string(),
            client_id: String::new(),
            app_uid: 0,
            in_files: vec![DEFAULT_IN_FILE.to_string()],
            out_files: vec![DEFAULT_OUT_FILE.to_string()],
            args: Vec::new(),
            request_id: None,
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RequestConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            func_name: config.func_name.clone(),
            client_id: config.client_id.clone(),
            app_uid: config.app_uid,
            in_files: config.in_files.clone(),
            out_files: config.out_files.clone(),
            args: Vec::new(),
            request_id: None,
        }
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn func_name(mut self, func_name: impl Into<String>) -> Self {
        self.func_name = func_name.into();
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn app_uid(mut self, app_uid: u64) -> Self {
        self.app_uid = app_uid;
        self
    }

    pub fn in_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.in_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn out_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.out_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn args(mut self, args: Vec<Vec<u8>>) -> Self {
        self.args = args;
        self
    }

    /// Use a fixed correlation id instead of generating one.
    pub fn request_id(mut self, id: Uuid) -> Self {
        self.request_id = Some(id);
        self
    }

    /// Finalize the request.
    pub fn build(self) -> Request {
        let id = self.request_id.unwrap_or_else(Uuid::new_v4);
        let app = App {
            app_name: self.app_name,
            app_uid: self.app_uid,
            request_id: Some(id.to_proto_uuid()),
            client_id: self.client_id,
            func_name: self.func_name,
            in_files: self.in_files,
            out_files: self.out_files,
            args: self.args,
        };

        Request {
            id,
            app: Arc::new(app),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto_ext::AppExt;

    #[test]
    fn test_default_request_matches_reference_app() {
        let request = RequestBuilder::new().build();
        let app = request.app();

        assert_eq!(app.app_name, "mpspdz");
        assert_eq!(app.func_name, "unused");
        assert_eq!(app.app_uid, 0);
        assert!(app.client_id.is_empty());
        assert_eq!(app.in_files, vec!["input".to_string()]);
        assert_eq!(app.out_files, vec!["output".to_string()]);
        assert!(app.args.is_empty());
    }

    #[test]
    fn test_descriptor_carries_request_id() {
        let request = RequestBuilder::new().build();
        assert_eq!(request.app().request_uuid(), Some(request.request_id()));
        assert_eq!(request.request_id().get_version_num(), 4);
    }

    #[test]
    fn test_each_build_generates_new_id() {
        let first = RequestBuilder::new().build();
        let second = RequestBuilder::new().build();
        assert_ne!(first.request_id(), second.request_id());
    }

    #[test]
    fn test_pinned_request_id() {
        let id = Uuid::new_v4();
        let request = RequestBuilder::new().request_id(id).build();
        assert_eq!(request.request_id(), id);
    }

    #[test]
    fn test_from_config_copies_fields() {
        let config = RequestConfig {
            app_name: "sum".to_string(),
            func_name: "main".to_string(),
            client_id: "client-7".to_string(),
            app_uid: 42,
            in_files: vec!["x".to_string(), "y".to_string()],
            out_files: vec!["z".to_string()],
        };

        let request = RequestBuilder::from_config(&config)
            .args(vec![b"--fast".to_vec()])
            .build();
        let app = request.app();

        assert_eq!(app.app_name, "sum");
        assert_eq!(app.func_name, "main");
        assert_eq!(app.client_id, "client-7");
        assert_eq!(app.app_uid, 42);
        assert_eq!(app.in_files, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(app.out_files, vec!["z".to_string()]);
        assert_eq!(app.args, vec![b"--fast".to_vec()]);
    }

    #[test]
    fn test_shared_handles_point_to_same_descriptor() {
        let request = RequestBuilder::new().build();
        let a = request.shared();
        let b = request.clone().shared();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
