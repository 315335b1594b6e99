//! Injected API client contract

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authenticated user, as reported by the API client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_name: String,
}

/// Transport used by the dialog. Timeouts and retries belong here, not to callers.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// GET a resource
    async fn fetch(&self, resource: &str) -> Result<Value, ApiError>;

    /// GET a resource with query arguments
    async fn query(&self, resource: &str, args: &Value) -> Result<Value, ApiError>;

    /// Currently authenticated user
    fn current_user(&self) -> CurrentUser;
}
