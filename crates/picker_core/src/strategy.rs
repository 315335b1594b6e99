//! Strategy plugged into the generic search dialog

use crate::api::ApiClient;
use crate::error::Result;
use crate::snapshot::SearchSnapshot;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Content-specific behavior of a search dialog
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    /// User-editable search inputs
    type Fields: Serialize + DeserializeOwned + Default + Clone + Send + Sync;
    /// One search result
    type Item: DeserializeOwned + Clone + Send + Sync + 'static;

    /// Resource queried for the current field state
    fn api_resource_name(&self, fields: &Self::Fields) -> String;

    /// Request payload for the current field state
    fn build_search_arguments(&self, fields: &Self::Fields, api: &dyn ApiClient) -> Result<Value>;

    /// Fetch the option lists the filter controls need
    async fn load_lookups(&self, api: &dyn ApiClient) -> Result<()>;

    /// Repair a restored snapshot before it is applied
    fn reconcile_snapshot(&self, snapshot: SearchSnapshot) -> SearchSnapshot {
        snapshot
    }

    /// Re-establish field invariants after construction or any edit
    fn normalize_fields(&self, _fields: &mut Self::Fields) {}
}
