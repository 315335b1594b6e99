//! Filter-control lookup data (zones, directories)
//!
//! Each enabled backend exposes its own configuration resource. Fetches run
//! concurrently and the load fails on the first error; data already written by
//! a completed fetch stays in place.

use crate::api::ApiClient;
use crate::error::Result;
use crate::source::{ContentTypeId, SourceCatalogue, SourceKey};
use futures::future::{try_join_all, BoxFuture, FutureExt};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Zone record returned by the ght1t configuration resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Option lists for the filter controls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupData {
    pub cloudinary_directories: Vec<String>,
    pub cloudinary_sub_directories: Vec<String>,
    pub zones: Vec<Zone>,
}

/// Payload of the picto configuration resource. Missing or null lists are empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DirectoryLookups {
    directory_code_names: Option<Vec<String>>,
    sub_directory_code_names: Option<Vec<String>>,
}

/// Fetch the lookups of every enabled backend into `lookups`
pub async fn load_lookups(
    api: &dyn ApiClient,
    catalogue: &SourceCatalogue,
    enabled: &[ContentTypeId],
    lookups: &RwLock<LookupData>,
) -> Result<()> {
    let mut pending: Vec<BoxFuture<'_, Result<()>>> = Vec::new();

    if enabled.contains(&SourceKey::Ght1t.builtin_id()) {
        let resource = catalogue.definition(SourceKey::Ght1t).configuration_api_resource_name.as_str();
        pending.push(load_zones(api, resource, lookups).boxed());
    }

    if enabled.contains(&SourceKey::Picto.builtin_id()) {
        let resource = catalogue.definition(SourceKey::Picto).configuration_api_resource_name.as_str();
        pending.push(load_directories(api, resource, lookups).boxed());
    }

    if pending.is_empty() {
        tracing::debug!("No lookup backend enabled");
        return Ok(());
    }

    try_join_all(pending).await.map(|_| ())
}

async fn load_zones(api: &dyn ApiClient, resource: &str, lookups: &RwLock<LookupData>) -> Result<()> {
    tracing::debug!("Loading zones from {}", resource);

    let payload = api.fetch(resource).await.map_err(|e| {
        tracing::warn!("Zone lookup failed: {}", e);
        e
    })?;
    let zones: Vec<Zone> = serde_json::from_value(payload)?;

    tracing::debug!("Loaded {} zones", zones.len());
    lookups.write().zones = zones;
    Ok(())
}

async fn load_directories(api: &dyn ApiClient, resource: &str, lookups: &RwLock<LookupData>) -> Result<()> {
    tracing::debug!("Loading directories from {}", resource);

    let payload = api.fetch(resource).await.map_err(|e| {
        tracing::warn!("Directory lookup failed: {}", e);
        e
    })?;
    let dirs: DirectoryLookups = serde_json::from_value(payload)?;

    let mut lookups = lookups.write();
    lookups.cloudinary_directories = dirs.directory_code_names.unwrap_or_default();
    lookups.cloudinary_sub_directories = dirs.sub_directory_code_names.unwrap_or_default();
    Ok(())
}
