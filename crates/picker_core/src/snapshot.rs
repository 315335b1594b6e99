//! Last-search snapshots
//!
//! A snapshot records the raw field state of the last search so the next
//! dialog can resume from it. Unknown keys are carried through untouched.

use crate::source::{ContentTypeId, SourceDefinition};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

const CONTENT_TYPE_ID: &str = "contentTypeId";

/// Persisted search state
///
/// `search_fields` is `None` when the key is absent and `Some(None)` when it
/// was recorded as `null`; both are written back the way they were read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub search_fields: Option<Option<Map<String, Value>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl SearchSnapshot {
    /// Record the given field state
    pub fn capture<F: Serialize>(fields: &F) -> serde_json::Result<Self> {
        let search_fields = match serde_json::to_value(fields)? {
            Value::Object(map) => Some(Some(map)),
            _ => None,
        };
        Ok(Self {
            search_fields,
            extra: Map::new(),
        })
    }

    /// Recorded field map, if any
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.search_fields.as_ref()?.as_ref()
    }

    fn fields_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.search_fields.as_mut()?.as_mut()
    }

    /// Rebuild field state.
    ///
    /// Recorded keys are applied one at a time over the defaults; a key whose
    /// value cannot be read keeps its default and the others still apply.
    pub fn restore<F: Serialize + DeserializeOwned + Default>(&self) -> F {
        let Some(recorded) = self.fields() else {
            return F::default();
        };

        let mut merged = match serde_json::to_value(F::default()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        for (key, value) in recorded {
            let mut candidate = merged.clone();
            candidate.insert(key.clone(), value.clone());
            match serde_json::from_value::<F>(Value::Object(candidate.clone())) {
                Ok(_) => merged = candidate,
                Err(e) => tracing::warn!("Ignoring unreadable snapshot field {}: {}", key, e),
            }
        }

        serde_json::from_value(Value::Object(merged)).unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable search snapshot: {}", e);
            F::default()
        })
    }

    /// Recorded content type, if present and numeric
    pub fn content_type_id(&self) -> Option<ContentTypeId> {
        self.fields()?
            .get(CONTENT_TYPE_ID)?
            .as_u64()
            .and_then(|id| u32::try_from(id).ok())
            .filter(|id| *id != 0)
            .map(ContentTypeId)
    }
}

/// Point the snapshot's content type at an enabled type.
///
/// Snapshots without field state, and situations where nothing is enabled,
/// are returned unchanged.
pub fn reconcile_snapshot(mut snapshot: SearchSnapshot, enabled: &[SourceDefinition]) -> SearchSnapshot {
    let recorded = snapshot.content_type_id();
    let still_enabled = recorded.map_or(false, |id| enabled.iter().any(|def| def.id == id));
    if still_enabled {
        return snapshot;
    }

    let Some(first) = enabled.first() else {
        return snapshot;
    };
    if let Some(fields) = snapshot.fields_mut() {
        tracing::info!(
            "Snapshot content type {:?} no longer enabled, using {}",
            recorded,
            first.id
        );
        fields.insert(CONTENT_TYPE_ID.to_string(), Value::from(first.id.as_u32()));
    }

    snapshot
}

/// Last-search snapshot shared by every dialog built from it
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<Mutex<Option<SearchSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, snapshot: SearchSnapshot) {
        *self.inner.lock() = Some(snapshot);
    }

    pub fn load(&self) -> Option<SearchSnapshot> {
        self.inner.lock().clone()
    }

    pub fn clear(&self) {
        *self.inner.lock() = None;
    }
}
