//! Image source catalogue
//!
//! Two built-in backends exist. Callers may override their fields per dialog
//! instance but cannot add new ones. Every instance owns its own catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content type identifier of an image backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTypeId(pub u32);

impl ContentTypeId {
    /// General image store
    pub const PICTO: ContentTypeId = ContentTypeId(19);
    /// Zoned image store
    pub const GHT1T: ContentTypeId = ContentTypeId(20);

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short key of a built-in backend, as used in override configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Picto,
    Ght1t,
}

impl SourceKey {
    pub const ALL: [SourceKey; 2] = [SourceKey::Picto, SourceKey::Ght1t];

    /// Id the built-in definition carries
    pub fn builtin_id(&self) -> ContentTypeId {
        match self {
            SourceKey::Picto => ContentTypeId::PICTO,
            SourceKey::Ght1t => ContentTypeId::GHT1T,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKey::Picto => "picto",
            SourceKey::Ght1t => "ght1t",
        }
    }
}

/// One pluggable image backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDefinition {
    pub name: String,
    pub id: ContentTypeId,
    /// Resource searched for images
    pub api_resource_name: String,
    /// Resource returning the filter lookups
    pub configuration_api_resource_name: String,
}

impl SourceDefinition {
    fn builtin(key: SourceKey) -> Self {
        match key {
            SourceKey::Picto => Self {
                name: "Picto".to_string(),
                id: ContentTypeId::PICTO,
                api_resource_name: "images".to_string(),
                configuration_api_resource_name: "images/configuration".to_string(),
            },
            SourceKey::Ght1t => Self {
                name: "GHT1T".to_string(),
                id: ContentTypeId::GHT1T,
                api_resource_name: "images/ght1t".to_string(),
                configuration_api_resource_name: "zones-for-images".to_string(),
            },
        }
    }

    /// Shallow merge: every field present in the override replaces ours
    fn apply(&mut self, patch: &SourceOverride) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(id) = patch.id {
            self.id = id;
        }
        if let Some(resource) = &patch.api_resource_name {
            self.api_resource_name = resource.clone();
        }
        if let Some(resource) = &patch.configuration_api_resource_name {
            self.configuration_api_resource_name = resource.clone();
        }
    }
}

/// Partial source definition supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceOverride {
    pub name: Option<String>,
    pub id: Option<ContentTypeId>,
    pub api_resource_name: Option<String>,
    pub configuration_api_resource_name: Option<String>,
}

/// Per-backend overrides. Unknown keys are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSourceConfig {
    pub picto: Option<SourceOverride>,
    pub ght1t: Option<SourceOverride>,
}

impl ImageSourceConfig {
    pub fn get(&self, key: SourceKey) -> Option<&SourceOverride> {
        match key {
            SourceKey::Picto => self.picto.as_ref(),
            SourceKey::Ght1t => self.ght1t.as_ref(),
        }
    }
}

/// Instance-scoped catalogue of backend definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCatalogue {
    picto: SourceDefinition,
    ght1t: SourceDefinition,
}

impl SourceCatalogue {
    /// Fresh copy of the built-in definitions
    pub fn builtin() -> Self {
        Self {
            picto: SourceDefinition::builtin(SourceKey::Picto),
            ght1t: SourceDefinition::builtin(SourceKey::Ght1t),
        }
    }

    /// Built-in definitions with caller overrides merged on top
    pub fn with_overrides(config: Option<&ImageSourceConfig>) -> Self {
        let mut catalogue = Self::builtin();

        if let Some(config) = config {
            for key in SourceKey::ALL {
                if let Some(patch) = config.get(key) {
                    tracing::debug!("Applying {} source override: {:?}", key.as_str(), patch);
                    catalogue.definition_mut(key).apply(patch);
                }
            }
        }

        catalogue
    }

    /// Definition of a built-in backend, whatever id it was overridden to
    pub fn definition(&self, key: SourceKey) -> &SourceDefinition {
        match key {
            SourceKey::Picto => &self.picto,
            SourceKey::Ght1t => &self.ght1t,
        }
    }

    fn definition_mut(&mut self, key: SourceKey) -> &mut SourceDefinition {
        match key {
            SourceKey::Picto => &mut self.picto,
            SourceKey::Ght1t => &mut self.ght1t,
        }
    }

    /// Definitions in catalogue order
    pub fn iter(&self) -> impl Iterator<Item = &SourceDefinition> {
        [&self.picto, &self.ght1t].into_iter()
    }

    /// Look up a definition by id
    pub fn find(&self, id: ContentTypeId) -> Option<&SourceDefinition> {
        self.iter().find(|def| def.id == id)
    }

    /// Definitions whose id is enabled, in catalogue order
    pub fn enabled(&self, ids: &[ContentTypeId]) -> Vec<SourceDefinition> {
        self.iter()
            .filter(|def| ids.contains(&def.id))
            .cloned()
            .collect()
    }
}

impl Default for SourceCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogue() {
        let catalogue = SourceCatalogue::builtin();
        let ids: Vec<_> = catalogue.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![ContentTypeId(19), ContentTypeId(20)]);
        assert_eq!(catalogue.definition(SourceKey::Ght1t).configuration_api_resource_name, "zones-for-images");
    }

    #[test]
    fn test_override_merges_fields() {
        let config = ImageSourceConfig {
            picto: Some(SourceOverride {
                api_resource_name: Some("cloud/images".into()),
                ..Default::default()
            }),
            ght1t: Some(SourceOverride {
                name: Some("Zones".into()),
                configuration_api_resource_name: Some("zones".into()),
                ..Default::default()
            }),
        };

        let catalogue = SourceCatalogue::with_overrides(Some(&config));
        let picto = catalogue.find(ContentTypeId::PICTO).unwrap();
        assert_eq!(picto.api_resource_name, "cloud/images");
        assert_eq!(picto.name, "Picto");
        assert_eq!(picto.configuration_api_resource_name, "images/configuration");

        let ght1t = catalogue.find(ContentTypeId::GHT1T).unwrap();
        assert_eq!(ght1t.name, "Zones");
        assert_eq!(ght1t.api_resource_name, "images/ght1t");
        assert_eq!(ght1t.configuration_api_resource_name, "zones");
        assert_eq!(catalogue.iter().count(), 2);
    }

    #[test]
    fn test_overrides_do_not_leak_between_instances() {
        let config = ImageSourceConfig {
            picto: Some(SourceOverride {
                name: Some("Mine".into()),
                ..Default::default()
            }),
            ght1t: None,
        };

        let first = SourceCatalogue::with_overrides(Some(&config));
        let second = SourceCatalogue::with_overrides(None);
        assert_eq!(first.definition(SourceKey::Picto).name, "Mine");
        assert_eq!(second.definition(SourceKey::Picto).name, "Picto");
    }

    #[test]
    fn test_unknown_override_keys_ignored() {
        let config: ImageSourceConfig = serde_json::from_value(serde_json::json!({
            "picto": { "name": "P" },
            "flickr": { "name": "F" }
        }))
        .unwrap();

        let catalogue = SourceCatalogue::with_overrides(Some(&config));
        assert_eq!(catalogue.iter().count(), 2);
        assert_eq!(catalogue.definition(SourceKey::Picto).name, "P");
    }

    #[test]
    fn test_enabled_filter() {
        let catalogue = SourceCatalogue::builtin();

        let only_picto = catalogue.enabled(&[ContentTypeId(19), ContentTypeId(19)]);
        assert_eq!(only_picto.len(), 1);
        assert_eq!(only_picto[0].id, ContentTypeId(19));

        // Catalogue order wins over list order
        let both = catalogue.enabled(&[ContentTypeId(20), ContentTypeId(19)]);
        let ids: Vec<_> = both.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![ContentTypeId(19), ContentTypeId(20)]);

        assert!(catalogue.enabled(&[ContentTypeId(99)]).is_empty());
    }
}
