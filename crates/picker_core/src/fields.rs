//! User-editable search inputs

use crate::source::{ContentTypeId, SourceDefinition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Search field state of the image dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFields {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub keywords: String,
    pub my_images: bool,
    pub code_zones: Vec<String>,
    pub content_type_id: ContentTypeId,
    pub directory_code_name: Option<String>,
    pub sub_directory_code_name: Option<String>,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            keywords: String::new(),
            my_images: false,
            code_zones: Vec::new(),
            content_type_id: ContentTypeId::PICTO,
            directory_code_name: None,
            sub_directory_code_name: None,
        }
    }
}

impl SearchFields {
    /// Keep `content_type_id` pointing at an enabled type.
    ///
    /// Returns true if the value had to be corrected.
    pub fn ensure_content_type(&mut self, enabled: &[SourceDefinition]) -> bool {
        if enabled.iter().any(|def| def.id == self.content_type_id) {
            return false;
        }

        match enabled.first() {
            Some(first) => {
                tracing::debug!(
                    "Content type {} not enabled, falling back to {}",
                    self.content_type_id,
                    first.id
                );
                self.content_type_id = first.id;
                true
            }
            None => false,
        }
    }
}
