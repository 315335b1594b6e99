//! Search request payload derived from the search fields

use crate::api::ApiClient;
use crate::fields::SearchFields;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Characters left untouched by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Query arguments of an image search. Absent keys are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArguments {
    pub zone_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_code_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_directory_code_name: Option<String>,
}

/// Build the arguments of the next search.
///
/// Field contents are passed through as-is. The creator is resolved from the
/// client on every call.
pub fn build_search_arguments(
    fields: &SearchFields,
    dimensions: Option<&Value>,
    api: &dyn ApiClient,
) -> SearchArguments {
    let mut args = SearchArguments {
        zone_ids: fields.code_zones.clone(),
        ..Default::default()
    };

    if let Some(dimensions) = dimensions {
        args.dimensions = Some(encode_dimensions(dimensions));
    }

    args.start_date = fields.start_date;
    args.end_date = fields.end_date;

    if fields.my_images {
        args.created_by = Some(api.current_user().user_name);
    }

    if !fields.keywords.is_empty() {
        args.keywords = Some(fields.keywords.clone());
    }

    args.directory_code_name = non_empty(&fields.directory_code_name);
    args.sub_directory_code_name = non_empty(&fields.sub_directory_code_name);

    args
}

/// URI-component encoded JSON of the dimension constraints
pub fn encode_dimensions(dimensions: &Value) -> String {
    utf8_percent_encode(&dimensions.to_string(), URI_COMPONENT).to_string()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
