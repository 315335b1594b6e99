//! Image picker search state
//!
//! This crate contains:
//! - Image source catalogue and per-instance overrides
//! - Search fields and request arguments
//! - Lookup loading for filter controls
//! - Last-search snapshots and their reconciliation
//! - Named-event bus
//! - Generic search dialog controller and the image strategy plugged into it

pub mod api;
pub mod arguments;
pub mod config;
pub mod dialog;
pub mod error;
pub mod events;
pub mod fields;
pub mod image_search;
pub mod lookups;
pub mod snapshot;
pub mod source;
pub mod strategy;

pub use api::{ApiClient, CurrentUser};
pub use arguments::{build_search_arguments, encode_dimensions, SearchArguments};
pub use config::PickerConfig;
pub use dialog::{DialogController, DialogOptions, DialogState, IsSame, ItemList};
pub use error::{ApiError, PickerError, Result};
pub use events::{EventBus, Subscription, IMAGE_REMOVED};
pub use fields::SearchFields;
pub use image_search::{ImageDialogSearch, ImageItem, ImagePickerSettings, ImageSearchStrategy};
pub use lookups::{load_lookups, LookupData, Zone};
pub use snapshot::{reconcile_snapshot, SearchSnapshot, SnapshotStore};
pub use source::{ContentTypeId, ImageSourceConfig, SourceCatalogue, SourceDefinition, SourceKey, SourceOverride};
pub use strategy::SearchStrategy;
