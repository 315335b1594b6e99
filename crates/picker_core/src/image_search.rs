//! Image search dialog
//!
//! `ImageSearchStrategy` supplies the image-specific behavior to the generic
//! `DialogController`; `ImageDialogSearch` wires both to the event bus so
//! images deleted elsewhere disappear from the result list.

use crate::api::ApiClient;
use crate::arguments::build_search_arguments;
use crate::config::PickerConfig;
use crate::dialog::{DialogController, DialogOptions, DialogState, IsSame, ItemList};
use crate::error::Result;
use crate::events::{EventBus, Subscription, IMAGE_REMOVED};
use crate::fields::SearchFields;
use crate::lookups::{load_lookups, LookupData};
use crate::snapshot::{reconcile_snapshot, SearchSnapshot, SnapshotStore};
use crate::source::{ContentTypeId, SourceCatalogue, SourceDefinition};
use crate::strategy::SearchStrategy;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// One image search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    /// Identifying key, also carried by "image removed" notifications
    pub id_as_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Construction parameters of an image dialog
pub struct ImagePickerSettings {
    pub api: Arc<dyn ApiClient>,
    pub config: PickerConfig,
    pub is_same: Option<IsSame<ImageItem>>,
    pub selected: Option<ImageItem>,
}

impl ImagePickerSettings {
    pub fn new(api: Arc<dyn ApiClient>, config: PickerConfig) -> Self {
        Self {
            api,
            config,
            is_same: None,
            selected: None,
        }
    }
}

/// Image-specific search behavior
pub struct ImageSearchStrategy {
    catalogue: SourceCatalogue,
    content_types: Vec<SourceDefinition>,
    enabled_ids: Vec<ContentTypeId>,
    dimensions: Option<Value>,
    lookups: RwLock<LookupData>,
}

impl ImageSearchStrategy {
    pub fn new(config: &PickerConfig) -> Self {
        let catalogue = SourceCatalogue::with_overrides(config.image_source_config.as_ref());
        let content_types = catalogue.enabled(&config.content_type_ids);
        if content_types.is_empty() {
            tracing::warn!("No image source enabled for {:?}", config.content_type_ids);
        }

        Self {
            catalogue,
            content_types,
            enabled_ids: config.content_type_ids.clone(),
            dimensions: config.dimensions.clone(),
            lookups: RwLock::new(LookupData::default()),
        }
    }

    pub fn catalogue(&self) -> &SourceCatalogue {
        &self.catalogue
    }

    /// Backends the user may choose from
    pub fn content_types(&self) -> &[SourceDefinition] {
        &self.content_types
    }

    pub fn lookups(&self) -> LookupData {
        self.lookups.read().clone()
    }
}

#[async_trait]
impl SearchStrategy for ImageSearchStrategy {
    type Fields = SearchFields;
    type Item = ImageItem;

    fn api_resource_name(&self, fields: &SearchFields) -> String {
        self.catalogue
            .find(fields.content_type_id)
            .map(|def| def.api_resource_name.clone())
            .unwrap_or_default()
    }

    fn build_search_arguments(&self, fields: &SearchFields, api: &dyn ApiClient) -> Result<Value> {
        let args = build_search_arguments(fields, self.dimensions.as_ref(), api);
        Ok(serde_json::to_value(args)?)
    }

    async fn load_lookups(&self, api: &dyn ApiClient) -> Result<()> {
        load_lookups(api, &self.catalogue, &self.enabled_ids, &self.lookups).await
    }

    fn reconcile_snapshot(&self, snapshot: SearchSnapshot) -> SearchSnapshot {
        reconcile_snapshot(snapshot, &self.content_types)
    }

    fn normalize_fields(&self, fields: &mut SearchFields) {
        fields.ensure_content_type(&self.content_types);
    }
}

/// Image picker search dialog
pub struct ImageDialogSearch {
    strategy: Arc<ImageSearchStrategy>,
    controller: DialogController<ImageSearchStrategy>,
    removed_listener: Option<Subscription>,
}

impl ImageDialogSearch {
    /// Build the dialog and start listening for removed images.
    ///
    /// Call `activate` afterwards to load lookups.
    pub fn new(settings: ImagePickerSettings, bus: &EventBus, snapshots: SnapshotStore) -> Self {
        let strategy = Arc::new(ImageSearchStrategy::new(&settings.config));
        let options = DialogOptions {
            is_same: settings.is_same,
            selected: settings.selected,
            search_on_display: settings.config.search_on_display,
        };
        let controller = DialogController::new(strategy.clone(), settings.api, options, snapshots);

        let items = controller.items().clone();
        let removed_listener = bus.subscribe(IMAGE_REMOVED, move |id_as_url| {
            let removed = items.remove_where(|item| item.id_as_url == id_as_url);
            if removed > 0 {
                tracing::debug!("Removed {} deleted image(s) {}", removed, id_as_url);
            }
        });

        Self {
            strategy,
            controller,
            removed_listener: Some(removed_listener),
        }
    }

    /// Load lookups; failures from any backend are returned as-is
    pub async fn activate(&mut self) -> Result<()> {
        self.controller.activate().await
    }

    pub async fn search(&mut self) -> Result<usize> {
        self.controller.search().await
    }

    /// Payload the next search would send
    pub fn search_arguments(&self) -> Result<Value> {
        self.controller.search_arguments()
    }

    pub fn fields(&self) -> &SearchFields {
        self.controller.fields()
    }

    /// Edit the fields; an invalid content type falls back to the first enabled one
    pub fn update_fields<R>(&mut self, edit: impl FnOnce(&mut SearchFields) -> R) -> R {
        self.controller.update_fields(edit)
    }

    pub fn set_content_type(&mut self, id: ContentTypeId) {
        self.update_fields(|fields| fields.content_type_id = id);
    }

    /// Resource searched for the selected content type; empty if unknown
    pub fn api_resource_name(&self) -> String {
        self.controller.api_resource_name()
    }

    pub fn content_types(&self) -> &[SourceDefinition] {
        self.strategy.content_types()
    }

    pub fn lookups(&self) -> LookupData {
        self.strategy.lookups()
    }

    pub fn items(&self) -> &ItemList<ImageItem> {
        self.controller.items()
    }

    pub fn select(&mut self, item: ImageItem) {
        self.controller.select(item);
    }

    pub fn selected(&self) -> Option<&ImageItem> {
        self.controller.selected()
    }

    pub fn is_selected(&self, item: &ImageItem) -> bool {
        self.controller.is_selected(item)
    }

    pub fn state(&self) -> DialogState {
        self.controller.state()
    }

    /// Tear down the dialog, then stop listening. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.controller.dispose();
        if let Some(listener) = self.removed_listener.take() {
            listener.cancel();
        }
    }
}

impl Drop for ImageDialogSearch {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::error::{ApiError, PickerError};
    use serde_json::json;

    fn config(ids: &[u32]) -> PickerConfig {
        PickerConfig {
            content_type_ids: ids.iter().copied().map(ContentTypeId).collect(),
            ..Default::default()
        }
    }

    fn dialog(api: Arc<MockApi>, config: PickerConfig, bus: &EventBus, store: SnapshotStore) -> ImageDialogSearch {
        ImageDialogSearch::new(ImagePickerSettings::new(api, config), bus, store)
    }

    fn images(ids: &[&str]) -> Value {
        Value::Array(ids.iter().map(|id| json!({ "idAsUrl": id, "title": "t" })).collect())
    }

    #[test]
    fn test_content_types_and_resource_name() {
        let bus = EventBus::new();
        let mut picker = dialog(Arc::new(MockApi::new()), config(&[20, 19, 20]), &bus, SnapshotStore::new());

        let ids: Vec<_> = picker.content_types().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![ContentTypeId(19), ContentTypeId(20)]);
        assert_eq!(picker.api_resource_name(), "images");

        picker.set_content_type(ContentTypeId::GHT1T);
        assert_eq!(picker.api_resource_name(), "images/ght1t");
    }

    #[test]
    fn test_invalid_content_type_corrected() {
        let bus = EventBus::new();
        let mut picker = dialog(Arc::new(MockApi::new()), config(&[20]), &bus, SnapshotStore::new());

        // Default field value 19 is not enabled here
        assert_eq!(picker.fields().content_type_id, ContentTypeId::GHT1T);

        picker.set_content_type(ContentTypeId(42));
        assert_eq!(picker.fields().content_type_id, ContentTypeId::GHT1T);
    }

    #[test]
    fn test_unknown_type_resolves_to_empty_resource() {
        let bus = EventBus::new();
        let picker = dialog(Arc::new(MockApi::new()), config(&[]), &bus, SnapshotStore::new());
        assert!(picker.content_types().is_empty());

        let strategy = ImageSearchStrategy::new(&config(&[]));
        let fields = SearchFields {
            content_type_id: ContentTypeId(77),
            ..Default::default()
        };
        assert_eq!(strategy.api_resource_name(&fields), "");
        assert_eq!(picker.api_resource_name(), "images");
    }

    #[test]
    fn test_search_arguments_with_dimensions() {
        let bus = EventBus::new();
        let mut cfg = config(&[19]);
        cfg.dimensions = Some(json!({ "w": 1 }));
        let mut picker = dialog(Arc::new(MockApi::new().with_user("alice")), cfg, &bus, SnapshotStore::new());
        picker.update_fields(|f| f.my_images = true);

        assert_eq!(
            picker.search_arguments().unwrap(),
            json!({ "zoneIds": [], "dimensions": "%7B%22w%22%3A1%7D", "createdBy": "alice" })
        );
    }

    #[tokio::test]
    async fn test_activate_loads_lookups() {
        let api = Arc::new(
            MockApi::new()
                .respond("zones-for-images", Ok(json!([{ "id": 3, "name": "Gaspésie" }])))
                .respond("images/configuration", Ok(json!({
                    "directoryCodeNames": ["archives"],
                    "subDirectoryCodeNames": ["1990"]
                }))),
        );
        let bus = EventBus::new();
        let mut picker = dialog(api, config(&[19, 20]), &bus, SnapshotStore::new());

        picker.activate().await.unwrap();

        let lookups = picker.lookups();
        assert_eq!(lookups.zones[0].name.as_deref(), Some("Gaspésie"));
        assert_eq!(lookups.cloudinary_directories, vec!["archives"]);
        assert_eq!(picker.state(), DialogState::Active);
    }

    #[tokio::test]
    async fn test_activate_propagates_lookup_failure() {
        let api = Arc::new(MockApi::new().respond("zones-for-images", Err(ApiError::Unauthorized("token".into()))));
        let bus = EventBus::new();
        let mut picker = dialog(api, config(&[20]), &bus, SnapshotStore::new());

        let err = picker.activate().await.unwrap_err();
        assert!(matches!(err, PickerError::Api(ApiError::Unauthorized(_))));

        // Teardown stays reliable after a failed activation
        picker.dispose();
        assert_eq!(bus.listener_count(IMAGE_REMOVED), 0);
    }

    #[tokio::test]
    async fn test_removed_image_leaves_results() {
        let api = Arc::new(MockApi::new().respond("images", Ok(images(&["a", "b", "c"]))));
        let bus = EventBus::new();
        let mut picker = dialog(api, config(&[19]), &bus, SnapshotStore::new());

        assert_eq!(picker.search().await.unwrap(), 3);
        bus.emit(IMAGE_REMOVED, "b");

        let left: Vec<_> = picker.items().to_vec().into_iter().map(|i| i.id_as_url).collect();
        assert_eq!(left, vec!["a", "c"]);
        assert_eq!(picker.items().to_vec()[0].extra["title"], "t");
    }

    #[tokio::test]
    async fn test_dispose_unsubscribes() {
        let api = Arc::new(MockApi::new().respond("images", Ok(images(&["a", "b"]))));
        let bus = EventBus::new();
        let mut picker = dialog(api, config(&[19]), &bus, SnapshotStore::new());
        picker.search().await.unwrap();
        let items = picker.items().clone();

        assert_eq!(bus.listener_count(IMAGE_REMOVED), 1);
        picker.dispose();
        picker.dispose();
        assert_eq!(bus.listener_count(IMAGE_REMOVED), 0);

        items.replace(vec![ImageItem { id_as_url: "a".into(), extra: Map::new() }]);
        assert_eq!(bus.emit(IMAGE_REMOVED, "a"), 0);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = EventBus::new();
        {
            let _first = dialog(Arc::new(MockApi::new()), config(&[19]), &bus, SnapshotStore::new());
            let _second = dialog(Arc::new(MockApi::new()), config(&[19]), &bus, SnapshotStore::new());
            assert_eq!(bus.listener_count(IMAGE_REMOVED), 2);
        }
        assert_eq!(bus.listener_count(IMAGE_REMOVED), 0);
    }

    #[tokio::test]
    async fn test_snapshot_reconciled_on_reopen() {
        let api = Arc::new(MockApi::new().respond("images/ght1t", Ok(json!([]))));
        let bus = EventBus::new();
        let store = SnapshotStore::new();

        let mut first = dialog(api.clone(), config(&[19, 20]), &bus, store.clone());
        first.update_fields(|f| {
            f.content_type_id = ContentTypeId::GHT1T;
            f.keywords = "lighthouse".into();
        });
        first.search().await.unwrap();
        first.dispose();

        // Reopened with only picto allowed
        let second = dialog(api, config(&[19]), &bus, store);
        assert_eq!(second.fields().content_type_id, ContentTypeId::PICTO);
        assert_eq!(second.fields().keywords, "lighthouse");
    }

    #[test]
    fn test_selection() {
        let bus = EventBus::new();
        let selected = ImageItem { id_as_url: "x".into(), extra: Map::new() };
        let mut settings = ImagePickerSettings::new(Arc::new(MockApi::new()), config(&[19]));
        settings.is_same = Some(Arc::new(|a: &ImageItem, b: &ImageItem| a.id_as_url == b.id_as_url));
        settings.selected = Some(selected.clone());

        let picker = ImageDialogSearch::new(settings, &bus, SnapshotStore::new());
        assert_eq!(picker.selected(), Some(&selected));
        assert!(picker.is_selected(&ImageItem { id_as_url: "x".into(), extra: Map::new() }));
    }
}
