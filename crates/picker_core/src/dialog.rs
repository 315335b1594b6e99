//! Generic search dialog controller
//!
//! Owns the result list, the search fields and the activate/search/dispose
//! lifecycle. Everything content-specific comes from the `SearchStrategy`.

use crate::api::ApiClient;
use crate::error::{PickerError, Result};
use crate::snapshot::{SearchSnapshot, SnapshotStore};
use crate::strategy::SearchStrategy;
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;

/// Item equality used for selection
pub type IsSame<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Options forwarded by the caller to the dialog
pub struct DialogOptions<T> {
    pub is_same: Option<IsSame<T>>,
    pub selected: Option<T>,
    pub search_on_display: bool,
}

impl<T> Default for DialogOptions<T> {
    fn default() -> Self {
        Self {
            is_same: None,
            selected: None,
            search_on_display: false,
        }
    }
}

/// Result list shared with event listeners
pub struct ItemList<T> {
    inner: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for ItemList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> ItemList<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn replace(&self, items: Vec<T>) {
        *self.inner.write() = items;
    }

    /// Remove every item matching `pred`; returns how many were removed
    pub fn remove_where<F: Fn(&T) -> bool>(&self, pred: F) -> usize {
        let mut items = self.inner.write();
        let before = items.len();
        items.retain(|item| !pred(item));
        before - items.len()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.inner.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl<T: Clone> Default for ItemList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Search responses come either as a bare list or wrapped with paging data
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse<T> {
    List(Vec<T>),
    Page { items: Vec<T> },
}

impl<T> SearchResponse<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            SearchResponse::List(items) => items,
            SearchResponse::Page { items } => items,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Created,
    Active,
    Disposed,
}

/// Search dialog driven by a strategy
pub struct DialogController<S: SearchStrategy> {
    strategy: Arc<S>,
    api: Arc<dyn ApiClient>,
    fields: S::Fields,
    items: ItemList<S::Item>,
    selected: Option<S::Item>,
    is_same: Option<IsSame<S::Item>>,
    search_on_display: bool,
    snapshots: SnapshotStore,
    state: DialogState,
}

impl<S: SearchStrategy> DialogController<S> {
    /// Create the controller, resuming from the last snapshot when one exists
    pub fn new(
        strategy: Arc<S>,
        api: Arc<dyn ApiClient>,
        options: DialogOptions<S::Item>,
        snapshots: SnapshotStore,
    ) -> Self {
        let mut fields = match snapshots.load() {
            Some(snapshot) => {
                tracing::debug!("Restoring last search snapshot");
                strategy.reconcile_snapshot(snapshot).restore::<S::Fields>()
            }
            None => S::Fields::default(),
        };
        strategy.normalize_fields(&mut fields);

        Self {
            strategy,
            api,
            fields,
            items: ItemList::new(),
            selected: options.selected,
            is_same: options.is_same,
            search_on_display: options.search_on_display,
            snapshots,
            state: DialogState::Created,
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn fields(&self) -> &S::Fields {
        &self.fields
    }

    /// Edit the fields; invariants are restored before returning
    pub fn update_fields<R>(&mut self, edit: impl FnOnce(&mut S::Fields) -> R) -> R {
        let result = edit(&mut self.fields);
        self.strategy.normalize_fields(&mut self.fields);
        result
    }

    /// Resource the next search goes to, recomputed from the current fields
    pub fn api_resource_name(&self) -> String {
        self.strategy.api_resource_name(&self.fields)
    }

    pub fn items(&self) -> &ItemList<S::Item> {
        &self.items
    }

    /// Payload the next search would send
    pub fn search_arguments(&self) -> Result<serde_json::Value> {
        self.strategy.build_search_arguments(&self.fields, self.api.as_ref())
    }

    /// Load lookups, then search right away if asked to
    pub async fn activate(&mut self) -> Result<()> {
        self.ensure_alive()?;

        self.strategy.load_lookups(self.api.as_ref()).await?;
        self.state = DialogState::Active;
        tracing::debug!("Search dialog activated");

        if self.search_on_display {
            self.search().await?;
        }
        Ok(())
    }

    /// Run a search with the current fields; returns the number of results
    pub async fn search(&mut self) -> Result<usize> {
        self.ensure_alive()?;

        let args = self.search_arguments()?;
        let resource = self.api_resource_name();
        self.snapshots.save(SearchSnapshot::capture(&self.fields)?);

        tracing::info!("Searching {} with {}", resource, args);
        let response = self.api.query(&resource, &args).await?;
        let items = serde_json::from_value::<SearchResponse<S::Item>>(response)?.into_items();

        let count = items.len();
        self.items.replace(items);
        Ok(count)
    }

    pub fn select(&mut self, item: S::Item) {
        self.selected = Some(item);
    }

    pub fn selected(&self) -> Option<&S::Item> {
        self.selected.as_ref()
    }

    /// Whether `item` is the selected one, according to the caller's equality
    pub fn is_selected(&self, item: &S::Item) -> bool {
        match (&self.selected, &self.is_same) {
            (Some(selected), Some(is_same)) => is_same(selected, item),
            _ => false,
        }
    }

    /// Release the results. Calling it again does nothing.
    pub fn dispose(&mut self) -> bool {
        if self.state == DialogState::Disposed {
            return false;
        }
        self.items.clear();
        self.selected = None;
        self.state = DialogState::Disposed;
        tracing::debug!("Search dialog disposed");
        true
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.state == DialogState::Disposed {
            return Err(PickerError::Disposed);
        }
        Ok(())
    }
}
