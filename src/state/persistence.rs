use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::scheduler::Debouncer;
use super::storage::StorageBackend;
use crate::element::Element;
use crate::error::{PersistenceError, PersistenceResult};
use crate::event::{EditorEvent, EventBus, EventHandler, ListenerId};
use crate::store::ElementStore;
use crate::util::time;

pub const DEFAULT_STORAGE_KEY: &str = "blog-builder-autosave";
pub const DEFAULT_METADATA_KEY: &str = "blog-builder-metadata";
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);

/// Builder metadata stored next to the elements (title, slug, category and
/// any other free-form keys)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BuilderMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.slug.is_none() && self.category.is_none() && self.extra.is_empty()
    }
}

/// What the primary storage entry holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub elements: Vec<Element>,
    #[serde(default)]
    pub metadata: Option<BuilderMetadata>,
    /// Milliseconds since the UNIX epoch
    #[serde(default)]
    pub timestamp: u64,
}

/// Where and how often the builder state is saved
#[derive(Debug, Clone, PartialEq)]
pub struct AutoSaveSettings {
    pub interval: Duration,
    pub storage_key: String,
    pub metadata_key: String,
}

impl Default for AutoSaveSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_AUTOSAVE_INTERVAL,
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            metadata_key: DEFAULT_METADATA_KEY.to_owned(),
        }
    }
}

/// Debounced persistence of the element store and builder metadata.
///
/// Storage failures are logged and reported as [`EditorEvent::SaveFailed`];
/// they never reach the editing path. The in-memory store stays the source
/// of truth.
pub struct AutoSave {
    storage: Box<dyn StorageBackend>,
    settings: AutoSaveSettings,
    debouncer: Debouncer,
    dirty: bool,
    last_save: Option<u64>,
    event_bus: EventBus,
}

impl std::fmt::Debug for AutoSave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSave")
            .field("settings", &self.settings)
            .field("debouncer", &self.debouncer)
            .field("dirty", &self.dirty)
            .field("last_save", &self.last_save)
            .finish_non_exhaustive()
    }
}

impl AutoSave {
    pub fn new(storage: Box<dyn StorageBackend>, settings: AutoSaveSettings) -> Self {
        Self {
            debouncer: Debouncer::new(settings.interval),
            storage,
            settings,
            dirty: false,
            last_save: None,
            event_bus: EventBus::new(),
        }
    }

    pub fn settings(&self) -> &AutoSaveSettings {
        &self.settings
    }

    /// Flag unsaved changes and push the save out by one interval
    pub fn mark_dirty(&mut self, now: f64) {
        self.dirty = true;
        self.debouncer.schedule(now);
    }

    /// Run the pending save if its quiet period has elapsed.
    /// Returns true when a save was attempted.
    pub fn poll(&mut self, now: f64, store: &ElementStore) -> bool {
        if self.debouncer.poll(now).is_some() {
            self.save(store);
            true
        } else {
            false
        }
    }

    /// Write elements, metadata and a timestamp to the primary key.
    /// Does nothing when there are no unsaved changes.
    pub fn save(&mut self, store: &ElementStore) {
        if !self.dirty {
            return;
        }

        match self.write_snapshot(store) {
            Ok(timestamp) => {
                self.dirty = false;
                self.last_save = Some(timestamp);
                log::info!("Blog builder auto-saved ({} elements)", store.len());
                self.event_bus.emit(EditorEvent::Saved { timestamp });
            }
            Err(err) => {
                log::error!("Error auto-saving blog builder: {}", err);
                self.event_bus.emit(EditorEvent::SaveFailed {
                    error: err.to_string(),
                });
            }
        }
    }

    fn write_snapshot(&mut self, store: &ElementStore) -> PersistenceResult<u64> {
        let timestamp = time::timestamp_millis();
        let metadata = self.metadata();
        let snapshot = SnapshotRef {
            elements: store.elements_data(),
            metadata: &metadata,
            timestamp,
        };
        let json = serde_json::to_string(&snapshot)?;
        self.storage.set_item(&self.settings.storage_key, &json)?;
        Ok(timestamp)
    }

    /// Restore the store and metadata from the primary key.
    ///
    /// Missing, unreadable or malformed state yields `None` and leaves the
    /// store untouched.
    pub fn load(&mut self, store: &mut ElementStore) -> Option<PersistedSnapshot> {
        let raw = match self.storage.get_item(&self.settings.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::error!("Error loading auto-saved blog builder: {}", err);
                return None;
            }
        };

        let snapshot: PersistedSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("Ignoring malformed auto-save: {}", err);
                return None;
            }
        };

        store.load_elements_data(snapshot.elements.clone());
        if let Some(metadata) = &snapshot.metadata {
            self.save_metadata(metadata);
        }
        log::info!("Blog builder loaded from auto-save");
        self.event_bus.emit(EditorEvent::Restored {
            element_count: snapshot.elements.len(),
        });
        Some(snapshot)
    }

    /// Write metadata to its own key, independent of the element saves.
    /// Failures are reported like element save failures.
    pub fn save_metadata(&mut self, metadata: &BuilderMetadata) {
        let result: Result<(), PersistenceError> = serde_json::to_string(metadata)
            .map_err(PersistenceError::from)
            .and_then(|json| {
                self.storage
                    .set_item(&self.settings.metadata_key, &json)
                    .map_err(PersistenceError::from)
            });
        if let Err(err) = result {
            log::error!("Error saving metadata: {}", err);
            self.event_bus.emit(EditorEvent::SaveFailed {
                error: err.to_string(),
            });
        }
    }

    /// Stored metadata, empty when missing or unreadable
    pub fn metadata(&self) -> BuilderMetadata {
        match self.storage.get_item(&self.settings.metadata_key) {
            Ok(Some(raw)) => serde_json::from_str::<Option<BuilderMetadata>>(&raw)
                .ok()
                .flatten()
                .unwrap_or_default(),
            Ok(None) => BuilderMetadata::default(),
            Err(err) => {
                log::warn!("Error reading metadata: {}", err);
                BuilderMetadata::default()
            }
        }
    }

    /// Remove both keys and forget any pending save
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.dirty = false;
        for key in [&self.settings.storage_key, &self.settings.metadata_key] {
            if let Err(err) = self.storage.remove_item(key) {
                log::error!("Error clearing auto-save key {}: {}", key, err);
            }
        }
        log::info!("Blog builder auto-save cleared");
        self.event_bus.emit(EditorEvent::SaveCleared);
    }

    /// Save right away, skipping the debounce window
    pub fn force_save(&mut self, store: &ElementStore) {
        self.debouncer.cancel();
        self.save(store);
    }

    /// Epoch milliseconds of the last successful save
    pub fn last_save_time(&self) -> Option<u64> {
        self.last_save
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn has_pending_save(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Clock time at which the pending save fires
    pub fn next_save_at(&self) -> Option<f64> {
        self.debouncer.pending().map(|task| task.due_at)
    }

    pub fn subscribe(&mut self, handler: Box<dyn EventHandler>) -> ListenerId {
        self.event_bus.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.event_bus.unsubscribe(id)
    }
}

/// Borrowing twin of [`PersistedSnapshot`] so saving does not copy elements
#[derive(Serialize)]
struct SnapshotRef<'a> {
    elements: &'a [Element],
    metadata: &'a BuilderMetadata,
    timestamp: u64,
}
