use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use parking_lot::Mutex;

use crate::command::{Command, CommandHistory, CommandResult};
use crate::config::EditorConfig;
use crate::element::{
    Dimension, Element, ElementId, ElementKind, MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH, Position, clamp_extent,
};
use crate::export::{self, ExportDocument};
use crate::state::{AutoSave, BuilderMetadata, MemoryStorage, PersistedSnapshot, StorageBackend};
use crate::store::{Alignment, ElementStore};
use crate::toast::{ToastLevel, Toasts};
use crate::tools::{DragDropCoordinator, DropAction};
use crate::util::time;

/// Source of "now" for debouncing and toast expiry, in seconds
pub trait Clock: Send {
    fn now(&self) -> f64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        time::current_time_secs()
    }
}

/// Clock that only moves when told to; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, now: f64) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, secs: f64) {
        *self.now.lock() += secs;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}

/// One editing session: owns the store, history, auto-save, drag-drop
/// state and toasts, and routes every edit through the history.
pub struct EditorSession {
    store: ElementStore,
    history: CommandHistory,
    autosave: AutoSave,
    drag_drop: DragDropCoordinator,
    toasts: Toasts,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("store", &self.store)
            .field("history", &self.history)
            .field("autosave", &self.autosave)
            .field("drag_drop", &self.drag_drop)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    pub fn new(config: &EditorConfig, storage: Box<dyn StorageBackend>, clock: Box<dyn Clock>) -> Self {
        Self {
            store: ElementStore::new(),
            history: CommandHistory::with_max_size(config.max_history),
            autosave: AutoSave::new(storage, config.autosave_settings()),
            drag_drop: DragDropCoordinator::new(Vec2::new(config.drop_offset_left, config.drop_offset_top)),
            toasts: Toasts::new(config.toast_duration()),
            clock,
        }
    }

    /// Session backed by in-memory storage and the wall clock
    pub fn in_memory(config: &EditorConfig) -> Self {
        Self::new(config, Box::new(MemoryStorage::new()), Box::new(SystemClock))
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    pub fn autosave(&self) -> &AutoSave {
        &self.autosave
    }

    pub fn autosave_mut(&mut self) -> &mut AutoSave {
        &mut self.autosave
    }

    pub fn drag_drop(&self) -> &DragDropCoordinator {
        &self.drag_drop
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Run a command through the history and schedule a save
    pub fn execute(&mut self, command: Command) {
        self.history.execute(command, &mut self.store);
        let now = self.clock.now();
        self.autosave.mark_dirty(now);
    }

    pub fn add_element(&mut self, kind: ElementKind, position: Position) -> ElementId {
        let element = self.store.create_element(kind, position);
        let id = element.id.clone();
        self.execute(Command::create(&element));
        id
    }

    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        match Command::delete(&self.store, id) {
            Ok(command) => {
                self.execute(command);
                true
            }
            Err(err) => {
                log::debug!("Delete ignored: {}", err);
                false
            }
        }
    }

    /// Delete whatever is selected
    pub fn delete_selected(&mut self) -> bool {
        match self.store.selected_id().cloned() {
            Some(id) => self.delete_element(&id),
            None => false,
        }
    }

    /// Replace an element's state with the result of `edit` on a copy
    pub fn update_element(&mut self, id: &ElementId, edit: impl FnOnce(&mut Element)) -> bool {
        let Some(old) = self.store.get_element_by_id(id) else {
            return false;
        };
        let mut new = old.clone();
        edit(&mut new);
        if &new == old {
            return false;
        }
        let command = Command::update(old, &new);
        self.execute(command);
        true
    }

    /// Set one value by property path. Returns `Ok(false)` when the value
    /// is already in place and nothing was recorded.
    pub fn set_property(
        &mut self,
        id: &ElementId,
        path: &str,
        value: serde_json::Value,
    ) -> CommandResult<bool> {
        let command = Command::update_property(&self.store, id, path, value)?;
        if command.is_noop(&self.store) {
            return Ok(false);
        }
        self.execute(command);
        Ok(true)
    }

    pub fn move_element(&mut self, id: &ElementId, position: Position) -> bool {
        self.update_element(id, |el| el.position = position.clamped())
    }

    pub fn resize_element(&mut self, id: &ElementId, width: f32, height: f32) -> bool {
        self.update_element(id, |el| {
            el.size.width = Dimension::Px(clamp_extent(width, MIN_ELEMENT_WIDTH));
            el.size.height = Dimension::Px(clamp_extent(height, MIN_ELEMENT_HEIGHT));
        })
    }

    pub fn bring_to_front(&mut self, id: &ElementId) -> bool {
        let mut preview = self.store.clone();
        match preview.bring_to_front(id) {
            Some(_) => self.apply_preview(preview, "Bring to Front"),
            None => false,
        }
    }

    pub fn send_to_back(&mut self, id: &ElementId) -> bool {
        let mut preview = self.store.clone();
        match preview.send_to_back(id) {
            Some(_) => self.apply_preview(preview, "Send to Back"),
            None => false,
        }
    }

    /// Record the difference between the current store and an edited copy
    /// of it as one batch of updates
    fn apply_preview(&mut self, preview: ElementStore, label: &str) -> bool {
        let commands: Vec<Command> = preview
            .elements_data()
            .iter()
            .filter_map(|new| {
                let old = self.store.get_element_by_id(&new.id)?;
                (old != new).then(|| Command::update(old, new))
            })
            .collect();
        if commands.is_empty() {
            return false;
        }
        self.execute(Command::batch(label, commands));
        true
    }

    pub fn duplicate_element(&mut self, id: &ElementId) -> Option<ElementId> {
        let duplicate = self.store.duplicate_element(id)?;
        let new_id = duplicate.id.clone();
        self.execute(Command::create(&duplicate));
        self.store.select_element(&new_id);
        Some(new_id)
    }

    pub fn align_elements(&mut self, ids: &[ElementId], alignment: Alignment) -> bool {
        let commands: Vec<Command> = self
            .store
            .aligned_positions(ids, alignment)
            .into_iter()
            .filter_map(|(id, position)| {
                let old = self.store.get_element_by_id(&id)?;
                if old.position == position {
                    return None;
                }
                let mut new = old.clone();
                new.position = position;
                Some(Command::update(old, &new))
            })
            .collect();
        if commands.is_empty() {
            return false;
        }
        self.execute(Command::batch("Align Elements", commands));
        true
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.store);
        if undone {
            let now = self.clock.now();
            self.autosave.mark_dirty(now);
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.store);
        if redone {
            let now = self.clock.now();
            self.autosave.mark_dirty(now);
        }
        redone
    }

    pub fn select(&mut self, id: &ElementId) -> bool {
        self.store.select_element(id).is_some()
    }

    pub fn deselect(&mut self) {
        self.store.deselect_element();
    }

    pub fn begin_palette_drag(&mut self, kind: ElementKind) {
        self.drag_drop.begin_palette_drag(kind);
    }

    pub fn begin_element_drag(&mut self, id: &ElementId) -> bool {
        self.drag_drop.begin_element_drag(id, &mut self.store)
    }

    pub fn cancel_drag(&mut self) {
        self.drag_drop.cancel();
    }

    /// Finish a drag over the canvas. Returns the id of the created or
    /// moved element.
    pub fn drop_at(&mut self, pointer: Pos2, canvas: Rect) -> Option<ElementId> {
        let action = self.drag_drop.resolve_drop(pointer, canvas, &self.store)?;
        match action {
            DropAction::Created { kind, command } => {
                let id = command.element_ids().first().map(|id| (*id).clone());
                self.execute(command);
                let now = self.clock.now();
                self.toasts
                    .push(format!("{} element added", kind), ToastLevel::Success, now);
                id
            }
            DropAction::Moved { element_id, command } => {
                self.execute(command);
                Some(element_id)
            }
        }
    }

    /// Fire a due save and expire toasts. Call once per frame.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.autosave.poll(now, &self.store);
        self.toasts.prune(now);
    }

    /// Load saved state. The history is reset since its commands refer to
    /// the replaced content.
    pub fn restore(&mut self) -> Option<PersistedSnapshot> {
        let snapshot = self.autosave.load(&mut self.store)?;
        self.history.clear();
        let now = self.clock.now();
        self.toasts.push(
            format!("Restored {} elements", snapshot.elements.len()),
            ToastLevel::Info,
            now,
        );
        Some(snapshot)
    }

    pub fn force_save(&mut self) {
        self.autosave.force_save(&self.store);
    }

    pub fn clear_saved(&mut self) {
        self.autosave.clear();
    }

    pub fn metadata(&self) -> BuilderMetadata {
        self.autosave.metadata()
    }

    /// Store metadata, deriving a slug from the title when none is given
    pub fn set_metadata(&mut self, mut metadata: BuilderMetadata) {
        if metadata.slug.is_none() {
            metadata.slug = metadata
                .title
                .as_deref()
                .map(export::generate_slug)
                .filter(|slug| !slug.is_empty());
        }
        self.autosave.save_metadata(&metadata);
        let now = self.clock.now();
        self.autosave.mark_dirty(now);
    }

    pub fn export_json(&self) -> ExportDocument {
        export::to_json(self.store.elements_data(), &self.metadata(), time::timestamp_millis())
    }

    pub fn export_html(&self) -> String {
        export::to_html(self.store.elements_data())
    }

    /// Complete standalone page for the current content and metadata
    pub fn export_document_html(&self) -> String {
        export::to_document_html(self.store.elements_data(), &self.metadata())
    }

    pub fn notify(&mut self, message: impl Into<String>, level: ToastLevel) {
        let now = self.clock.now();
        self.toasts.push(message, level, now);
    }
}
