use super::Command;
use crate::event::{EditorEvent, EventBus, EventHandler, HistoryStatus, ListenerId};
use crate::store::ElementStore;

/// History bound used when none is configured
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Linear undo/redo history over the element store.
///
/// `entries[..applied]` are undoable, `entries[applied..]` are redoable.
/// Executing a new command prunes the redoable tail; there is no branching.
#[derive(Debug)]
pub struct CommandHistory {
    entries: Vec<Command>,
    applied: usize,
    max_size: usize,
    event_bus: EventBus,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_HISTORY)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            applied: 0,
            max_size: max_size.max(1),
            event_bus: EventBus::new(),
        }
    }

    /// Execute a command and record it, discarding any redo entries
    pub fn execute(&mut self, command: Command, store: &mut ElementStore) {
        self.entries.truncate(self.applied);

        command.execute(store);
        log::debug!("Executed {}", command.label());
        self.entries.push(command);
        self.applied += 1;

        while self.entries.len() > self.max_size {
            let evicted = self.entries.remove(0);
            self.applied -= 1;
            log::debug!("History full, dropped {}", evicted.label());
        }

        self.notify();
    }

    /// Undo the last applied command. Returns false when there is none.
    pub fn undo(&mut self, store: &mut ElementStore) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.applied -= 1;
        let command = &self.entries[self.applied];
        command.undo(store);
        log::debug!("Undid {}", command.label());
        self.notify();
        true
    }

    /// Re-apply the next undone command. Returns false when there is none.
    pub fn redo(&mut self, store: &mut ElementStore) -> bool {
        if !self.can_redo() {
            return false;
        }
        let command = &self.entries[self.applied];
        command.execute(store);
        log::debug!("Redid {}", command.label());
        self.applied += 1;
        self.notify();
        true
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Index of the last applied command; `None` before the first one
    pub fn current_index(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// All recorded commands, oldest first
    pub fn entries(&self) -> &[Command] {
        &self.entries
    }

    pub fn undo_entries(&self) -> &[Command] {
        &self.entries[..self.applied]
    }

    pub fn redo_entries(&self) -> &[Command] {
        &self.entries[self.applied..]
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            current_index: self.current_index(),
            history_size: self.entries.len(),
        }
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.applied = 0;
        self.notify();
    }

    pub fn subscribe(&mut self, handler: Box<dyn EventHandler>) -> ListenerId {
        self.event_bus.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.event_bus.unsubscribe(id)
    }

    fn notify(&mut self) {
        let status = self.status();
        self.event_bus.emit(EditorEvent::HistoryChanged(status));
    }
}
