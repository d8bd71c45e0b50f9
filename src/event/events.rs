/// Undo/redo availability reported after every history change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    /// Index of the last applied command, `None` before the first one
    pub current_index: Option<usize>,
    pub history_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    HistoryChanged(HistoryStatus),
    Saved {
        /// Milliseconds since the UNIX epoch
        timestamp: u64,
    },
    SaveFailed {
        error: String,
    },
    Restored {
        element_count: usize,
    },
    SaveCleared,
}

impl EditorEvent {
    /// True for save outcomes, whether they succeeded or not
    pub fn is_save_result(&self) -> bool {
        matches!(self, EditorEvent::Saved { .. } | EditorEvent::SaveFailed { .. })
    }
}
