use egui::{Pos2, Rect, Vec2};

use crate::command::Command;
use crate::element::{ElementId, ElementKind, Position};
use crate::store::ElementStore;

/// What a drag gesture carries, fixed when the drag starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOperation {
    /// Palette item dragged onto the canvas; creates a new element
    Copy { kind: ElementKind },
    /// Placed element dragged to a new position
    Move { element_id: ElementId },
}

/// Feedback shown while hovering the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Copy,
    Move,
}

/// Command produced by a drop, ready to run through the history
#[derive(Debug, Clone, PartialEq)]
pub enum DropAction {
    Created { kind: ElementKind, command: Command },
    Moved { element_id: ElementId, command: Command },
}

impl DropAction {
    pub fn command(&self) -> &Command {
        match self {
            DropAction::Created { command, .. } | DropAction::Moved { command, .. } => command,
        }
    }

    pub fn into_command(self) -> Command {
        match self {
            DropAction::Created { command, .. } | DropAction::Moved { command, .. } => command,
        }
    }
}

/// Turns drag gestures into create/update commands.
///
/// Drag state lives only between a `begin_*` call and the next drop or
/// cancel; both always clear it.
#[derive(Debug, Clone)]
pub struct DragDropCoordinator {
    current: Option<DragOperation>,
    /// Subtracted from the pointer so the drop point is near the element's center
    drop_offset: Vec2,
}

impl Default for DragDropCoordinator {
    fn default() -> Self {
        Self::new(Vec2::new(60.0, 30.0))
    }
}

impl DragDropCoordinator {
    pub fn new(drop_offset: Vec2) -> Self {
        Self {
            current: None,
            drop_offset,
        }
    }

    pub fn begin_palette_drag(&mut self, kind: ElementKind) {
        log::debug!("Palette drag started: {}", kind);
        self.current = Some(DragOperation::Copy { kind });
    }

    /// Start moving a placed element and select it. Unknown ids start nothing.
    pub fn begin_element_drag(&mut self, element_id: &ElementId, store: &mut ElementStore) -> bool {
        if store.select_element(element_id).is_none() {
            log::warn!("Drag started on unknown element {}", element_id);
            self.current = None;
            return false;
        }
        log::debug!("Element drag started: {}", element_id);
        self.current = Some(DragOperation::Move {
            element_id: element_id.clone(),
        });
        true
    }

    pub fn current(&self) -> Option<&DragOperation> {
        self.current.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.current.is_some()
    }

    pub fn drag_over_effect(&self) -> Option<DropEffect> {
        self.current.as_ref().map(|op| match op {
            DragOperation::Copy { .. } => DropEffect::Copy,
            DragOperation::Move { .. } => DropEffect::Move,
        })
    }

    pub fn cancel(&mut self) {
        if self.current.take().is_some() {
            log::debug!("Drag cancelled");
        }
    }

    /// Canvas-relative drop position for a pointer in screen coordinates
    pub fn canvas_position(&self, pointer: Pos2, canvas: Rect) -> Position {
        let local = pointer - canvas.min - self.drop_offset;
        Position::new(local.y, local.x).clamped()
    }

    /// Finish the gesture at `pointer`. Drag state is cleared whatever the
    /// outcome; `None` means nothing should change.
    pub fn resolve_drop(
        &mut self,
        pointer: Pos2,
        canvas: Rect,
        store: &ElementStore,
    ) -> Option<DropAction> {
        let operation = self.current.take()?;
        let position = self.canvas_position(pointer, canvas);

        match operation {
            DragOperation::Copy { kind } => {
                let element = store.create_element(kind, position);
                Some(DropAction::Created {
                    kind,
                    command: Command::create(&element),
                })
            }
            DragOperation::Move { element_id } => {
                let Some(old) = store.get_element_by_id(&element_id) else {
                    log::warn!("Dropped element {} no longer exists", element_id);
                    return None;
                };
                let mut new = old.clone();
                new.position = position;
                Some(DropAction::Moved {
                    command: Command::update(old, &new),
                    element_id,
                })
            }
        }
    }
}
