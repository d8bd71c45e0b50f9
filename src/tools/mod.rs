mod drag_drop;

pub use drag_drop::{DragDropCoordinator, DragOperation, DropAction, DropEffect};
