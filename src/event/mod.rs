mod bus;
mod events;

pub use bus::{EventBus, ListenerId};
pub use events::{EditorEvent, HistoryStatus};

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&EditorEvent) + Send,
{
    fn handle_event(&mut self, event: &EditorEvent) {
        self(event)
    }
}
