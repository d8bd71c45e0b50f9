use crate::event::{EditorEvent, EventHandler};

/// Identifies a subscription so it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A simple event bus for broadcasting editor events to registered handlers
pub struct EventBus {
    handlers: Vec<(ListenerId, Box<dyn EventHandler>)>,
    next_id: u64,
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        // Subscriptions belong to the original owner
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&mut self, handler: Box<dyn EventHandler>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    /// Remove a handler. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(listener, _)| *listener != id);
        self.handlers.len() != before
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Emit an event to all registered handlers
    pub fn emit(&mut self, event: EditorEvent) {
        for (_, handler) in self.handlers.iter_mut() {
            handler.handle_event(&event);
        }
    }
}
