//! Handler registry holding at most one handler per event kind.
//!
//! Registering a handler for a kind that already has one replaces it.

use std::collections::HashMap;

use autopilot_core::AgentAction;

use super::EventHandler;
use crate::events::{AgentEvent, EventKind};

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<EventKind, Box<dyn EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific kind.
    ///
    /// If a handler already exists for this kind, it will be replaced.
    pub fn register(&mut self, kind: EventKind, handler: impl EventHandler + 'static) {
        self.handlers.insert(kind, Box::new(handler));
    }

    /// Register an already boxed handler.
    pub fn register_boxed(&mut self, kind: EventKind, handler: Box<dyn EventHandler>) {
        self.handlers.insert(kind, handler);
    }

    /// Remove the handler for a kind, returning whether one was registered.
    pub fn unregister(&mut self, kind: EventKind) -> bool {
        self.handlers.remove(&kind).is_some()
    }

    pub fn has(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke the handler registered for the event's kind.
    ///
    /// Returns `None` when the event kind has no handler (or cannot have
    /// one), so callers can fall back to default behavior.
    pub fn invoke(&mut self, event: &AgentEvent) -> Option<Vec<AgentAction>> {
        let kind = event.kind()?;
        let handler = self.handlers.get_mut(&kind)?;
        Some(handler.handle(event))
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
