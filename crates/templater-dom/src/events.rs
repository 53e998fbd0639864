//! DOM Events
//!
//! Listener registration and synchronous dispatch. Listeners accumulate:
//! adding a second handler for the same event type never replaces the first.

use crate::NodeId;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Event handler callback
///
/// Reference-counted so one handler can be attached to many clones.
pub type EventHandler = Rc<dyn Fn(&Event)>;

/// A dispatched event
#[derive(Debug)]
pub struct Event {
    pub event_type: String,
    /// Node the event was dispatched on
    pub target: NodeId,
    /// Node whose listener is currently running
    pub current_target: Cell<NodeId>,
    pub bubbles: bool,
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Create a bubbling event
    pub fn new(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            current_target: Cell::new(target),
            bubbles: true,
            propagation_stopped: Cell::new(false),
        }
    }

    /// Create an event that only reaches the target
    pub fn non_bubbling(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            bubbles: false,
            ..Self::new(event_type, target)
        }
    }

    /// Stop propagation to ancestors
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Check if propagation was stopped
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// Registered event listener
#[derive(Clone)]
pub struct EventListener {
    pub event_type: String,
    pub handler: EventHandler,
}

impl EventListener {
    pub fn new(event_type: impl Into<String>, handler: EventHandler) -> Self {
        Self {
            event_type: event_type.into(),
            handler,
        }
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}
