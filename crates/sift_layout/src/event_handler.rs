//! Event handler storage for layout elements
//!
//! # Architecture
//!
//! ```text
//! Widget::build
//!     ↓ EventHandlers::on_click(|ctx| ...)
//! LayoutTree node (handlers stored with the node)
//!     ↓ EventRouter hit tests and bubbles the event
//! Handler callback invoked, may call ctx.stop_propagation()
//! ```

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use sift_core::events::{event_types, EventType, KeyCode};

use crate::tree::LayoutNodeId;

/// Callback for handling events
///
/// Uses Rc since UI is single-threaded.
pub type EventCallback = Rc<dyn Fn(&EventContext)>;

/// Context passed to event handlers
#[derive(Clone, Debug)]
pub struct EventContext {
    /// The type of event that occurred
    pub event_type: EventType,
    /// The node currently handling the event (None for document listeners)
    pub node_id: Option<LayoutNodeId>,
    /// The deepest node the event was originally targeted at
    pub target: Option<LayoutNodeId>,
    /// Mouse position at time of event
    pub mouse_x: f32,
    pub mouse_y: f32,
    /// Character for TEXT_INPUT events
    pub key_char: Option<char>,
    /// Key code for KEY_DOWN events
    pub key_code: u32,
    /// When the host received the input
    pub timestamp: Instant,
    /// Shared across every node of one bubbling pass
    propagation_stopped: Rc<Cell<bool>>,
}

impl EventContext {
    /// Create a new event context
    pub fn new(event_type: EventType, timestamp: Instant) -> Self {
        Self {
            event_type,
            node_id: None,
            target: None,
            mouse_x: 0.0,
            mouse_y: 0.0,
            key_char: None,
            key_code: 0,
            timestamp,
            propagation_stopped: Rc::new(Cell::new(false)),
        }
    }

    /// Set mouse position
    pub fn with_mouse_pos(mut self, x: f32, y: f32) -> Self {
        self.mouse_x = x;
        self.mouse_y = y;
        self
    }

    /// Set the original target
    pub fn with_target(mut self, target: Option<LayoutNodeId>) -> Self {
        self.target = target;
        self
    }

    /// Set key character (for TEXT_INPUT events)
    pub fn with_key_char(mut self, c: char) -> Self {
        self.key_char = Some(c);
        self
    }

    /// Set key code (for KEY_DOWN events)
    pub fn with_key_code(mut self, code: KeyCode) -> Self {
        self.key_code = code.to_raw();
        self
    }

    /// Decoded key code
    pub fn key(&self) -> KeyCode {
        KeyCode::from_raw(self.key_code)
    }

    /// Same event, delivered to another node
    pub fn for_node(&self, node_id: LayoutNodeId) -> Self {
        Self {
            node_id: Some(node_id),
            ..self.clone()
        }
    }

    /// Prevent ancestors from seeing this event
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// Storage for event handlers on an element
#[derive(Default, Clone)]
pub struct EventHandlers {
    handlers: HashMap<EventType, Vec<EventCallback>>,
}

impl EventHandlers {
    /// Create a new empty event handlers storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are any handlers registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Check if a handler is registered for a specific event type
    pub fn has_handler(&self, event_type: EventType) -> bool {
        self.handlers.contains_key(&event_type)
    }

    /// Register a handler for an event type
    pub fn on<F>(&mut self, event_type: EventType, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.handlers
            .entry(event_type)
            .or_default()
            .push(Rc::new(handler));
    }

    /// Get handlers for an event type
    pub fn get(&self, event_type: EventType) -> Option<&[EventCallback]> {
        self.handlers.get(&event_type).map(|v| v.as_slice())
    }

    /// Dispatch an event to all registered handlers for that type
    pub fn dispatch(&self, ctx: &EventContext) {
        if let Some(handlers) = self.handlers.get(&ctx.event_type) {
            for handler in handlers {
                handler(ctx);
            }
        }
    }

    // =========================================================================
    // Convenience registration methods
    // =========================================================================

    /// Register a click handler
    ///
    /// A click is delivered as POINTER_UP to the element the press started on.
    pub fn on_click<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::POINTER_UP, handler);
    }

    /// Register a mouse down handler
    pub fn on_mouse_down<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::POINTER_DOWN, handler);
    }

    /// Register a hover enter handler
    pub fn on_hover_enter<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::POINTER_ENTER, handler);
    }

    /// Register a hover leave handler
    pub fn on_hover_leave<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::POINTER_LEAVE, handler);
    }

    /// Register a key down handler
    pub fn on_key_down<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::KEY_DOWN, handler);
    }

    /// Register a text input handler (for character input)
    pub fn on_text_input<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::TEXT_INPUT, handler);
    }
}
