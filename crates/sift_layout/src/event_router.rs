//! Event routing from host input to layout elements
//!
//! # Architecture
//!
//! ```text
//! Host input (mouse moved, button pressed, character typed)
//!     ↓
//! EventRouter (hit testing, hover/press/focus tracking)
//!     ↓
//! Element handlers, bubbling from the target to the root
//!     ↓
//! Document listeners (every POINTER_DOWN, wherever it lands)
//! ```
//!
//! Hover, press and focus are remembered by element key so they survive a
//! tree rebuild between two events.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use sift_layout::prelude::*;
//!
//! let mut tree = LayoutTree::new();
//! let mut handlers = EventHandlers::new();
//! handlers.on_click(|_| println!("clicked"));
//! tree.create_node(None, "button", ElementBounds::new(0.0, 0.0, 80.0, 30.0), handlers);
//!
//! let mut router = EventRouter::new();
//! let now = Instant::now();
//! router.on_mouse_down(&tree, 10.0, 10.0, now);
//! router.on_mouse_up(&tree, 10.0, 10.0, now);
//! ```

use std::collections::HashSet;
use std::time::Instant;

use slotmap::{new_key_type, SlotMap};

use sift_core::events::{event_types, EventType, KeyCode};

use crate::event_handler::{EventCallback, EventContext};
use crate::tree::{LayoutNodeId, LayoutTree};

new_key_type! {
    /// Handle to a document-level listener
    pub struct ListenerId;
}

struct DocumentListener {
    event_type: EventType,
    handler: EventCallback,
}

/// Routes host input events to layout elements
pub struct EventRouter {
    mouse_x: f32,
    mouse_y: f32,

    /// Keys of elements currently under the pointer
    hovered: HashSet<String>,

    /// Key of the element where the button was pressed
    pressed_target: Option<String>,

    /// Key of the focused element (receives keyboard events)
    focused: Option<String>,

    /// Listeners that see events regardless of the hit element
    document_listeners: SlotMap<ListenerId, DocumentListener>,
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRouter {
    /// Create a new event router
    pub fn new() -> Self {
        Self {
            mouse_x: 0.0,
            mouse_y: 0.0,
            hovered: HashSet::new(),
            pressed_target: None,
            focused: None,
            document_listeners: SlotMap::with_key(),
        }
    }

    /// Get current mouse position
    pub fn mouse_position(&self) -> (f32, f32) {
        (self.mouse_x, self.mouse_y)
    }

    /// Key of the focused element
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Whether the element with `key` is under the pointer
    pub fn is_hovered(&self, key: &str) -> bool {
        self.hovered.contains(key)
    }

    // =========================================================================
    // Document listeners
    // =========================================================================

    /// Listen for an event type anywhere in the document
    pub fn add_document_listener<F>(&mut self, event_type: EventType, handler: F) -> ListenerId
    where
        F: Fn(&EventContext) + 'static,
    {
        self.document_listeners.insert(DocumentListener {
            event_type,
            handler: std::rc::Rc::new(handler),
        })
    }

    /// Remove a document listener. Returns false if it was already removed.
    pub fn remove_document_listener(&mut self, id: ListenerId) -> bool {
        self.document_listeners.remove(id).is_some()
    }

    /// Number of registered document listeners
    pub fn document_listener_count(&self) -> usize {
        self.document_listeners.len()
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move focus to the element with `key` (or clear it)
    ///
    /// Sends BLUR to the previously focused element and FOCUS to the new one.
    pub fn set_focus(&mut self, tree: &LayoutTree, key: Option<&str>, now: Instant) {
        if self.focused.as_deref() == key {
            return;
        }

        if let Some(old) = self.focused.take() {
            self.dispatch_to_key(tree, &old, EventContext::new(event_types::BLUR, now));
        }
        if let Some(new) = key {
            self.dispatch_to_key(tree, new, EventContext::new(event_types::FOCUS, now));
        }
        self.focused = key.map(str::to_string);
    }

    // =========================================================================
    // Mouse Events
    // =========================================================================

    /// Handle mouse move event
    ///
    /// Updates hover state and emits POINTER_LEAVE, POINTER_ENTER and
    /// POINTER_MOVE. An element stays hovered while the pointer is over
    /// one of its descendants. Returns the emitted (key, event) pairs.
    pub fn on_mouse_move(
        &mut self,
        tree: &LayoutTree,
        x: f32,
        y: f32,
        now: Instant,
    ) -> Vec<(String, EventType)> {
        self.mouse_x = x;
        self.mouse_y = y;

        let current: HashSet<String> = tree
            .hit_test(x, y)
            .map(|hit| {
                tree.ancestors(hit)
                    .into_iter()
                    .filter_map(|id| tree.get(id).map(|n| n.key.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let mut events = Vec::new();

        let mut left: Vec<String> = self.hovered.difference(&current).cloned().collect();
        left.sort();
        for key in left {
            let ctx = EventContext::new(event_types::POINTER_LEAVE, now).with_mouse_pos(x, y);
            self.dispatch_to_key(tree, &key, ctx);
            events.push((key, event_types::POINTER_LEAVE));
        }

        let mut entered: Vec<String> = current.difference(&self.hovered).cloned().collect();
        entered.sort();
        for key in entered {
            let ctx = EventContext::new(event_types::POINTER_ENTER, now).with_mouse_pos(x, y);
            self.dispatch_to_key(tree, &key, ctx);
            events.push((key, event_types::POINTER_ENTER));
        }

        for key in &current {
            let ctx = EventContext::new(event_types::POINTER_MOVE, now).with_mouse_pos(x, y);
            self.dispatch_to_key(tree, key, ctx);
        }

        self.hovered = current;
        events
    }

    /// Handle mouse button press
    ///
    /// Notifies document listeners, moves focus to the hit element, then
    /// bubbles POINTER_DOWN from it. Returns the key of the hit element.
    pub fn on_mouse_down(
        &mut self,
        tree: &LayoutTree,
        x: f32,
        y: f32,
        now: Instant,
    ) -> Option<String> {
        self.mouse_x = x;
        self.mouse_y = y;

        let hit = tree.hit_test(x, y);
        let hit_key = hit.and_then(|id| tree.get(id)).map(|n| n.key.clone());

        let ctx = EventContext::new(event_types::POINTER_DOWN, now)
            .with_mouse_pos(x, y)
            .with_target(hit);
        self.notify_document(&ctx);

        self.set_focus(tree, hit_key.as_deref(), now);
        self.pressed_target = hit_key.clone();

        if let Some(target) = hit {
            self.bubble(tree, target, &ctx);
        }

        tracing::trace!(x, y, target = ?hit_key, "pointer down");
        hit_key
    }

    /// Handle mouse button release
    ///
    /// The click (POINTER_UP) goes to the element where the press started
    /// and bubbles from there, provided the pointer is still over that
    /// element. Returns the key that received it.
    pub fn on_mouse_up(
        &mut self,
        tree: &LayoutTree,
        x: f32,
        y: f32,
        now: Instant,
    ) -> Option<String> {
        self.mouse_x = x;
        self.mouse_y = y;

        let target_key = self.pressed_target.take()?;
        let target = tree.node_by_key(&target_key)?;

        // Released somewhere that is neither the pressed element nor inside it
        let released_inside = tree
            .hit_test(x, y)
            .map(|hit| tree.ancestors(hit).contains(&target))
            .unwrap_or(false);
        if !released_inside {
            tracing::trace!(target = %target_key, "press cancelled, released outside");
            return None;
        }

        let ctx = EventContext::new(event_types::POINTER_UP, now)
            .with_mouse_pos(x, y)
            .with_target(Some(target));
        self.bubble(tree, target, &ctx);
        Some(target_key)
    }

    // =========================================================================
    // Keyboard Events
    // =========================================================================

    /// Deliver a typed character to the focused element, bubbling
    ///
    /// Returns false if nothing focused is in the tree.
    pub fn on_text_input(&mut self, tree: &LayoutTree, c: char, now: Instant) -> bool {
        let ctx = EventContext::new(event_types::TEXT_INPUT, now).with_key_char(c);
        self.bubble_from_focused(tree, ctx)
    }

    /// Deliver a key press to the focused element, bubbling
    pub fn on_key_down(&mut self, tree: &LayoutTree, key: KeyCode, now: Instant) -> bool {
        let ctx = EventContext::new(event_types::KEY_DOWN, now).with_key_code(key);
        self.bubble_from_focused(tree, ctx)
    }

    fn bubble_from_focused(&self, tree: &LayoutTree, ctx: EventContext) -> bool {
        let Some(target) = self.focused.as_deref().and_then(|key| tree.node_by_key(key)) else {
            return false;
        };
        let ctx = ctx.with_target(Some(target));
        self.bubble(tree, target, &ctx);
        true
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Deliver to one element without bubbling. Returns false if the key is
    /// not in the tree.
    fn dispatch_to_key(&self, tree: &LayoutTree, key: &str, ctx: EventContext) -> bool {
        let Some(id) = tree.node_by_key(key) else {
            return false;
        };
        if let Some(node) = tree.get(id) {
            node.handlers.dispatch(&ctx.for_node(id));
        }
        true
    }

    /// Deliver from `target` up through its ancestors until stopped
    fn bubble(&self, tree: &LayoutTree, target: LayoutNodeId, ctx: &EventContext) {
        for id in tree.ancestors(target) {
            if let Some(node) = tree.get(id) {
                node.handlers.dispatch(&ctx.for_node(id));
            }
            if ctx.is_propagation_stopped() {
                break;
            }
        }
    }

    fn notify_document(&self, ctx: &EventContext) {
        let handlers: Vec<EventCallback> = self
            .document_listeners
            .values()
            .filter(|l| l.event_type == ctx.event_type)
            .map(|l| l.handler.clone())
            .collect();
        for handler in handlers {
            handler(ctx);
        }
    }
}
