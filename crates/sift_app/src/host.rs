//! Headless application host
//!
//! Owns the element tree, event router and timer queue, mounts widgets into
//! slots, and rebuilds the tree whenever widget state raises the dirty
//! flag. Input arrives as host calls instead of window events, and time
//! only moves when [`Host::advance`] is called, so sessions replay exactly.
//!
//! # Example
//!
//! ```
//! use sift_app::Host;
//! use sift_cn::prelude::*;
//! use sift_layout::ElementBounds;
//!
//! let mut host = Host::new();
//! let fruit = cn::dropdown(["Apple", "Banana"]).key("fruit").build().unwrap();
//! let id = host.mount(fruit, ElementBounds::new(0.0, 0.0, 300.0, 40.0));
//!
//! host.click_element("fruit/trigger").unwrap();
//! assert!(host.widget::<Dropdown>(id).unwrap().is_open());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

use sift_core::events::KeyCode;
use sift_core::reactive::DirtyFlag;
use sift_core::timer::{fire_due, SharedTimerQueue, TimerQueue};
use sift_layout::{ElementBounds, EventRouter, LayoutTree, MountContext, Widget};

use crate::error::{AppError, Result};

new_key_type! {
    /// Handle to a mounted widget
    pub struct WidgetId;
}

struct MountedWidget {
    widget: Box<dyn Widget>,
    bounds: ElementBounds,
}

/// Drives mounted widgets with synthetic input and a manual clock
pub struct Host {
    tree: LayoutTree,
    router: EventRouter,
    timers: SharedTimerQueue,
    dirty: DirtyFlag,
    widgets: SlotMap<WidgetId, MountedWidget>,
    /// Mount order, which is also build order
    order: Vec<WidgetId>,
    now: Instant,
    rebuilds: u64,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    /// Create a host whose clock starts at the current instant
    pub fn new() -> Self {
        Self::with_clock(Instant::now())
    }

    /// Create a host whose clock starts at `now`
    pub fn with_clock(now: Instant) -> Self {
        Self {
            tree: LayoutTree::new(),
            router: EventRouter::new(),
            timers: TimerQueue::shared(),
            dirty: Arc::new(AtomicBool::new(false)),
            widgets: SlotMap::with_key(),
            order: Vec::new(),
            now,
            rebuilds: 0,
        }
    }

    /// Current host time
    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    /// Number of timers waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Number of tree rebuilds so far
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    // =========================================================================
    // Widgets
    // =========================================================================

    /// Mount a widget into `bounds` and rebuild
    pub fn mount<W: Widget>(&mut self, widget: W, bounds: ElementBounds) -> WidgetId {
        let mut widget: Box<dyn Widget> = Box::new(widget);
        let mut ctx = MountContext {
            router: &mut self.router,
            timers: self.timers.clone(),
            dirty: Arc::clone(&self.dirty),
            bounds,
        };
        widget.mount(&mut ctx);
        tracing::debug!(key = widget.key(), ?bounds, "widget mounted");

        let id = self.widgets.insert(MountedWidget { widget, bounds });
        self.order.push(id);
        self.rebuild();
        id
    }

    /// Unmount a widget and rebuild. Returns the widget, unmounted.
    pub fn unmount(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let MountedWidget { mut widget, bounds } = self.widgets.remove(id)?;
        self.order.retain(|w| *w != id);

        let mut ctx = MountContext {
            router: &mut self.router,
            timers: self.timers.clone(),
            dirty: Arc::clone(&self.dirty),
            bounds,
        };
        widget.unmount(&mut ctx);
        tracing::debug!(key = widget.key(), "widget unmounted");

        self.rebuild();
        Some(widget)
    }

    /// Borrow a mounted widget as its concrete type
    pub fn widget<W: Widget>(&self, id: WidgetId) -> Option<&W> {
        self.widgets.get(id)?.widget.as_any().downcast_ref::<W>()
    }

    /// Find a mounted widget by its key
    pub fn find<W: Widget>(&self, key: &str) -> Option<&W> {
        self.widgets()
            .find(|w| w.key() == key)
            .and_then(|w| w.as_any().downcast_ref::<W>())
    }

    /// Mounted widgets in mount order
    pub fn widgets(&self) -> impl Iterator<Item = &dyn Widget> {
        self.order
            .iter()
            .filter_map(|id| self.widgets.get(*id))
            .map(|m| m.widget.as_ref())
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.router.on_mouse_move(&self.tree, x, y, self.now);
        self.rebuild_if_dirty();
    }

    /// Press the primary button. Returns the key of the element hit.
    pub fn mouse_down(&mut self, x: f32, y: f32) -> Option<String> {
        let hit = self.router.on_mouse_down(&self.tree, x, y, self.now);
        self.rebuild_if_dirty();
        hit
    }

    /// Release the primary button. Returns the key of the element clicked.
    pub fn mouse_up(&mut self, x: f32, y: f32) -> Option<String> {
        let clicked = self.router.on_mouse_up(&self.tree, x, y, self.now);
        self.rebuild_if_dirty();
        clicked
    }

    /// Move there, press and release
    pub fn click(&mut self, x: f32, y: f32) -> Option<String> {
        self.mouse_move(x, y);
        self.mouse_down(x, y);
        self.mouse_up(x, y)
    }

    /// Center of the element with `key` in the current tree
    pub fn element_center(&self, key: &str) -> Option<(f32, f32)> {
        self.tree
            .bounds_of(key)
            .map(|b| (b.x + b.width / 2.0, b.y + b.height / 2.0))
    }

    /// Click the center of the element with `key`
    pub fn click_element(&mut self, key: &str) -> Result<Option<String>> {
        let (x, y) = self
            .element_center(key)
            .ok_or_else(|| AppError::UnknownElement(key.to_string()))?;
        Ok(self.click(x, y))
    }

    /// Type `text` into the focused element, one character at a time
    pub fn text_input(&mut self, text: &str) {
        for c in text.chars() {
            self.router.on_text_input(&self.tree, c, self.now);
            self.rebuild_if_dirty();
        }
    }

    /// Press a key. Returns false if nothing is focused.
    pub fn key_down(&mut self, key: KeyCode) -> bool {
        let delivered = self.router.on_key_down(&self.tree, key, self.now);
        self.rebuild_if_dirty();
        delivered
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Move the clock to `now` and fire due timers. The clock never goes
    /// backwards. Returns the number of timers fired.
    pub fn advance(&mut self, now: Instant) -> usize {
        self.now = self.now.max(now);
        let fired = fire_due(&self.timers, self.now);
        self.rebuild_if_dirty();
        fired
    }

    /// Move the clock forward by `delta`
    pub fn advance_by(&mut self, delta: Duration) -> usize {
        self.advance(self.now + delta)
    }

    // =========================================================================
    // Rebuild
    // =========================================================================

    /// Rebuild the whole tree: in-flow elements first, then overlays
    pub fn rebuild(&mut self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.tree.clear();
        for id in &self.order {
            if let Some(m) = self.widgets.get(*id) {
                m.widget.build(&mut self.tree);
            }
        }
        for id in &self.order {
            if let Some(m) = self.widgets.get(*id) {
                m.widget.build_overlay(&mut self.tree);
            }
        }
        self.rebuilds += 1;
        tracing::trace!(nodes = self.tree.len(), "tree rebuilt");
    }

    fn rebuild_if_dirty(&mut self) {
        if self.dirty.load(Ordering::SeqCst) {
            self.rebuild();
        }
    }
}
