//! Sift Layout
//!
//! Retained element tree, hit testing and event routing for Sift widgets.
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use sift_layout::prelude::*;
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.create_node(
//!     None,
//!     "card",
//!     ElementBounds::new(0.0, 0.0, 200.0, 100.0),
//!     EventHandlers::new(),
//! );
//! let mut handlers = EventHandlers::new();
//! handlers.on_click(|ctx| ctx.stop_propagation());
//! tree.create_node(Some(root), "card/close", ElementBounds::new(170.0, 0.0, 30.0, 30.0), handlers);
//!
//! let mut router = EventRouter::new();
//! let now = Instant::now();
//! router.on_mouse_down(&tree, 180.0, 10.0, now);
//! assert_eq!(router.on_mouse_up(&tree, 180.0, 10.0, now).as_deref(), Some("card/close"));
//! ```

pub mod element;
pub mod event_handler;
pub mod event_router;
pub mod text_measure;
pub mod tree;
pub mod widget;

pub use element::ElementBounds;
pub use event_handler::{EventCallback, EventContext, EventHandlers};
pub use event_router::{EventRouter, ListenerId};
pub use tree::{LayoutNode, LayoutNodeId, LayoutTree};
pub use widget::{MountContext, Widget};

// Text measurement
pub use text_measure::{
    clear_text_measurer, measure_text, set_text_measurer, EstimatedTextMeasurer, TextMeasurer,
    TextMetrics,
};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::element::ElementBounds;
    // Event handlers
    pub use crate::event_handler::{EventCallback, EventContext, EventHandlers};
    // Event routing
    pub use crate::event_router::{EventRouter, ListenerId};
    pub use crate::text_measure::{measure_text, EstimatedTextMeasurer, TextMeasurer, TextMetrics};
    pub use crate::tree::{LayoutNodeId, LayoutTree};
    pub use crate::widget::{MountContext, Widget};
    pub use sift_core::events::{event_types, KeyCode};
}
