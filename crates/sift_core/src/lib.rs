//! Sift Core Runtime
//!
//! Foundational primitives shared by the Sift crates:
//!
//! - **Reactive Signals**: fine-grained state with effects
//! - **Timers**: a cancellable timer queue and a last-write-wins debouncer
//! - **Events**: event type identifiers and key codes
//! - **Geometry**: points, sizes and rectangles for hit testing
//!
//! # Example
//!
//! ```rust
//! use sift_core::reactive::ReactiveGraph;
//!
//! let mut graph = ReactiveGraph::new();
//! let count = graph.create_signal(0i32);
//!
//! graph.update(count, |n| n + 5);
//! assert_eq!(graph.get(count), Some(5));
//! ```

pub mod events;
pub mod geometry;
pub mod reactive;
pub mod timer;

pub use events::{event_types, EventType, KeyCode};
pub use geometry::{Point, Rect, Size};
pub use reactive::{
    DirtyFlag, Effect, ReactiveGraph, ReactiveScope, SharedReactiveGraph, Signal, State,
};
pub use timer::{fire_due, Debouncer, SharedTimerQueue, TimerId, TimerQueue};
