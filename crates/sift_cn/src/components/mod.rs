//! Components built on sift_layout primitives
//!
//! Each component follows a consistent pattern:
//! - Builder function (e.g., `dropdown(options)`)
//! - Builder with fluent configuration, validated by `build()`
//! - Implements `Widget` for mounting into a host

pub mod dropdown;

pub use dropdown::{dropdown, Dropdown, DropdownBuilder, DropdownSnapshot, ToggleOutcome};
