//! # Sift Component Library (sift_cn)
//!
//! Interactive components built on `sift_layout` primitives.
//!
//! ## Example
//!
//! ```
//! use sift_cn::prelude::*;
//!
//! let fruit = cn::dropdown(["Apple 🍎", "Banana 🍌", "Cherry 🍒"])
//!     .placeholder("Pick a fruit")
//!     .key("fruit")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(fruit.options().len(), 3);
//! assert!(!fruit.is_mounted());
//! ```
//!
//! ## Components
//!
//! - **Dropdown** - single or multi-select with search, lazy pagination and
//!   overflow-aware chips

pub mod components;
pub mod error;

pub use components::*;
pub use error::DropdownError;

/// Convenience module for accessing components with `cn::` prefix
pub mod cn {
    pub use crate::components::dropdown::dropdown;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cn;
    pub use crate::components::dropdown::{
        dropdown, CornerIcon, Dropdown, DropdownBuilder, DropdownSnapshot, OptionRow,
        ToggleOutcome,
    };
    pub use crate::error::DropdownError;
    pub use sift_layout::Widget;
}
