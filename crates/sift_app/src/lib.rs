//! Sift Application Host
//!
//! Headless host for Sift widgets: mounts widgets into slots, routes
//! synthetic pointer and keyboard input through the element tree, and
//! fires timers on a manual clock. Also carries the demo option sets and
//! the TOML configuration of the `sift-demo` binary.
//!
//! # Example
//!
//! ```
//! use sift_app::prelude::*;
//!
//! let mut host = Host::new();
//! let config = AppConfig::default();
//! mount_showcase(&mut host, &config.dropdown).unwrap();
//!
//! host.click_element("vegetables/trigger").unwrap();
//! host.click_element("vegetables/option/1").unwrap();
//!
//! let vegetables = host.find::<Dropdown>("vegetables").unwrap();
//! assert_eq!(vegetables.selection(), vec!["Carrot 🥕".to_string()]);
//! ```

pub mod config;
pub mod demo;
mod error;
pub mod host;
pub mod script;

pub use config::{AppConfig, DropdownLayoutConfig, LoggingConfig, ScriptKey, ScriptStep, WindowConfig};
pub use error::{AppError, Result};
pub use host::{Host, WidgetId};
pub use script::run_script;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{AppConfig, ScriptStep};
    pub use crate::demo::{describe, mount_showcase};
    pub use crate::error::{AppError, Result};
    pub use crate::host::{Host, WidgetId};
    pub use crate::script::run_script;
    pub use sift_cn::prelude::*;
    pub use sift_layout::ElementBounds;
}
