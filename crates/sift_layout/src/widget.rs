//! Widget lifecycle
//!
//! A widget is mounted once into a host-assigned slot, rebuilds its part of
//! the element tree whenever the host sees the dirty flag raised, and is
//! unmounted once. Resources acquired in `mount` (document listeners,
//! timers, effects) must be released in `unmount`.
//!
//! ```text
//! mount(ctx) ──► build(tree) ──► build_overlay(tree) ──┐
//!                  ▲                                   │ state change
//!                  └──────────── dirty flag ◄──────────┘
//! unmount(ctx)
//! ```

use std::any::Any;

use sift_core::reactive::DirtyFlag;
use sift_core::timer::SharedTimerQueue;

use crate::element::ElementBounds;
use crate::event_router::EventRouter;
use crate::tree::LayoutTree;

/// Host resources handed to a widget during mount and unmount
pub struct MountContext<'a> {
    /// Router for registering document-level listeners
    pub router: &'a mut EventRouter,
    /// Timer queue the host fires from its event loop
    pub timers: SharedTimerQueue,
    /// Raised by widget state to request a rebuild
    pub dirty: DirtyFlag,
    /// Slot assigned to the widget by the host
    pub bounds: ElementBounds,
}

/// A retained widget driven by a host
pub trait Widget: Any {
    /// Element key of the widget root; every element it builds is prefixed
    /// with this key
    fn key(&self) -> &str;

    /// Acquire resources and create state
    fn mount(&mut self, ctx: &mut MountContext<'_>);

    /// Add the widget's in-flow elements to the tree
    fn build(&self, tree: &mut LayoutTree);

    /// Add floating elements (panels, popovers). Runs after every widget's
    /// `build`, so overlays stack above in-flow content.
    fn build_overlay(&self, _tree: &mut LayoutTree) {}

    /// Release everything acquired in `mount`
    fn unmount(&mut self, ctx: &mut MountContext<'_>);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
