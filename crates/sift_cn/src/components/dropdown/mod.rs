//! Dropdown component for picking one or many options
//!
//! A trigger showing the selection as chips, and a panel of checkbox rows
//! that opens below it. Large option sets are materialized one batch at a
//! time; a search box filters the whole set once typing pauses.
//!
//! # Example
//!
//! ```ignore
//! use sift_cn::prelude::*;
//!
//! let fruit = cn::dropdown(["Apple 🍎", "Banana 🍌", "Cherry 🍒"])
//!     .placeholder("Pick a fruit")
//!     .on_change(|picked| println!("Selected: {picked:?}"))
//!     .build()?;
//!
//! // Many options, searchable, several picks
//! let users = cn::dropdown(usernames)
//!     .multiple(true)
//!     .searchable(true)
//!     .key("users")
//!     .build()?;
//! ```
//!
//! # Elements
//!
//! Every element key is prefixed with the dropdown key:
//!
//! ```text
//! <key>                    root (trigger slot)
//! <key>/trigger            click toggles the panel
//! <key>/chip/<i>           one per visible selected option
//! <key>/chip/<i>/remove    removes that option
//! <key>/summary            "+K more"
//! <key>/clear | <key>/arrow
//! <key>/panel              overlay, only while open
//! <key>/search             only when searchable
//! <key>/option/<i>         one per displayed option
//! <key>/no-results
//! <key>/load-more
//! ```

pub mod chips;
pub mod pagination;
pub mod search;
pub mod selection;
pub mod view;

use std::any::Any;
use std::cell::Cell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rustc_hash::FxHasher;

use sift_core::events::{event_types, KeyCode};
use sift_core::reactive::{Effect, ReactiveScope, State};
use sift_core::timer::Debouncer;
use sift_layout::prelude::*;

use crate::error::{DropdownError, Result};

pub use chips::{layout_chips, summary_label, ChipLayout, ChipMetrics, ChipSlot, SummaryChip};
pub use pagination::{Pagination, DEFAULT_BATCH_SIZE};
pub use search::{filter_options, SearchState};
pub use selection::{is_option_disabled, ToggleOutcome};
pub use view::{CornerIcon, DropdownSnapshot, OptionRow};

use chips::{DEFAULT_CHIP_PADDING, DEFAULT_FONT_SIZE};
use view::{
    corner_icon, displayed_options, option_rows, shows_load_more, CORNER_WIDTH, PANEL_GAP,
    ROW_HEIGHT, SEARCH_HEIGHT, TRIGGER_INSET,
};

/// Quiet period before typed search text is applied
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(50);

/// Selection change callback
pub type OnChangeFn = Arc<dyn Fn(&[String]) + Send + Sync>;

/// Internal configuration, fixed for the lifetime of a dropdown
struct DropdownConfig {
    options: Vec<String>,
    multiple: bool,
    searchable: bool,
    placeholder: Option<String>,
    on_change: Option<OnChangeFn>,
    batch_size: usize,
    search_debounce: Duration,
    metrics: ChipMetrics,
}

/// Builder for creating Dropdown components with fluent API
pub struct DropdownBuilder {
    key: String,
    options: Vec<String>,
    multiple: bool,
    searchable: bool,
    placeholder: Option<String>,
    on_change: Option<OnChangeFn>,
    batch_size: usize,
    search_debounce: Duration,
    font_size: f32,
    chip_padding: f32,
    measurer: Option<Arc<dyn TextMeasurer>>,
}

impl DropdownBuilder {
    /// Create a dropdown builder over `options`
    ///
    /// Uses `#[track_caller]` to derive a default key from the call site.
    #[track_caller]
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: call_site_key(),
            options: options.into_iter().map(Into::into).collect(),
            multiple: false,
            searchable: false,
            placeholder: None,
            on_change: None,
            batch_size: DEFAULT_BATCH_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            font_size: DEFAULT_FONT_SIZE,
            chip_padding: DEFAULT_CHIP_PADDING,
            measurer: None,
        }
    }

    /// Allow several options to be selected
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Show a search box at the top of the panel
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Text shown in the trigger while nothing is selected
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Called with the whole selection after every change
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    /// Options materialized per "See More"
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    /// Chip label font size in pixels
    pub fn font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Horizontal chip padding per side in pixels
    pub fn chip_padding(mut self, padding: f32) -> Self {
        self.chip_padding = padding;
        self
    }

    /// Measure chip labels with `measurer` instead of the global measurer
    pub fn measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = Some(measurer);
        self
    }

    /// Use an explicit element key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Validate the configuration
    pub fn build(self) -> Result<Dropdown> {
        if self.key.is_empty() || self.key.contains('/') {
            return Err(DropdownError::InvalidKey(self.key));
        }
        if self.batch_size == 0 {
            return Err(DropdownError::ZeroBatchSize);
        }
        // Written this way round so NaN is rejected too
        if !(self.font_size > 0.0) {
            return Err(DropdownError::InvalidFontSize(self.font_size));
        }
        if !(self.chip_padding >= 0.0) {
            return Err(DropdownError::InvalidPadding(self.chip_padding));
        }

        let mut metrics = ChipMetrics::new(self.font_size, self.chip_padding);
        if let Some(measurer) = self.measurer {
            metrics = metrics.with_measurer(measurer);
        }

        Ok(Dropdown {
            key: self.key,
            config: Rc::new(DropdownConfig {
                options: self.options,
                multiple: self.multiple,
                searchable: self.searchable,
                placeholder: self.placeholder,
                on_change: self.on_change,
                batch_size: self.batch_size,
                search_debounce: self.search_debounce,
                metrics,
            }),
            mounted: None,
        })
    }
}

/// Create a dropdown builder over `options`
#[track_caller]
pub fn dropdown<I, S>(options: I) -> DropdownBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    DropdownBuilder::new(options)
}

#[track_caller]
fn call_site_key() -> String {
    let loc = std::panic::Location::caller();
    let mut hasher = FxHasher::default();
    (loc.file(), loc.line(), loc.column()).hash(&mut hasher);
    format!("dropdown-{:x}", hasher.finish())
}

/// A searchable, lazily paginated single/multi-select dropdown
///
/// All interaction state is created at mount and dropped at unmount.
/// Before mount the operations below do nothing.
pub struct Dropdown {
    key: String,
    config: Rc<DropdownConfig>,
    mounted: Option<Mounted>,
}

struct Mounted {
    handle: DropdownHandle,
    scope: ReactiveScope,
    listener: ListenerId,
    change_effect: Option<Effect>,
}

/// Mounted state, cloned into element handlers
#[derive(Clone)]
struct DropdownHandle {
    key: Rc<str>,
    config: Rc<DropdownConfig>,
    open: State<bool>,
    hovered: State<bool>,
    selection: State<Vec<String>>,
    pagination: State<Pagination>,
    search: State<SearchState>,
    debouncer: Rc<Debouncer>,
    /// Slot assigned at mount
    slot: ElementBounds,
    /// Width available to chips, measured once at mount
    available_width: f32,
    /// Trigger plus open panel, as of the last build
    rendered: Rc<Cell<ElementBounds>>,
}

/// Everything one build needs, read from state in one go
struct Frame {
    open: bool,
    hovered: bool,
    selection: Vec<String>,
    chip_layout: ChipLayout,
    corner: CornerIcon,
    search: SearchState,
    pagination: Pagination,
    rows: Vec<OptionRow>,
    no_results: bool,
    load_more: bool,
}

impl DropdownHandle {
    fn is_open(&self) -> bool {
        self.open.get()
    }

    fn toggle_open(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    fn open(&self) {
        if self.is_open() {
            return;
        }
        self.open.set_rebuild(true);
        tracing::debug!(key = %self.key, "dropdown opened");
        self.load_next();
    }

    fn close(&self) {
        if !self.is_open() {
            return;
        }
        self.open.set_rebuild(false);
        tracing::debug!(key = %self.key, "dropdown closed");
    }

    fn load_next(&self) -> usize {
        if self.pagination.get().is_exhausted() {
            return 0;
        }
        let mut loaded = 0..0;
        self.pagination.update_rebuild(|mut p| {
            loaded = p.load_next();
            p
        });
        tracing::debug!(
            key = %self.key,
            from = loaded.start,
            to = loaded.end,
            total = self.config.options.len(),
            "options materialized"
        );
        loaded.len()
    }

    // Selection writes derive the next value from the committed one and
    // skip the write entirely when nothing changes.

    fn toggle_option(&self, option: &str) -> ToggleOutcome {
        let multiple = self.config.multiple;
        let mut outcome = ToggleOutcome::Rejected;
        self.selection.update_rebuild_if(|prev| {
            let (next, result) = selection::toggle(prev, option, multiple);
            outcome = result;
            result.changed().then_some(next)
        });
        tracing::debug!(key = %self.key, option, ?outcome, "option toggled");
        outcome
    }

    fn remove(&self, option: &str) -> bool {
        let removed = self
            .selection
            .update_rebuild_if(|prev| selection::remove(&prev, option));
        if removed {
            tracing::debug!(key = %self.key, option, "option removed");
        }
        removed
    }

    fn clear(&self) -> bool {
        let cleared = self
            .selection
            .update_rebuild_if(|prev| (!prev.is_empty()).then(Vec::new));
        if cleared {
            tracing::debug!(key = %self.key, "selection cleared");
        }
        cleared
    }

    fn set_hovered(&self, hovered: bool) {
        self.hovered
            .update_rebuild_if(|prev| (prev != hovered).then_some(hovered));
    }

    /// Show `text` now, apply it as the query once typing pauses
    fn set_search_text(&self, text: String, now: Instant) {
        self.search.update_rebuild(|s| s.with_typed(text));

        let search = self.search.clone();
        let key = Rc::clone(&self.key);
        self.debouncer.call(now, move || {
            search.update_rebuild(SearchState::applied);
            tracing::debug!(key = %key, query = %search.get().applied, "search query applied");
        });
    }

    fn push_search_char(&self, c: char, now: Instant) {
        let mut text = self.search.get().typed;
        text.push(c);
        self.set_search_text(text, now);
    }

    fn pop_search_char(&self, now: Instant) {
        let mut text = self.search.get().typed;
        if text.pop().is_some() {
            self.set_search_text(text, now);
        }
    }

    fn frame(&self) -> Frame {
        let open = self.is_open();
        let hovered = self.hovered.get();
        let selection = self.selection.get();
        let search = self.search.get();
        let pagination = self.pagination.get();

        let chip_layout = layout_chips(&selection, Some(self.available_width), &self.config.metrics);
        let corner = corner_icon(hovered, &selection);

        let (rows, no_results, load_more) = if open {
            let displayed = displayed_options(&self.config.options, &pagination, &search);
            let no_results = search.is_filtering() && displayed.is_empty();
            (
                option_rows(&displayed, &selection, self.config.multiple),
                no_results,
                shows_load_more(&pagination, &search),
            )
        } else {
            (Vec::new(), false, false)
        };

        Frame {
            open,
            hovered,
            selection,
            chip_layout,
            corner,
            search,
            pagination,
            rows,
            no_results,
            load_more,
        }
    }

    fn snapshot(&self) -> DropdownSnapshot {
        let frame = self.frame();
        DropdownSnapshot {
            key: self.key.to_string(),
            open: frame.open,
            hovered: frame.hovered,
            multiple: self.config.multiple,
            searchable: self.config.searchable,
            placeholder: if frame.selection.is_empty() {
                self.config.placeholder.clone()
            } else {
                None
            },
            chips: frame
                .chip_layout
                .chips
                .iter()
                .map(|chip| frame.selection[chip.index].clone())
                .collect(),
            summary: frame.chip_layout.summary.as_ref().map(|s| s.label.clone()),
            corner: frame.corner,
            search_text: frame.search.typed,
            applied_query: frame.search.applied,
            options: frame.rows,
            no_results: frame.no_results,
            load_more: frame.load_more,
            materialized: frame.pagination.cursor(),
            total: frame.pagination.total(),
            selection: frame.selection,
        }
    }

    fn panel_bounds(&self, frame: &Frame) -> ElementBounds {
        let mut height = frame.rows.len() as f32 * ROW_HEIGHT;
        if self.config.searchable {
            height += SEARCH_HEIGHT;
        }
        if frame.no_results {
            height += ROW_HEIGHT;
        }
        if frame.load_more {
            height += ROW_HEIGHT;
        }
        ElementBounds::new(
            self.slot.x,
            self.slot.bottom() + PANEL_GAP,
            self.slot.width,
            height,
        )
    }

    fn build_trigger(&self, tree: &mut LayoutTree, frame: &Frame) {
        let key = &*self.key;
        let slot = self.slot;
        let root = tree.create_node(None, key, slot, EventHandlers::new());

        let mut handlers = EventHandlers::new();
        let h = self.clone();
        handlers.on_click(move |_| h.toggle_open());
        let h = self.clone();
        handlers.on_hover_enter(move |_| h.set_hovered(true));
        let h = self.clone();
        handlers.on_hover_leave(move |_| h.set_hovered(false));
        let h = self.clone();
        handlers.on_key_down(move |ctx| {
            if ctx.key() == KeyCode::Escape {
                h.close();
            }
        });
        let trigger = tree.create_node(Some(root), format!("{key}/trigger"), slot, handlers);

        // Chips have no click handler of their own: clicks reach the trigger
        let chip_y = slot.y + TRIGGER_INSET;
        let chip_height = (slot.height - 2.0 * TRIGGER_INSET).max(0.0);
        let padding = self.config.metrics.padding;
        let mut x = slot.x + TRIGGER_INSET;

        for chip in &frame.chip_layout.chips {
            let bounds = ElementBounds::new(x, chip_y, chip.width, chip_height);
            let chip_node = tree.create_node(
                Some(trigger),
                format!("{key}/chip/{}", chip.index),
                bounds,
                EventHandlers::new(),
            );

            let mut remove = EventHandlers::new();
            let h = self.clone();
            let value = frame.selection[chip.index].clone();
            remove.on_click(move |ctx| {
                ctx.stop_propagation();
                h.remove(&value);
            });
            let remove_width = padding.min(chip.width);
            tree.create_node(
                Some(chip_node),
                format!("{key}/chip/{}/remove", chip.index),
                ElementBounds::new(bounds.right() - remove_width, chip_y, remove_width, chip_height),
                remove,
            );

            x += chip.width;
        }

        let corner = ElementBounds::new(slot.right() - CORNER_WIDTH, slot.y, CORNER_WIDTH, slot.height);

        // An overshooting summary is cut at the corner icon
        if let Some(summary) = &frame.chip_layout.summary {
            let width = summary.width.min((corner.x - x).max(0.0));
            tree.create_node(
                Some(trigger),
                format!("{key}/summary"),
                ElementBounds::new(x, chip_y, width, chip_height),
                EventHandlers::new(),
            );
        }

        match frame.corner {
            CornerIcon::Clear => {
                let mut handlers = EventHandlers::new();
                let h = self.clone();
                handlers.on_click(move |ctx| {
                    ctx.stop_propagation();
                    h.clear();
                });
                tree.create_node(Some(trigger), format!("{key}/clear"), corner, handlers);
            }
            CornerIcon::Chevron => {
                tree.create_node(Some(trigger), format!("{key}/arrow"), corner, EventHandlers::new());
            }
        }

        let rendered = if frame.open {
            slot.union(&self.panel_bounds(frame))
        } else {
            slot
        };
        self.rendered.set(rendered);
    }

    fn build_panel(&self, tree: &mut LayoutTree, frame: &Frame) {
        let key = &*self.key;
        let bounds = self.panel_bounds(frame);
        let panel = tree.create_node(None, format!("{key}/panel"), bounds, EventHandlers::new());
        let row = |y: f32, height: f32| ElementBounds::new(bounds.x, y, bounds.width, height);
        let mut y = bounds.y;

        if self.config.searchable {
            let mut handlers = EventHandlers::new();
            handlers.on_click(|ctx| ctx.stop_propagation());
            let h = self.clone();
            handlers.on_text_input(move |ctx| {
                if let Some(c) = ctx.key_char {
                    h.push_search_char(c, ctx.timestamp);
                }
            });
            let h = self.clone();
            handlers.on_key_down(move |ctx| match ctx.key() {
                KeyCode::Backspace => h.pop_search_char(ctx.timestamp),
                KeyCode::Escape => h.close(),
                _ => {}
            });
            tree.create_node(Some(panel), format!("{key}/search"), row(y, SEARCH_HEIGHT), handlers);
            y += SEARCH_HEIGHT;
        }

        if frame.no_results {
            tree.create_node(Some(panel), format!("{key}/no-results"), row(y, ROW_HEIGHT), EventHandlers::new());
            y += ROW_HEIGHT;
        }

        for (i, option) in frame.rows.iter().enumerate() {
            let mut handlers = EventHandlers::new();
            if !option.disabled {
                let h = self.clone();
                let value = option.label.clone();
                handlers.on_click(move |_| {
                    h.toggle_option(&value);
                });
            }
            tree.create_node(Some(panel), format!("{key}/option/{i}"), row(y, ROW_HEIGHT), handlers);
            y += ROW_HEIGHT;
        }

        if frame.load_more {
            let mut handlers = EventHandlers::new();
            let h = self.clone();
            handlers.on_click(move |_| {
                h.load_next();
            });
            tree.create_node(Some(panel), format!("{key}/load-more"), row(y, ROW_HEIGHT), handlers);
        }
    }
}

impl Dropdown {
    fn handle(&self) -> Option<&DropdownHandle> {
        self.mounted.as_ref().map(|m| &m.handle)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// The full option set
    pub fn options(&self) -> &[String] {
        &self.config.options
    }

    pub fn is_multiple(&self) -> bool {
        self.config.multiple
    }

    pub fn is_searchable(&self) -> bool {
        self.config.searchable
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.config.placeholder.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.handle().is_some_and(DropdownHandle::is_open)
    }

    /// Same as clicking the trigger
    pub fn toggle_open(&self) {
        if let Some(h) = self.handle() {
            h.toggle_open();
        }
    }

    /// Open the panel, materializing the next batch of options
    pub fn open(&self) {
        if let Some(h) = self.handle() {
            h.open();
        }
    }

    pub fn close(&self) {
        if let Some(h) = self.handle() {
            h.close();
        }
    }

    /// Select or deselect `option`
    pub fn toggle_option(&self, option: &str) -> ToggleOutcome {
        self.handle()
            .map_or(ToggleOutcome::Rejected, |h| h.toggle_option(option))
    }

    /// Deselect `option`. Returns false if it was not selected.
    pub fn remove(&self, option: &str) -> bool {
        self.handle().is_some_and(|h| h.remove(option))
    }

    /// Deselect everything. Returns false if nothing was selected.
    pub fn clear(&self) -> bool {
        self.handle().is_some_and(DropdownHandle::clear)
    }

    /// Same as "See More". Returns the number of options added.
    pub fn load_next(&self) -> usize {
        self.handle().map_or(0, DropdownHandle::load_next)
    }

    /// Replace the search text as if typed at `now`
    pub fn set_search_text(&self, text: impl Into<String>, now: Instant) {
        if let Some(h) = self.handle() {
            h.set_search_text(text.into(), now);
        }
    }

    /// Selected options in selection order
    pub fn selection(&self) -> Vec<String> {
        self.handle().map(|h| h.selection.get()).unwrap_or_default()
    }

    /// Chip width measured at mount
    pub fn measured_width(&self) -> Option<f32> {
        self.handle().map(|h| h.available_width)
    }

    /// Picture of the current state; `None` before mount
    pub fn snapshot(&self) -> Option<DropdownSnapshot> {
        self.handle().map(DropdownHandle::snapshot)
    }
}

impl Widget for Dropdown {
    fn key(&self) -> &str {
        &self.key
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) {
        if self.mounted.is_some() {
            tracing::warn!(key = %self.key, "dropdown already mounted");
            return;
        }

        let scope = ReactiveScope::with_dirty_flag(Arc::clone(&ctx.dirty));
        let handle = DropdownHandle {
            key: Rc::from(self.key.as_str()),
            config: Rc::clone(&self.config),
            open: scope.use_state(false),
            hovered: scope.use_state(false),
            selection: scope.use_state(Vec::<String>::new()),
            pagination: scope.use_state(Pagination::new(
                self.config.options.len(),
                self.config.batch_size,
            )),
            search: scope.use_state(SearchState::default()),
            debouncer: Rc::new(Debouncer::new(
                Rc::clone(&ctx.timers),
                self.config.search_debounce,
            )),
            slot: ctx.bounds,
            available_width: (ctx.bounds.width - 2.0 * TRIGGER_INSET - CORNER_WIDTH).max(0.0),
            rendered: Rc::new(Cell::new(ctx.bounds)),
        };

        let outside = handle.clone();
        let listener = ctx
            .router
            .add_document_listener(event_types::POINTER_DOWN, move |event| {
                if outside.is_open() && !outside.rendered.get().contains(event.mouse_x, event.mouse_y) {
                    tracing::debug!(key = %outside.key, "pointer down outside");
                    outside.close();
                }
            });

        let change_effect = self.config.on_change.clone().map(|callback| {
            let selection = handle.selection.signal();
            scope.effect(move |graph| {
                let current = graph.get(selection).unwrap_or_default();
                callback(&current);
            })
        });

        scope.request_rebuild();
        tracing::debug!(
            key = %self.key,
            options = self.config.options.len(),
            width = handle.available_width,
            "dropdown mounted"
        );

        self.mounted = Some(Mounted {
            handle,
            scope,
            listener,
            change_effect,
        });
    }

    fn build(&self, tree: &mut LayoutTree) {
        if let Some(h) = self.handle() {
            h.build_trigger(tree, &h.frame());
        }
    }

    fn build_overlay(&self, tree: &mut LayoutTree) {
        if let Some(h) = self.handle() {
            let frame = h.frame();
            if frame.open {
                h.build_panel(tree, &frame);
            }
        }
    }

    fn unmount(&mut self, ctx: &mut MountContext<'_>) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        ctx.router.remove_document_listener(mounted.listener);
        mounted.handle.debouncer.cancel();
        if let Some(effect) = mounted.change_effect {
            mounted.scope.dispose_effect(effect);
        }
        mounted.scope.request_rebuild();
        tracing::debug!(key = %self.key, "dropdown unmounted");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
