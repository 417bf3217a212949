//! Fine-grained reactive signal system
//!
//! Signals push invalidation to the effects that read them. Effects are
//! queued and run once per flush, re-recording their dependencies on
//! every run.
//!
//! # State
//!
//! [`State<T>`] wraps a signal together with the shared graph and the
//! rebuild flag. It is the API components use for their local state.
//!
//! ```
//! use sift_core::reactive::ReactiveScope;
//!
//! let scope = ReactiveScope::new();
//! let counter = scope.use_state(0i32);
//!
//! counter.update_rebuild(|n| n + 1);
//! assert_eq!(counter.get(), 1);
//! assert!(scope.take_dirty());
//!
//! // No change: nothing is written and no rebuild is requested
//! assert!(!counter.update_rebuild_if(|n| (n > 5).then_some(0)));
//! assert!(!scope.take_dirty());
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

new_key_type! {
    /// Unique identifier for a signal
    pub struct SignalId;
    /// Unique identifier for an effect
    pub struct EffectId;
}

/// A reactive signal handle (cheap to copy)
#[derive(Debug)]
pub struct Signal<T> {
    id: SignalId,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> Signal<T> {
    /// Get the signal's internal ID
    pub fn id(&self) -> SignalId {
        self.id
    }
}

/// An effect handle
#[derive(Debug, Clone, Copy)]
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn id(&self) -> EffectId {
        self.id
    }
}

type EffectFn = Box<dyn FnMut(&ReactiveGraph) + Send>;

struct SignalNode {
    value: Box<dyn Any + Send>,
    subscribers: SmallVec<[EffectId; 4]>,
}

struct EffectNode {
    /// Taken out of the node while it runs
    run: Option<EffectFn>,
    dependencies: SmallVec<[SignalId; 4]>,
    dirty: Cell<bool>,
}

/// The reactive graph that owns all signals and effects
pub struct ReactiveGraph {
    signals: SlotMap<SignalId, SignalNode>,
    effects: SlotMap<EffectId, EffectNode>,
    pending_effects: RefCell<VecDeque<EffectId>>,
    /// Dependencies recorded by the effect currently running
    tracking: RefCell<Option<Vec<SignalId>>>,
}

impl ReactiveGraph {
    /// Create a new reactive graph
    pub fn new() -> Self {
        Self {
            signals: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            pending_effects: RefCell::new(VecDeque::new()),
            tracking: RefCell::new(None),
        }
    }

    // =========================================================================
    // SIGNALS
    // =========================================================================

    /// Create a new signal with an initial value
    pub fn create_signal<T: Send + 'static>(&mut self, initial: T) -> Signal<T> {
        let id = self.signals.insert(SignalNode {
            value: Box::new(initial),
            subscribers: SmallVec::new(),
        });
        Signal {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get the current value of a signal
    ///
    /// Inside an effect the signal is recorded as a dependency.
    pub fn get<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        if let Some(ref mut deps) = *self.tracking.borrow_mut() {
            if !deps.contains(&signal.id) {
                deps.push(signal.id);
            }
        }

        self.get_untracked(signal)
    }

    /// Get the current value without tracking as a dependency
    pub fn get_untracked<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.signals
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>().cloned())
    }

    /// Set the value of a signal, triggering reactive updates
    pub fn set<T: Send + 'static>(&mut self, signal: Signal<T>, value: T) {
        let Some(node) = self.signals.get_mut(signal.id) else {
            return;
        };
        node.value = Box::new(value);
        let subscribers = node.subscribers.clone();

        for effect_id in subscribers {
            self.mark_dirty(effect_id);
        }

        self.flush_effects();
    }

    /// Update a signal from its previous value
    ///
    /// The closure receives the committed value, so consecutive updates
    /// compose instead of overwriting each other.
    pub fn update<T: Clone + Send + 'static, F: FnOnce(T) -> T>(
        &mut self,
        signal: Signal<T>,
        f: F,
    ) {
        if let Some(current) = self.get_untracked(signal) {
            self.set(signal, f(current));
        }
    }

    /// Update a signal only when `f` produces a new value
    ///
    /// Returning `None` leaves the signal untouched and runs no effects.
    /// Returns whether a value was written.
    pub fn update_if<T, F>(&mut self, signal: Signal<T>, f: F) -> bool
    where
        T: Clone + Send + 'static,
        F: FnOnce(T) -> Option<T>,
    {
        match self.get_untracked(signal).and_then(f) {
            Some(next) => {
                self.set(signal, next);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // EFFECTS
    // =========================================================================

    /// Create an effect that runs now and whenever its dependencies change
    pub fn create_effect<F>(&mut self, run: F) -> Effect
    where
        F: FnMut(&ReactiveGraph) + Send + 'static,
    {
        let id = self.effects.insert(EffectNode {
            run: Some(Box::new(run)),
            dependencies: SmallVec::new(),
            dirty: Cell::new(true),
        });

        self.pending_effects.borrow_mut().push_back(id);
        self.flush_effects();

        Effect { id }
    }

    /// Dispose of an effect, removing it from the graph
    pub fn dispose_effect(&mut self, effect: Effect) {
        if let Some(node) = self.effects.remove(effect.id) {
            for &dep_id in &node.dependencies {
                if let Some(sig) = self.signals.get_mut(dep_id) {
                    sig.subscribers.retain(|s| *s != effect.id);
                }
            }
        }
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn mark_dirty(&mut self, id: EffectId) {
        if let Some(node) = self.effects.get(id) {
            if !node.dirty.get() {
                node.dirty.set(true);
                self.pending_effects.borrow_mut().push_back(id);
            }
        }
    }

    fn flush_effects(&mut self) {
        let effects: Vec<EffectId> = self.pending_effects.borrow_mut().drain(..).collect();
        for effect_id in effects {
            self.run_effect(effect_id);
        }
    }

    fn run_effect(&mut self, effect_id: EffectId) {
        let Some(node) = self.effects.get_mut(effect_id) else {
            return;
        };
        if !node.dirty.get() {
            return;
        }
        node.dirty.set(false);
        let Some(mut run) = node.run.take() else {
            return;
        };

        let outer = self.tracking.replace(Some(Vec::new()));
        run(self);
        let deps = self.tracking.replace(outer).unwrap_or_default();

        self.resubscribe(effect_id, &deps);

        if let Some(node) = self.effects.get_mut(effect_id) {
            node.run = Some(run);
            node.dependencies = deps.into_iter().collect();
        }
    }

    /// Replace an effect's signal subscriptions with `deps`
    fn resubscribe(&mut self, sub: EffectId, deps: &[SignalId]) {
        let old: SmallVec<[SignalId; 4]> = self
            .effects
            .get(sub)
            .map(|n| n.dependencies.clone())
            .unwrap_or_default();

        for dep_id in old {
            if let Some(sig) = self.signals.get_mut(dep_id) {
                sig.subscribers.retain(|s| *s != sub);
            }
        }

        for &dep_id in deps {
            if let Some(sig) = self.signals.get_mut(dep_id) {
                if !sig.subscribers.contains(&sub) {
                    sig.subscribers.push(sub);
                }
            }
        }
    }
}

impl Default for ReactiveGraph {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// STATE - High-level API for component state management
// =============================================================================

/// Shared reactive graph
pub type SharedReactiveGraph = Arc<Mutex<ReactiveGraph>>;

/// Shared dirty flag for triggering UI rebuilds
pub type DirtyFlag = Arc<AtomicBool>;

/// Lock the shared graph, recovering the guard if a previous holder panicked
pub fn lock_graph(graph: &SharedReactiveGraph) -> MutexGuard<'_, ReactiveGraph> {
    graph.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A bound state value with direct get/set methods
///
/// Effects run while the graph is locked, so an effect must never call
/// back into a `State` of the same graph.
#[derive(Clone)]
pub struct State<T> {
    signal: Signal<T>,
    reactive: SharedReactiveGraph,
    dirty_flag: DirtyFlag,
}

impl<T: Clone + Send + 'static> State<T> {
    /// Create a new State wrapper
    pub fn new(signal: Signal<T>, reactive: SharedReactiveGraph, dirty_flag: DirtyFlag) -> Self {
        Self {
            signal,
            reactive,
            dirty_flag,
        }
    }

    /// Get the current value
    pub fn get(&self) -> T
    where
        T: Default,
    {
        lock_graph(&self.reactive)
            .get(self.signal)
            .unwrap_or_default()
    }

    /// Set a new value AND request a UI tree rebuild
    pub fn set_rebuild(&self, value: T) {
        lock_graph(&self.reactive).set(self.signal, value);
        self.dirty_flag.store(true, Ordering::SeqCst);
    }

    /// Update the value from the committed previous value AND request a
    /// UI tree rebuild
    pub fn update_rebuild(&self, f: impl FnOnce(T) -> T) {
        lock_graph(&self.reactive).update(self.signal, f);
        self.dirty_flag.store(true, Ordering::SeqCst);
    }

    /// Like [`update_rebuild`](Self::update_rebuild), but `f` may decline
    /// the change by returning `None`
    ///
    /// A declined update writes nothing, runs no effects and leaves the
    /// rebuild flag alone.
    pub fn update_rebuild_if(&self, f: impl FnOnce(T) -> Option<T>) -> bool {
        let changed = lock_graph(&self.reactive).update_if(self.signal, f);
        if changed {
            self.dirty_flag.store(true, Ordering::SeqCst);
        }
        changed
    }

    /// Get the underlying signal (for reading inside effects)
    pub fn signal(&self) -> Signal<T> {
        self.signal
    }
}

/// A reactive graph together with its rebuild flag
///
/// Each mounted component owns one scope; nothing is shared between
/// instances.
#[derive(Clone)]
pub struct ReactiveScope {
    graph: SharedReactiveGraph,
    dirty: DirtyFlag,
}

impl ReactiveScope {
    /// Create a scope with its own graph and dirty flag
    pub fn new() -> Self {
        Self::with_dirty_flag(Arc::new(AtomicBool::new(false)))
    }

    /// Create a scope that reports rebuilds through an existing flag
    pub fn with_dirty_flag(dirty: DirtyFlag) -> Self {
        Self {
            graph: Arc::new(Mutex::new(ReactiveGraph::new())),
            dirty,
        }
    }

    /// Create a state value in this scope
    pub fn use_state<T: Clone + Send + 'static>(&self, initial: T) -> State<T> {
        let signal = lock_graph(&self.graph).create_signal(initial);
        State::new(signal, Arc::clone(&self.graph), Arc::clone(&self.dirty))
    }

    /// Create an effect in this scope
    pub fn effect<F>(&self, run: F) -> Effect
    where
        F: FnMut(&ReactiveGraph) + Send + 'static,
    {
        lock_graph(&self.graph).create_effect(run)
    }

    /// Dispose an effect created in this scope
    pub fn dispose_effect(&self, effect: Effect) {
        lock_graph(&self.graph).dispose_effect(effect);
    }

    /// Raise the rebuild flag without changing any value
    pub fn request_rebuild(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Read and clear the rebuild flag
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }
}

impl Default for ReactiveScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_signal_create_get_set() {
        let mut graph = ReactiveGraph::new();

        let count = graph.create_signal(0i32);
        assert_eq!(graph.get(count), Some(0));

        graph.set(count, 42);
        assert_eq!(graph.get(count), Some(42));
    }

    #[test]
    fn test_signal_update_composes() {
        let mut graph = ReactiveGraph::new();

        let items = graph.create_signal(Vec::<String>::new());
        graph.update(items, |mut v| {
            v.push("a".into());
            v
        });
        graph.update(items, |mut v| {
            v.push("b".into());
            v
        });
        assert_eq!(graph.get(items), Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_effect_runs_on_change() {
        let mut graph = ReactiveGraph::new();
        let effect_runs = Arc::new(Mutex::new(Vec::new()));

        let count = graph.create_signal(0i32);
        let effect_runs_clone = effect_runs.clone();

        let _effect = graph.create_effect(move |g| {
            let val = g.get(count).unwrap_or(0);
            effect_runs_clone.lock().unwrap().push(val);
        });

        assert_eq!(*effect_runs.lock().unwrap(), vec![0]);

        graph.set(count, 1);
        graph.set(count, 2);
        assert_eq!(*effect_runs.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_effect_ignores_untracked_signals() {
        let mut graph = ReactiveGraph::new();
        let runs = Arc::new(Mutex::new(0));

        let tracked = graph.create_signal(0i32);
        let other = graph.create_signal(0i32);
        let runs_clone = runs.clone();
        graph.create_effect(move |g| {
            let _ = g.get(tracked);
            *runs_clone.lock().unwrap() += 1;
        });

        graph.set(other, 9);
        assert_eq!(*runs.lock().unwrap(), 1);
    }

    #[test]
    fn test_update_if_declined_runs_nothing() {
        let mut graph = ReactiveGraph::new();
        let runs = Arc::new(Mutex::new(0));

        let items = graph.create_signal(vec![1u32]);
        let runs_clone = runs.clone();
        graph.create_effect(move |g| {
            let _ = g.get(items);
            *runs_clone.lock().unwrap() += 1;
        });

        assert!(!graph.update_if(items, |_| None));
        assert_eq!(*runs.lock().unwrap(), 1);

        assert!(graph.update_if(items, |mut v| {
            v.push(2);
            Some(v)
        }));
        assert_eq!(*runs.lock().unwrap(), 2);
        assert_eq!(graph.get(items), Some(vec![1, 2]));
    }

    #[test]
    fn test_dispose_effect() {
        let mut graph = ReactiveGraph::new();
        let effect_runs = Arc::new(Mutex::new(0));

        let count = graph.create_signal(0i32);
        let effect_runs_clone = effect_runs.clone();

        let effect = graph.create_effect(move |g| {
            let _val = g.get(count);
            *effect_runs_clone.lock().unwrap() += 1;
        });

        graph.set(count, 1);
        assert_eq!(*effect_runs.lock().unwrap(), 2);

        graph.dispose_effect(effect);

        graph.set(count, 2);
        assert_eq!(*effect_runs.lock().unwrap(), 2);
        assert!(graph.signals[count.id()].subscribers.is_empty());
    }

    #[test]
    fn test_state_rebuild_flag() {
        let scope = ReactiveScope::new();
        let open = scope.use_state(false);

        assert!(!scope.take_dirty());

        open.set_rebuild(true);
        assert!(scope.take_dirty());
        assert!(!scope.take_dirty());
        assert!(open.get());
    }

    #[test]
    fn test_update_rebuild_if_composes_and_skips() {
        let scope = ReactiveScope::new();
        let picked = scope.use_state(Vec::<String>::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let signal = picked.signal();
        let seen_clone = seen.clone();
        scope.effect(move |g| {
            seen_clone.lock().unwrap().push(g.get(signal).unwrap_or_default());
        });

        // Each closure sees the value committed by the previous one
        for label in ["a", "b"] {
            assert!(picked.update_rebuild_if(|mut v| {
                v.push(label.to_string());
                Some(v)
            }));
        }
        assert!(scope.take_dirty());

        assert!(!picked.update_rebuild_if(|v| (v.len() > 5).then(Vec::new)));
        assert!(!scope.take_dirty());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![vec![], vec!["a".to_string()], vec!["a".to_string(), "b".to_string()]]
        );
    }
}
