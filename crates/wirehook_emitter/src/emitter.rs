//! The emitter: hook registration, wiring and dispatch.
//!
//! An [`Emitter`] keeps two independent registries of [`Event`]s keyed by
//! hook name:
//!
//! - **instance** registrations, made through [`on`](Emitter::on) /
//!   [`once`](Emitter::once). These are the only ones dispatch and removal
//!   look at.
//! - **class** registrations, made with [`Scope::Class`] before the emitter is
//!   seeded (see [`HookClass`](crate::HookClass)). Seeding replays each of
//!   them through the instance registration path.
//!
//! Emitters can be wired to other emitters. Firing a hook runs the local
//! callbacks first, then the callbacks of every wired emitter, one level deep.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use wirehook_emitter::{Callback, Emitter};
//!
//! let upstream = Emitter::new();
//! let downstream = Emitter::new();
//! upstream.wire(&downstream);
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let hits_clone = Arc::clone(&hits);
//! downstream.on("saved", Callback::new(move |_, _| {
//!     hits_clone.fetch_add(1, Ordering::SeqCst);
//! }));
//!
//! upstream.fire("saved")?;
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! # Ok::<(), wirehook_emitter::HookError>(())
//! ```

use core::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;

use crate::callback::Callback;
use crate::class::HookClass;
use crate::error::HookError;
use crate::event::{Event, EventConfig};
use crate::params::Params;

/// Hook name to registrations, in registration order.
pub type Events = IndexMap<String, Vec<Arc<Event>>>;

// ─────────────────────────────────────────────────────────────────────────────
// EmitterId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier of an emitter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmitterId(Arc<str>);

impl EmitterId {
    fn generate() -> Self {
        Self(Arc::from(nanoid::nanoid!()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "emitter_{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scope
// ─────────────────────────────────────────────────────────────────────────────

/// Which registry a registration is written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The live registry used by dispatch and removal.
    #[default]
    Instance,
    /// The class-level registry, replayed into the instance registry when the
    /// emitter is seeded.
    Class,
}

// ─────────────────────────────────────────────────────────────────────────────
// Emitter
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct EmitterState {
    instance_events: Events,
    class_events: Events,
    wired: Vec<WeakEmitter>,
}

impl EmitterState {
    fn registry_mut(&mut self, scope: Scope) -> &mut Events {
        match scope {
            Scope::Instance => &mut self.instance_events,
            Scope::Class => &mut self.class_events,
        }
    }

    fn live_wired(&self) -> usize {
        self.wired.iter().filter(|weak| weak.is_alive()).count()
    }
}

struct EmitterInner {
    id: EmitterId,
    label: Option<String>,
    state: RwLock<EmitterState>,
}

/// Registry and dispatcher of named hooks.
///
/// `Emitter` is a cheap handle: clones refer to the same registries. Handles
/// compare equal when they refer to the same emitter.
///
/// Every registration, removal and wiring method returns `&Self` for
/// chaining. No lock is held while callbacks run, so a callback may freely
/// register, remove, wire or fire on any emitter, including the one
/// currently dispatching.
#[derive(Clone)]
pub struct Emitter {
    inner: Arc<EmitterInner>,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    /// Creates an emitter with no registrations and no wiring.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates an emitter seeded with the class-level hooks of `T`.
    #[must_use]
    pub fn of<T: HookClass>() -> Self {
        Self::builder().with_class::<T>().build()
    }

    /// Returns a builder for configuring a new emitter.
    #[must_use]
    pub fn builder() -> EmitterBuilder {
        EmitterBuilder::default()
    }

    fn unseeded(label: Option<String>) -> Self {
        Self {
            inner: Arc::new(EmitterInner {
                id: EmitterId::generate(),
                label,
                state: RwLock::new(EmitterState::default()),
            }),
        }
    }

    /// Returns this emitter's id.
    #[must_use]
    pub fn id(&self) -> &EmitterId {
        &self.inner.id
    }

    /// Returns the label given to the builder, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Returns a non-owning handle to this emitter.
    #[must_use]
    pub fn downgrade(&self) -> WeakEmitter {
        WeakEmitter {
            id: self.inner.id.clone(),
            inner: Arc::downgrade(&self.inner),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────

    /// Registers `callback` for `hook`.
    ///
    /// Callbacks for the same hook run in registration order.
    pub fn on(&self, hook: impl Into<String>, callback: Callback) -> &Self {
        self.register(hook.into(), callback, Scope::Instance)
    }

    /// Registers `callback` for `hook`, to run at most once.
    ///
    /// After its first invocation the registration removes itself from the
    /// emitter that owns it. Passing the same `callback` to
    /// [`off`](Self::off) cancels it before it runs.
    pub fn once(&self, hook: impl Into<String>, callback: Callback) -> &Self {
        crate::dispatch::once(hook, callback, self, Scope::Instance)
    }

    /// Removes the first registration of `callback` for `hook`.
    ///
    /// A registration holding `callback` itself is removed first. Only when
    /// there is none is a pending [`once`](Self::once) wrapper around it
    /// removed instead. Only instance registrations are searched. Unknown
    /// hooks and callbacks are ignored.
    pub fn off(&self, hook: &str, callback: &Callback) -> &Self {
        let removed = {
            let mut state = self.inner.state.write();
            state.instance_events.get_mut(hook).and_then(|events| {
                events
                    .iter()
                    .position(|event| event.callback().ptr_eq(callback))
                    .or_else(|| {
                        events
                            .iter()
                            .position(|event| event.callback().matches(callback))
                    })
                    .map(|index| events.remove(index))
            })
        };

        if removed.is_some() {
            tracing::trace!(emitter = %self.inner.id, hook, "removed callback");
        }
        self
    }

    /// Shared registration path for the instance methods and the static forms.
    pub(crate) fn register(&self, hook: String, callback: Callback, scope: Scope) -> &Self {
        let event = Arc::new(Event::new(EventConfig {
            hook: hook.clone(),
            callback,
            source: self.downgrade(),
            params: Params::default(),
        }));

        tracing::trace!(emitter = %self.inner.id, hook = %hook, ?scope, "registered callback");

        self.inner
            .state
            .write()
            .registry_mut(scope)
            .entry(hook)
            .or_default()
            .push(event);
        self
    }

    /// Replays class registrations through the instance registration path.
    fn seed(&self) {
        let replay: Vec<(String, Callback)> = {
            let state = self.inner.state.read();
            state
                .class_events
                .iter()
                .flat_map(|(hook, events)| {
                    events
                        .iter()
                        .map(move |event| (hook.clone(), event.callback().clone()))
                })
                .collect()
        };

        for (hook, callback) in replay {
            self.register(hook, callback, Scope::Instance);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Wiring
    // ─────────────────────────────────────────────────────────────────────

    /// Wires `other` downstream of this emitter.
    ///
    /// Firing a hook here will also run `other`'s callbacks for it. The link
    /// is directed, not transitive, and does not keep `other` alive. Wiring
    /// the same emitter twice makes its callbacks run twice.
    ///
    /// Links to emitters that have been dropped are pruned here.
    pub fn wire(&self, other: &Emitter) -> &Self {
        tracing::trace!(emitter = %self.inner.id, wired = %other.inner.id, "wired emitter");
        let mut state = self.inner.state.write();
        state.wired.retain(WeakEmitter::is_alive);
        state.wired.push(other.downgrade());
        self
    }

    /// Removes the first wiring to `other`. No-op if it is not wired.
    pub fn unwire(&self, other: &Emitter) -> &Self {
        let mut state = self.inner.state.write();
        state.wired.retain(WeakEmitter::is_alive);
        if let Some(index) = state.wired.iter().position(|weak| weak.id == other.inner.id) {
            state.wired.remove(index);
            tracing::trace!(emitter = %self.inner.id, wired = %other.inner.id, "unwired emitter");
        }
        self
    }

    /// Returns the number of wired emitters that are still alive.
    #[must_use]
    pub fn wired_count(&self) -> usize {
        self.inner.state.read().live_wired()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────

    /// Fires `hook` with an empty payload.
    ///
    /// See [`fire_with`](Self::fire_with).
    pub fn fire(&self, hook: &str) -> Result<&Self, HookError> {
        self.fire_with(hook, Params::default())
    }

    /// Fires `hook` with `params`.
    ///
    /// Runs this emitter's callbacks for `hook`, then those of each wired
    /// emitter in wiring order. Each callback receives its owning emitter and
    /// its own copy of `params`. The first callback error aborts the rest of
    /// the dispatch and is returned.
    pub fn fire_with(&self, hook: &str, params: impl Into<Params>) -> Result<&Self, HookError> {
        self.dispatch(hook, &params.into())?;
        Ok(self)
    }

    /// Runs `f`, then fires `hook` with its serialized result.
    ///
    /// Returns the result of `f` once every callback has run.
    pub fn fire_after<T, F>(&self, hook: &str, f: F) -> Result<T, HookError>
    where
        T: Serialize,
        F: FnOnce() -> T,
    {
        let result = f();
        self.dispatch(hook, &Params::from_serialize(&result)?)?;
        Ok(result)
    }

    /// Shared dispatch path for the instance methods and the static forms.
    pub(crate) fn dispatch(&self, hook: &str, params: &Params) -> Result<(), HookError> {
        let local = self.run_local(hook, params);
        let local = match local {
            Ok(count) => count,
            Err(err) => return Err(self.aborted(hook, err)),
        };

        let wired: Vec<Emitter> = self
            .inner
            .state
            .read()
            .wired
            .iter()
            .filter_map(WeakEmitter::upgrade)
            .collect();

        let mut remote = 0;
        for emitter in &wired {
            match emitter.run_local(hook, params) {
                Ok(count) => remote += count,
                Err(err) => return Err(self.aborted(hook, err)),
            }
        }

        tracing::debug!(
            emitter = %self.inner.id,
            label = self.label(),
            hook,
            local,
            wired = wired.len(),
            remote,
            "fired hook"
        );
        Ok(())
    }

    /// Invokes this emitter's own callbacks for `hook` with `self` as context.
    fn run_local(&self, hook: &str, params: &Params) -> Result<usize, HookError> {
        let snapshot = self.snapshot(hook);
        for event in &snapshot {
            event.callback().invoke(self, params.clone())?;
        }
        Ok(snapshot.len())
    }

    fn snapshot(&self, hook: &str) -> Vec<Arc<Event>> {
        self.inner
            .state
            .read()
            .instance_events
            .get(hook)
            .cloned()
            .unwrap_or_default()
    }

    fn aborted(&self, hook: &str, err: HookError) -> HookError {
        tracing::debug!(emitter = %self.inner.id, hook, error = %err, "dispatch aborted");
        err
    }

    // ─────────────────────────────────────────────────────────────────────
    // Introspection
    // ─────────────────────────────────────────────────────────────────────

    /// Returns a snapshot of all registrations.
    ///
    /// Class and instance registrations are merged by hook name; when a hook
    /// appears in both, the instance entry wins.
    #[must_use]
    pub fn events(&self) -> Events {
        let state = self.inner.state.read();
        let mut merged = state.class_events.clone();
        for (hook, events) in &state.instance_events {
            merged.insert(hook.clone(), events.clone());
        }
        merged
    }

    /// Returns the number of instance registrations for `hook`.
    #[must_use]
    pub fn hook_count(&self, hook: &str) -> usize {
        self.inner
            .state
            .read()
            .instance_events
            .get(hook)
            .map_or(0, Vec::len)
    }

    /// Returns `true` if `hook` has at least one instance registration.
    #[must_use]
    pub fn contains_hook(&self, hook: &str) -> bool {
        self.hook_count(hook) > 0
    }
}

impl PartialEq for Emitter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Emitter {}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("Emitter")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("hooks", &state.instance_events.keys().collect::<Vec<_>>())
            .field("class_hooks", &state.class_events.keys().collect::<Vec<_>>())
            .field("wired", &state.live_wired())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WeakEmitter
// ─────────────────────────────────────────────────────────────────────────────

/// Non-owning handle to an [`Emitter`].
///
/// Used for wiring and for an event's back-reference to its owner.
#[derive(Clone)]
pub struct WeakEmitter {
    id: EmitterId,
    inner: Weak<EmitterInner>,
}

impl WeakEmitter {
    /// Returns the referenced emitter if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Emitter> {
        self.inner.upgrade().map(|inner| Emitter { inner })
    }

    /// Returns the id of the referenced emitter.
    #[must_use]
    pub fn id(&self) -> &EmitterId {
        &self.id
    }

    /// Returns `true` while the referenced emitter has not been dropped.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for WeakEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEmitter")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EmitterBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for [`Emitter`].
///
/// # Example
///
/// ```
/// use wirehook_emitter::{Callback, Emitter, HookClass, Scope, dispatch};
///
/// struct Audit;
///
/// impl HookClass for Audit {
///     fn register_hooks(target: &Emitter) {
///         dispatch::on("saved", Callback::new(|_, _| {}), target, Scope::Class);
///     }
/// }
///
/// let emitter = Emitter::builder().label("documents").with_class::<Audit>().build();
/// assert_eq!(emitter.label(), Some("documents"));
/// assert_eq!(emitter.hook_count("saved"), 1);
/// ```
#[derive(Default)]
pub struct EmitterBuilder {
    label: Option<String>,
    classes: Vec<fn(&Emitter)>,
}

impl EmitterBuilder {
    /// Sets a human-readable label, reported in logs and `Debug` output.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds the class-level hooks of `T`.
    ///
    /// Classes are applied in the order they were added.
    #[must_use]
    pub fn with_class<T: HookClass>(mut self) -> Self {
        self.classes.push(T::register_hooks);
        self
    }

    /// Builds the emitter.
    ///
    /// Class hooks are written into the class registry of the fresh emitter,
    /// then replayed into its instance registry.
    #[must_use]
    pub fn build(self) -> Emitter {
        let emitter = Emitter::unseeded(self.label);
        for register in &self.classes {
            register(&emitter);
        }
        emitter.seed();
        emitter
    }
}

impl fmt::Debug for EmitterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterBuilder")
            .field("label", &self.label)
            .field("classes", &self.classes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, Callback) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let callback = Callback::new(move |_: &Emitter, _| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        (count, callback)
    }

    #[test]
    fn on_then_fire_invokes_with_owner_as_context() {
        let emitter = Emitter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        emitter.on(
            "ready",
            Callback::new(move |ctx: &Emitter, _| {
                seen_clone.lock().unwrap().push(ctx.id().clone());
            }),
        );
        emitter.fire("ready").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![emitter.id().clone()]);
    }

    #[test]
    fn callbacks_run_in_registration_order() {
        let emitter = Emitter::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order_clone = Arc::clone(&order);
            emitter.on(
                "step",
                Callback::new(move |_: &Emitter, _| {
                    order_clone.lock().unwrap().push(name);
                }),
            );
        }
        emitter.fire("step").unwrap();

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn registration_methods_chain() {
        let emitter = Emitter::new();
        let (_, callback) = counter();

        emitter
            .on("a", callback.clone())
            .on("b", callback.clone())
            .once("c", callback.clone())
            .off("a", &callback);

        assert_eq!(emitter.hook_count("a"), 0);
        assert_eq!(emitter.hook_count("b"), 1);
        assert_eq!(emitter.hook_count("c"), 1);
    }

    #[test]
    fn off_removes_only_the_first_match() {
        let emitter = Emitter::new();
        let (count, callback) = counter();

        emitter.on("tick", callback.clone()).on("tick", callback.clone());
        emitter.off("tick", &callback);
        emitter.fire("tick").unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.hook_count("tick"), 1);
    }

    #[test]
    fn off_unknown_hook_or_callback_is_noop() {
        let emitter = Emitter::new();
        let (_, registered) = counter();
        let (_, stranger) = counter();

        emitter.on("tick", registered);
        emitter.off("missing", &stranger).off("tick", &stranger);

        assert_eq!(emitter.hook_count("tick"), 1);
    }

    #[test]
    fn off_never_touches_class_registrations() {
        let emitter = Emitter::new();
        let (_, callback) = counter();

        emitter.register("boot".to_string(), callback.clone(), Scope::Class);
        emitter.off("boot", &callback);

        assert_eq!(emitter.events()["boot"].len(), 1);
    }

    #[test]
    fn fire_without_registrations_is_noop() {
        let emitter = Emitter::new();
        let returned = emitter.fire("nothing").unwrap();
        assert_eq!(returned, &emitter);
        assert!(emitter.events().is_empty());
    }

    #[test]
    fn class_registrations_are_not_dispatched_until_seeded() {
        let emitter = Emitter::new();
        let (count, callback) = counter();

        emitter.register("boot".to_string(), callback, Scope::Class);
        emitter.fire("boot").unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(emitter.hook_count("boot"), 0);
    }

    #[test]
    fn events_prefers_instance_entries() {
        let emitter = Emitter::new();
        let (_, class_callback) = counter();
        let (_, instance_callback) = counter();

        emitter.register("boot".to_string(), class_callback.clone(), Scope::Class);
        emitter.register("only_class".to_string(), class_callback, Scope::Class);
        emitter.on("boot", instance_callback.clone());

        let events = emitter.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events["boot"].len(), 1);
        assert_eq!(events["boot"][0].callback(), &instance_callback);
        assert!(events.contains_key("only_class"));
    }

    #[test]
    fn unwire_removes_a_single_link() {
        let a = Emitter::new();
        let b = Emitter::new();

        a.wire(&b).wire(&b);
        assert_eq!(a.wired_count(), 2);

        a.unwire(&b);
        assert_eq!(a.wired_count(), 1);

        a.unwire(&b).unwire(&b);
        assert_eq!(a.wired_count(), 0);
    }

    #[test]
    fn dropped_wired_emitters_are_skipped() {
        let a = Emitter::new();
        let b = Emitter::new();
        let (count, callback) = counter();

        b.on("tick", callback);
        a.wire(&b);
        drop(b);

        assert_eq!(a.wired_count(), 0);
        a.fire("tick").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn off_prefers_the_exact_registration_over_a_once_wrapper() {
        let emitter = Emitter::new();
        let (count, callback) = counter();

        emitter.once("tick", callback.clone()).on("tick", callback.clone());
        emitter.off("tick", &callback);

        let events = emitter.events();
        assert_eq!(events["tick"].len(), 1);
        assert_ne!(events["tick"][0].callback(), &callback);

        emitter.fire("tick").unwrap().fire("tick").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn wire_prunes_dropped_links() {
        let a = Emitter::new();
        for _ in 0..10 {
            let temporary = Emitter::new();
            a.wire(&temporary);
        }
        assert_eq!(a.inner.state.read().wired.len(), 1);

        let kept = Emitter::new();
        a.wire(&kept);

        assert_eq!(a.inner.state.read().wired.len(), 1);
        assert_eq!(a.wired_count(), 1);
        assert!(format!("{a:?}").contains("wired: 1"));
    }

    #[test]
    fn builder_sets_label() {
        let emitter = Emitter::builder().label("jobs").build();
        assert_eq!(emitter.label(), Some("jobs"));
        assert!(format!("{emitter:?}").contains("jobs"));
    }

    #[test]
    fn ids_are_unique_and_displayed_with_prefix() {
        let a = Emitter::new();
        let b = Emitter::new();
        assert_ne!(a.id(), b.id());
        assert!(a.id().to_string().starts_with("emitter_"));
        assert_eq!(a.downgrade().id(), a.id());
    }

    #[test]
    fn fire_after_returns_result_and_delivers_it() {
        let emitter = Emitter::new();
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);

        emitter.on(
            "computed",
            Callback::new(move |_: &Emitter, params: Params| {
                *seen_clone.lock().unwrap() = Some(params.into_value());
            }),
        );

        let value = emitter.fire_after("computed", || 6 * 7).unwrap();

        assert_eq!(value, 42);
        assert_eq!(*seen.lock().unwrap(), Some(serde_json::json!(42)));
    }
}
