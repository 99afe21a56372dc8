//! Per-object publish/subscribe.
//!
//! Any host type can carry an event registry by embedding an
//! `Option<EventBus<Self>>` and implementing [`Evented`]. The slot stays `None`
//! until the first subscription; [`off`] with no event name resets it to `None`.
//! Everything else goes through the free functions of this module:
//!
//! - [`on`] – subscribe a handler under an auto-generated key (`_0`, `_1`, ...)
//! - [`on_keyed`] – merge handlers under caller-chosen keys
//! - [`off`] – drop the whole registry, one event, or one handler
//! - [`trigger`] – call every handler of an event
//! - [`remove`] – mark a [`Lifecycle`] host dead and fire [`REMOVE_EVENT`]
//!
//! # Dispatch rules
//!
//! Handlers run in subscription order and receive the host and the payload.
//! [`trigger`] works on the handlers present when it was called: a handler
//! removed (or replaced) by an earlier handler of the same dispatch is skipped,
//! and handlers subscribed during the dispatch wait for the next one. A handler
//! whose return value converts to [`HandlerResult::Unsubscribe`] (for instance
//! `false`) is removed right after it returns.
//!
//! # Example
//! ```
//! use aberredkit::eventbus::{EventBus, Evented, on, trigger};
//!
//! #[derive(Default)]
//! struct Door {
//!     opened: u32,
//!     events: Option<EventBus<Door>>,
//! }
//!
//! impl Evented for Door {
//!     type Args = ();
//!     fn events(&self) -> Option<&EventBus<Self>> {
//!         self.events.as_ref()
//!     }
//!     fn events_mut(&mut self) -> &mut Option<EventBus<Self>> {
//!         &mut self.events
//!     }
//! }
//!
//! let mut door = Door::default();
//! on(&mut door, "open", |d: &mut Door, _: &()| d.opened += 1);
//! trigger(&mut door, "open", &());
//! trigger(&mut door, "open", &());
//! assert_eq!(door.opened, 2);
//! ```

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::fmt;
use std::rc::Rc;

use log::{trace, warn};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Event fired by [`remove`].
pub const REMOVE_EVENT: &str = "remove";

/// What a handler wants after it ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Keep,
    Unsubscribe,
}

impl From<()> for HandlerResult {
    fn from(_: ()) -> Self {
        HandlerResult::Keep
    }
}

/// `false` unsubscribes, `true` keeps the handler.
impl From<bool> for HandlerResult {
    fn from(keep: bool) -> Self {
        if keep {
            HandlerResult::Keep
        } else {
            HandlerResult::Unsubscribe
        }
    }
}

/// A type that can own an event registry.
pub trait Evented: Sized + 'static {
    /// Payload passed to every handler by [`trigger`].
    type Args: 'static;

    fn events(&self) -> Option<&EventBus<Self>>;
    fn events_mut(&mut self) -> &mut Option<EventBus<Self>>;
}

/// Hosts with a liveness flag, required by [`remove`].
pub trait Lifecycle {
    fn is_alive(&self) -> bool;
    /// Make [`Lifecycle::is_alive`] return `false` from now on.
    fn mark_dead(&mut self);
}

type HandlerFn<H> = dyn FnMut(&mut H, &<H as Evented>::Args) -> HandlerResult;

/// A subscribed callback. Cloning shares the same callback.
pub struct Handler<H: Evented>(Rc<RefCell<HandlerFn<H>>>);

impl<H: Evented> Handler<H> {
    pub fn new<F, R>(mut f: F) -> Self
    where
        F: FnMut(&mut H, &H::Args) -> R + 'static,
        R: Into<HandlerResult>,
    {
        let callback: Rc<RefCell<HandlerFn<H>>> = Rc::new(RefCell::new(
            move |host: &mut H, args: &H::Args| -> HandlerResult { f(host, args).into() },
        ));
        Handler(callback)
    }

    fn same(&self, other: &Handler<H>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<H: Evented> Clone for Handler<H> {
    fn clone(&self) -> Self {
        Handler(Rc::clone(&self.0))
    }
}

impl<H: Evented> fmt::Debug for Handler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler")
    }
}

struct Slot<H: Evented> {
    seq: u64,
    handler: Handler<H>,
}

/// Handlers of one event plus the counter for auto-generated keys.
struct HandlerMap<H: Evented> {
    slots: FxHashMap<String, Slot<H>>,
    next_auto: u64,
}

impl<H: Evented> Default for HandlerMap<H> {
    fn default() -> Self {
        Self {
            slots: FxHashMap::default(),
            next_auto: 0,
        }
    }
}

type Snapshot<H> = SmallVec<[(String, Handler<H>); 8]>;

/// Registry of handlers keyed by event name, then by subscription key.
///
/// Only [`on`], [`on_keyed`], [`off`], [`trigger`] and [`remove`] change the
/// handlers; a bus exposes nothing but read access:
///
/// ```compile_fail
/// use aberredkit::eventbus::{EventBus, Evented, Handler};
///
/// struct Lamp {
///     events: Option<EventBus<Lamp>>,
/// }
///
/// impl Evented for Lamp {
///     type Args = ();
///     fn events(&self) -> Option<&EventBus<Self>> {
///         self.events.as_ref()
///     }
///     fn events_mut(&mut self) -> &mut Option<EventBus<Self>> {
///         &mut self.events
///     }
/// }
///
/// let mut bus: EventBus<Lamp> = EventBus::new();
/// bus.subscribe("x", Handler::new(|_: &mut Lamp, _: &()| {}));
/// ```
pub struct EventBus<H: Evented> {
    events: FxHashMap<String, HandlerMap<H>>,
    next_seq: u64,
}

impl<H: Evented> Default for EventBus<H> {
    fn default() -> Self {
        Self {
            events: FxHashMap::default(),
            next_seq: 0,
        }
    }
}

impl<H: Evented> fmt::Debug for EventBus<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, handlers) in &self.events {
            map.entry(name, &handlers.slots.len());
        }
        map.finish()
    }
}

impl<H: Evented> EventBus<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the handler map of `event` if it does not exist yet.
    fn ensure_event(&mut self, event: &str) {
        if !self.events.contains_key(event) {
            self.events.insert(event.to_string(), HandlerMap::default());
        }
    }

    /// Subscribe under the next free `_<n>` key and return that key.
    fn subscribe(&mut self, event: &str, handler: Handler<H>) -> String {
        let seq = self.bump_seq();
        let map = self.events.entry(event.to_string()).or_default();
        let key = loop {
            let candidate = format!("_{}", map.next_auto);
            map.next_auto += 1;
            if !map.slots.contains_key(&candidate) {
                break candidate;
            }
        };
        map.slots.insert(key.clone(), Slot { seq, handler });
        key
    }

    /// Subscribe under `key`, replacing any handler already stored there.
    ///
    /// A replaced handler keeps its position in dispatch order.
    fn subscribe_keyed(&mut self, event: &str, key: impl Into<String>, handler: Handler<H>) {
        let seq = self.bump_seq();
        let map = self.events.entry(event.to_string()).or_default();
        match map.slots.entry(key.into()) {
            Entry::Occupied(mut slot) => slot.get_mut().handler = handler,
            Entry::Vacant(slot) => {
                slot.insert(Slot { seq, handler });
            }
        }
    }

    /// Remove one handler. Returns whether it existed.
    fn unsubscribe(&mut self, event: &str, key: &str) -> bool {
        self.events
            .get_mut(event)
            .is_some_and(|map| map.slots.remove(key).is_some())
    }

    /// Remove every handler of `event`. Returns whether the event existed.
    fn clear_event(&mut self, event: &str) -> bool {
        self.events.remove(event).is_some()
    }

    pub fn has_event(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    pub fn contains(&self, event: &str, key: &str) -> bool {
        self.events
            .get(event)
            .is_some_and(|map| map.slots.contains_key(key))
    }

    /// Number of handlers subscribed to `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.events.get(event).map_or(0, |map| map.slots.len())
    }

    /// Subscription keys of `event` in dispatch order.
    pub fn keys(&self, event: &str) -> Vec<String> {
        self.snapshot(event)
            .map(|snap| snap.into_iter().map(|(key, _)| key).collect())
            .unwrap_or_default()
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn snapshot(&self, event: &str) -> Option<Snapshot<H>> {
        let map = self.events.get(event)?;
        let mut ordered: SmallVec<[(u64, &String, &Handler<H>); 8]> = map
            .slots
            .iter()
            .map(|(key, slot)| (slot.seq, key, &slot.handler))
            .collect();
        ordered.sort_unstable_by_key(|(seq, _, _)| *seq);
        Some(
            ordered
                .into_iter()
                .map(|(_, key, handler)| (key.clone(), handler.clone()))
                .collect(),
        )
    }

    fn is_current(&self, event: &str, key: &str, handler: &Handler<H>) -> bool {
        self.events
            .get(event)
            .and_then(|map| map.slots.get(key))
            .is_some_and(|slot| slot.handler.same(handler))
    }

    fn remove_if_current(&mut self, event: &str, key: &str, handler: &Handler<H>) {
        if self.is_current(event, key, handler) {
            if let Some(map) = self.events.get_mut(event) {
                map.slots.remove(key);
            }
        }
    }
}

fn bus_of<H: Evented>(host: &mut H) -> &mut EventBus<H> {
    host.events_mut().get_or_insert_with(EventBus::new)
}

/// Subscribe `handler` to `event` under an auto-generated key.
///
/// Creates the registry and the event's handler map on first use. The
/// returned key can be passed to [`off`] later.
pub fn on<H, F, R>(host: &mut H, event: &str, handler: F) -> String
where
    H: Evented,
    F: FnMut(&mut H, &H::Args) -> R + 'static,
    R: Into<HandlerResult>,
{
    let key = bus_of(host).subscribe(event, Handler::new(handler));
    trace!("on '{}' -> {}", event, key);
    key
}

/// Merge `handlers` into `event` under their own keys.
///
/// Existing handlers with the same key are replaced. The event's handler map
/// is created even when `handlers` is empty.
pub fn on_keyed<H, I, K>(host: &mut H, event: &str, handlers: I)
where
    H: Evented,
    I: IntoIterator<Item = (K, Handler<H>)>,
    K: Into<String>,
{
    let bus = bus_of(host);
    bus.ensure_event(event);
    for (key, handler) in handlers {
        bus.subscribe_keyed(event, key, handler);
    }
}

/// Unsubscribe at one of three granularities.
///
/// - no `event`: drop the whole registry (`key` is ignored)
/// - `event` only: drop every handler of that event
/// - `event` and `key`: drop that one handler
///
/// Missing targets are ignored.
pub fn off<H: Evented>(host: &mut H, event: Option<&str>, key: Option<&str>) {
    let Some(event) = event else {
        *host.events_mut() = None;
        return;
    };
    let Some(bus) = host.events_mut().as_mut() else {
        return;
    };
    match key {
        None => {
            bus.clear_event(event);
        }
        Some(key) => {
            bus.unsubscribe(event, key);
        }
    }
}

/// Call every handler of `event` with the host and `args`.
///
/// Does nothing when the host has no registry or no handlers for `event`.
pub fn trigger<H: Evented>(host: &mut H, event: &str, args: &H::Args) {
    let Some(snapshot) = host.events().and_then(|bus| bus.snapshot(event)) else {
        return;
    };
    trace!("trigger '{}' ({} handlers)", event, snapshot.len());
    for (key, handler) in snapshot {
        if !host
            .events()
            .is_some_and(|bus| bus.is_current(event, &key, &handler))
        {
            continue;
        }
        let result = match handler.0.try_borrow_mut() {
            Ok(mut callback) => (&mut *callback)(host, args),
            Err(_) => {
                warn!("handler '{}' of '{}' is already running, skipped", key, event);
                continue;
            }
        };
        if result == HandlerResult::Unsubscribe {
            if let Some(bus) = host.events_mut().as_mut() {
                bus.remove_if_current(event, &key, &handler);
            }
        }
    }
}

/// Mark `host` dead and fire its [`REMOVE_EVENT`] with the default payload.
///
/// Listeners run before this returns and already observe `is_alive() == false`.
pub fn remove<H>(host: &mut H)
where
    H: Evented + Lifecycle,
    H::Args: Default,
{
    host.mark_dead();
    trigger(host, REMOVE_EVENT, &H::Args::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        log: Vec<String>,
        alive: bool,
        events: Option<EventBus<Probe>>,
    }

    impl Evented for Probe {
        type Args = i32;
        fn events(&self) -> Option<&EventBus<Self>> {
            self.events.as_ref()
        }
        fn events_mut(&mut self) -> &mut Option<EventBus<Self>> {
            &mut self.events
        }
    }

    impl Lifecycle for Probe {
        fn is_alive(&self) -> bool {
            self.alive
        }
        fn mark_dead(&mut self) {
            self.alive = false;
        }
    }

    fn probe() -> Probe {
        Probe {
            alive: true,
            ..Default::default()
        }
    }

    // ==================== SUBSCRIBE ====================

    #[test]
    fn test_registry_created_lazily() {
        let mut p = probe();
        assert!(p.events.is_none());
        on(&mut p, "hit", |_: &mut Probe, _: &i32| {});
        let bus = p.events.as_ref().unwrap();
        assert!(bus.has_event("hit"));
        assert_eq!(bus.handler_count("hit"), 1);
    }

    #[test]
    fn test_auto_keys_count_up() {
        let mut p = probe();
        let k0 = on(&mut p, "hit", |_: &mut Probe, _: &i32| {});
        let k1 = on(&mut p, "hit", |_: &mut Probe, _: &i32| {});
        assert_eq!(k0, "_0");
        assert_eq!(k1, "_1");
        // keys are per event
        let other = on(&mut p, "miss", |_: &mut Probe, _: &i32| {});
        assert_eq!(other, "_0");
    }

    #[test]
    fn test_auto_keys_not_reused_after_removal() {
        let mut p = probe();
        let k0 = on(&mut p, "hit", |_: &mut Probe, _: &i32| {});
        off(&mut p, Some("hit"), Some(&k0));
        let k1 = on(&mut p, "hit", |_: &mut Probe, _: &i32| {});
        assert_eq!(k1, "_1");
    }

    #[test]
    fn test_auto_keys_skip_caller_keys() {
        let mut p = probe();
        on_keyed(
            &mut p,
            "hit",
            [("_0", Handler::new(|_: &mut Probe, _: &i32| {}))],
        );
        let key = on(&mut p, "hit", |_: &mut Probe, _: &i32| {});
        assert_eq!(key, "_1");
        assert_eq!(p.events.as_ref().unwrap().handler_count("hit"), 2);
    }

    #[test]
    fn test_on_keyed_empty_still_creates_event() {
        let mut p = probe();
        on_keyed(&mut p, "idle", Vec::<(String, Handler<Probe>)>::new());
        assert!(p.events.as_ref().unwrap().has_event("idle"));
        assert_eq!(p.events.as_ref().unwrap().handler_count("idle"), 0);
    }

    // ==================== TRIGGER ====================

    #[test]
    fn test_trigger_passes_host_and_args() {
        let mut p = probe();
        on(&mut p, "hit", |p: &mut Probe, dmg: &i32| {
            p.log.push(format!("hit {dmg}"))
        });
        trigger(&mut p, "hit", &7);
        assert_eq!(p.log, vec!["hit 7"]);
    }

    #[test]
    fn test_trigger_missing_registry_or_event_is_noop() {
        let mut p = probe();
        trigger(&mut p, "hit", &1);
        assert!(p.events.is_none());
        on(&mut p, "other", |p: &mut Probe, _: &i32| p.log.push("other".into()));
        trigger(&mut p, "hit", &1);
        assert!(p.log.is_empty());
    }

    #[test]
    fn test_trigger_runs_in_subscription_order() {
        let mut p = probe();
        for name in ["a", "b", "c"] {
            on(&mut p, "go", move |p: &mut Probe, _: &i32| p.log.push(name.into()));
        }
        on_keyed(
            &mut p,
            "go",
            [("z", Handler::new(|p: &mut Probe, _: &i32| p.log.push("z".into())))],
        );
        trigger(&mut p, "go", &0);
        assert_eq!(p.log, vec!["a", "b", "c", "z"]);
        assert_eq!(p.events.as_ref().unwrap().keys("go"), vec!["_0", "_1", "_2", "z"]);
    }

    #[test]
    fn test_replacing_keyed_handler_keeps_position() {
        let mut p = probe();
        on_keyed(
            &mut p,
            "go",
            [("first", Handler::new(|p: &mut Probe, _: &i32| p.log.push("old".into())))],
        );
        on(&mut p, "go", |p: &mut Probe, _: &i32| p.log.push("second".into()));
        on_keyed(
            &mut p,
            "go",
            [("first", Handler::new(|p: &mut Probe, _: &i32| p.log.push("new".into())))],
        );
        trigger(&mut p, "go", &0);
        assert_eq!(p.log, vec!["new", "second"]);
    }

    #[test]
    fn test_returning_false_unsubscribes() {
        let mut p = probe();
        on(&mut p, "tick", |p: &mut Probe, _: &i32| {
            p.log.push("once".into());
            false
        });
        on(&mut p, "tick", |p: &mut Probe, _: &i32| {
            p.log.push("always".into());
            true
        });
        trigger(&mut p, "tick", &0);
        trigger(&mut p, "tick", &0);
        assert_eq!(p.log, vec!["once", "always", "always"]);
        assert_eq!(p.events.as_ref().unwrap().handler_count("tick"), 1);
    }

    #[test]
    fn test_handler_removing_later_handler_skips_it() {
        let mut p = probe();
        on(&mut p, "go", |p: &mut Probe, _: &i32| {
            p.log.push("first".into());
            off(p, Some("go"), Some("_1"));
        });
        on(&mut p, "go", |p: &mut Probe, _: &i32| p.log.push("second".into()));
        trigger(&mut p, "go", &0);
        assert_eq!(p.log, vec!["first"]);
    }

    #[test]
    fn test_handler_added_during_dispatch_waits_for_next_trigger() {
        let mut p = probe();
        on(&mut p, "go", |p: &mut Probe, _: &i32| {
            p.log.push("spawner".into());
            on(p, "go", |p: &mut Probe, _: &i32| p.log.push("late".into()));
            false
        });
        trigger(&mut p, "go", &0);
        assert_eq!(p.log, vec!["spawner"]);
        trigger(&mut p, "go", &0);
        assert_eq!(p.log, vec!["spawner", "late"]);
    }

    #[test]
    fn test_handler_clearing_registry_stops_dispatch() {
        let mut p = probe();
        on(&mut p, "go", |p: &mut Probe, _: &i32| {
            p.log.push("first".into());
            off(p, None, None);
        });
        on(&mut p, "go", |p: &mut Probe, _: &i32| p.log.push("second".into()));
        trigger(&mut p, "go", &0);
        assert_eq!(p.log, vec!["first"]);
        assert!(p.events.is_none());
    }

    #[test]
    fn test_reentrant_trigger_skips_running_handler() {
        let mut p = probe();
        on(&mut p, "echo", |p: &mut Probe, depth: &i32| {
            p.log.push(format!("depth {depth}"));
            if *depth == 0 {
                trigger(p, "echo", &1);
            }
        });
        trigger(&mut p, "echo", &0);
        assert_eq!(p.log, vec!["depth 0"]);
    }

    // ==================== OFF ====================

    #[test]
    fn test_off_event_stops_handlers() {
        let mut p = probe();
        on(&mut p, "x", |p: &mut Probe, _: &i32| p.log.push("x".into()));
        trigger(&mut p, "x", &0);
        off(&mut p, Some("x"), None);
        trigger(&mut p, "x", &0);
        assert_eq!(p.log, vec!["x"]);
        assert!(!p.events.as_ref().unwrap().has_event("x"));
    }

    #[test]
    fn test_off_single_key() {
        let mut p = probe();
        let a = on(&mut p, "x", |p: &mut Probe, _: &i32| p.log.push("a".into()));
        on(&mut p, "x", |p: &mut Probe, _: &i32| p.log.push("b".into()));
        off(&mut p, Some("x"), Some(&a));
        trigger(&mut p, "x", &0);
        assert_eq!(p.log, vec!["b"]);
    }

    #[test]
    fn test_off_all_drops_registry() {
        let mut p = probe();
        on(&mut p, "x", |_: &mut Probe, _: &i32| {});
        off(&mut p, None, Some("ignored"));
        assert!(p.events.is_none());
    }

    #[test]
    fn test_off_missing_targets_is_silent() {
        let mut p = probe();
        off(&mut p, Some("x"), None);
        off(&mut p, Some("x"), Some("_0"));
        off(&mut p, None, None);
        assert!(p.events.is_none());
        on(&mut p, "x", |_: &mut Probe, _: &i32| {});
        off(&mut p, Some("y"), Some("_0"));
        off(&mut p, Some("x"), Some("_9"));
        assert_eq!(p.events.as_ref().unwrap().handler_count("x"), 1);
    }

    // ==================== REMOVE ====================

    #[test]
    fn test_remove_marks_dead_and_notifies_once() {
        let mut p = probe();
        on(&mut p, REMOVE_EVENT, |p: &mut Probe, _: &i32| {
            let state = if p.is_alive() { "alive" } else { "dead" };
            p.log.push(state.into());
        });
        remove(&mut p);
        assert!(!p.is_alive());
        assert_eq!(p.log, vec!["dead"]);
    }

    #[test]
    fn test_remove_without_listeners() {
        let mut p = probe();
        remove(&mut p);
        assert!(!p.is_alive());
        assert!(p.events.is_none());
    }
}
