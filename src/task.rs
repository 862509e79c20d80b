//! Mission tasks driven by the flight loop.
//!
//! A task is activated once, updated every control cycle, and closed by
//! its owner before another task takes over the same outputs.

use crate::events::EventSink;
use crate::store::{StateStore, Value};

/// A maneuver that runs against a vehicle `T`.
pub trait Task<T> {
    /// The per-cycle result of this task.
    type Output;

    fn name(&self) -> &str;

    /// Take over the vehicle outputs.
    fn activate(&mut self, vehicle: &mut T);

    /// Run one control cycle with time-step `dt` in seconds.
    /// Returns `None` if the task is not active.
    fn update(&mut self, vehicle: &mut T, dt: f64) -> Option<Self::Output>;

    fn is_complete(&self, vehicle: &T) -> bool;

    /// Hand the vehicle outputs back to whoever held them before [`Task::activate`].
    fn close(&mut self, vehicle: &mut T);
}

/// A state store paired with an event sink.
#[derive(Clone, Debug, Default)]
pub struct Vehicle<S, E> {
    pub store: S,
    pub events: E,
}

impl<S, E> Vehicle<S, E> {
    pub fn new(store: S, events: E) -> Self {
        Self { store, events }
    }
}

impl<S: StateStore, E> StateStore for Vehicle<S, E> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.store.set(key, value)
    }

    fn remove(&mut self, key: &str) {
        self.store.remove(key)
    }
}

impl<S, E: EventSink> EventSink for Vehicle<S, E> {
    fn log(&mut self, category: &str, message: &str) {
        self.events.log(category, message)
    }
}
