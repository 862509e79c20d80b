//! Save and restore the shared state a task takes over.
//!
//! A task captures the modes, circle and targets it is about to overwrite
//! when it activates, and puts them back when it closes so the hand-back to
//! the previous task is transparent.

use crate::store::{keys, StateStore, Value};
use alloc::vec::Vec;

const MODE_KEYS: [&str; 2] = [keys::AUTOPILOT_MODE, keys::NAVIGATION_MODE];

const CIRCLE_KEYS: [&str; 4] = [
    keys::CIRCLE_LATITUDE_DEG,
    keys::CIRCLE_LONGITUDE_DEG,
    keys::CIRCLE_DIRECTION,
    keys::CIRCLE_RADIUS_M,
];

const TARGET_KEYS: [&str; 3] = [
    keys::TARGET_ALTITUDE_AGL_FT,
    keys::TARGET_PITCH_DEG,
    keys::TARGET_AIRSPEED_KT,
];

/// Which groups of state to capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scope {
    pub modes: bool,
    pub circle: bool,
    pub targets: bool,
}

impl Scope {
    pub fn all() -> Self {
        Self {
            modes: true,
            circle: true,
            targets: true,
        }
    }
}

/// Captured values, restored in one step.
///
/// Keys that were absent at capture are recorded too, and removed again on
/// restore.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<(&'static str, Option<Value>)>,
}

impl Snapshot {
    pub fn capture<S: StateStore + ?Sized>(store: &S, scope: Scope) -> Self {
        let groups: [(bool, &[&'static str]); 3] = [
            (scope.modes, &MODE_KEYS),
            (scope.circle, &CIRCLE_KEYS),
            (scope.targets, &TARGET_KEYS),
        ];

        let entries = groups
            .iter()
            .filter(|(enabled, _)| *enabled)
            .flat_map(|(_, group)| group.iter())
            .map(|&key| (key, store.get(key).cloned()))
            .collect();

        Self { entries }
    }

    /// Write every captured value back.
    pub fn restore<S: StateStore + ?Sized>(&self, store: &mut S) {
        for (key, value) in &self.entries {
            match value {
                Some(value) => store.set(key, value.clone()),
                None => store.remove(key),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn restores_captured_groups_only() {
        let mut store = MemoryStore::new()
            .with(keys::NAVIGATION_MODE, "route")
            .with(keys::AUTOPILOT_MODE, "basic+tecs")
            .with(keys::TARGET_ALTITUDE_AGL_FT, 400.)
            .with(keys::CIRCLE_RADIUS_M, 100.);

        let snapshot = Snapshot::capture(
            &store,
            Scope {
                modes: true,
                circle: false,
                targets: true,
            },
        );
        assert_eq!(snapshot.len(), 5);

        store.set_str(keys::NAVIGATION_MODE, "circle");
        store.set_f64(keys::TARGET_ALTITUDE_AGL_FT, 150.);
        store.set_f64(keys::CIRCLE_RADIUS_M, 75.);
        store.set_f64(keys::TARGET_PITCH_DEG, -4.);

        snapshot.restore(&mut store);

        assert_eq!(store.get_str(keys::NAVIGATION_MODE), "route");
        assert_eq!(store.get_f64(keys::TARGET_ALTITUDE_AGL_FT), 400.);
        assert_eq!(store.get_f64(keys::CIRCLE_RADIUS_M), 75.);
    }

    #[test]
    fn keys_absent_at_capture_are_removed() {
        let mut store = MemoryStore::new().with(keys::TARGET_ALTITUDE_AGL_FT, 400.);
        let snapshot = Snapshot::capture(&store, Scope::all());

        store.set_f64(keys::TARGET_PITCH_DEG, -4.);
        store.set_str(keys::CIRCLE_DIRECTION, "left");
        snapshot.restore(&mut store);

        assert!(!store.has(keys::TARGET_PITCH_DEG));
        assert!(!store.has(keys::CIRCLE_DIRECTION));
        assert_eq!(store.get_f64(keys::TARGET_ALTITUDE_AGL_FT), 400.);
        assert_eq!(store.len(), 1);
    }
}
