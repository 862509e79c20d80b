//! Typed access to the autopilot's shared state.
//!
//! The guidance code never reaches for global state; it reads and writes
//! through a [`StateStore`] handed to it by the flight loop. Reads of absent
//! or mistyped keys fall back to zero, the empty string, or `false`.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Path keys read or written by the landing guidance.
pub mod keys {
    pub const HOME_LATITUDE_DEG: &str = "/task/home/latitude_deg";
    pub const HOME_LONGITUDE_DEG: &str = "/task/home/longitude_deg";
    pub const HOME_AZIMUTH_DEG: &str = "/task/home/azimuth_deg";

    pub const LAND_LATERAL_OFFSET_M: &str = "/task/land/lateral_offset_m";
    pub const LAND_GLIDESLOPE_DEG: &str = "/task/land/glideslope_deg";
    pub const LAND_TURN_RADIUS_M: &str = "/task/land/turn_radius_m";
    pub const LAND_DIRECTION: &str = "/task/land/direction";
    pub const LAND_EXTEND_FINAL_LEG_M: &str = "/task/land/extend_final_leg_m";
    pub const LAND_ALTITUDE_BIAS_FT: &str = "/task/land/altitude_bias_ft";
    pub const LAND_APPROACH_SPEED_KT: &str = "/task/land/approach_speed_kt";
    pub const LAND_FLARE_PITCH_DEG: &str = "/task/land/flare_pitch_deg";
    pub const LAND_FLARE_SECONDS: &str = "/task/land/flare_seconds";

    pub const CIRCLE_LATITUDE_DEG: &str = "/task/circle/latitude_deg";
    pub const CIRCLE_LONGITUDE_DEG: &str = "/task/circle/longitude_deg";
    pub const CIRCLE_DIRECTION: &str = "/task/circle/direction";
    pub const CIRCLE_RADIUS_M: &str = "/task/circle/radius_m";

    pub const ROUTE_REQUEST: &str = "/task/route/route_request";
    pub const ROUTE_START_MODE: &str = "/task/route/start_mode";
    pub const ROUTE_FOLLOW_MODE: &str = "/task/route/follow_mode";
    pub const ROUTE_COMPLETION_MODE: &str = "/task/route/completion_mode";
    pub const ROUTE_DIST_REMAINING_M: &str = "/task/route/dist_remaining_m";
    pub const ROUTE_DIST_VALID: &str = "/task/route/dist_valid";

    pub const AUTOPILOT_MODE: &str = "/autopilot/mode";
    pub const NAVIGATION_MODE: &str = "/navigation/mode";

    pub const TARGET_ALTITUDE_AGL_FT: &str = "/autopilot/targets/altitude_agl_ft";
    pub const TARGET_PITCH_DEG: &str = "/autopilot/targets/pitch_deg";
    pub const TARGET_AIRSPEED_KT: &str = "/autopilot/targets/airspeed_kt";

    pub const POSITION_LATITUDE_DEG: &str = "/position/latitude_deg";
    pub const POSITION_LONGITUDE_DEG: &str = "/position/longitude_deg";
    pub const POSITION_ALTITUDE_AGL_FT: &str = "/position/altitude_agl_ft";
    pub const VELOCITY_GROUNDSPEED_MS: &str = "/velocity/groundspeed_ms";

    pub const PILOT_ELEVATOR: &str = "/sensors/pilot_input/elevator";
    pub const IMU_TIMESTAMP: &str = "/sensors/imu/timestamp";

    pub const FLAPS_SETPOINT: &str = "/controls/flight/flaps_setpoint";
    pub const THROTTLE: &str = "/controls/engine/throttle";
}

/// A value held by the store.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Double(f64),
    String(String),
    Bool(bool),
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// Key-value access to the shared autopilot state.
pub trait StateStore {
    fn get(&self, key: &str) -> Option<&Value>;

    fn set(&mut self, key: &str, value: Value);

    /// Remove `key`, so later reads fall back to the defaults.
    fn remove(&mut self, key: &str);

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn get_f64(&self, key: &str) -> f64 {
        match self.get(key) {
            Some(Value::Double(value)) => *value,
            Some(Value::Bool(value)) => f64::from(u8::from(*value)),
            _ => 0.,
        }
    }

    fn get_str(&self, key: &str) -> &str {
        match self.get(key) {
            Some(Value::String(value)) => value.as_str(),
            _ => "",
        }
    }

    fn get_bool(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(value)) => *value,
            Some(Value::Double(value)) => *value != 0.,
            _ => false,
        }
    }

    fn set_f64(&mut self, key: &str, value: f64) {
        self.set(key, Value::Double(value));
    }

    fn set_str(&mut self, key: &str, value: &str) {
        self.set(key, Value::from(value));
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, Value::Bool(value));
    }
}

/// An in-memory [`StateStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set `key` and return `self`
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_read_as_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.get_f64(keys::TARGET_PITCH_DEG), 0.);
        assert_eq!(store.get_str(keys::NAVIGATION_MODE), "");
        assert!(!store.get_bool(keys::ROUTE_DIST_VALID));
        assert!(!store.has(keys::TARGET_PITCH_DEG));
    }

    #[test]
    fn typed_reads_coerce_numbers_and_flags() {
        let store = MemoryStore::new()
            .with(keys::ROUTE_DIST_VALID, 1.)
            .with(keys::THROTTLE, true)
            .with(keys::NAVIGATION_MODE, "circle");

        assert!(store.get_bool(keys::ROUTE_DIST_VALID));
        assert_eq!(store.get_f64(keys::THROTTLE), 1.);
        assert_eq!(store.get_f64(keys::NAVIGATION_MODE), 0.);
        assert_eq!(store.get_str(keys::NAVIGATION_MODE), "circle");
    }

    #[test]
    fn set_overwrites_previous_value() {
        let mut store = MemoryStore::new();
        store.set_f64(keys::TARGET_ALTITUDE_AGL_FT, 300.);
        store.set_f64(keys::TARGET_ALTITUDE_AGL_FT, 250.);
        assert_eq!(store.get_f64(keys::TARGET_ALTITUDE_AGL_FT), 250.);
        assert_eq!(store.len(), 1);
    }
}
