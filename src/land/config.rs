//! Land task configuration.

use crate::store::{keys, StateStore};
use alloc::string::String;

#[cfg(feature = "serde")]
use serde::Deserialize;

pub const DEFAULT_GLIDESLOPE_DEG: f64 = 6.0;
pub const DEFAULT_TURN_RADIUS_M: f64 = 75.0;
pub const DEFAULT_APPROACH_SPEED_KT: f64 = 25.0;
pub const DEFAULT_FLARE_SECONDS: f64 = 5.0;

const MIN_GLIDESLOPE_DEG: f64 = 0.01;
const MIN_TURN_RADIUS_M: f64 = 1.0;
const MIN_APPROACH_SPEED_KT: f64 = 0.1;
const MIN_FLARE_SECONDS: f64 = 0.1;

/// The land task entry of the autopilot configuration tree, as written.
///
/// Absent fields read as zero or empty, the same as an absent node.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LandConfig {
    pub name: String,
    pub nickname: String,
    pub lateral_offset_m: f64,
    pub glideslope_deg: f64,
    pub turn_radius_m: f64,
    pub direction: String,
    pub extend_final_leg_m: f64,
    pub alt_bias_ft: f64,
    pub approach_speed_kt: f64,
    pub flare_pitch_deg: f64,
    pub flare_seconds: f64,
    pub flaps: Option<f64>,
}

#[cfg(feature = "serde")]
impl LandConfig {
    /// Parse the task configuration from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, crate::Error> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

/// Which way the descending circle is flown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    /// Parse a configured direction. Anything but `"right"` is a left turn.
    pub fn from_name(name: &str) -> Self {
        if name == "right" {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// -1 for a left turn, +1 for a right turn.
    pub fn side(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Validated approach configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ApproachConfig {
    /// Lateral offset (in meters) of the final leg from home.
    pub lateral_offset_m: f64,

    /// Descent angle (in degrees).
    pub glideslope_deg: f64,

    /// Radius (in meters) of the descending circle.
    pub turn_radius_m: f64,

    pub direction: Direction,

    /// Extra length (in meters) appended to the final leg.
    pub extend_final_leg_m: f64,

    /// Offset (in feet) added to the glideslope altitude.
    pub alt_bias_ft: f64,

    /// Target airspeed (in knots) for the approach.
    pub approach_speed_kt: f64,

    /// Pitch target (in degrees) at the end of the flare.
    pub flare_pitch_deg: f64,

    /// Duration (in seconds) of the flare blend.
    pub flare_seconds: f64,

    pub flaps_setpoint: f64,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self::from_config(&LandConfig::default())
    }
}

impl ApproachConfig {
    /// Validate a task configuration, replacing missing or out of range
    /// values with their defaults.
    pub fn from_config(config: &LandConfig) -> Self {
        Self {
            lateral_offset_m: config.lateral_offset_m,
            glideslope_deg: at_least(
                "glideslope_deg",
                config.glideslope_deg,
                MIN_GLIDESLOPE_DEG,
                DEFAULT_GLIDESLOPE_DEG,
            ),
            turn_radius_m: at_least(
                "turn_radius_m",
                config.turn_radius_m,
                MIN_TURN_RADIUS_M,
                DEFAULT_TURN_RADIUS_M,
            ),
            direction: Direction::from_name(&config.direction),
            extend_final_leg_m: config.extend_final_leg_m,
            alt_bias_ft: config.alt_bias_ft,
            approach_speed_kt: at_least(
                "approach_speed_kt",
                config.approach_speed_kt,
                MIN_APPROACH_SPEED_KT,
                DEFAULT_APPROACH_SPEED_KT,
            ),
            flare_pitch_deg: config.flare_pitch_deg,
            flare_seconds: at_least(
                "flare_seconds",
                config.flare_seconds,
                MIN_FLARE_SECONDS,
                DEFAULT_FLARE_SECONDS,
            ),
            flaps_setpoint: config.flaps.unwrap_or(0.0),
        }
    }

    /// Publish the effective configuration under `/task/land`.
    pub fn sync_to_store<S: StateStore + ?Sized>(&self, store: &mut S) {
        store.set_f64(keys::LAND_LATERAL_OFFSET_M, self.lateral_offset_m);
        store.set_f64(keys::LAND_GLIDESLOPE_DEG, self.glideslope_deg);
        store.set_f64(keys::LAND_TURN_RADIUS_M, self.turn_radius_m);
        store.set_str(keys::LAND_DIRECTION, self.direction.name());
        store.set_f64(keys::LAND_EXTEND_FINAL_LEG_M, self.extend_final_leg_m);
        store.set_f64(keys::LAND_ALTITUDE_BIAS_FT, self.alt_bias_ft);
        store.set_f64(keys::LAND_APPROACH_SPEED_KT, self.approach_speed_kt);
        store.set_f64(keys::LAND_FLARE_PITCH_DEG, self.flare_pitch_deg);
        store.set_f64(keys::LAND_FLARE_SECONDS, self.flare_seconds);
    }

    /// Re-read the values that may be tuned in flight.
    pub fn refresh_tunables<S: StateStore + ?Sized>(&mut self, store: &S) {
        refresh(store, keys::LAND_GLIDESLOPE_DEG, &mut self.glideslope_deg);
        refresh(store, keys::LAND_EXTEND_FINAL_LEG_M, &mut self.extend_final_leg_m);
        refresh(store, keys::LAND_ALTITUDE_BIAS_FT, &mut self.alt_bias_ft);
        refresh(store, keys::LAND_FLARE_PITCH_DEG, &mut self.flare_pitch_deg);
        refresh(store, keys::LAND_FLARE_SECONDS, &mut self.flare_seconds);
    }

    /// Re-read the values the approach geometry is built from.
    ///
    /// A turn radius below the minimum is ignored so the circle never
    /// collapses.
    pub fn refresh_geometry<S: StateStore + ?Sized>(&mut self, store: &S) {
        refresh(store, keys::LAND_LATERAL_OFFSET_M, &mut self.lateral_offset_m);
        refresh(store, keys::LAND_EXTEND_FINAL_LEG_M, &mut self.extend_final_leg_m);

        if store.has(keys::LAND_TURN_RADIUS_M) {
            let turn_radius_m = store.get_f64(keys::LAND_TURN_RADIUS_M);
            if turn_radius_m >= MIN_TURN_RADIUS_M {
                self.turn_radius_m = turn_radius_m;
            } else {
                log::warn!(
                    "ignoring turn radius of {} m, keeping {} m",
                    turn_radius_m,
                    self.turn_radius_m
                );
            }
        }

        if store.has(keys::LAND_DIRECTION) {
            self.direction = Direction::from_name(store.get_str(keys::LAND_DIRECTION));
        }
    }
}

fn at_least(name: &str, value: f64, min: f64, default: f64) -> f64 {
    if value < min {
        log::warn!("land {} of {} is below {}, using {}", name, value, min, default);
        default
    } else {
        value
    }
}

fn refresh<S: StateStore + ?Sized>(store: &S, key: &str, value: &mut f64) {
    if store.has(key) {
        *value = store.get_f64(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rstest::rstest;

    #[test]
    fn invalid_values_take_defaults() {
        let config = ApproachConfig::from_config(&LandConfig {
            glideslope_deg: 0.,
            turn_radius_m: 0.,
            direction: String::new(),
            approach_speed_kt: 0.,
            flare_seconds: 0.,
            ..LandConfig::default()
        });

        assert_eq!(config.glideslope_deg, 6.0);
        assert_eq!(config.turn_radius_m, 75.0);
        assert_eq!(config.direction, Direction::Left);
        assert_eq!(config.direction.name(), "left");
        assert_eq!(config.approach_speed_kt, 25.0);
        assert_eq!(config.flare_seconds, 5.0);
        assert_eq!(config.flaps_setpoint, 0.0);
    }

    #[test]
    fn valid_values_are_kept() {
        let config = ApproachConfig::from_config(&LandConfig {
            lateral_offset_m: 10.,
            glideslope_deg: 4.5,
            turn_radius_m: 60.,
            direction: "right".into(),
            extend_final_leg_m: 30.,
            alt_bias_ft: 5.,
            approach_speed_kt: 30.,
            flare_pitch_deg: 2.,
            flare_seconds: 3.,
            flaps: Some(0.5),
            ..LandConfig::default()
        });

        assert_eq!(config.glideslope_deg, 4.5);
        assert_eq!(config.turn_radius_m, 60.);
        assert_eq!(config.direction, Direction::Right);
        assert_eq!(config.approach_speed_kt, 30.);
        assert_eq!(config.flare_seconds, 3.);
        assert_eq!(config.flaps_setpoint, 0.5);
    }

    #[rstest]
    #[case("left", Direction::Left, -1.0)]
    #[case("right", Direction::Right, 1.0)]
    #[case("", Direction::Left, -1.0)]
    #[case("Right", Direction::Left, -1.0)]
    fn direction_names(#[case] name: &str, #[case] direction: Direction, #[case] side: f64) {
        assert_eq!(Direction::from_name(name), direction);
        assert_eq!(direction.side(), side);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_json_task_entry() {
        let config = LandConfig::from_json(
            r#"{
                "name": "land",
                "nickname": "Land",
                "turn_radius_m": 50.0,
                "direction": "right",
                "extend_final_leg_m": 25.0,
                "flare_pitch_deg": 3.0,
                "flaps": 0.25
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "land");
        assert_eq!(config.glideslope_deg, 0.);
        assert_eq!(config.flaps, Some(0.25));

        let approach = ApproachConfig::from_config(&config);
        assert_eq!(approach.glideslope_deg, DEFAULT_GLIDESLOPE_DEG);
        assert_eq!(approach.turn_radius_m, 50.);
        assert_eq!(approach.direction, Direction::Right);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            LandConfig::from_json(r#"{"turn_radius_m": "wide"}"#),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn syncs_and_refreshes_through_store() {
        let mut store = MemoryStore::new();
        let mut config = ApproachConfig::default();
        config.sync_to_store(&mut store);

        assert_eq!(store.get_f64(keys::LAND_GLIDESLOPE_DEG), 6.0);
        assert_eq!(store.get_str(keys::LAND_DIRECTION), "left");

        store.set_f64(keys::LAND_GLIDESLOPE_DEG, 4.0);
        store.set_f64(keys::LAND_ALTITUDE_BIAS_FT, 12.0);
        store.set_f64(keys::LAND_TURN_RADIUS_M, 90.0);
        config.refresh_tunables(&store);

        assert_eq!(config.glideslope_deg, 4.0);
        assert_eq!(config.alt_bias_ft, 12.0);
        assert_eq!(config.turn_radius_m, 75.0);

        config.refresh_geometry(&store);
        assert_eq!(config.turn_radius_m, 90.0);

        store.set_f64(keys::LAND_TURN_RADIUS_M, 0.5);
        config.refresh_geometry(&store);
        assert_eq!(config.turn_radius_m, 90.0);
    }
}
