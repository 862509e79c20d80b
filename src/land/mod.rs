//! Automated landing.
//!
//! The approach is flown as a descending circle tangent to a straight final
//! leg that ends at home. The circle is held until the aircraft has captured
//! both the circle and the glideslope, then the task hands lateral guidance
//! to the route follower at the tangent point. Altitude is managed here the
//! whole way down, and a timed flare blends pitch and throttle just before
//! touchdown.
//!
//! ```
//! use embedded_autoland::land::{Land, LandConfig};
//! use embedded_autoland::store::{keys, MemoryStore};
//! use embedded_autoland::{EventLog, Task, Vehicle};
//!
//! let store = MemoryStore::new()
//!     .with(keys::HOME_LATITUDE_DEG, 45.0)
//!     .with(keys::HOME_LONGITUDE_DEG, -93.0)
//!     .with(keys::HOME_AZIMUTH_DEG, 270.0)
//!     .with(keys::TARGET_ALTITUDE_AGL_FT, 400.0);
//! let mut vehicle = Vehicle::new(store, EventLog::new());
//!
//! let mut land = Land::new(&LandConfig::default(), &mut vehicle);
//! land.activate(&mut vehicle);
//!
//! // Once per control cycle
//! let output = land.update(&mut vehicle, 0.02).unwrap();
//! assert!(output.target_altitude_ft <= 400.0);
//!
//! land.close(&mut vehicle);
//! ```

pub mod approach;
pub use approach::{ApproachGeometry, Home, RouteRequest, Waypoint};

pub mod config;
pub use config::{ApproachConfig, Direction, LandConfig};

pub mod flare;
pub use flare::{Flare, FlareCommand};

use crate::events::EventSink;
use crate::geodesy::{self, LatLon};
use crate::geometry::{wrap_180, wrap_360};
use crate::snapshot::{Scope, Snapshot};
use crate::store::{keys, StateStore};
use crate::task::Task;
use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::PI;
use num_traits::Float;

pub const METERS_TO_FEET: f64 = 1.0 / FEET_TO_METERS;
pub const FEET_TO_METERS: f64 = 0.3048;

/// Altitude bias (in feet) per unit of pilot elevator input.
const ELEVATOR_BIAS_FT: f64 = 25.0;

/// Circle capture band as a fraction of the turn radius.
const CIRCLE_CAPTURE_MIN: f64 = 0.75;
const CIRCLE_CAPTURE_MAX: f64 = 1.25;

const GLIDESLOPE_CAPTURE_DEG: f64 = 1.0;

/// How far (in degrees) past the tangent point the circle still counts down.
const TANGENT_OVERSHOOT_DEG: f64 = 10.0;

/// Exit window (in degrees) around the tangent point.
const FINAL_EXIT_DEG: f64 = 10.0;

const MIN_GROUND_SPEED_MS: f64 = 0.01;

/// Time to touchdown (in seconds) reported when not moving.
const STATIONARY_SECONDS: f64 = 1000.0;

/// Lateral navigation modes used by the approach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationMode {
    Circle,
    Route,
}

impl NavigationMode {
    pub fn name(self) -> &'static str {
        match self {
            NavigationMode::Circle => "circle",
            NavigationMode::Route => "route",
        }
    }
}

/// Autopilot modes used by the approach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutopilotMode {
    /// Total energy control of altitude and airspeed.
    BasicTecs,

    /// Pitch and throttle targets are set directly.
    Basic,
}

impl AutopilotMode {
    pub fn name(self) -> &'static str {
        match self {
            AutopilotMode::BasicTecs => "basic+tecs",
            AutopilotMode::Basic => "basic",
        }
    }
}

/// Lateral phase of the approach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    CircleDescent,
    FinalApproach,
}

/// Guidance state owned by one activation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GuidanceState {
    pub circle_capture: bool,
    pub gs_capture: bool,

    /// Set once the flare starts.
    pub flare: Option<Flare>,

    /// Distance (in meters) left to touchdown.
    pub dist_remaining_m: f64,
}

impl GuidanceState {
    pub fn is_flaring(&self) -> bool {
        self.flare.is_some()
    }
}

/// What one guidance cycle computed and commanded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuidanceOutput {
    pub phase: Phase,
    pub dist_remaining_m: f64,

    /// Commanded target altitude (in feet AGL).
    pub target_altitude_ft: f64,

    /// Altitude floor (in feet AGL) before glideslope capture.
    pub safe_altitude_ft: f64,

    pub glideslope_error_deg: f64,
    pub seconds_to_touchdown: f64,
    pub circle_capture: bool,
    pub gs_capture: bool,
    pub flare: Option<FlareCommand>,
}

/// Returns `true` if `distance_m` from the circle center is within the
/// capture band of `radius_m`.
pub fn is_circle_capture(distance_m: f64, radius_m: f64) -> bool {
    let fraction = (distance_m / radius_m).abs();
    fraction > CIRCLE_CAPTURE_MIN && fraction < CIRCLE_CAPTURE_MAX
}

/// Altitude (in feet) on the glideslope with `dist_remaining_m` to go.
pub fn glideslope_altitude_ft(dist_remaining_m: f64, glideslope_rad: f64, bias_ft: f64) -> f64 {
    dist_remaining_m * glideslope_rad.tan() * METERS_TO_FEET + bias_ft
}

/// Glideslope altitude (in feet) at the start of a full half circle.
pub fn safe_altitude_ft(radius_m: f64, final_leg_m: f64, glideslope_rad: f64, bias_ft: f64) -> f64 {
    glideslope_altitude_ft(PI * radius_m + final_leg_m, glideslope_rad, bias_ft)
}

/// Limit a new target altitude to the safety floor (until the glideslope is
/// captured) and to the current target, so the target never climbs.
pub fn limit_target_altitude(
    target_ft: f64,
    safe_ft: f64,
    current_target_ft: f64,
    gs_capture: bool,
) -> f64 {
    let target_ft = if gs_capture {
        target_ft
    } else {
        target_ft.max(safe_ft)
    };
    target_ft.min(current_target_ft)
}

/// Seconds to touchdown at the current ground speed.
pub fn seconds_to_touchdown(dist_remaining_m: f64, ground_speed_ms: f64) -> f64 {
    if ground_speed_ms > MIN_GROUND_SPEED_MS {
        dist_remaining_m / ground_speed_ms
    } else {
        STATIONARY_SECONDS
    }
}

/// The landing task.
#[derive(Clone, Debug)]
pub struct Land {
    name: String,
    nickname: String,
    config: ApproachConfig,
    geometry: Option<ApproachGeometry>,
    guidance: Option<GuidanceState>,
    /// One snapshot per activation, restored in reverse order.
    saved: Vec<Snapshot>,
}

impl Land {
    /// Create the task and publish its effective configuration to `store`.
    pub fn new<S: StateStore + ?Sized>(config: &LandConfig, store: &mut S) -> Self {
        let approach = ApproachConfig::from_config(config);
        approach.sync_to_store(store);

        Self {
            name: config.name.clone(),
            nickname: config.nickname.clone(),
            config: approach,
            geometry: None,
            guidance: None,
            saved: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn config(&self) -> &ApproachConfig {
        &self.config
    }

    pub fn geometry(&self) -> Option<&ApproachGeometry> {
        self.geometry.as_ref()
    }

    pub fn guidance(&self) -> Option<&GuidanceState> {
        self.guidance.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.guidance.is_some()
    }

    /// Build the approach from the current home and `/task/land` values and
    /// publish it.
    pub fn rebuild_approach<S: StateStore + ?Sized>(&mut self, store: &mut S) -> &ApproachGeometry {
        self.config.refresh_geometry(&*store);
        let home = Home::from_store(&*store);

        let geometry = ApproachGeometry::build(&self.config, &home);
        geometry.publish(store);

        log::debug!(
            "approach to {:?} heading {}: circle {:?} radius {} m, final leg {} m, route {}",
            home.position,
            geometry.final_heading_deg,
            geometry.center,
            geometry.radius_m,
            geometry.final_leg_m,
            geometry.route.request
        );

        &*self.geometry.insert(geometry)
    }
}

impl<T> Task<T> for Land
where
    T: StateStore + EventSink,
{
    type Output = GuidanceOutput;

    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self, vehicle: &mut T) {
        // Other tasks may have taken over the circle and route since the
        // last activation
        match &self.geometry {
            Some(geometry) => geometry.publish(vehicle),
            None => {
                self.rebuild_approach(vehicle);
            }
        }

        self.saved.push(Snapshot::capture(&*vehicle, Scope::all()));

        vehicle.set_str(keys::AUTOPILOT_MODE, AutopilotMode::BasicTecs.name());
        vehicle.set_str(keys::NAVIGATION_MODE, NavigationMode::Circle.name());

        let approach_speed_kt = if vehicle.has(keys::LAND_APPROACH_SPEED_KT) {
            vehicle.get_f64(keys::LAND_APPROACH_SPEED_KT)
        } else {
            self.config.approach_speed_kt
        };
        vehicle.set_f64(keys::TARGET_AIRSPEED_KT, approach_speed_kt);
        vehicle.set_f64(keys::FLAPS_SETPOINT, self.config.flaps_setpoint);

        self.guidance = Some(GuidanceState::default());
        vehicle.log("mission", "land");
    }

    fn update(&mut self, vehicle: &mut T, _dt: f64) -> Option<GuidanceOutput> {
        let (Some(guidance), Some(geometry)) = (self.guidance.as_mut(), self.geometry.as_ref())
        else {
            return None;
        };
        let config = &mut self.config;

        config.refresh_tunables(&*vehicle);
        let glideslope_rad = config.glideslope_deg.to_radians();

        // Negative elevator is nose up and raises the glideslope
        let bias_ft = config.alt_bias_ft - vehicle.get_f64(keys::PILOT_ELEVATOR) * ELEVATOR_BIAS_FT;

        let safe_altitude_ft =
            safe_altitude_ft(geometry.radius_m, geometry.final_leg_m, glideslope_rad, bias_ft);

        let mut circle_pos_deg = 0.0;
        if vehicle.get_str(keys::NAVIGATION_MODE) == NavigationMode::Circle.name() {
            let position = LatLon::new(
                vehicle.get_f64(keys::POSITION_LATITUDE_DEG),
                vehicle.get_f64(keys::POSITION_LONGITUDE_DEG),
            );
            let radial = geodesy::inverse(geometry.center, position);

            if !guidance.circle_capture && is_circle_capture(radial.distance_m, geometry.radius_m) {
                vehicle.log("land", "descent circle capture");
                guidance.circle_capture = true;
            }

            // Ground track along the circle, zero at the tangent point
            let course_deg = wrap_360(radial.course_deg + geometry.side() * 90.0);
            circle_pos_deg = wrap_180(course_deg - geometry.final_heading_deg);

            let angle_remaining_rad =
                if guidance.circle_capture && circle_pos_deg > -TANGENT_OVERSHOOT_DEG {
                    circle_pos_deg.to_radians()
                } else {
                    PI
                };

            guidance.dist_remaining_m = (radial.distance_m - geometry.radius_m)
                + angle_remaining_rad * geometry.radius_m
                + geometry.final_leg_m;

            if guidance.circle_capture
                && guidance.gs_capture
                && circle_pos_deg.abs() <= FINAL_EXIT_DEG
            {
                vehicle.log("land", "transition to final");
                vehicle.set_str(keys::NAVIGATION_MODE, NavigationMode::Route.name());
            }
        } else if vehicle.get_bool(keys::ROUTE_DIST_VALID) {
            guidance.dist_remaining_m = vehicle.get_f64(keys::ROUTE_DIST_REMAINING_M);
        }

        let glideslope_ft = glideslope_altitude_ft(guidance.dist_remaining_m, glideslope_rad, bias_ft);
        let target_altitude_ft = limit_target_altitude(
            glideslope_ft,
            safe_altitude_ft,
            vehicle.get_f64(keys::TARGET_ALTITUDE_AGL_FT),
            guidance.gs_capture,
        );
        vehicle.set_f64(keys::TARGET_ALTITUDE_AGL_FT, target_altitude_ft);

        let altitude_error_ft = vehicle.get_f64(keys::POSITION_ALTITUDE_AGL_FT) - glideslope_ft;
        let glideslope_error_deg = (altitude_error_ft * FEET_TO_METERS)
            .atan2(guidance.dist_remaining_m)
            .to_degrees();

        if guidance.circle_capture
            && !guidance.gs_capture
            && glideslope_error_deg <= GLIDESLOPE_CAPTURE_DEG
            && circle_pos_deg >= 0.0
        {
            vehicle.log("land", "glide slope capture");
            guidance.gs_capture = true;
        }

        let seconds_to_touchdown = seconds_to_touchdown(
            guidance.dist_remaining_m,
            vehicle.get_f64(keys::VELOCITY_GROUNDSPEED_MS),
        );

        let now = vehicle.get_f64(keys::IMU_TIMESTAMP);
        if guidance.flare.is_none() && seconds_to_touchdown <= config.flare_seconds {
            vehicle.log("land", "start flare");
            guidance.flare = Some(Flare::start(
                now,
                vehicle.get_f64(keys::THROTTLE),
                vehicle.get_f64(keys::TARGET_PITCH_DEG),
                config.flare_pitch_deg,
            ));
            vehicle.set_str(keys::AUTOPILOT_MODE, AutopilotMode::Basic.name());
        }

        let flare = if let Some(flare) = &guidance.flare {
            let command = flare.command(now, config.flare_seconds, config.flare_pitch_deg);
            vehicle.set_f64(keys::TARGET_PITCH_DEG, command.pitch_deg);
            vehicle.set_f64(keys::THROTTLE, command.throttle);
            Some(command)
        } else {
            None
        };

        let phase = if vehicle.get_str(keys::NAVIGATION_MODE) == NavigationMode::Circle.name() {
            Phase::CircleDescent
        } else {
            Phase::FinalApproach
        };

        log::trace!(
            "land {:?}: dist {:.1} m, target {:.1} ft, gs error {:.2} deg, {:.1} s to touchdown",
            phase,
            guidance.dist_remaining_m,
            target_altitude_ft,
            glideslope_error_deg,
            seconds_to_touchdown
        );

        Some(GuidanceOutput {
            phase,
            dist_remaining_m: guidance.dist_remaining_m,
            target_altitude_ft,
            safe_altitude_ft,
            glideslope_error_deg,
            seconds_to_touchdown,
            circle_capture: guidance.circle_capture,
            gs_capture: guidance.gs_capture,
            flare,
        })
    }

    /// The landing task never finishes on its own; the mission stack
    /// removes it.
    fn is_complete(&self, _vehicle: &T) -> bool {
        false
    }

    fn close(&mut self, vehicle: &mut T) {
        if let Some(snapshot) = self.saved.pop() {
            snapshot.restore(vehicle);
        }
        vehicle.set_f64(keys::FLAPS_SETPOINT, 0.0);
        self.guidance = None;
    }
}
