//! Approach geometry: a descending circle tangent to a straight final leg
//! that ends at the touchdown point.

use super::config::{ApproachConfig, Direction};
use crate::geodesy::{self, LatLon};
use crate::geometry::{cart_to_polar, wrap_360, Polar};
use crate::store::{keys, StateStore};
use crate::Error;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use nalgebra::Vector2;

/// The touchdown point and runway heading.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Home {
    pub position: LatLon,

    /// Final approach heading (in degrees).
    pub azimuth_deg: f64,
}

impl Home {
    pub fn new(position: LatLon, azimuth_deg: f64) -> Self {
        Self {
            position,
            azimuth_deg,
        }
    }

    pub fn from_store<S: StateStore + ?Sized>(store: &S) -> Self {
        Self::new(
            LatLon::new(
                store.get_f64(keys::HOME_LATITUDE_DEG),
                store.get_f64(keys::HOME_LONGITUDE_DEG),
            ),
            store.get_f64(keys::HOME_AZIMUTH_DEG),
        )
    }
}

/// A route waypoint given as a polar offset from home.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    /// Waypoint flag; 0 marks a home-relative polar offset.
    pub flag: u8,
    pub offset: Polar,
}

impl Waypoint {
    pub fn relative(offset: Polar) -> Self {
        Self { flag: 0, offset }
    }
}

/// A route request for the external route follower.
///
/// Formats as comma separated `<flag>,<distance_m>,<bearing_deg>,-` groups,
/// one per waypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteRequest {
    pub waypoints: Vec<Waypoint>,
}

impl fmt::Display for RouteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, waypoint) in self.waypoints.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(
                f,
                "{},{:.2},{:.2},-",
                waypoint.flag, waypoint.offset.distance_m, waypoint.offset.bearing_deg
            )?;
        }
        Ok(())
    }
}

impl FromStr for RouteRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::RouteRequest(s.to_string());

        let tokens: Vec<&str> = s.split(',').map(str::trim).collect();
        if s.is_empty() || tokens.len() % 4 != 0 {
            return Err(malformed());
        }

        tokens
            .chunks(4)
            .map(|group| {
                if group[3] != "-" {
                    return Err(malformed());
                }
                let flag = group[0].parse().map_err(|_| malformed())?;
                let distance_m = group[1].parse().map_err(|_| malformed())?;
                let bearing_deg = group[2].parse().map_err(|_| malformed())?;
                Ok(Waypoint {
                    flag,
                    offset: Polar::new(distance_m, bearing_deg),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|waypoints| RouteRequest { waypoints })
    }
}

/// How the route follower starts the route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartMode {
    FirstWaypoint,
}

/// How the route follower tracks the route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowMode {
    Leader,
}

/// What the route follower does after the last waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionMode {
    ExtendLastLeg,
}

impl StartMode {
    pub fn name(self) -> &'static str {
        match self {
            StartMode::FirstWaypoint => "first_wpt",
        }
    }
}

impl FollowMode {
    pub fn name(self) -> &'static str {
        match self {
            FollowMode::Leader => "leader",
        }
    }
}

impl CompletionMode {
    pub fn name(self) -> &'static str {
        match self {
            CompletionMode::ExtendLastLeg => "extend_last_leg",
        }
    }
}

/// The final approach route and how it is flown.
#[derive(Clone, Debug, PartialEq)]
pub struct FinalApproachRoute {
    pub request: RouteRequest,
    pub start_mode: StartMode,
    pub follow_mode: FollowMode,
    pub completion_mode: CompletionMode,
}

/// Derived geometry of one approach.
#[derive(Clone, Debug, PartialEq)]
pub struct ApproachGeometry {
    /// Center of the descending circle.
    pub center: LatLon,

    /// Radius (in meters) of the descending circle.
    pub radius_m: f64,

    pub direction: Direction,

    /// Heading (in degrees) flown down the final leg.
    pub final_heading_deg: f64,

    /// Length (in meters) of the final leg.
    pub final_leg_m: f64,

    pub route: FinalApproachRoute,
}

impl ApproachGeometry {
    /// Build the approach to `home` from `config`.
    pub fn build(config: &ApproachConfig, home: &Home) -> Self {
        let side = config.direction.side();
        let final_heading_deg = home.azimuth_deg;
        let final_leg_m = 2.0 * config.turn_radius_m + config.extend_final_leg_m;

        // Circle center in the approach frame: beside the start of the final leg
        let x = config.turn_radius_m * side - config.lateral_offset_m * side;
        let y = final_leg_m;
        let offset = cart_to_polar(Vector2::new(x, -y));
        let circle_offset_deg = wrap_360(final_heading_deg + offset.bearing_deg);
        let center = geodesy::direct(home.position, circle_offset_deg, offset.distance_m).position;

        let lateral = -config.lateral_offset_m * side;
        let start_of_final = cart_to_polar(Vector2::new(lateral, -final_leg_m));
        let touchdown = cart_to_polar(Vector2::new(lateral, 0.0));

        Self {
            center,
            radius_m: config.turn_radius_m,
            direction: config.direction,
            final_heading_deg,
            final_leg_m,
            route: FinalApproachRoute {
                request: RouteRequest {
                    waypoints: alloc::vec![
                        Waypoint::relative(start_of_final),
                        Waypoint::relative(touchdown),
                    ],
                },
                start_mode: StartMode::FirstWaypoint,
                follow_mode: FollowMode::Leader,
                completion_mode: CompletionMode::ExtendLastLeg,
            },
        }
    }

    /// -1 for a left circle, +1 for a right circle.
    pub fn side(&self) -> f64 {
        self.direction.side()
    }

    /// Hand the circle to the circle-hold controller and request the final
    /// approach route from the route follower.
    pub fn publish<S: StateStore + ?Sized>(&self, store: &mut S) {
        store.set_f64(keys::CIRCLE_LATITUDE_DEG, self.center.latitude_deg);
        store.set_f64(keys::CIRCLE_LONGITUDE_DEG, self.center.longitude_deg);
        store.set_str(keys::CIRCLE_DIRECTION, self.direction.name());
        store.set_f64(keys::CIRCLE_RADIUS_M, self.radius_m);

        let request: String = self.route.request.to_string();
        store.set_str(keys::ROUTE_REQUEST, &request);
        store.set_str(keys::ROUTE_START_MODE, self.route.start_mode.name());
        store.set_str(keys::ROUTE_FOLLOW_MODE, self.route.follow_mode.name());
        store.set_str(keys::ROUTE_COMPLETION_MODE, self.route.completion_mode.name());

        // Seed the remaining distance so a stale value from an earlier route
        // is never read.
        store.set_f64(keys::ROUTE_DIST_REMAINING_M, self.final_leg_m);
    }
}
