//! # embedded-autoland
//! A `#![no_std]` automated landing library for fixed-wing autopilots.
//!
//! # Guidance
//! [`Land`] flies a descending circle onto a straight final leg, holds the
//! glideslope and flares before touchdown
//! (see [`ApproachGeometry`](land::ApproachGeometry) for the approach layout).
//!
//! [`Task`] is the lifecycle every mission task follows.
//!
//! # Shared state
//! [`StateStore`] is typed access to the autopilot's property tree
//! (see [`MemoryStore`] for an in-memory implementation).
//!
//! [`EventSink`] receives the named transitions of a task
//! (see [`EventLog`]).
//!
//! # Math
//! [`geodesy`] contains the WGS84 direct and inverse solutions.
//!
//! [`geometry`] contains planar polar/cartesian helpers.

#![no_std]

extern crate alloc;

pub mod error;
pub use error::Error;

pub mod events;
pub use events::{EventLog, EventSink};

pub mod geodesy;
pub use geodesy::LatLon;

pub mod geometry;

pub mod land;
pub use land::{GuidanceOutput, Land, LandConfig};

pub mod snapshot;

pub mod store;
pub use store::{MemoryStore, StateStore};

pub mod task;
pub use task::{Task, Vehicle};
