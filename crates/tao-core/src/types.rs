//! Fundamental geometric and simulation types.
//!
//! Every position is expressed in nautical miles relative to ownship, which
//! sits fixed at the origin. Headings are compass degrees (0 = North,
//! clockwise), speeds are knots.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::MS_PER_HOUR;

/// Position relative to ownship in nautical miles.
/// x = East, y = North.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Course and speed of a contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Compass heading in degrees, [0, 360).
    pub heading: f64,
    /// Speed in knots.
    pub speed: f64,
}

/// Stable identifier of a track for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u32);

/// What a weapon is guiding on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "track")]
pub enum WeaponTarget {
    /// The player's own platform at the origin.
    Ownship,
    /// A track in the registry.
    Track(TrackId),
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulated time in seconds (accelerated).
    pub elapsed_secs: f64,
    /// Elapsed wall-clock cadence in milliseconds (not accelerated).
    pub wall_ms: u64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Range to another position in nautical miles.
    pub fn range_to(&self, other: &Position) -> f64 {
        (other.as_dvec2() - self.as_dvec2()).length()
    }

    /// Compass bearing in degrees from this position to `other`.
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (90.0 - dy.atan2(dx).to_degrees() + 360.0).rem_euclid(360.0)
    }

    /// This position moved by a displacement in nautical miles.
    pub fn displaced(&self, delta: DVec2) -> Position {
        Position::new(self.x + delta.x, self.y + delta.y)
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl Vector {
    pub fn new(heading: f64, speed: f64) -> Self {
        Self { heading, speed }
    }

    /// Cartesian velocity in knots (x = East, y = North).
    pub fn velocity(&self) -> DVec2 {
        let angle = (90.0 - self.heading).to_radians();
        DVec2::new(angle.cos(), angle.sin()) * self.speed
    }
}

impl SimTime {
    /// Advance by one tick of `interval_ms` wall time, scaled by `acceleration`.
    pub fn advance(&mut self, interval_ms: u64, acceleration: f64) {
        self.tick += 1;
        self.wall_ms += interval_ms;
        self.elapsed_secs += interval_ms as f64 * acceleration / 1000.0;
    }
}

/// Simulated hours covered by one tick.
pub fn elapsed_hours(interval_ms: u64, acceleration: f64) -> f64 {
    interval_ms as f64 * acceleration / MS_PER_HOUR
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TN{:04}", self.0)
    }
}
