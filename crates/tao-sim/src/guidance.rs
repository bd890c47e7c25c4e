//! Guidance laws for weapon tracks.
//!
//! A law maps the current missile and target states to a new compass heading.
//! Speed is never changed by guidance. The law for a given weapon is picked
//! from its `GuidanceMode` at launch.

use tao_core::enums::GuidanceMode;
use tao_core::types::{Position, Vector};

/// Position and motion of one side of an engagement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Position,
    pub vector: Vector,
}

impl Kinematics {
    pub fn new(position: Position, vector: Vector) -> Self {
        Self { position, vector }
    }
}

pub trait Guidance {
    /// Commanded heading in degrees, normalized to [0, 360).
    fn heading(&self, missile: &Kinematics, target: &Kinematics) -> f64;
}

/// Point straight at the target's current position.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurePursuit;

/// Collision-course steering.
///
/// Offsets the line of sight by the angle whose sine is the target's crossing
/// speed over the missile's speed. When the target crosses faster than the
/// missile can fly, falls back to the line of sight.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadPursuit;

impl Guidance for PurePursuit {
    fn heading(&self, missile: &Kinematics, target: &Kinematics) -> f64 {
        missile.position.bearing_to(&target.position)
    }
}

impl Guidance for LeadPursuit {
    fn heading(&self, missile: &Kinematics, target: &Kinematics) -> f64 {
        let line_of_sight = missile.position.bearing_to(&target.position);
        if missile.vector.speed <= 0.0 {
            return line_of_sight;
        }

        let aspect = target.vector.heading.to_radians() - line_of_sight.to_radians();
        let sin_lead = target.vector.speed * aspect.sin() / missile.vector.speed;
        if !sin_lead.is_finite() || sin_lead.abs() > 1.0 {
            return line_of_sight;
        }

        (line_of_sight + sin_lead.asin().to_degrees()).rem_euclid(360.0)
    }
}

/// The guidance law selected by `mode`.
pub fn law_for(mode: GuidanceMode) -> &'static dyn Guidance {
    match mode {
        GuidanceMode::PurePursuit => &PurePursuit,
        GuidanceMode::LeadPursuit => &LeadPursuit,
    }
}
