//! Threat behavior decision function.
//!
//! State is implicit: each tick the intent is recomputed from whether the
//! role's target is still available and whether the magazine is empty.
//! Both only ever decay (destruction is permanent, ammo only decreases), so
//! an egressing aircraft never turns back in.
//! No ECS dependency; operates on plain data.

use rand::Rng;

use tao_core::enums::{ThreatRole, WeaponClass};
use tao_core::types::{Position, Vector, WeaponTarget};

use crate::profiles::get_profile;

/// A target the threat could close on, with its current position.
#[derive(Debug, Clone, Copy)]
pub struct TargetFix {
    pub target: WeaponTarget,
    pub position: Position,
}

/// Input to the decision function for a single aircraft.
#[derive(Debug, Clone, Copy)]
pub struct ThreatContext {
    pub role: ThreatRole,
    pub position: Position,
    pub ammo: u32,
    /// `None` once the role's target no longer exists.
    pub target: Option<TargetFix>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatIntent {
    Pursue,
    Egress,
}

/// A weapon release decided this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireOrder {
    pub target: WeaponTarget,
    pub class: WeaponClass,
}

/// Output from the decision function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatUpdate {
    pub intent: ThreatIntent,
    pub vector: Vector,
    pub fire: Option<FireOrder>,
}

/// Decide heading, speed and weapon release for one aircraft.
///
/// Returns `None` for roles without autonomous behavior. The random draw is
/// only taken once the range and magazine checks pass, so the number of
/// draws per tick depends on the tactical picture, not on the track count.
pub fn evaluate<R: Rng>(ctx: &ThreatContext, rng: &mut R) -> Option<ThreatUpdate> {
    let profile = get_profile(ctx.role)?;

    let winchester = ctx.ammo == 0;
    let pursuit = match ctx.target {
        Some(fix) if !(winchester && profile.egress_when_empty) => Some(fix),
        _ => None,
    };

    let Some(fix) = pursuit else {
        return Some(ThreatUpdate {
            intent: ThreatIntent::Egress,
            vector: Vector::new(egress_heading(&ctx.position), profile.egress_speed),
            fire: None,
        });
    };

    let heading = ctx.position.bearing_to(&fix.position);
    let in_envelope = ctx.position.range_to(&fix.position) < profile.fire_range_nm;
    let fire = if in_envelope && !winchester && rng.gen::<f64>() < profile.fire_probability {
        Some(FireOrder {
            target: fix.target,
            class: profile.weapon,
        })
    } else {
        None
    };

    Some(ThreatUpdate {
        intent: ThreatIntent::Pursue,
        vector: Vector::new(heading, profile.pursuit_speed),
        fire,
    })
}

/// Heading that opens range from ownship: the bearing from the origin to the aircraft.
pub fn egress_heading(position: &Position) -> f64 {
    Position::ORIGIN.bearing_to(position)
}
