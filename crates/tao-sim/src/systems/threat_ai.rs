//! Threat AI system: runs the role state machine for every armed hostile
//! aircraft. Surface contacts and weapons keep their scenario vector.
//!
//! Decisions are evaluated against start-of-tick positions and applied
//! afterwards. Contacts are visited in id order so the random draws line up
//! the same way for a given seed.

use rand::Rng;

use tao_core::components::{HighValueAsset, Identity, ThreatProfile, TrackInfo};
use tao_core::enums::*;
use tao_core::events::SimEvent;
use tao_core::types::{Position, TrackId, Vector, WeaponTarget};

use tao_threat_ai::fsm::{evaluate, TargetFix, ThreatContext, ThreatUpdate};

use crate::comms::CommsLog;
use crate::registry::TrackRegistry;
use crate::world_setup::{self, Launch};

/// Live high-value asset that fighters hunt, if any.
fn high_value_target(registry: &TrackRegistry) -> Option<TargetFix> {
    let world = registry.world();
    let mut query = world.query::<(&TrackInfo, &Position, &HighValueAsset)>();
    query
        .iter()
        .filter(|(_, (info, _, _))| info.status != EngagementStatus::Destroyed)
        .min_by_key(|(_, (info, _, _))| info.id)
        .map(|(_, (info, pos, _))| TargetFix {
            target: WeaponTarget::Track(info.id),
            position: *pos,
        })
}

struct Decision {
    id: TrackId,
    callsign: String,
    position: Position,
    altitude_ft: f64,
    update: ThreatUpdate,
}

/// Run the threat AI: steer each armed hostile and launch its weapons.
pub fn run<R: Rng>(
    registry: &mut TrackRegistry,
    rng: &mut R,
    comms: &mut CommsLog,
    events: &mut Vec<SimEvent>,
    tick: u64,
) {
    let hunted = high_value_target(registry);
    let ownship = TargetFix {
        target: WeaponTarget::Ownship,
        position: Position::ORIGIN,
    };

    let mut decisions = Vec::new();
    for id in registry.ids() {
        let Some(entity) = registry.entity(id) else {
            continue;
        };
        let world = registry.world();
        let Ok(mut query) =
            world.query_one::<(&TrackInfo, &Identity, &Position, &ThreatProfile)>(entity)
        else {
            continue;
        };
        let Some((info, identity, position, profile)) = query.get() else {
            continue;
        };
        if info.kind != TrackKind::Air
            || info.status == EngagementStatus::Destroyed
            || identity.actual() != ActualIdentity::Hostile
        {
            continue;
        }

        let target = match profile.role {
            ThreatRole::None => continue,
            ThreatRole::Fighter => hunted,
            ThreatRole::Attack => Some(ownship),
        };
        let ctx = ThreatContext {
            role: profile.role,
            position: *position,
            ammo: profile.ammo,
            target,
        };
        if let Some(update) = evaluate(&ctx, rng) {
            decisions.push(Decision {
                id,
                callsign: info.callsign.clone(),
                position: *position,
                altitude_ft: info.altitude_ft,
                update,
            });
        }
    }

    for decision in decisions {
        let Some(entity) = registry.entity(decision.id) else {
            continue;
        };
        if let Ok(mut vector) = registry.world().get::<&mut Vector>(entity) {
            *vector = decision.update.vector;
        }

        let Some(order) = decision.update.fire else {
            continue;
        };
        let target_position = match order.target {
            WeaponTarget::Ownship => Some(Position::ORIGIN),
            WeaponTarget::Track(target) => registry.live_position(target),
        };
        let Some(target_position) = target_position else {
            continue;
        };
        if let Ok(mut profile) = registry.world().get::<&mut ThreatProfile>(entity) {
            profile.ammo = profile.ammo.saturating_sub(1);
        }

        let weapon = world_setup::spawn_weapon(
            registry,
            &Launch {
                class: order.class,
                launcher: Some(decision.id),
                origin: decision.position,
                launcher_altitude_ft: decision.altitude_ft,
                side: ActualIdentity::Hostile,
                target: order.target,
                target_position,
                guidance: GuidanceMode::PurePursuit,
            },
        );

        let bearing = Position::ORIGIN.bearing_to(&decision.position);
        let message = match order.target {
            WeaponTarget::Ownship => format!(
                "VAMPIRE! VAMPIRE! Missile launch from {} bearing {:03.0}, inbound ownship!",
                decision.callsign, bearing
            ),
            WeaponTarget::Track(_) => format!(
                "VAMPIRE! Missile launch from {} bearing {:03.0}!",
                decision.callsign, bearing
            ),
        };
        comms.post(tick, Station::Cic, Priority::Critical, message);
        log::info!("{} launched {:?} as {weapon}", decision.callsign, order.class);
        events.push(SimEvent::HostileLaunch {
            launcher: decision.id,
            weapon,
            class: order.class,
        });
    }
}
