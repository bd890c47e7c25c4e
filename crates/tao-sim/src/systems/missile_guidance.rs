//! Weapon guidance system: re-aims every weapon at its target.
//!
//! A weapon whose target is gone or already destroyed is expended as a miss.

use tao_core::components::{TrackInfo, WeaponState};
use tao_core::enums::EngagementStatus;
use tao_core::events::SimEvent;
use tao_core::types::{Position, TrackId, Vector, WeaponTarget};

use crate::guidance::{law_for, Kinematics};
use crate::registry::TrackRegistry;

/// Target kinematics, or `None` if the target no longer exists.
pub fn resolve_target(
    registry: &TrackRegistry,
    target: WeaponTarget,
    ownship: &Vector,
) -> Option<Kinematics> {
    match target {
        WeaponTarget::Ownship => Some(Kinematics::new(Position::ORIGIN, *ownship)),
        WeaponTarget::Track(id) => {
            let position = registry.live_position(id)?;
            let entity = registry.entity(id)?;
            let vector = *registry.world().get::<&Vector>(entity).ok()?;
            Some(Kinematics::new(position, vector))
        }
    }
}

/// Mark a weapon expended without a hit.
pub fn expend(registry: &TrackRegistry, weapon: TrackId, events: &mut Vec<SimEvent>) {
    let Some(entity) = registry.entity(weapon) else {
        return;
    };
    if let Ok(mut info) = registry.world().get::<&mut TrackInfo>(entity) {
        info.status = EngagementStatus::Destroyed;
    }
    log::debug!("{weapon} lost its target");
    events.push(SimEvent::WeaponMissed { weapon });
}

pub fn run(registry: &mut TrackRegistry, ownship: &Vector, events: &mut Vec<SimEvent>) {
    for id in registry.ids() {
        let Some(entity) = registry.entity(id) else {
            continue;
        };
        let (state, position, vector) = {
            let world = registry.world();
            let Ok(mut query) =
                world.query_one::<(&TrackInfo, &WeaponState, &Position, &Vector)>(entity)
            else {
                continue;
            };
            match query.get() {
                Some((info, state, pos, vector))
                    if info.status != EngagementStatus::Destroyed =>
                {
                    (*state, *pos, *vector)
                }
                _ => continue,
            }
        };

        let Some(target) = resolve_target(registry, state.target, ownship) else {
            expend(registry, id, events);
            continue;
        };
        let missile = Kinematics::new(position, vector);
        let heading = law_for(state.guidance).heading(&missile, &target);
        if let Ok(mut v) = registry.world().get::<&mut Vector>(entity) {
            v.heading = heading;
        }
    }
}
