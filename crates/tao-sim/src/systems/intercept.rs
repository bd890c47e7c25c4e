//! Intercept system: detonates weapons that closed inside the intercept
//! radius and scores the result.
//!
//! Weapons are resolved one at a time in id order. A weapon whose target was
//! destroyed earlier in the same pass is expended as a miss.

use tao_core::components::{Identity, TrackInfo, WeaponState};
use tao_core::constants::INTERCEPT_RADIUS_NM;
use tao_core::enums::*;
use tao_core::events::SimEvent;
use tao_core::types::{Position, TrackId, Vector, WeaponTarget};

use crate::comms::CommsLog;
use crate::engagement::{adjudicate, ScoreState, StrikeOutcome};
use crate::registry::TrackRegistry;
use crate::systems::missile_guidance::expend;

fn set_destroyed(registry: &TrackRegistry, id: TrackId) {
    let Some(entity) = registry.entity(id) else {
        return;
    };
    if let Ok(mut info) = registry.world().get::<&mut TrackInfo>(entity) {
        info.status = EngagementStatus::Destroyed;
    }
    if let Ok(mut vector) = registry.world().get::<&mut Vector>(entity) {
        vector.speed = 0.0;
    }
}

/// Callsign and ground truth of a struck track.
fn victim(registry: &TrackRegistry, id: TrackId) -> Option<(String, ActualIdentity)> {
    let entity = registry.entity(id)?;
    let world = registry.world();
    let info = world.get::<&TrackInfo>(entity).ok()?;
    let identity = world.get::<&Identity>(entity).ok()?;
    Some((info.callsign.clone(), identity.actual()))
}

pub fn run(
    registry: &mut TrackRegistry,
    score: &mut ScoreState,
    comms: &mut CommsLog,
    events: &mut Vec<SimEvent>,
    tick: u64,
) {
    for id in registry.ids() {
        let Some(entity) = registry.entity(id) else {
            continue;
        };
        let (weapon_callsign, side, state, position) = {
            let world = registry.world();
            let Ok(mut query) = world
                .query_one::<(&TrackInfo, &Identity, &WeaponState, &Position)>(entity)
            else {
                continue;
            };
            match query.get() {
                Some((info, identity, state, pos))
                    if info.status != EngagementStatus::Destroyed =>
                {
                    (info.callsign.clone(), identity.actual(), *state, *pos)
                }
                _ => continue,
            }
        };

        let target_position = match state.target {
            WeaponTarget::Ownship => Some(Position::ORIGIN),
            WeaponTarget::Track(target) => registry.live_position(target),
        };
        let Some(target_position) = target_position else {
            expend(registry, id, events);
            continue;
        };
        if position.range_to(&target_position) >= INTERCEPT_RADIUS_NM {
            continue;
        }

        set_destroyed(registry, id);
        let struck = match state.target {
            WeaponTarget::Ownship => None,
            WeaponTarget::Track(target) => {
                set_destroyed(registry, target);
                victim(registry, target).map(|(callsign, actual)| (target, callsign, actual))
            }
        };

        let Some(adjudication) = adjudicate(side, struck.as_ref().map(|(_, _, actual)| *actual))
        else {
            log::debug!("{weapon_callsign} detonated with no score");
            continue;
        };
        score.apply(&adjudication);

        match (adjudication.outcome, struck) {
            (StrikeOutcome::Splash, Some((target, callsign, _))) => {
                comms.post(tick, Station::Fc, Priority::High, format!("SPLASH TARGET {callsign}!"));
                events.push(SimEvent::Splash { target });
            }
            (StrikeOutcome::BlueOnBlue, Some((target, callsign, _))) => {
                comms.post(
                    tick,
                    Station::Bridge,
                    Priority::Critical,
                    format!("CEASE FIRE! BLUE ON BLUE! {callsign} destroyed by own fire!"),
                );
                log::warn!("fratricide: {weapon_callsign} destroyed {callsign}");
                events.push(SimEvent::BlueOnBlue { target });
            }
            (StrikeOutcome::ContactLost, Some((target, callsign, _))) => {
                comms.post(
                    tick,
                    Station::Cic,
                    Priority::High,
                    format!("{callsign} has been hit! Contact lost."),
                );
                events.push(SimEvent::ContactLost { target });
            }
            (StrikeOutcome::OwnshipHit, _) => {
                comms.post(
                    tick,
                    Station::Bridge,
                    Priority::Critical,
                    format!("IMPACT! We've been hit by {weapon_callsign}! Damage control parties away!"),
                );
                events.push(SimEvent::OwnshipHit { weapon: id });
            }
            (outcome, None) => log::debug!("{outcome:?} without a struck track"),
        }
    }
}
