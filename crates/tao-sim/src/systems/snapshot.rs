//! Snapshot system: reads the registry and builds a complete `SimSnapshot`.
//!
//! This system is read-only. Detection and the threat condition are
//! derived here, never stored.

use tao_core::components::*;
use tao_core::constants::{AEW_RADAR_RANGE_NM, RADAR_RANGE_NM};
use tao_core::enums::*;
use tao_core::events::{LogEntry, SimEvent};
use tao_core::state::*;
use tao_core::types::{Position, SimTime, Vector};

use crate::engagement::ScoreState;
use crate::registry::TrackRegistry;

/// Position of the live airborne early-warning asset, if any.
fn aew_position(registry: &TrackRegistry) -> Option<Position> {
    registry
        .world()
        .query::<(&TrackInfo, &Position, &HighValueAsset)>()
        .iter()
        .find(|(_, (info, _, _))| info.status != EngagementStatus::Destroyed)
        .map(|(_, (_, pos, _))| *pos)
}

/// Whether a track at `position` is held by ownship's radar or the AEW.
pub fn in_sensor_coverage(position: &Position, aew: Option<&Position>) -> bool {
    Position::ORIGIN.range_to(position) <= RADAR_RANGE_NM
        || aew.is_some_and(|aew| aew.range_to(position) <= AEW_RADAR_RANGE_NM)
}

/// Overall alert state derived from the displayed picture.
pub fn threat_condition(tracks: &[TrackView]) -> ThreatCondition {
    let live = || {
        tracks
            .iter()
            .filter(|t| t.detected && t.status != EngagementStatus::Destroyed)
    };
    if live().any(|t| t.identity == DisplayedIdentity::Hostile) {
        ThreatCondition::Red
    } else if live().any(|t| {
        matches!(
            t.identity,
            DisplayedIdentity::Unknown | DisplayedIdentity::Pending
        )
    }) {
        ThreatCondition::Yellow
    } else {
        ThreatCondition::White
    }
}

pub fn build_tracks(registry: &TrackRegistry) -> Vec<TrackView> {
    let aew = aew_position(registry);
    let world = registry.world();
    let mut tracks = Vec::with_capacity(registry.len());

    for id in registry.ids() {
        let Some(entity) = registry.entity(id) else {
            continue;
        };
        let Ok(mut query) = world.query_one::<(
            &TrackInfo,
            &Identity,
            &Position,
            &Vector,
            Option<&PositionHistory>,
            Option<&WeaponState>,
            Option<&Formation>,
        )>(entity) else {
            continue;
        };
        let Some((info, identity, pos, vector, history, weapon, formation)) = query.get() else {
            continue;
        };

        let own_weapon = weapon.is_some_and(|w| w.launcher.is_none());
        let detected =
            formation.is_some() || own_weapon || in_sensor_coverage(pos, aew.as_ref());

        tracks.push(TrackView {
            id: info.id,
            callsign: info.callsign.clone(),
            kind: info.kind,
            position: *pos,
            vector: *vector,
            altitude_ft: info.altitude_ft,
            bearing: Position::ORIGIN.bearing_to(pos),
            range: Position::ORIGIN.range_to(pos),
            identity: identity.displayed,
            status: info.status,
            target: weapon.map(|w| w.target),
            detected,
            history: history.map(|h| h.positions.clone()).unwrap_or_default(),
        });
    }
    tracks
}

/// Build a complete snapshot from the registry and engine state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    registry: &TrackRegistry,
    time: &SimTime,
    phase: GamePhase,
    weapons_free: bool,
    ownship: &Vector,
    score: &ScoreState,
    logs: &[LogEntry],
    events: Vec<SimEvent>,
    scenario_description: Option<String>,
    debrief: Option<String>,
) -> SimSnapshot {
    let tracks = build_tracks(registry);
    SimSnapshot {
        time: *time,
        phase,
        weapons_free,
        condition: threat_condition(&tracks),
        scenario_description,
        tracks,
        own_ship: OwnShipView {
            position: Position::ORIGIN,
            vector: *ownship,
        },
        score: score.view(),
        logs: logs.to_vec(),
        events,
        debrief,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(identity: DisplayedIdentity, detected: bool, status: EngagementStatus) -> TrackView {
        TrackView {
            id: tao_core::types::TrackId(0),
            callsign: "X".into(),
            kind: TrackKind::Air,
            position: Position::ORIGIN,
            vector: Vector::default(),
            altitude_ft: 0.0,
            bearing: 0.0,
            range: 0.0,
            identity,
            status,
            target: None,
            detected,
            history: Vec::new(),
        }
    }

    #[test]
    fn test_sensor_coverage() {
        assert!(in_sensor_coverage(&Position::new(0.0, 80.0), None));
        assert!(!in_sensor_coverage(&Position::new(0.0, 80.5), None));
        let aew = Position::new(0.0, -15.0);
        assert!(in_sensor_coverage(&Position::new(0.0, -160.0), Some(&aew)));
        assert!(!in_sensor_coverage(&Position::new(0.0, -170.0), Some(&aew)));
    }

    #[test]
    fn test_threat_condition_levels() {
        use DisplayedIdentity::*;
        let none = EngagementStatus::None;
        assert_eq!(threat_condition(&[]), ThreatCondition::White);
        assert_eq!(threat_condition(&[view(Friend, true, none)]), ThreatCondition::White);
        assert_eq!(
            threat_condition(&[view(Friend, true, none), view(Unknown, true, none)]),
            ThreatCondition::Yellow
        );
        assert_eq!(
            threat_condition(&[view(Unknown, true, none), view(Hostile, true, none)]),
            ThreatCondition::Red
        );
    }

    #[test]
    fn test_threat_condition_ignores_undetected_and_wreckage() {
        use DisplayedIdentity::*;
        assert_eq!(
            threat_condition(&[view(Unknown, false, EngagementStatus::None)]),
            ThreatCondition::White
        );
        assert_eq!(
            threat_condition(&[view(Hostile, true, EngagementStatus::Destroyed)]),
            ThreatCondition::White
        );
    }
}
