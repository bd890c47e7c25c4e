//! Spawning functions for the formation, scenario contacts, and weapons.

use tao_core::components::*;
use tao_core::constants::AEW_ALTITUDE_FT;
use tao_core::enums::*;
use tao_core::types::{Position, TrackId, Vector, WeaponTarget};
use tao_threat_ai::profiles::weapon_profile;

use crate::registry::TrackRegistry;
use crate::scenario::ContactSpec;

/// Escorts and picket sailing in company with ownship.
const FORMATION: [(&str, f64, f64); 3] = [
    ("USS STOUT", -6.0, -2.0),
    ("USS ARLEIGH BURKE", 6.0, -2.0),
    ("USS PRINCETON", 0.0, 10.0),
];

/// Airborne early-warning aircraft on station astern of the group.
const AEW_CALLSIGN: &str = "DARKSTAR";
const AEW_STATION: (f64, f64) = (0.0, -15.0);

/// Spawn the three surface escorts and the AEW aircraft, all matching the
/// ownship vector. Returns the AEW track id.
pub fn spawn_formation(registry: &mut TrackRegistry, ownship: &Vector) -> TrackId {
    for (callsign, x, y) in FORMATION {
        let id = registry.allocate_id();
        registry.insert(
            id,
            (
                TrackInfo {
                    id,
                    callsign: callsign.to_string(),
                    kind: TrackKind::Surface,
                    altitude_ft: 0.0,
                    responsive: true,
                    status: EngagementStatus::None,
                },
                Identity::masked(ActualIdentity::Friend),
                Position::new(x, y),
                *ownship,
                ThreatProfile::default(),
                PositionHistory::default(),
                Formation,
            ),
        );
    }

    let id = registry.allocate_id();
    registry.insert(
        id,
        (
            TrackInfo {
                id,
                callsign: AEW_CALLSIGN.to_string(),
                kind: TrackKind::Air,
                altitude_ft: AEW_ALTITUDE_FT,
                responsive: true,
                status: EngagementStatus::None,
            },
            Identity::masked(ActualIdentity::Friend),
            Position::new(AEW_STATION.0, AEW_STATION.1),
            *ownship,
            ThreatProfile::default(),
            PositionHistory::default(),
            Formation,
            HighValueAsset,
        ),
    );
    id
}

/// Spawn a validated scenario contact with its identity masked.
pub fn spawn_contact(registry: &mut TrackRegistry, contact: &ContactSpec) -> TrackId {
    let id = registry.allocate_id();
    registry.insert(
        id,
        (
            TrackInfo {
                id,
                callsign: contact.callsign.clone(),
                kind: contact.kind,
                altitude_ft: contact.altitude_ft,
                responsive: contact.responsive,
                status: EngagementStatus::None,
            },
            Identity::masked(contact.actual),
            contact.position,
            contact.vector,
            ThreatProfile {
                role: contact.role,
                ammo: contact.ammo,
            },
            PositionHistory::default(),
        ),
    );
    id
}

/// Everything needed to put a weapon in the air.
#[derive(Debug, Clone, Copy)]
pub struct Launch {
    pub class: WeaponClass,
    /// `None` for ownship's own launchers.
    pub launcher: Option<TrackId>,
    pub origin: Position,
    pub launcher_altitude_ft: f64,
    pub side: ActualIdentity,
    pub target: WeaponTarget,
    pub target_position: Position,
    pub guidance: GuidanceMode,
}

fn designator(class: WeaponClass) -> &'static str {
    match class {
        WeaponClass::Standard => "SM-2",
        WeaponClass::AirIntercept => "AAM",
        WeaponClass::AntiShip => "ASCM",
    }
}

/// Spawn a weapon track pointed at its target. The weapon shows its true
/// side from launch and leaves no trail.
pub fn spawn_weapon(registry: &mut TrackRegistry, launch: &Launch) -> TrackId {
    let profile = weapon_profile(launch.class);
    let id = registry.allocate_id();
    let displayed = match launch.side {
        ActualIdentity::Friend => DisplayedIdentity::Friend,
        ActualIdentity::Hostile => DisplayedIdentity::Hostile,
        ActualIdentity::Neutral => DisplayedIdentity::Unknown,
    };
    registry.insert(
        id,
        (
            TrackInfo {
                id,
                callsign: format!("{} {}", designator(launch.class), id),
                kind: TrackKind::Missile,
                altitude_ft: profile.altitude.resolve(launch.launcher_altitude_ft),
                responsive: false,
                status: EngagementStatus::Firing,
            },
            Identity::declared(launch.side, displayed),
            launch.origin,
            Vector::new(
                launch.origin.bearing_to(&launch.target_position),
                profile.speed_kts,
            ),
            ThreatProfile::default(),
            WeaponState {
                class: launch.class,
                target: launch.target,
                guidance: launch.guidance,
                launcher: launch.launcher,
            },
        ),
    );
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tao_core::constants::{OWNSHIP_VECTOR, STANDARD_MISSILE_ALTITUDE_FT};

    #[test]
    fn test_formation_layout() {
        let mut registry = TrackRegistry::new();
        let aew = spawn_formation(&mut registry, &OWNSHIP_VECTOR);
        assert_eq!(registry.len(), 4);
        assert_eq!(aew, TrackId(3));

        let world = registry.world();
        let mut escorts = 0;
        for (_e, (info, identity, vector, _f)) in world
            .query::<(&TrackInfo, &Identity, &Vector, &Formation)>()
            .iter()
        {
            assert_eq!(identity.displayed, DisplayedIdentity::Friend, "{}", info.callsign);
            assert_eq!(*vector, OWNSHIP_VECTOR, "{} must match ownship", info.callsign);
            if info.kind == TrackKind::Surface {
                escorts += 1;
            }
        }
        assert_eq!(escorts, 3);
        assert_eq!(world.query::<&HighValueAsset>().iter().count(), 1);
    }

    #[test]
    fn test_contact_identity_masked() {
        let mut registry = TrackRegistry::new();
        let contact = ContactSpec {
            callsign: "RAIDER".into(),
            position: Position::new(30.0, 30.0),
            vector: Vector::new(225.0, 450.0),
            altitude_ft: 500.0,
            actual: ActualIdentity::Hostile,
            kind: TrackKind::Air,
            role: ThreatRole::Attack,
            responsive: false,
            ammo: 2,
        };
        let id = spawn_contact(&mut registry, &contact);
        let entity = registry.entity(id).expect("spawned");
        let identity = *registry.world().get::<&Identity>(entity).expect("identity");
        assert_eq!(identity.displayed, DisplayedIdentity::Unknown);
        assert_eq!(identity.actual(), ActualIdentity::Hostile);
        let profile = *registry.world().get::<&ThreatProfile>(entity).expect("profile");
        assert_eq!(profile.ammo, 2);
    }

    #[test]
    fn test_weapon_points_at_target() {
        let mut registry = TrackRegistry::new();
        let id = spawn_weapon(
            &mut registry,
            &Launch {
                class: WeaponClass::Standard,
                launcher: None,
                origin: Position::ORIGIN,
                launcher_altitude_ft: 0.0,
                side: ActualIdentity::Friend,
                target: WeaponTarget::Track(TrackId(7)),
                target_position: Position::new(-10.0, 0.0),
                guidance: GuidanceMode::PurePursuit,
            },
        );
        let entity = registry.entity(id).expect("spawned");
        let world = registry.world();
        let vector = *world.get::<&Vector>(entity).expect("vector");
        assert_relative_eq!(vector.heading, 270.0, epsilon = 1e-9);
        assert_relative_eq!(vector.speed, 1200.0);
        let info = world.get::<&TrackInfo>(entity).expect("info");
        assert_eq!(info.kind, TrackKind::Missile);
        assert_eq!(info.status, EngagementStatus::Firing);
        assert_eq!(info.altitude_ft, STANDARD_MISSILE_ALTITUDE_FT);
        assert!(info.callsign.starts_with("SM-2"));
    }
}
