//! Role- and weapon-specific behavioral profiles.
//!
//! Consolidates the per-role parameters for the threat FSM.

use tao_core::constants::*;
use tao_core::enums::{ThreatRole, WeaponClass};

/// Behavioral profile for a hostile role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleProfile {
    /// Speed while closing on the target (knots).
    pub pursuit_speed: f64,
    /// Speed while running away from ownship (knots).
    pub egress_speed: f64,
    /// Weapon release range (nautical miles, exclusive).
    pub fire_range_nm: f64,
    /// Chance per tick of releasing a weapon once inside `fire_range_nm`.
    pub fire_probability: f64,
    /// Weapon carried.
    pub weapon: WeaponClass,
    /// Magazine size when a scenario does not specify one.
    pub default_ammo: u32,
    /// Turn for home once the magazine is empty.
    pub egress_when_empty: bool,
}

/// Flight altitude of a weapon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponAltitude {
    /// Stays at the altitude it was released from.
    Launcher,
    /// Fixed altitude in feet.
    Fixed(f64),
}

/// Kinematic profile of a weapon class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub speed_kts: f64,
    pub altitude: WeaponAltitude,
}

/// Get the behavioral profile for a role. `None` for roles without autonomy.
pub fn get_profile(role: ThreatRole) -> Option<RoleProfile> {
    match role {
        ThreatRole::None => None,
        ThreatRole::Fighter => Some(RoleProfile {
            pursuit_speed: 800.0,
            egress_speed: 1000.0,
            fire_range_nm: 40.0,
            fire_probability: 0.05,
            weapon: WeaponClass::AirIntercept,
            default_ammo: 4,
            egress_when_empty: false,
        }),
        ThreatRole::Attack => Some(RoleProfile {
            pursuit_speed: 450.0,
            egress_speed: 800.0,
            fire_range_nm: 60.0,
            fire_probability: 0.02,
            weapon: WeaponClass::AntiShip,
            default_ammo: 2,
            egress_when_empty: true,
        }),
    }
}

/// Magazine size for a role when a scenario leaves it out.
pub fn default_ammo(role: ThreatRole) -> u32 {
    get_profile(role).map_or(0, |p| p.default_ammo)
}

/// Get the flight profile of a weapon class.
pub fn weapon_profile(class: WeaponClass) -> WeaponProfile {
    match class {
        WeaponClass::Standard => WeaponProfile {
            speed_kts: STANDARD_MISSILE_SPEED_KTS,
            altitude: WeaponAltitude::Fixed(STANDARD_MISSILE_ALTITUDE_FT),
        },
        WeaponClass::AirIntercept => WeaponProfile {
            speed_kts: AIR_INTERCEPT_SPEED_KTS,
            altitude: WeaponAltitude::Launcher,
        },
        WeaponClass::AntiShip => WeaponProfile {
            speed_kts: ANTI_SHIP_SPEED_KTS,
            altitude: WeaponAltitude::Fixed(ANTI_SHIP_ALTITUDE_FT),
        },
    }
}

impl WeaponAltitude {
    /// Resolve against the altitude of the launching platform.
    pub fn resolve(&self, launcher_altitude_ft: f64) -> f64 {
        match self {
            WeaponAltitude::Launcher => launcher_altitude_ft,
            WeaponAltitude::Fixed(ft) => *ft,
        }
    }
}
