//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in systems, except for the
//! identity pair, which guards the immutability of ground truth.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Position, TrackId, WeaponTarget};

/// Registry bookkeeping carried by every track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackInfo {
    pub id: TrackId,
    /// Display name only. Never parsed.
    pub callsign: String,
    pub kind: TrackKind,
    pub altitude_ft: f64,
    /// Whether the contact answers queries on the distress net.
    pub responsive: bool,
    pub status: EngagementStatus,
}

/// Displayed classification paired with ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// What the operator sees. Freely reclassified.
    pub displayed: DisplayedIdentity,
    actual: ActualIdentity,
}

/// Autonomous behavior and remaining weapons.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ThreatProfile {
    pub role: ThreatRole,
    pub ammo: u32,
}

/// Present on Missile tracks only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeaponState {
    pub class: WeaponClass,
    pub target: WeaponTarget,
    pub guidance: GuidanceMode,
    /// Firing track, `None` when launched from ownship.
    pub launcher: Option<TrackId>,
}

/// Marks the high-value air asset hostile fighters hunt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HighValueAsset;

/// Marks a ship or aircraft of ownship's own formation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Formation;

/// History of positions for trail rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionHistory {
    /// Recent positions (newest first), up to MAX_HISTORY_DOTS.
    pub positions: Vec<Position>,
}

impl Identity {
    /// IFF masking: only friends answer as friends, everything else is unknown.
    pub fn masked(actual: ActualIdentity) -> Self {
        let displayed = match actual {
            ActualIdentity::Friend => DisplayedIdentity::Friend,
            ActualIdentity::Hostile | ActualIdentity::Neutral => DisplayedIdentity::Unknown,
        };
        Self { displayed, actual }
    }

    /// Identity with an explicit display, e.g. a hostile launch seen on radar.
    pub fn declared(actual: ActualIdentity, displayed: DisplayedIdentity) -> Self {
        Self { displayed, actual }
    }

    pub fn actual(&self) -> ActualIdentity {
        self.actual
    }
}
