//! Game state snapshot: the complete visible state handed to the
//! presentation layer after each tick.
//!
//! Ground truth (actual identity, role, remaining ammo) is absent: the
//! operator only ever sees the displayed classification.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{LogEntry, SimEvent};
use crate::types::{Position, SimTime, TrackId, Vector, WeaponTarget};

/// Complete game state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub weapons_free: bool,
    pub condition: ThreatCondition,
    pub scenario_description: Option<String>,
    pub tracks: Vec<TrackView>,
    pub own_ship: OwnShipView,
    pub score: ScoreView,
    pub logs: Vec<LogEntry>,
    pub events: Vec<SimEvent>,
    /// After-action report, once the narrative generator has answered.
    pub debrief: Option<String>,
}

/// A track on the tactical display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackView {
    pub id: TrackId,
    pub callsign: String,
    pub kind: TrackKind,
    pub position: Position,
    pub vector: Vector,
    pub altitude_ft: f64,
    /// Bearing from ownship (compass degrees).
    pub bearing: f64,
    /// Range from ownship (nautical miles).
    pub range: f64,
    pub identity: DisplayedIdentity,
    pub status: EngagementStatus,
    /// Weapon target, for missiles.
    pub target: Option<WeaponTarget>,
    /// Whether any sensor in the formation currently holds this track.
    pub detected: bool,
    /// Trail positions, newest first.
    pub history: Vec<Position>,
}

/// Ownship status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OwnShipView {
    pub position: Position,
    pub vector: Vector,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: i64,
    pub hostiles_splashed: u32,
    pub fratricides: u32,
    pub ownship_hits: u32,
    pub contacts_lost: u32,
    pub weapons_fired: u32,
}
