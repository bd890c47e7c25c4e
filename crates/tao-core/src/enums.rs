//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Physical category of a contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    #[default]
    Air,
    Surface,
    Missile,
}

/// Operator-visible classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayedIdentity {
    #[default]
    Unknown,
    Pending,
    Friend,
    Hostile,
    Neutral,
}

/// Ground truth allegiance of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActualIdentity {
    Friend,
    Hostile,
    Neutral,
}

/// Autonomous behavior assigned to hostile aircraft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatRole {
    #[default]
    None,
    /// Hunts the airborne sensor asset.
    Fighter,
    /// Runs in on ownship with anti-ship missiles.
    Attack,
}

/// Engagement lifecycle of a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementStatus {
    #[default]
    None,
    Tracking,
    LockOn,
    Firing,
    Destroyed,
}

/// Weapon family, which fixes speed and flight profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    /// Ship-launched surface-to-air missile (SM-2 equivalent).
    Standard,
    /// Air-to-air missile fired by hostile fighters.
    AirIntercept,
    /// Sea-skimming anti-ship missile fired by hostile attack aircraft.
    AntiShip,
}

/// Heading law a weapon flies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuidanceMode {
    /// Point straight at the target's current position.
    #[default]
    PurePursuit,
    /// Lead the target along the collision triangle.
    LeadPursuit,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Briefing,
    Active,
    Debriefing,
}

/// Comms log priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// Watch station originating a comms log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Station {
    System,
    Cic,
    Bridge,
    /// Tactical Action Officer (the player).
    Tao,
    Coms,
    /// Air contact on the distress net.
    Air,
    /// Fire control.
    Fc,
    /// Track identification coordinator.
    Tic,
    /// Missile systems supervisor.
    Mss,
}

/// Readiness level shown on the console header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatCondition {
    #[default]
    White,
    Yellow,
    Red,
}
