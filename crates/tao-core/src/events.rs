//! Comms log entries and simulation events for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::TrackId;

/// One line in the combat information center comms log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub tick: u64,
    pub station: Station,
    pub message: String,
    pub priority: Priority,
}

/// Discrete happenings during a tick, for audio and visual cues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// Ownship launched a standard missile.
    WeaponAway { weapon: TrackId, target: TrackId },
    /// A hostile aircraft fired.
    HostileLaunch {
        launcher: TrackId,
        weapon: TrackId,
        class: WeaponClass,
    },
    /// Player weapon destroyed a hostile.
    Splash { target: TrackId },
    /// Player weapon destroyed a friend or neutral.
    BlueOnBlue { target: TrackId },
    /// Hostile weapon struck ownship.
    OwnshipHit { weapon: TrackId },
    /// Hostile weapon destroyed a track.
    ContactLost { target: TrackId },
    /// Weapon lost its target and was discarded.
    WeaponMissed { weapon: TrackId },
}
