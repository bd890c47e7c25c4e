//! Operator commands sent from the presentation layer to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::DisplayedIdentity;
use crate::types::TrackId;

/// All possible operator actions during an exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Reclassify a track. Never touches ground truth.
    ClassifyTrack {
        track: TrackId,
        identity: DisplayedIdentity,
    },
    /// Transmit a query/warning on the international air distress net.
    QueryTrack { track: TrackId },
    /// Launch a standard missile at a track. Denied while weapons tight.
    EngageTrack { track: TrackId },
    /// Flip the rules of engagement between weapons tight and weapons free.
    ToggleWeaponsRelease,
    /// End the exercise and request the after-action debrief.
    EndExercise,
}
