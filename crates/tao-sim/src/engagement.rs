//! Strike adjudication and the running score.
//!
//! Kept out of the ECS: adjudication is a pure function of the two ground
//! truths, and the score is engine-owned state.

use serde::{Deserialize, Serialize};

use tao_core::constants::*;
use tao_core::enums::ActualIdentity;
use tao_core::state::ScoreView;

/// What a weapon's detonation meant for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrikeOutcome {
    /// Own weapon destroyed a hostile.
    Splash,
    /// Own weapon destroyed a friendly or neutral.
    BlueOnBlue,
    /// Hostile weapon reached ownship.
    OwnshipHit,
    /// Hostile weapon destroyed one of our tracks or a bystander.
    ContactLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjudication {
    pub outcome: StrikeOutcome,
    pub score_delta: i64,
}

/// Score a detonation.
///
/// `target` is `None` when the weapon struck ownship. Returns `None` for
/// detonations that carry no score.
pub fn adjudicate(
    weapon: ActualIdentity,
    target: Option<ActualIdentity>,
) -> Option<Adjudication> {
    let outcome = match (weapon, target) {
        (ActualIdentity::Friend, Some(ActualIdentity::Hostile)) => StrikeOutcome::Splash,
        (ActualIdentity::Friend, Some(_)) => StrikeOutcome::BlueOnBlue,
        (ActualIdentity::Hostile, None) => StrikeOutcome::OwnshipHit,
        (ActualIdentity::Hostile, Some(_)) => StrikeOutcome::ContactLost,
        _ => return None,
    };
    let score_delta = match outcome {
        StrikeOutcome::Splash => SCORE_HOSTILE_SPLASH,
        StrikeOutcome::BlueOnBlue => SCORE_FRATRICIDE,
        StrikeOutcome::OwnshipHit => SCORE_OWNSHIP_HIT,
        StrikeOutcome::ContactLost => SCORE_CONTACT_LOST,
    };
    Some(Adjudication {
        outcome,
        score_delta,
    })
}

/// Running score state tracked by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreState {
    pub score: i64,
    pub hostiles_splashed: u32,
    pub fratricides: u32,
    pub ownship_hits: u32,
    pub contacts_lost: u32,
    pub weapons_fired: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            score: INITIAL_SCORE,
            hostiles_splashed: 0,
            fratricides: 0,
            ownship_hits: 0,
            contacts_lost: 0,
            weapons_fired: 0,
        }
    }
}

impl ScoreState {
    pub fn apply(&mut self, adjudication: &Adjudication) {
        self.score += adjudication.score_delta;
        match adjudication.outcome {
            StrikeOutcome::Splash => self.hostiles_splashed += 1,
            StrikeOutcome::BlueOnBlue => self.fratricides += 1,
            StrikeOutcome::OwnshipHit => self.ownship_hits += 1,
            StrikeOutcome::ContactLost => self.contacts_lost += 1,
        }
    }

    pub fn view(&self) -> ScoreView {
        ScoreView {
            score: self.score,
            hostiles_splashed: self.hostiles_splashed,
            fratricides: self.fratricides,
            ownship_hits: self.ownship_hits,
            contacts_lost: self.contacts_lost,
            weapons_fired: self.weapons_fired,
        }
    }
}
