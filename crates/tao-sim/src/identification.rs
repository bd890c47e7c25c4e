//! Operator identification: classification, radio queries, and their replies.
//!
//! A query is a two-stage affair. The transmission starts a real-time
//! timer; when it expires the track's *current* state decides between
//! silence and a narrated answer, and the answer only relabels the track if
//! nobody has classified it in the meantime.

use tao_core::components::{Identity, TrackInfo};
use tao_core::enums::*;
use tao_core::narrative::{ChatterTag, NarrativeKind};
use tao_core::types::TrackId;

use crate::comms::CommsLog;
use crate::narration::{Narration, ReplyAction};
use crate::registry::TrackRegistry;

/// A transmitted query waiting for its response window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingQuery {
    pub track: TrackId,
    /// Wall-clock time (ms since exercise start) at which the window closes.
    pub due_ms: u64,
}

fn callsign(registry: &TrackRegistry, id: TrackId) -> Option<String> {
    let entity = registry.entity(id)?;
    let info = registry.world().get::<&TrackInfo>(entity).ok()?;
    Some(info.callsign.clone())
}

fn is_destroyed(registry: &TrackRegistry, id: TrackId) -> bool {
    registry
        .entity(id)
        .and_then(|entity| registry.world().get::<&TrackInfo>(entity).ok().map(|info| info.status))
        .map_or(true, |status| status == EngagementStatus::Destroyed)
}

fn identity_label(identity: DisplayedIdentity) -> String {
    format!("{identity:?}").to_uppercase()
}

/// Set the displayed identity of a track. Ground truth is untouched, and
/// wreckage keeps the label it had when it was destroyed.
pub fn classify(
    registry: &mut TrackRegistry,
    comms: &mut CommsLog,
    narration: &mut Narration,
    id: TrackId,
    identity: DisplayedIdentity,
    tick: u64,
) -> bool {
    let Some(entity) = registry.entity(id) else {
        log::warn!("classify: no track {id}");
        return false;
    };
    let Some(name) = callsign(registry, id) else {
        return false;
    };
    if is_destroyed(registry, id) {
        log::info!("classify denied: {name} is destroyed");
        return false;
    }
    if let Ok(mut current) = registry.world().get::<&mut Identity>(entity) {
        current.displayed = identity;
    }

    let label = identity_label(identity);
    comms.post(
        tick,
        Station::Tao,
        Priority::Normal,
        format!("Classifying track {name} as {label}"),
    );
    narration.request(
        NarrativeKind::Chatter {
            tag: ChatterTag::ClassificationChanged,
            context: format!("Target {name} marked as {label} by TAO."),
        },
        ReplyAction::Chatter(Station::Tic),
        GamePhase::Active,
    );
    true
}

/// Transmit on the distress frequency and start the response timer.
pub fn begin_query(
    registry: &TrackRegistry,
    comms: &mut CommsLog,
    id: TrackId,
    now_ms: u64,
    delay_ms: u64,
    tick: u64,
) -> Option<PendingQuery> {
    let Some(name) = callsign(registry, id) else {
        log::warn!("query: no track {id}");
        return None;
    };
    comms.post(
        tick,
        Station::Coms,
        Priority::Normal,
        format!("Transmitting query to {name} on Int'l Air Distress..."),
    );
    Some(PendingQuery {
        track: id,
        due_ms: now_ms + delay_ms,
    })
}

/// Remove and return the queries whose window has closed, oldest first.
pub fn take_due(pending: &mut Vec<PendingQuery>, now_ms: u64) -> Vec<PendingQuery> {
    let (due, waiting): (Vec<_>, Vec<_>) = pending.drain(..).partition(|q| q.due_ms <= now_ms);
    *pending = waiting;
    due
}

/// Close a query window against the track's state right now.
pub fn resolve_query(
    registry: &TrackRegistry,
    comms: &mut CommsLog,
    narration: &mut Narration,
    query: &PendingQuery,
    tick: u64,
) {
    let Some(entity) = registry.entity(query.track) else {
        log::debug!("query on {} expired: track gone", query.track);
        return;
    };
    let Ok(info) = registry.world().get::<&TrackInfo>(entity) else {
        return;
    };

    let answers = info.responsive && info.status != EngagementStatus::Destroyed;
    if !answers {
        comms.post(
            tick,
            Station::Coms,
            Priority::High,
            format!("No response from {}.", info.callsign),
        );
        return;
    }

    narration.request(
        NarrativeKind::Chatter {
            tag: ChatterTag::QueryResponse,
            context: format!(
                "Civilian aircraft {} responding to a military query from a US Navy warship.",
                info.callsign
            ),
        },
        ReplyAction::QueryResponse(query.track),
        GamePhase::Active,
    );
}

/// Post the narrated answer and relabel the track Neutral unless it was
/// classified or destroyed while the answer was in flight.
pub fn apply_query_response(
    registry: &TrackRegistry,
    comms: &mut CommsLog,
    id: TrackId,
    text: &str,
    tick: u64,
) {
    comms.post(tick, Station::Air, Priority::Normal, format!("\"{text}\""));

    let Some(entity) = registry.entity(id) else {
        return;
    };
    if is_destroyed(registry, id) {
        log::debug!("query reply for {id} arrived after it was destroyed");
        return;
    }
    if let Ok(mut identity) = registry.world().get::<&mut Identity>(entity) {
        if matches!(
            identity.displayed,
            DisplayedIdentity::Unknown | DisplayedIdentity::Pending
        ) {
            identity.displayed = DisplayedIdentity::Neutral;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(track: u32, due_ms: u64) -> PendingQuery {
        PendingQuery {
            track: TrackId(track),
            due_ms,
        }
    }

    #[test]
    fn test_take_due_partitions_in_order() {
        let mut queue = vec![pending(1, 3000), pending(2, 5000), pending(3, 3000)];
        let due = take_due(&mut queue, 3000);
        assert_eq!(due, vec![pending(1, 3000), pending(3, 3000)]);
        assert_eq!(queue, vec![pending(2, 5000)]);
        assert!(take_due(&mut queue, 4999).is_empty());
    }

    #[test]
    fn test_identity_label() {
        assert_eq!(identity_label(DisplayedIdentity::Hostile), "HOSTILE");
        assert_eq!(identity_label(DisplayedIdentity::Neutral), "NEUTRAL");
    }
}
