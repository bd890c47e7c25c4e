//! Bookkeeping for outstanding narrative requests.
//!
//! Requests leave through an outbox drained by the host. Each one remembers
//! what to do with its reply and the phase it was issued in; replies from an
//! older session, or arriving after the phase moved on, are dropped.

use std::collections::BTreeMap;

use tao_core::enums::{GamePhase, Station};
use tao_core::narrative::{NarrativeKind, NarrativeReply, NarrativeRequest};
use tao_core::types::TrackId;

/// What the engine does with the text of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyAction {
    /// Post the text to the comms log under this station.
    Chatter(Station),
    /// Radio answer from a queried track.
    QueryResponse(TrackId),
    Debrief,
}

/// Requests remembered at once. Past this the oldest is forgotten and its
/// reply, if it ever comes, is dropped as stale.
pub const MAX_OUTSTANDING: usize = 64;

#[derive(Debug, Clone, Copy)]
struct Outstanding {
    action: ReplyAction,
    phase: GamePhase,
}

#[derive(Debug, Default)]
pub struct Narration {
    session: u32,
    next_id: u64,
    outbox: Vec<NarrativeRequest>,
    outstanding: BTreeMap<u64, Outstanding>,
}

impl Narration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> u32 {
        self.session
    }

    /// Forget everything in flight and bump the session counter.
    pub fn new_session(&mut self) {
        self.session = self.session.wrapping_add(1);
        self.outbox.clear();
        self.outstanding.clear();
    }

    pub fn request(&mut self, kind: NarrativeKind, action: ReplyAction, phase: GamePhase) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.outstanding.insert(id, Outstanding { action, phase });
        while self.outstanding.len() > MAX_OUTSTANDING {
            if let Some((oldest, _)) = self.outstanding.pop_first() {
                log::debug!("forgetting unanswered narrative request {oldest}");
            }
        }
        self.outbox.push(NarrativeRequest {
            id,
            session: self.session,
            kind,
        });
        id
    }

    pub fn take_requests(&mut self) -> Vec<NarrativeRequest> {
        std::mem::take(&mut self.outbox)
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Match a reply to its request. `None` means the reply is stale.
    pub fn redeem(&mut self, reply: &NarrativeReply, phase: GamePhase) -> Option<ReplyAction> {
        if reply.session != self.session {
            log::debug!(
                "dropping narrative reply {} from session {}",
                reply.request_id,
                reply.session
            );
            return None;
        }
        let pending = self.outstanding.remove(&reply.request_id)?;
        if pending.phase != phase {
            log::debug!(
                "dropping narrative reply {}: issued during {:?}, now {:?}",
                reply.request_id,
                pending.phase,
                phase
            );
            return None;
        }
        Some(pending.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tao_core::narrative::ChatterTag;

    fn chatter() -> NarrativeKind {
        NarrativeKind::Chatter {
            tag: ChatterTag::MissileLaunch,
            context: "test".into(),
        }
    }

    fn reply_to(request: &NarrativeRequest) -> NarrativeReply {
        NarrativeReply {
            request_id: request.id,
            session: request.session,
            text: "ok".into(),
        }
    }

    #[test]
    fn test_reply_redeemed_once() {
        let mut narration = Narration::new();
        narration.request(chatter(), ReplyAction::Chatter(Station::Mss), GamePhase::Active);
        let requests = narration.take_requests();
        assert_eq!(requests.len(), 1);
        assert!(narration.take_requests().is_empty(), "outbox drains");

        let reply = reply_to(&requests[0]);
        assert_eq!(
            narration.redeem(&reply, GamePhase::Active),
            Some(ReplyAction::Chatter(Station::Mss))
        );
        assert_eq!(narration.redeem(&reply, GamePhase::Active), None);
    }

    #[test]
    fn test_reply_after_phase_change_is_stale() {
        let mut narration = Narration::new();
        narration.request(chatter(), ReplyAction::Chatter(Station::Tic), GamePhase::Active);
        let request = narration.take_requests().remove(0);
        assert_eq!(narration.redeem(&reply_to(&request), GamePhase::Debriefing), None);
        assert_eq!(narration.outstanding(), 0);
    }

    #[test]
    fn test_unanswered_requests_are_bounded() {
        let mut narration = Narration::new();
        for _ in 0..MAX_OUTSTANDING + 10 {
            narration.request(chatter(), ReplyAction::Chatter(Station::Tic), GamePhase::Active);
        }
        assert_eq!(narration.outstanding(), MAX_OUTSTANDING);

        let requests = narration.take_requests();
        let oldest = reply_to(&requests[0]);
        assert_eq!(narration.redeem(&oldest, GamePhase::Active), None, "oldest was forgotten");
        let newest = reply_to(requests.last().expect("requests"));
        assert_eq!(
            narration.redeem(&newest, GamePhase::Active),
            Some(ReplyAction::Chatter(Station::Tic))
        );
    }

    #[test]
    fn test_reply_from_old_session_is_stale() {
        let mut narration = Narration::new();
        narration.request(chatter(), ReplyAction::Debrief, GamePhase::Debriefing);
        let request = narration.take_requests().remove(0);
        narration.new_session();
        assert_eq!(narration.redeem(&reply_to(&request), GamePhase::Debriefing), None);
    }
}
