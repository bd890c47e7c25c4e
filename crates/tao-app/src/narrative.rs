//! Narrative dispatch: radio chatter and the debrief, produced off-thread.
//!
//! Each request runs on its own worker thread and posts its reply back into
//! the game loop channel. A failed or empty generation is replaced by the
//! fixed fallback text for its kind. There is no retry.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use thiserror::Error;

use tao_core::enums::Priority;
use tao_core::events::LogEntry;
use tao_core::narrative::{ChatterTag, NarrativeKind, NarrativeReply, NarrativeRequest};

use crate::state::LoopMessage;

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative generator unavailable: {0}")]
    Unavailable(String),
    #[error("narrative generator returned no text")]
    Empty,
}

/// Source of free-text radio chatter and debrief prose.
pub trait NarrativeGenerator: Send + Sync {
    fn chatter(&self, tag: ChatterTag, context: &str) -> Result<String, NarrativeError>;

    fn debrief(&self, log: &[LogEntry], score: i64) -> Result<String, NarrativeError>;
}

/// Produce the text for a request, substituting the fallback on failure.
pub fn generate(generator: &dyn NarrativeGenerator, kind: &NarrativeKind) -> String {
    let result = match kind {
        NarrativeKind::Chatter { tag, context } => generator.chatter(*tag, context),
        NarrativeKind::Debrief { log, score } => generator.debrief(log, *score),
    };
    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            log::warn!("{}; using fallback", NarrativeError::Empty);
            kind.fallback().to_string()
        }
        Err(err) => {
            log::warn!("{err}; using fallback");
            kind.fallback().to_string()
        }
    }
}

/// Run a request on a worker thread and send the reply into the game loop.
pub fn dispatch(
    generator: Arc<dyn NarrativeGenerator>,
    request: NarrativeRequest,
    loop_tx: Sender<LoopMessage>,
) {
    let spawned = std::thread::Builder::new()
        .name(format!("tao-narrative-{}", request.id))
        .spawn({
            let loop_tx = loop_tx.clone();
            let generator = Arc::clone(&generator);
            let request = request.clone();
            move || {
                let text = generate(generator.as_ref(), &request.kind);
                send_reply(&loop_tx, &request, text);
            }
        });
    if let Err(err) = spawned {
        log::warn!("narrative worker failed to start: {err}");
        send_reply(&loop_tx, &request, request.kind.fallback().to_string());
    }
}

fn send_reply(loop_tx: &Sender<LoopMessage>, request: &NarrativeRequest, text: String) {
    let reply = NarrativeReply {
        request_id: request.id,
        session: request.session,
        text,
    };
    if loop_tx.send(LoopMessage::Narrative(reply)).is_err() {
        log::debug!("game loop gone; dropping narrative reply {}", request.id);
    }
}

/// Canned narration for running without an external generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineNarrator;

impl NarrativeGenerator for OfflineNarrator {
    fn chatter(&self, tag: ChatterTag, _context: &str) -> Result<String, NarrativeError> {
        let line = match tag {
            ChatterTag::ClassificationChanged => "TIC copies, track classification updated.",
            ChatterTag::MissileLaunch => "Missile away, good launch, tracking.",
            ChatterTag::QueryResponse => {
                "Warship, this is civil traffic on a scheduled route. We read you and are altering course."
            }
        };
        Ok(line.to_string())
    }

    fn debrief(&self, log: &[LogEntry], score: i64) -> Result<String, NarrativeError> {
        let critical = log
            .iter()
            .filter(|entry| entry.priority == Priority::Critical)
            .count();
        let grade = match score {
            s if s >= 150 => "Outstanding",
            s if s >= 100 => "Satisfactory",
            s if s >= 0 => "Marginal",
            _ => "Unsatisfactory",
        };
        Ok(format!(
            "Final score {score}. {grade} watch. {critical} critical events in {} log entries.",
            log.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use tao_core::enums::Station;
    use tao_core::narrative::{CHATTER_FALLBACK, DEBRIEF_FALLBACK};

    struct Broken;

    impl NarrativeGenerator for Broken {
        fn chatter(&self, _tag: ChatterTag, _context: &str) -> Result<String, NarrativeError> {
            Err(NarrativeError::Unavailable("timeout".into()))
        }

        fn debrief(&self, _log: &[LogEntry], _score: i64) -> Result<String, NarrativeError> {
            Ok("   ".into())
        }
    }

    fn chatter(tag: ChatterTag) -> NarrativeKind {
        NarrativeKind::Chatter {
            tag,
            context: String::new(),
        }
    }

    #[test]
    fn test_fallbacks_replace_failures() {
        assert_eq!(generate(&Broken, &chatter(ChatterTag::MissileLaunch)), CHATTER_FALLBACK);
        let debrief = NarrativeKind::Debrief {
            log: Vec::new(),
            score: 0,
        };
        assert_eq!(generate(&Broken, &debrief), DEBRIEF_FALLBACK, "blank text is a failure");
    }

    #[test]
    fn test_offline_debrief_counts_critical_entries() {
        let log = vec![
            LogEntry {
                id: 0,
                tick: 1,
                station: Station::Tao,
                message: "Cannot fire! Weapons Tight!".into(),
                priority: Priority::Critical,
            },
            LogEntry {
                id: 1,
                tick: 2,
                station: Station::Fc,
                message: "SPLASH TARGET X!".into(),
                priority: Priority::High,
            },
        ];
        let text = OfflineNarrator.debrief(&log, 150).expect("offline never fails");
        assert!(text.contains("Final score 150"));
        assert!(text.contains("Outstanding"));
        assert!(text.contains("1 critical"));
    }

    #[test]
    fn test_dispatch_replies_through_channel() {
        let (tx, rx) = mpsc::channel();
        let request = NarrativeRequest {
            id: 9,
            session: 2,
            kind: chatter(ChatterTag::QueryResponse),
        };
        dispatch(Arc::new(Broken), request, tx);

        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(LoopMessage::Narrative(reply)) => {
                assert_eq!(reply.request_id, 9);
                assert_eq!(reply.session, 2);
                assert_eq!(reply.text, CHATTER_FALLBACK);
            }
            other => panic!("expected a narrative reply, got {other:?}"),
        }
    }
}
