//! Requests to, and replies from, the external narrative generator.
//!
//! The simulation never waits on narration. It posts a request, carries on
//! ticking, and applies the reply whenever it comes back through the inbox.

use serde::{Deserialize, Serialize};

use crate::events::LogEntry;

/// Text used when chatter generation fails.
pub const CHATTER_FALLBACK: &str = "Copy.";

/// Text used when the debrief cannot be generated.
pub const DEBRIEF_FALLBACK: &str = "Data corrupted. No debrief available.";

/// Event a chatter line is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatterTag {
    ClassificationChanged,
    MissileLaunch,
    QueryResponse,
}

/// A request for generated text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub id: u64,
    /// Exercise the request belongs to. Replies from older sessions are dropped.
    pub session: u32,
    pub kind: NarrativeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NarrativeKind {
    /// One short radio transmission.
    Chatter { tag: ChatterTag, context: String },
    /// After-action evaluation of the exercise.
    Debrief { log: Vec<LogEntry>, score: i64 },
}

/// Generated text for an earlier request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeReply {
    pub request_id: u64,
    pub session: u32,
    pub text: String,
}

impl ChatterTag {
    /// Event label handed to the generator.
    pub fn label(&self) -> &'static str {
        match self {
            ChatterTag::ClassificationChanged => "Classification Changed",
            ChatterTag::MissileLaunch => "Missile Launch",
            ChatterTag::QueryResponse => "Civilian Response",
        }
    }
}

impl NarrativeKind {
    /// Text substituted when the generator fails.
    pub fn fallback(&self) -> &'static str {
        match self {
            NarrativeKind::Chatter { .. } => CHATTER_FALLBACK,
            NarrativeKind::Debrief { .. } => DEBRIEF_FALLBACK,
        }
    }
}
