//! Comms log: the time-ordered message history shown to the player.
//!
//! Every entry is also mirrored to the `log` facade at debug level so a
//! headless run can be followed from the terminal. The log is unbounded for
//! the length of an exercise and starts over with the next one; snapshots
//! carry it in full.

use tao_core::enums::{Priority, Station};
use tao_core::events::LogEntry;

/// Message posted by CIC when an exercise comes up.
pub const STARTUP_MESSAGE: &str = "SYSTEM STARTUP COMPLETE. SPY-1 RADAR ONLINE.";

/// Standing orders from the bridge at the start of every exercise.
pub const ROE_BRIEF: &str = "TAO, this is Captain. We are entering the exclusion zone. \
Rules of Engagement are TIGHT. Do not fire unless fired upon or hostile intent is verified.";

#[derive(Debug, Clone, Default)]
pub struct CommsLog {
    entries: Vec<LogEntry>,
    next_id: u64,
}

impl CommsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh log carrying the two opening messages of an exercise.
    pub fn with_startup_entries() -> Self {
        let mut comms = Self::new();
        comms.post(0, Station::Cic, Priority::Normal, STARTUP_MESSAGE);
        comms.post(0, Station::Bridge, Priority::High, ROE_BRIEF);
        comms
    }

    pub fn post(
        &mut self,
        tick: u64,
        station: Station,
        priority: Priority,
        message: impl Into<String>,
    ) {
        let message = message.into();
        log::debug!("[{station:?}/{priority:?}] {message}");
        self.entries.push(LogEntry {
            id: self.next_id,
            tick,
            station,
            message,
            priority,
        });
        self.next_id += 1;
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
