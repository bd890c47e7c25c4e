//! Application state shared between the control surface and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use tao_core::commands::PlayerCommand;
use tao_core::narrative::NarrativeReply;
use tao_core::state::SimSnapshot;

/// Everything the game loop thread consumes, through a single channel.
#[derive(Debug)]
pub enum LoopMessage {
    /// Generate a scenario and begin an exercise.
    Start,
    /// A player command to forward to the simulation engine.
    Command(PlayerCommand),
    /// Text returned by a narrative worker.
    Narrative(NarrativeReply),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared application state.
///
/// - `mpsc::Sender` sits in a `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` for handles that do not exist before `start_simulation`
/// - `Arc<Mutex<...>>` for the latest snapshot, shared with the game loop thread
pub struct AppState {
    /// Channel into the game loop. `None` before `start_simulation`.
    pub loop_tx: Mutex<Option<mpsc::Sender<LoopMessage>>>,
    /// Latest snapshot for synchronous `get_snapshot` queries.
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    /// Join handle of the game loop thread while it runs.
    pub loop_thread: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            loop_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_thread: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a game loop thread has been started and not yet shut down.
    pub fn is_running(&self) -> bool {
        self.loop_tx.lock().map(|tx| tx.is_some()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.loop_tx.lock().unwrap().is_none());
        assert!(state.latest_snapshot.lock().unwrap().is_none());
        assert!(state.loop_thread.lock().unwrap().is_none());
        assert!(!state.is_running());
    }
}
