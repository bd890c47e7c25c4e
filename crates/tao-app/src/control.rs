//! Control surface for the presentation layer.
//!
//! Each function takes the shared `AppState`, forwards work to the game loop
//! thread, and returns immediately. Snapshots are polled, never pushed.

use std::sync::Arc;

use tao_core::commands::PlayerCommand;
use tao_core::state::SimSnapshot;
use tao_sim::SimConfig;

use crate::error::AppError;
use crate::game_loop::{self, LoopContext};
use crate::narrative::NarrativeGenerator;
use crate::scenario::ScenarioProvider;
use crate::state::{AppState, LoopMessage};

/// Spawn the game loop thread. The engine waits in Briefing until
/// `start_exercise` is called.
pub fn start_simulation(
    state: &AppState,
    config: SimConfig,
    provider: Box<dyn ScenarioProvider>,
    narrator: Arc<dyn NarrativeGenerator>,
) -> Result<(), AppError> {
    let mut loop_tx = state.loop_tx.lock()?;
    if loop_tx.is_some() {
        return Err(AppError::AlreadyRunning);
    }
    let context = LoopContext {
        provider,
        narrator,
        latest_snapshot: Arc::clone(&state.latest_snapshot),
    };
    let (tx, handle) = game_loop::spawn_game_loop(config, context)?;
    *loop_tx = Some(tx);
    *state.loop_thread.lock()? = Some(handle);
    log::info!("game loop started");
    Ok(())
}

fn send(state: &AppState, message: LoopMessage) -> Result<(), AppError> {
    let loop_tx = state.loop_tx.lock()?;
    let tx = loop_tx.as_ref().ok_or(AppError::NotStarted)?;
    tx.send(message).map_err(|_| AppError::LoopDisconnected)
}

/// Request a fresh scenario and begin an exercise.
pub fn start_exercise(state: &AppState) -> Result<(), AppError> {
    send(state, LoopMessage::Start)
}

/// Forward an operator command; it applies at the next tick boundary.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), AppError> {
    send(state, LoopMessage::Command(command))
}

/// Latest published snapshot, if the loop has produced one.
pub fn get_snapshot(state: &AppState) -> Result<Option<SimSnapshot>, AppError> {
    Ok(state.latest_snapshot.lock()?.clone())
}

/// Stop the game loop and wait for its thread to finish.
pub fn shutdown(state: &AppState) -> Result<(), AppError> {
    let Some(tx) = state.loop_tx.lock()?.take() else {
        return Ok(());
    };
    if tx.send(LoopMessage::Shutdown).is_err() {
        log::debug!("game loop already stopped");
    }
    if let Some(handle) = state.loop_thread.lock()?.take() {
        if handle.join().is_err() {
            log::error!("game loop thread panicked");
        }
    }
    log::info!("game loop stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::narrative::OfflineNarrator;
    use crate::scenario::FallbackDrill;
    use tao_core::enums::GamePhase;

    fn launch(state: &AppState) -> Result<(), AppError> {
        let config = SimConfig {
            tick_interval_ms: 5,
            ..SimConfig::default()
        };
        start_simulation(state, config, Box::new(FallbackDrill), Arc::new(OfflineNarrator))
    }

    #[test]
    fn test_commands_before_start_are_rejected() {
        let state = AppState::new();
        assert!(matches!(start_exercise(&state), Err(AppError::NotStarted)));
        assert!(matches!(
            send_command(&state, PlayerCommand::EndExercise),
            Err(AppError::NotStarted)
        ));
        assert!(get_snapshot(&state).unwrap().is_none());
        assert!(shutdown(&state).is_ok(), "shutdown without a loop is a no-op");
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let state = AppState::new();
        launch(&state).unwrap();
        assert!(state.is_running());
        assert!(matches!(launch(&state), Err(AppError::AlreadyRunning)));
        shutdown(&state).unwrap();
        assert!(!state.is_running());
    }

    #[test]
    fn test_weapons_release_round_trip() {
        let state = AppState::new();
        launch(&state).unwrap();
        start_exercise(&state).unwrap();
        send_command(&state, PlayerCommand::ToggleWeaponsRelease).unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut released = false;
        while Instant::now() < deadline {
            if let Some(snapshot) = get_snapshot(&state).unwrap() {
                if snapshot.phase == GamePhase::Active && snapshot.weapons_free {
                    released = true;
                    break;
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(released, "toggle should reach the engine");
        shutdown(&state).unwrap();
        assert!(matches!(
            send_command(&state, PlayerCommand::EndExercise),
            Err(AppError::NotStarted)
        ));
    }
}
