//! Game loop thread: runs the simulation engine at a fixed real-time cadence
//! and publishes snapshots.
//!
//! The engine is created inside this thread and never leaves it. Everything
//! else talks to it through one `mpsc` channel of `LoopMessage`s, which also
//! carries narrative replies back from worker threads. Ticks run only while
//! an exercise is active; otherwise the loop blocks on the channel.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tao_core::enums::GamePhase;
use tao_core::state::SimSnapshot;
use tao_sim::scenario::fallback_drill;
use tao_sim::{SimConfig, SimulationEngine};

use crate::error::AppError;
use crate::narrative::{self, NarrativeGenerator};
use crate::scenario::ScenarioProvider;
use crate::state::LoopMessage;

/// Collaborators the loop needs besides its channel.
pub struct LoopContext {
    pub provider: Box<dyn ScenarioProvider>,
    pub narrator: Arc<dyn NarrativeGenerator>,
    pub latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
}

/// Spawns the game loop in a new thread.
///
/// Returns the sender for the control layer and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    context: LoopContext,
) -> Result<(mpsc::Sender<LoopMessage>, JoinHandle<()>), AppError> {
    let (loop_tx, loop_rx) = mpsc::channel::<LoopMessage>();
    let worker_tx = loop_tx.clone();

    let handle = std::thread::Builder::new()
        .name("tao-game-loop".into())
        .spawn(move || {
            run_game_loop(config, context, loop_rx, worker_tx);
        })?;

    Ok((loop_tx, handle))
}

fn publish(latest_snapshot: &Mutex<Option<SimSnapshot>>, snapshot: SimSnapshot) {
    if let Ok(mut lock) = latest_snapshot.lock() {
        *lock = Some(snapshot);
    }
}

/// Load a scenario from the provider, substituting the built-in drill when
/// the provider fails or hands back something unusable.
fn start(engine: &mut SimulationEngine, provider: &mut dyn ScenarioProvider) {
    let failure = match provider.generate() {
        Ok(scenario) => match engine.start_exercise(&scenario) {
            Ok(()) => return,
            Err(err) => err.to_string(),
        },
        Err(err) => err.to_string(),
    };
    if engine.phase() == GamePhase::Active {
        log::debug!("start ignored: exercise already active");
        return;
    }
    match engine.start_exercise(&fallback_drill()) {
        Ok(()) => engine.report_scenario_fallback(&failure),
        Err(err) => log::error!("fallback drill rejected: {err}"),
    }
}

/// The game loop. Runs until Shutdown or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    mut context: LoopContext,
    loop_rx: mpsc::Receiver<LoopMessage>,
    worker_tx: mpsc::Sender<LoopMessage>,
) {
    let interval = Duration::from_millis(config.tick_interval_ms.max(1));
    let mut engine = SimulationEngine::new(config);
    let mut next_tick_time = Instant::now();
    publish(&context.latest_snapshot, engine.snapshot());

    loop {
        let message = if engine.phase() == GamePhase::Active {
            let now = Instant::now();
            if now >= next_tick_time {
                let snapshot = engine.tick();
                publish(&context.latest_snapshot, snapshot);
                for request in engine.take_narrative_requests() {
                    narrative::dispatch(
                        Arc::clone(&context.narrator),
                        request,
                        worker_tx.clone(),
                    );
                }

                next_tick_time += interval;
                let now = Instant::now();
                if now > next_tick_time && now - next_tick_time > interval * 2 {
                    // Too far behind: reset to avoid a catch-up spiral
                    next_tick_time = now;
                }
                continue;
            }
            match loop_rx.recv_timeout(next_tick_time - now) {
                Ok(message) => message,
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => return,
            }
        } else {
            match loop_rx.recv() {
                Ok(message) => message,
                Err(_) => return,
            }
        };

        match message {
            LoopMessage::Start => {
                start(&mut engine, context.provider.as_mut());
                publish(&context.latest_snapshot, engine.snapshot());
                next_tick_time = Instant::now() + interval;
            }
            LoopMessage::Command(command) => engine.queue_command(command),
            LoopMessage::Narrative(reply) => engine.queue_narrative(reply),
            LoopMessage::Shutdown => return,
        }

        // Outside an exercise nothing ticks on its own; apply inputs now.
        if engine.phase() != GamePhase::Active {
            let snapshot = engine.tick();
            publish(&context.latest_snapshot, snapshot);
            for request in engine.take_narrative_requests() {
                narrative::dispatch(Arc::clone(&context.narrator), request, worker_tx.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::OfflineNarrator;
    use crate::scenario::{FallbackDrill, JsonScenario};
    use tao_core::commands::PlayerCommand;
    use tao_core::enums::{Priority, Station};

    fn fast_config() -> SimConfig {
        SimConfig {
            tick_interval_ms: 5,
            ..SimConfig::default()
        }
    }

    fn context(provider: Box<dyn ScenarioProvider>) -> LoopContext {
        LoopContext {
            provider,
            narrator: Arc::new(OfflineNarrator),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }

    /// Poll the shared snapshot until `done` holds or the deadline passes.
    fn wait_for(
        latest: &Mutex<Option<SimSnapshot>>,
        done: impl Fn(&SimSnapshot) -> bool,
    ) -> Option<SimSnapshot> {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if let Some(snapshot) = latest.lock().unwrap().as_ref() {
                if done(snapshot) {
                    return Some(snapshot.clone());
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_message_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<LoopMessage>();

        tx.send(LoopMessage::Start).unwrap();
        tx.send(LoopMessage::Command(PlayerCommand::ToggleWeaponsRelease))
            .unwrap();
        tx.send(LoopMessage::Shutdown).unwrap();

        let messages: Vec<_> = rx.try_iter().collect();
        assert_eq!(messages.len(), 3);
        assert!(matches!(messages[0], LoopMessage::Start));
        assert!(matches!(
            messages[1],
            LoopMessage::Command(PlayerCommand::ToggleWeaponsRelease)
        ));
        assert!(matches!(messages[2], LoopMessage::Shutdown));
    }

    #[test]
    fn test_snapshot_serialization_under_3ms() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.start_exercise(&fallback_drill()).unwrap();
        for _ in 0..50 {
            engine.tick();
        }

        let snapshot = engine.tick();
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(3),
            "Snapshot serialization took {:?}, should be <3ms",
            elapsed
        );
        assert!(!json.is_empty());
    }

    #[test]
    fn test_bad_scenario_falls_back_to_drill() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        let mut provider = JsonScenario::new("{ not json");
        start(&mut engine, &mut provider);

        assert_eq!(engine.phase(), GamePhase::Active);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.tracks.len(), 7, "formation plus three drill contacts");
        assert!(snapshot.logs.iter().any(|entry| entry.station == Station::System
            && entry.priority == Priority::High
            && entry.message.contains("Fallback drill loaded")));
        assert!(
            snapshot.logs.iter().any(|entry| entry.message.contains("not valid JSON")),
            "the parse failure reaches the operator log"
        );
    }

    #[test]
    fn test_invalid_scenario_reason_survives_fallback() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        let mut provider = JsonScenario::new(
            r#"{"description": "Bad", "tracks": [{"position": {"x": 1}, "vector": {"heading": 0, "speed": 0}}]}"#,
        );
        start(&mut engine, &mut provider);

        assert_eq!(engine.phase(), GamePhase::Active);
        let snapshot = engine.snapshot();
        let entry = snapshot
            .logs
            .iter()
            .find(|entry| entry.message.contains("Fallback drill loaded"))
            .expect("fallback reported");
        assert!(
            entry.message.contains("contact 0: missing required field `position.y`"),
            "validation error kept: {}",
            entry.message
        );
    }

    #[test_log::test]
    fn test_loop_runs_exercise_to_debrief() {
        let context = context(Box::new(FallbackDrill));
        let latest = Arc::clone(&context.latest_snapshot);
        let (tx, handle) = spawn_game_loop(fast_config(), context).unwrap();

        let briefing = wait_for(&latest, |s| s.phase == GamePhase::Briefing);
        assert!(briefing.is_some(), "initial snapshot published");

        tx.send(LoopMessage::Start).unwrap();
        let running = wait_for(&latest, |s| s.phase == GamePhase::Active && s.time.tick >= 3);
        assert!(running.is_some(), "loop ticks while active");

        tx.send(LoopMessage::Command(PlayerCommand::EndExercise)).unwrap();
        let debriefed = wait_for(&latest, |s| s.debrief.is_some())
            .expect("offline debrief arrives");
        assert_eq!(debriefed.phase, GamePhase::Debriefing);
        assert!(debriefed.debrief.unwrap().contains("Final score"));

        tx.send(LoopMessage::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_shutdown_from_briefing_joins_thread() {
        let (tx, handle) = spawn_game_loop(fast_config(), context(Box::new(FallbackDrill))).unwrap();
        tx.send(LoopMessage::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
