//! Simulation engine: the core of the trainer.
//!
//! `SimulationEngine` owns the track registry, processes player commands and
//! narrative replies at the tick boundary, runs all systems, and produces
//! `SimSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use tao_core::commands::PlayerCommand;
use tao_core::components::TrackInfo;
use tao_core::constants::*;
use tao_core::enums::*;
use tao_core::events::SimEvent;
use tao_core::narrative::{ChatterTag, NarrativeKind, NarrativeReply, NarrativeRequest};
use tao_core::state::SimSnapshot;
use tao_core::types::{elapsed_hours, Position, SimTime, TrackId, Vector, WeaponTarget};

use crate::comms::CommsLog;
use crate::engagement::ScoreState;
use crate::identification::{self, PendingQuery};
use crate::narration::{Narration, ReplyAction};
use crate::registry::TrackRegistry;
use crate::scenario::{ScenarioError, ScenarioSpec};
use crate::systems;
use crate::world_setup::{self, Launch};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Real milliseconds between ticks.
    pub tick_interval_ms: u64,
    /// Simulated time per unit of real time.
    pub time_acceleration: f64,
    /// Ownship course and speed, fixed for the exercise.
    pub ownship: Vector,
    /// Real milliseconds between a query transmission and its answer.
    pub query_delay_ms: u64,
    /// Guidance law given to ownship's missiles.
    pub player_weapon_guidance: GuidanceMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_interval_ms: TICK_INTERVAL_MS,
            time_acceleration: TIME_ACCELERATION,
            ownship: OWNSHIP_VECTOR,
            query_delay_ms: QUERY_RESPONSE_DELAY_MS,
            player_weapon_guidance: GuidanceMode::PurePursuit,
        }
    }
}

impl SimConfig {
    /// Parse a config, filling anything missing from the defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Simulated hours covered by one tick.
    pub fn hours_per_tick(&self) -> f64 {
        elapsed_hours(self.tick_interval_ms, self.time_acceleration)
    }
}

/// Anything the engine consumes at the tick boundary, in arrival order.
#[derive(Debug, Clone)]
pub enum SimInput {
    Command(PlayerCommand),
    Narrative(NarrativeReply),
}

/// The simulation engine. Owns the registry and all session state.
pub struct SimulationEngine {
    config: SimConfig,
    registry: TrackRegistry,
    time: SimTime,
    phase: GamePhase,
    weapons_free: bool,
    rng: ChaCha8Rng,
    inbox: VecDeque<SimInput>,
    comms: CommsLog,
    events: Vec<SimEvent>,
    score: ScoreState,
    pending_queries: Vec<PendingQuery>,
    narration: Narration,
    scenario_description: Option<String>,
    debrief: Option<String>,
}

impl SimulationEngine {
    /// Create a new engine in the Briefing phase.
    pub fn new(config: SimConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            registry: TrackRegistry::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            weapons_free: false,
            inbox: VecDeque::new(),
            comms: CommsLog::new(),
            events: Vec::new(),
            score: ScoreState::default(),
            pending_queries: Vec::new(),
            narration: Narration::new(),
            scenario_description: None,
            debrief: None,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.inbox.push_back(SimInput::Command(command));
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.inbox.extend(commands.into_iter().map(SimInput::Command));
    }

    /// Queue a narrative reply for application at the next tick boundary.
    pub fn queue_narrative(&mut self, reply: NarrativeReply) {
        self.inbox.push_back(SimInput::Narrative(reply));
    }

    /// Drain narrative requests issued since the last call.
    pub fn take_narrative_requests(&mut self) -> Vec<NarrativeRequest> {
        self.narration.take_requests()
    }

    /// Load a scenario and enter the Active phase.
    ///
    /// Allowed from Briefing or Debriefing. On failure nothing is spawned,
    /// the phase is unchanged, and a critical comms entry is posted.
    pub fn start_exercise(&mut self, scenario: &ScenarioSpec) -> Result<(), ScenarioError> {
        if self.phase == GamePhase::Active {
            return Err(ScenarioError::ExerciseInProgress);
        }
        let contacts = match scenario.validate() {
            Ok(contacts) => contacts,
            Err(err) => {
                log::warn!("scenario rejected: {err}");
                self.comms.post(
                    self.time.tick,
                    Station::System,
                    Priority::Critical,
                    format!("SCENARIO LOAD FAILED: {err}"),
                );
                return Err(err);
            }
        };

        self.registry.clear();
        self.time = SimTime::default();
        self.weapons_free = false;
        self.events.clear();
        self.score = ScoreState::default();
        self.pending_queries.clear();
        self.narration.new_session();
        self.comms = CommsLog::with_startup_entries();
        self.debrief = None;
        self.scenario_description = Some(scenario.description.clone());

        world_setup::spawn_formation(&mut self.registry, &self.config.ownship);
        for contact in &contacts {
            world_setup::spawn_contact(&mut self.registry, contact);
        }

        self.phase = GamePhase::Active;
        log::info!(
            "exercise started: {} contacts, session {}",
            contacts.len(),
            self.narration.session()
        );
        Ok(())
    }

    /// Note that the scenario generator failed and a fallback was substituted.
    pub fn report_scenario_fallback(&mut self, reason: &str) {
        log::warn!("scenario generator failed: {reason}");
        self.comms.post(
            self.time.tick,
            Station::System,
            Priority::High,
            format!("Scenario generator unavailable ({reason}). Fallback drill loaded."),
        );
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_inbox();

        if self.phase == GamePhase::Active {
            self.resolve_due_queries();
            self.run_systems();
            self.time
                .advance(self.config.tick_interval_ms, self.config.time_acceleration);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.registry,
            &self.time,
            self.phase,
            self.weapons_free,
            &self.config.ownship,
            &self.score,
            self.comms.entries(),
            events,
            self.scenario_description.clone(),
            self.debrief.clone(),
        )
    }

    /// Current picture without advancing time. Events stay queued for the
    /// next tick.
    pub fn snapshot(&self) -> SimSnapshot {
        systems::snapshot::build_snapshot(
            &self.registry,
            &self.time,
            self.phase,
            self.weapons_free,
            &self.config.ownship,
            &self.score,
            self.comms.entries(),
            Vec::new(),
            self.scenario_description.clone(),
            self.debrief.clone(),
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn weapons_free(&self) -> bool {
        self.weapons_free
    }

    /// Get a read-only reference to the track registry.
    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn comms(&self) -> &CommsLog {
        &self.comms
    }

    /// Mutable registry access for tests that stage engagements directly.
    #[cfg(test)]
    pub fn registry_mut(&mut self) -> &mut TrackRegistry {
        &mut self.registry
    }

    fn process_inbox(&mut self) {
        while let Some(input) = self.inbox.pop_front() {
            match input {
                SimInput::Command(command) => self.handle_command(command),
                SimInput::Narrative(reply) => self.apply_narrative(reply),
            }
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        if self.phase != GamePhase::Active {
            log::debug!("ignoring {command:?} during {:?}", self.phase);
            return;
        }
        let tick = self.time.tick;
        match command {
            PlayerCommand::ClassifyTrack { track, identity } => {
                identification::classify(
                    &mut self.registry,
                    &mut self.comms,
                    &mut self.narration,
                    track,
                    identity,
                    tick,
                );
            }
            PlayerCommand::QueryTrack { track } => {
                if let Some(query) = identification::begin_query(
                    &self.registry,
                    &mut self.comms,
                    track,
                    self.time.wall_ms,
                    self.config.query_delay_ms,
                    tick,
                ) {
                    self.pending_queries.push(query);
                }
            }
            PlayerCommand::EngageTrack { track } => self.engage(track),
            PlayerCommand::ToggleWeaponsRelease => {
                self.weapons_free = !self.weapons_free;
                let message = if self.weapons_free {
                    "WEAPONS FREE AUTHORIZED"
                } else {
                    "WEAPONS TIGHT"
                };
                self.comms.post(tick, Station::Tao, Priority::High, message);
            }
            PlayerCommand::EndExercise => self.end_exercise(),
        }
    }

    /// Fire a Standard missile at a track, if weapons release allows it.
    fn engage(&mut self, track: TrackId) {
        let tick = self.time.tick;
        if !self.weapons_free {
            log::info!("engagement of {track} denied: weapons tight");
            self.comms.post(
                tick,
                Station::Tao,
                Priority::Critical,
                "Cannot fire! Weapons Tight!",
            );
            return;
        }

        let target = self.registry.entity(track).and_then(|entity| {
            let info = self.registry.world().get::<&TrackInfo>(entity).ok()?;
            let position = *self.registry.world().get::<&Position>(entity).ok()?;
            let engageable =
                info.kind != TrackKind::Missile && info.status != EngagementStatus::Destroyed;
            engageable.then(|| (info.callsign.clone(), position))
        });
        let Some((callsign, target_position)) = target else {
            log::info!("engagement of {track} denied: no engageable track");
            self.comms.post(
                tick,
                Station::Fc,
                Priority::High,
                format!("Unable to engage {track}. No firing solution."),
            );
            return;
        };

        let weapon = world_setup::spawn_weapon(
            &mut self.registry,
            &Launch {
                class: WeaponClass::Standard,
                launcher: None,
                origin: Position::ORIGIN,
                launcher_altitude_ft: 0.0,
                side: ActualIdentity::Friend,
                target: WeaponTarget::Track(track),
                target_position,
                guidance: self.config.player_weapon_guidance,
            },
        );
        self.score.weapons_fired += 1;
        self.comms.post(
            tick,
            Station::Tao,
            Priority::Normal,
            format!("Birds away on {callsign}!"),
        );
        self.events.push(SimEvent::WeaponAway {
            weapon,
            target: track,
        });
        self.narration.request(
            NarrativeKind::Chatter {
                tag: ChatterTag::MissileLaunch,
                context: format!("Standard Missile 2 launched from VLS at {callsign}."),
            },
            ReplyAction::Chatter(Station::Mss),
            GamePhase::Active,
        );
    }

    fn end_exercise(&mut self) {
        self.phase = GamePhase::Debriefing;
        self.pending_queries.clear();
        self.comms.post(
            self.time.tick,
            Station::System,
            Priority::High,
            format!("EXERCISE TERMINATED. FINAL SCORE {}.", self.score.score),
        );
        self.narration.request(
            NarrativeKind::Debrief {
                log: self.comms.entries().to_vec(),
                score: self.score.score,
            },
            ReplyAction::Debrief,
            GamePhase::Debriefing,
        );
        log::info!("exercise ended with score {}", self.score.score);
    }

    fn apply_narrative(&mut self, reply: NarrativeReply) {
        let Some(action) = self.narration.redeem(&reply, self.phase) else {
            return;
        };
        let tick = self.time.tick;
        match action {
            ReplyAction::Chatter(station) => {
                self.comms.post(tick, station, Priority::Normal, reply.text);
            }
            ReplyAction::QueryResponse(track) => {
                identification::apply_query_response(
                    &self.registry,
                    &mut self.comms,
                    track,
                    &reply.text,
                    tick,
                );
            }
            ReplyAction::Debrief => self.debrief = Some(reply.text),
        }
    }

    fn resolve_due_queries(&mut self) {
        let due = identification::take_due(&mut self.pending_queries, self.time.wall_ms);
        for query in &due {
            identification::resolve_query(
                &self.registry,
                &mut self.comms,
                &mut self.narration,
                query,
                self.time.tick,
            );
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick;
        // 1. Threat AI (steering and hostile launches)
        systems::threat_ai::run(
            &mut self.registry,
            &mut self.rng,
            &mut self.comms,
            &mut self.events,
            tick,
        );
        // 2. Relative motion
        systems::movement::run(
            &mut self.registry,
            &self.config.ownship,
            self.config.hours_per_tick(),
        );
        // 3. Weapon guidance
        systems::missile_guidance::run(&mut self.registry, &self.config.ownship, &mut self.events);
        // 4. Intercept and scoring
        systems::intercept::run(
            &mut self.registry,
            &mut self.score,
            &mut self.comms,
            &mut self.events,
            tick,
        );
        // 5. Trails
        systems::movement::update_history(&mut self.registry);
        // 6. Expended weapons
        systems::cleanup::run(&mut self.registry);
    }

    /// Displayed and actual identity of a track, for assertions.
    #[cfg(test)]
    pub fn identity_of(&self, id: TrackId) -> Option<tao_core::components::Identity> {
        let entity = self.registry.entity(id)?;
        let identity = self
            .registry
            .world()
            .get::<&tao_core::components::Identity>(entity)
            .ok()?;
        Some(*identity)
    }
}
