//! Simulation constants and tuning parameters.

use crate::types::Vector;

// --- Time ---

/// Default wall-clock tick interval (1 Hz radar sweep).
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Default simulated seconds per real second.
pub const TIME_ACCELERATION: f64 = 10.0;

/// Milliseconds in one hour, for knots to nautical miles per tick.
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Real-time delay before a query on the distress net is answered.
pub const QUERY_RESPONSE_DELAY_MS: u64 = 2000;

// --- Ownship ---

/// Ownship course and speed: north at 20 knots.
pub const OWNSHIP_VECTOR: Vector = Vector {
    heading: 0.0,
    speed: 20.0,
};

// --- Sensors ---

/// Ownship radar horizon (nautical miles).
pub const RADAR_RANGE_NM: f64 = 80.0;

/// Detection radius of the airborne early-warning asset (nautical miles).
pub const AEW_RADAR_RANGE_NM: f64 = 150.0;

// --- Weapons ---

/// Standard missile speed (knots).
pub const STANDARD_MISSILE_SPEED_KTS: f64 = 1200.0;

/// Standard missile launch altitude (feet).
pub const STANDARD_MISSILE_ALTITUDE_FT: f64 = 1000.0;

/// Air-to-air missile speed (knots).
pub const AIR_INTERCEPT_SPEED_KTS: f64 = 2000.0;

/// Anti-ship missile speed (knots).
pub const ANTI_SHIP_SPEED_KTS: f64 = 600.0;

/// Anti-ship missile sea-skimming altitude (feet).
pub const ANTI_SHIP_ALTITUDE_FT: f64 = 100.0;

/// Range under which a weapon is considered to have struck (nautical miles).
pub const INTERCEPT_RADIUS_NM: f64 = 5.0;

// --- Scoring ---

/// Score at the start of an exercise.
pub const INITIAL_SCORE: i64 = 100;

/// Player weapon destroys a hostile.
pub const SCORE_HOSTILE_SPLASH: i64 = 50;

/// Player weapon destroys a friend or neutral.
pub const SCORE_FRATRICIDE: i64 = -200;

/// Hostile weapon strikes ownship.
pub const SCORE_OWNSHIP_HIT: i64 = -100;

/// Hostile weapon destroys a friendly or neutral track.
pub const SCORE_CONTACT_LOST: i64 = -50;

// --- Scenario defaults ---

/// Default altitude for air contacts missing one (feet).
pub const DEFAULT_AIR_ALTITUDE_FT: f64 = 20_000.0;

/// Base number for generated callsigns (`UNK-1000`, `UNK-1001`, ...).
pub const GENERATED_CALLSIGN_BASE: usize = 1000;

// --- Formation ---

/// Sensor asset orbit altitude (feet).
pub const AEW_ALTITUDE_FT: f64 = 25_000.0;

// --- Display ---

/// Maximum number of trail positions per track.
pub const MAX_HISTORY_DOTS: usize = 12;
