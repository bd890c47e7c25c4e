//! Simulation kernel for the TAO tactical trainer.
//!
//! Owns the track registry, runs the tick pipeline (threat AI, relative
//! motion, guidance, intercept, cleanup) and produces `SimSnapshot`s for the
//! presentation layer. Headless and deterministic for a given seed.

pub mod comms;
pub mod engagement;
pub mod engine;
pub mod guidance;
pub mod identification;
pub mod narration;
pub mod registry;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use scenario::{ScenarioError, ScenarioSpec};
pub use tao_core as core;
