//! ECS systems that operate on the track registry each tick.
//!
//! Systems are free functions over the registry. They do not own state;
//! everything persistent lives in components or in the engine.

pub mod cleanup;
pub mod intercept;
pub mod missile_guidance;
pub mod movement;
pub mod snapshot;
pub mod threat_ai;
