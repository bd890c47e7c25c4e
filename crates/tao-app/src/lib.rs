//! TAO trainer application layer.
//!
//! Hosts the simulation engine on a real-time game loop thread, dispatches
//! narrative requests to worker threads, and exposes a small control surface
//! for whatever presentation layer sits on top.

pub mod control;
pub mod error;
pub mod game_loop;
pub mod narrative;
pub mod scenario;
pub mod state;

pub use error::AppError;
pub use tao_core as core;
