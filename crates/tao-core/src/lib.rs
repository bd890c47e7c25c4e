//! Core types and definitions for the TAO tactical trainer.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, comms log entries, snapshots, narrative
//! request types, and constants. It has no dependency on any runtime.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod narrative;
pub mod state;
pub mod types;
