//! Threat AI for the TAO trainer.
//!
//! Implements the per-role decision process of hostile aircraft:
//! pursue or egress, and when to release a weapon.

pub mod fsm;
pub mod profiles;

pub use tao_core as core;
