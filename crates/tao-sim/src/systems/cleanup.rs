//! Cleanup system: removes expended weapons.
//!
//! Destroyed aircraft and ships stay in the registry as wreckage.

use tao_core::components::TrackInfo;
use tao_core::enums::{EngagementStatus, TrackKind};
use tao_core::types::TrackId;

use crate::registry::TrackRegistry;

/// Remove destroyed weapon tracks. Returns how many were removed.
pub fn run(registry: &mut TrackRegistry) -> usize {
    let expended: Vec<TrackId> = registry
        .world()
        .query::<&TrackInfo>()
        .iter()
        .filter(|(_, info)| {
            info.kind == TrackKind::Missile && info.status == EngagementStatus::Destroyed
        })
        .map(|(_, info)| info.id)
        .collect();

    for id in &expended {
        registry.remove(*id);
    }
    expended.len()
}
