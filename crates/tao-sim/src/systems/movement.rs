//! Relative-motion integration.
//!
//! Ownship sits at the origin, so every track is displaced by the
//! difference between its own velocity and ownship's. A track sailing in
//! company with ownship does not move at all.

use glam::DVec2;

use tao_core::components::PositionHistory;
use tao_core::constants::MAX_HISTORY_DOTS;
use tao_core::types::{Position, Vector};

use crate::registry::TrackRegistry;

/// Displace every track by `(v_track - v_own) * hours`.
pub fn run(registry: &mut TrackRegistry, ownship: &Vector, hours: f64) {
    let own_velocity: DVec2 = ownship.velocity();
    for (_entity, (pos, vector)) in registry
        .world_mut()
        .query_mut::<(&mut Position, &Vector)>()
    {
        *pos = pos.displaced((vector.velocity() - own_velocity) * hours);
    }
}

/// Record the latest position at the head of each track's trail.
pub fn update_history(registry: &mut TrackRegistry) {
    for (_entity, (pos, history)) in registry
        .world_mut()
        .query_mut::<(&Position, &mut PositionHistory)>()
    {
        history.positions.insert(0, *pos);
        history.positions.truncate(MAX_HISTORY_DOTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tao_core::types::elapsed_hours;

    fn spawn(registry: &mut TrackRegistry, pos: Position, vector: Vector) -> hecs::Entity {
        let id = registry.allocate_id();
        registry.insert(id, (pos, vector, PositionHistory::default()))
    }

    #[test]
    fn test_stationary_contact_drifts_astern() {
        let mut registry = TrackRegistry::new();
        let entity = spawn(&mut registry, Position::new(0.0, 10.0), Vector::new(0.0, 0.0));
        run(&mut registry, &Vector::new(0.0, 20.0), elapsed_hours(1000, 10.0));

        let pos = *registry.world().get::<&Position>(entity).expect("position");
        assert_relative_eq!(pos.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pos.y, 10.0 - 20.0 / 360.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matching_vector_holds_station() {
        let mut registry = TrackRegistry::new();
        let own = Vector::new(37.0, 20.0);
        let entity = spawn(&mut registry, Position::new(-6.0, -2.0), own);
        for _ in 0..100 {
            run(&mut registry, &own, elapsed_hours(1000, 10.0));
        }
        let pos = *registry.world().get::<&Position>(entity).expect("position");
        assert_eq!(pos, Position::new(-6.0, -2.0), "escort must not drift");
    }

    #[test]
    fn test_history_is_bounded_newest_first() {
        let mut registry = TrackRegistry::new();
        let entity = spawn(&mut registry, Position::ORIGIN, Vector::new(90.0, 360.0));
        for _ in 0..20 {
            run(&mut registry, &Vector::default(), elapsed_hours(1000, 10.0));
            update_history(&mut registry);
        }
        let history = registry.world().get::<&PositionHistory>(entity).expect("history");
        assert_eq!(history.positions.len(), MAX_HISTORY_DOTS);
        assert_relative_eq!(history.positions[0].x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(history.positions[1].x, 19.0, epsilon = 1e-9);
    }
}
