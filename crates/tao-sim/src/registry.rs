//! Track registry: the single owned store of every contact.
//!
//! Wraps the hecs `World` with a stable `TrackId` index so systems can
//! visit tracks in id order (keeps random draws reproducible) and resolve
//! weapon target references without scanning.

use std::collections::BTreeMap;

use hecs::{DynamicBundle, Entity, World};

use tao_core::components::TrackInfo;
use tao_core::enums::EngagementStatus;
use tao_core::types::{Position, TrackId};

#[derive(Default)]
pub struct TrackRegistry {
    world: World,
    index: BTreeMap<TrackId, Entity>,
    next_id: u32,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Reserve the next track id.
    pub fn allocate_id(&mut self) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a track under an id obtained from `allocate_id`.
    pub fn insert(&mut self, id: TrackId, components: impl DynamicBundle) -> Entity {
        let entity = self.world.spawn(components);
        self.index.insert(id, entity);
        entity
    }

    /// Remove a track. Returns false if it was not registered.
    pub fn remove(&mut self, id: TrackId) -> bool {
        match self.index.remove(&id) {
            Some(entity) => self.world.despawn(entity).is_ok(),
            None => false,
        }
    }

    /// Drop every track and restart id allocation.
    pub fn clear(&mut self) {
        self.world.clear();
        self.index.clear();
        self.next_id = 0;
    }

    pub fn entity(&self, id: TrackId) -> Option<Entity> {
        self.index.get(&id).copied()
    }

    /// All registered ids in ascending order.
    pub fn ids(&self) -> Vec<TrackId> {
        self.index.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.index.contains_key(&id)
    }

    /// Position of a registered track that has not been destroyed.
    pub fn live_position(&self, id: TrackId) -> Option<Position> {
        let entity = self.entity(id)?;
        let info = self.world.get::<&TrackInfo>(entity).ok()?;
        if info.status == EngagementStatus::Destroyed {
            return None;
        }
        self.world.get::<&Position>(entity).ok().map(|p| *p)
    }
}
