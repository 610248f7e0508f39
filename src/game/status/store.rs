use std::collections::HashMap;

use bevy::prelude::*;

use super::effect::{EffectType, StatusEffectRecord};

/// One optional effect record per entity (Bevy Resource).
///
/// Keyed by entity, so a second record for the same entity can only
/// ever replace the first.
#[derive(Resource, Default, Debug)]
pub struct StatusEffectStore {
    records: HashMap<Entity, StatusEffectRecord>,
}

impl StatusEffectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity: Entity) -> Option<&StatusEffectRecord> {
        self.records.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut StatusEffectRecord> {
        self.records.get_mut(&entity)
    }

    /// Put `record` in the entity's slot, returning whatever was there.
    pub fn insert(
        &mut self,
        entity: Entity,
        record: StatusEffectRecord,
    ) -> Option<StatusEffectRecord> {
        self.records.insert(entity, record)
    }

    pub fn remove(&mut self, entity: Entity) -> Option<StatusEffectRecord> {
        self.records.remove(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.records.contains_key(&entity)
    }

    pub fn kind_of(&self, entity: Entity) -> EffectType {
        self.get(entity).map_or(EffectType::None, |r| r.kind)
    }

    /// Seconds left on the entity's effect, or 0 if it has none.
    pub fn remaining(&self, entity: Entity) -> f32 {
        self.get(entity).map_or(0.0, |r| r.remaining.0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &StatusEffectRecord)> {
        self.records.iter().map(|(e, r)| (*e, r))
    }

    /// Mutable iteration for the clock. The map itself cannot be
    /// restructured while this borrow is live; removals go through
    /// [`DeferredRemovals`](super::removal::DeferredRemovals).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut StatusEffectRecord)> {
        self.records.iter_mut().map(|(e, r)| (*e, r))
    }
}
