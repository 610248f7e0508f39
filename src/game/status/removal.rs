use bevy::prelude::*;

use super::store::StatusEffectStore;

/// Command buffer of record removals decided while the store was being
/// iterated (Bevy Resource). Drained once iteration is over.
#[derive(Resource, Default, Debug)]
pub struct DeferredRemovals {
    pending: Vec<Entity>,
}

impl DeferredRemovals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, entity: Entity) {
        if !self.pending.contains(&entity) {
            self.pending.push(entity);
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove every queued entity's record. Entities whose record is
    /// already gone are skipped. Returns the entities actually removed.
    pub fn drain(&mut self, store: &mut StatusEffectStore) -> Vec<Entity> {
        self.pending
            .drain(..)
            .filter(|entity| store.remove(*entity).is_some())
            .collect()
    }
}
