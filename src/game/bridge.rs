use std::collections::HashMap;
use std::sync::{Arc, Weak};

use bevy::prelude::*;

use super::actor::{ActorCapability, SharedActor};

type WeakActor = Weak<std::sync::Mutex<dyn ActorCapability>>;

/// Identity of a live actor allocation, used for the reverse lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ActorKey(usize);

impl ActorKey {
    fn of(actor: &SharedActor) -> Self {
        Self(Arc::as_ptr(actor) as *const () as usize)
    }

    fn of_weak(actor: &WeakActor) -> Self {
        Self(actor.as_ptr() as *const () as usize)
    }
}

/// Bidirectional entity ↔ actor links (Bevy Resource).
///
/// Holds weak references only: an actor dropped by its owner stops
/// resolving without the registry having to be told.
#[derive(Resource, Default)]
pub struct ActorRegistry {
    by_entity: HashMap<Entity, WeakActor>,
    by_actor: HashMap<ActorKey, Entity>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `actor` to `entity`, replacing any previous link on either side.
    pub fn register(&mut self, entity: Entity, actor: &SharedActor) {
        let key = ActorKey::of(actor);
        if let Some(previous) = self.by_actor.insert(key, entity) {
            if previous != entity {
                debug!("[Bridge] actor moved from {previous} to {entity}");
                self.by_entity.remove(&previous);
            }
        }
        if let Some(old) = self.by_entity.insert(entity, Arc::downgrade(actor)) {
            let old_key = ActorKey::of_weak(&old);
            if old_key != key {
                self.by_actor.remove(&old_key);
            }
        }
    }

    /// Drop the link for `entity`. Returns whether a link existed.
    pub fn unregister(&mut self, entity: Entity) -> bool {
        match self.by_entity.remove(&entity) {
            Some(weak) => {
                self.by_actor.remove(&ActorKey::of_weak(&weak));
                true
            }
            None => false,
        }
    }

    /// The live actor linked to `entity`, if any. Every call for the same
    /// entity hands back the same allocation.
    pub fn resolve(&self, entity: Entity) -> Option<SharedActor> {
        let actor = self.by_entity.get(&entity)?.upgrade();
        if actor.is_none() {
            debug!("[Bridge] actor for {entity} has been destroyed");
        }
        actor
    }

    /// Like [`resolve`](Self::resolve), but only for actors that are still alive.
    pub fn resolve_alive(&self, entity: Entity) -> Option<SharedActor> {
        self.resolve(entity)
            .filter(|actor| super::actor::lock(actor).is_alive())
    }

    /// The entity a live actor is registered under.
    pub fn entity_of(&self, actor: &SharedActor) -> Option<Entity> {
        self.by_actor.get(&ActorKey::of(actor)).copied()
    }

    /// Linked, but the owner has dropped the actor.
    pub fn is_stale(&self, entity: Entity) -> bool {
        self.by_entity
            .get(&entity)
            .is_some_and(|weak| weak.strong_count() == 0)
    }

    pub fn is_linked(&self, entity: Entity) -> bool {
        self.by_entity.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    /// Remove links whose actor has been dropped. Returns how many went.
    pub fn prune(&mut self) -> usize {
        let dead: Vec<Entity> = self
            .by_entity
            .iter()
            .filter(|(_, weak)| weak.strong_count() == 0)
            .map(|(entity, _)| *entity)
            .collect();
        for entity in &dead {
            self.unregister(*entity);
        }
        dead.len()
    }
}
