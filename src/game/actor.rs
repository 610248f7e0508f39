use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// Health operations an actor may expose. Actors without a health
/// subsystem return `None` from [`ActorCapability::health_mut`].
pub trait HealthCapability {
    fn is_alive(&self) -> bool;
    fn can_regenerate(&self) -> bool;
    fn set_regenerating(&mut self, enabled: bool);
    fn heal(&mut self, amount: i32);
}

/// The narrow surface a live gameplay object exposes to the effect engine.
///
/// Implemented by the movement/health owners. The engine only reads and
/// writes through these accessors and never owns the actor.
pub trait ActorCapability: Send {
    fn move_speed(&self) -> f32;
    fn set_move_speed(&mut self, v: f32);
    fn rotation_speed(&self) -> f32;
    fn set_rotation_speed(&mut self, v: f32);
    fn jump_force(&self) -> f32;
    fn set_jump_force(&mut self, v: f32);

    fn health(&self) -> Option<&dyn HealthCapability> {
        None
    }

    fn health_mut(&mut self) -> Option<&mut dyn HealthCapability> {
        None
    }

    /// Actors without health are never "dead".
    fn is_alive(&self) -> bool {
        self.health().is_none_or(|h| h.is_alive())
    }
}

/// A live actor shared between its owner and the registry.
pub type SharedActor = Arc<Mutex<dyn ActorCapability>>;

/// Wrap a concrete actor for registration.
pub fn share<A: ActorCapability + 'static>(actor: A) -> SharedActor {
    Arc::new(Mutex::new(actor))
}

/// Lock an actor, recovering the guard if a previous holder panicked.
pub fn lock(actor: &SharedActor) -> MutexGuard<'_, dyn ActorCapability + 'static> {
    actor.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Continuous numeric fields an effect can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorField {
    MoveSpeed,
    RotationSpeed,
    JumpForce,
}

impl ActorField {
    pub fn get(self, actor: &dyn ActorCapability) -> f32 {
        match self {
            Self::MoveSpeed => actor.move_speed(),
            Self::RotationSpeed => actor.rotation_speed(),
            Self::JumpForce => actor.jump_force(),
        }
    }

    pub fn set(self, actor: &mut dyn ActorCapability, v: f32) {
        match self {
            Self::MoveSpeed => actor.set_move_speed(v),
            Self::RotationSpeed => actor.set_rotation_speed(v),
            Self::JumpForce => actor.set_jump_force(v),
        }
    }
}
