use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::actor::ActorField;
use crate::game::stats::types::Seconds;

/// Kind of temporary modifier. At most one is active per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EffectType {
    #[default]
    None,
    SpeedBoost,
    TurnSpeedBoost,
    JumpHeightBoost,
    Regeneration,
    Slowed,
    Bounced,
    Slipping,
    Immobilized,
}

/// What an effect type writes to on the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    Field(ActorField),
    Regeneration,
}

impl EffectType {
    pub fn target(self) -> Option<EffectTarget> {
        use ActorField::*;
        match self {
            Self::None => None,
            Self::SpeedBoost | Self::Slowed | Self::Immobilized => {
                Some(EffectTarget::Field(MoveSpeed))
            }
            Self::TurnSpeedBoost | Self::Slipping => Some(EffectTarget::Field(RotationSpeed)),
            Self::JumpHeightBoost | Self::Bounced => Some(EffectTarget::Field(JumpForce)),
            Self::Regeneration => Some(EffectTarget::Regeneration),
        }
    }

    pub fn field(self) -> Option<ActorField> {
        match self.target() {
            Some(EffectTarget::Field(field)) => Some(field),
            _ => None,
        }
    }

    /// Multiplier actually applied to the owned field.
    pub fn effective_strength(self, strength: f32) -> f32 {
        match self {
            Self::Immobilized => 0.0,
            _ => strength,
        }
    }
}

/// Parameters a trigger (pickup, trap, projectile) supplies per application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub kind: EffectType,
    pub duration: f32,
    pub strength: f32,
    /// Same-type reapplication extends duration instead of refreshing.
    pub stackable: bool,
    /// Upper bound on stacked duration; only read when `stackable`.
    pub max_stack_duration: f32,
}

impl EffectSpec {
    pub fn new(kind: EffectType, duration: f32, strength: f32) -> Self {
        Self {
            kind,
            duration,
            strength,
            stackable: false,
            max_stack_duration: duration,
        }
    }

    pub fn stacking(mut self, max_stack_duration: f32) -> Self {
        self.stackable = true;
        self.max_stack_duration = max_stack_duration;
        self
    }
}

/// Identity of one application of an effect; a refresh or replace mints a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(pub Uuid);

impl EffectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether this record wrote the owned field, and what it wrote last.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FieldOrigin {
    /// The engine never touched the actor for this record (it was unresolved).
    #[default]
    Unmodified,
    /// The engine last wrote `expected`. For regeneration `expected` is
    /// unused and only marks that the flag was switched on.
    ModifiedBy { expected: f32 },
}

/// The single active effect on an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffectRecord {
    pub id: EffectId,
    pub kind: EffectType,
    pub remaining: Seconds,
    pub strength: f32,
    /// Field value captured before this effect first modified it.
    pub original_value: f32,
    pub origin: FieldOrigin,
    /// A predecessor's modification that could not be undone because its
    /// actor was unreachable. Only unbound records carry one; binding
    /// undoes it first.
    pub pending: Option<Box<StatusEffectRecord>>,
}

impl StatusEffectRecord {
    pub fn new(kind: EffectType, duration: f32, strength: f32) -> Self {
        Self {
            id: EffectId::new(),
            kind,
            remaining: Seconds::new(duration),
            strength,
            original_value: 0.0,
            origin: FieldOrigin::Unmodified,
            pending: None,
        }
    }

    /// Value the owned field should hold while this effect is active.
    pub fn modified_value(&self) -> f32 {
        self.original_value * self.kind.effective_strength(self.strength)
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.origin, FieldOrigin::ModifiedBy { .. })
    }

    pub fn mark_written(&mut self, expected: f32) {
        self.origin = FieldOrigin::ModifiedBy { expected };
    }

    /// The modification still standing on the actor once this record is
    /// dropped without being undone.
    pub fn outstanding(&self) -> Option<Box<StatusEffectRecord>> {
        if self.is_bound() {
            Some(Box::new(Self {
                pending: None,
                ..self.clone()
            }))
        } else {
            self.pending.clone()
        }
    }
}
