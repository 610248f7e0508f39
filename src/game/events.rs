use bevy::prelude::*;

use super::status::applicator::ApplyOutcome;
use super::status::effect::{EffectId, EffectSpec, EffectType};

/// A trigger asking the engine to impose an effect on `target`.
#[derive(Message, Debug, Clone)]
pub struct EffectRequest {
    pub target: Entity,
    /// The pickup/trap/projectile that fired, if it is an entity.
    pub source: Option<Entity>,
    pub spec: EffectSpec,
}

/// How an entity's effect slot changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectChange {
    Applied,
    Stacked,
    Refreshed,
    Replaced { previous: EffectType },
    Expired { restored: bool },
}

impl From<ApplyOutcome> for EffectChange {
    fn from(outcome: ApplyOutcome) -> Self {
        match outcome {
            ApplyOutcome::Created => Self::Applied,
            ApplyOutcome::Stacked => Self::Stacked,
            ApplyOutcome::Refreshed => Self::Refreshed,
            ApplyOutcome::Replaced { previous } => Self::Replaced { previous },
        }
    }
}

/// Emitted by the engine whenever an entity's effect slot changes.
#[derive(Message, Debug, Clone)]
pub struct EffectLifecycle {
    pub entity: Entity,
    /// Instance the change concerns; an `Applied` and its `Expired` share one.
    pub id: EffectId,
    pub effect: EffectType,
    pub change: EffectChange,
}
