use bevy::prelude::*;

use super::effect::{EffectTarget, FieldOrigin, StatusEffectRecord};
use crate::config::tuning::{EffectTuning, GuardMode};
use crate::game::actor::{self, SharedActor};

/// Result of trying to undo a record's modification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestoreOutcome {
    /// Field reset to the original value (or regeneration switched off).
    Restored,
    /// Something else wrote the field since; left as-is.
    Drifted { current: f32, expected: f32 },
    /// The record never modified the actor.
    NotModified,
    /// No live actor to restore.
    Unresolved,
}

impl RestoreOutcome {
    pub fn restored(self) -> bool {
        matches!(self, Self::Restored)
    }
}

/// Compare with `epsilon` relative to magnitude, absolute below 1.0.
pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= epsilon * scale
}

/// Decides whether a field still holds what an effect put there before
/// resetting it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestoreGuard {
    pub mode: GuardMode,
    pub epsilon: f32,
}

impl Default for RestoreGuard {
    fn default() -> Self {
        Self::from_tuning(&EffectTuning::default())
    }
}

impl RestoreGuard {
    pub fn from_tuning(tuning: &EffectTuning) -> Self {
        Self {
            mode: tuning.guard_mode,
            epsilon: tuning.restore_epsilon,
        }
    }

    /// True if `current` is still the value `record` imposed.
    pub fn still_ours(&self, record: &StatusEffectRecord, current: f32) -> bool {
        match (self.mode, record.origin) {
            (_, FieldOrigin::Unmodified) => false,
            (GuardMode::Tolerance, FieldOrigin::ModifiedBy { .. }) => {
                approx_eq(current, record.modified_value(), self.epsilon)
            }
            (GuardMode::Origin, FieldOrigin::ModifiedBy { expected }) => current == expected,
        }
    }

    /// Undo `record`'s modification on `actor` if the guard allows it.
    /// An unbound record undoes the predecessor it carries instead.
    pub fn restore(
        &self,
        entity: Entity,
        record: &StatusEffectRecord,
        actor: Option<&SharedActor>,
    ) -> RestoreOutcome {
        if !record.is_bound() {
            return match record.pending.as_deref() {
                Some(previous) => self.restore(entity, previous, actor),
                None => RestoreOutcome::NotModified,
            };
        }
        let Some(actor) = actor else {
            debug!("[Status] {entity}: no actor to restore {:?} on", record.kind);
            return RestoreOutcome::Unresolved;
        };
        let mut actor = actor::lock(actor);

        match record.kind.target() {
            Some(EffectTarget::Field(field)) => {
                let current = field.get(&*actor);
                if self.still_ours(record, current) {
                    field.set(&mut *actor, record.original_value);
                    RestoreOutcome::Restored
                } else {
                    let expected = record.modified_value();
                    warn!(
                        "[Status] {entity}: {:?} left {field:?} at {current:.3} (expected {expected:.3}), not restoring",
                        record.kind
                    );
                    RestoreOutcome::Drifted { current, expected }
                }
            }
            Some(EffectTarget::Regeneration) => match actor.health_mut() {
                Some(health) => {
                    health.set_regenerating(false);
                    RestoreOutcome::Restored
                }
                None => RestoreOutcome::NotModified,
            },
            None => RestoreOutcome::NotModified,
        }
    }
}
