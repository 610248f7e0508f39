//! Stack / refresh / replace decision made whenever a trigger imposes an effect.

use bevy::prelude::*;
use thiserror::Error;

use super::effect::{EffectId, EffectSpec, EffectTarget, EffectType, StatusEffectRecord};
use super::guard::{RestoreGuard, RestoreOutcome};
use super::store::StatusEffectStore;
use crate::game::actor::{self, SharedActor};
use crate::game::bridge::ActorRegistry;

/// Parameters rejected at the `apply` boundary. Nothing is stored or
/// mutated when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ApplyError {
    #[error("effect type None cannot be applied")]
    UnknownEffect,
    #[error("duration must be finite and > 0, got {0}")]
    InvalidDuration(f32),
    #[error("strength must be finite and >= 0, got {0}")]
    InvalidStrength(f32),
    #[error("max stack duration must be finite and > 0, got {0}")]
    InvalidStackCap(f32),
}

/// Which branch of the policy an application took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    Stacked,
    Refreshed,
    Replaced { previous: EffectType },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyReport {
    pub outcome: ApplyOutcome,
    /// Instance now occupying the slot.
    pub id: EffectId,
    /// Whether the record now has a live actor modification behind it.
    pub bound: bool,
    /// Result of undoing the previous record on refresh/replace.
    pub restore: Option<RestoreOutcome>,
}

pub fn validate(spec: &EffectSpec) -> Result<(), ApplyError> {
    if spec.kind == EffectType::None {
        return Err(ApplyError::UnknownEffect);
    }
    if !(spec.duration.is_finite() && spec.duration > 0.0) {
        return Err(ApplyError::InvalidDuration(spec.duration));
    }
    if !(spec.strength.is_finite() && spec.strength >= 0.0) {
        return Err(ApplyError::InvalidStrength(spec.strength));
    }
    if spec.stackable && !(spec.max_stack_duration.is_finite() && spec.max_stack_duration > 0.0)
    {
        return Err(ApplyError::InvalidStackCap(spec.max_stack_duration));
    }
    Ok(())
}

/// Impose `spec` on `entity`.
///
/// The entity does not need a live actor: without one the record is still
/// stored and counts down, and the modification is bound later by the
/// clock if an actor appears.
pub fn apply(
    store: &mut StatusEffectStore,
    registry: &ActorRegistry,
    guard: &RestoreGuard,
    entity: Entity,
    spec: &EffectSpec,
) -> Result<ApplyReport, ApplyError> {
    if let Err(e) = validate(spec) {
        warn!("[Status] rejected {:?} on {entity}: {e}", spec.kind);
        return Err(e);
    }

    let actor = registry.resolve_alive(entity);
    if actor.is_none() {
        debug!("[Status] {entity} has no live actor, {:?} will only tick", spec.kind);
    }

    let report = match store.get_mut(entity) {
        None => {
            let record = begin(entity, spec, actor.as_ref(), guard);
            let report = ApplyReport {
                outcome: ApplyOutcome::Created,
                id: record.id,
                bound: record.is_bound(),
                restore: None,
            };
            store.insert(entity, record);
            report
        }
        Some(existing) if existing.kind == spec.kind && spec.stackable => {
            existing.remaining = existing
                .remaining
                .extend_capped(spec.duration, spec.max_stack_duration);
            // Already modified: keep the first snapshot so boosts never compound.
            if !existing.is_bound() {
                if let Some(actor) = actor.as_ref() {
                    bind(entity, existing, actor, guard);
                }
            }
            ApplyReport {
                outcome: ApplyOutcome::Stacked,
                id: existing.id,
                bound: existing.is_bound(),
                restore: None,
            }
        }
        Some(existing) => {
            let previous = existing.kind;
            let restore = guard.restore(entity, existing, actor.as_ref());
            // An unreachable actor still holds the old modification; the new
            // record undoes it before taking its own snapshot.
            let carried = match restore {
                RestoreOutcome::Unresolved => existing.outstanding(),
                _ => None,
            };
            let mut record = begin(entity, spec, actor.as_ref(), guard);
            record.pending = carried;
            *existing = record;
            let outcome = if previous == spec.kind {
                ApplyOutcome::Refreshed
            } else {
                ApplyOutcome::Replaced { previous }
            };
            ApplyReport {
                outcome,
                id: existing.id,
                bound: existing.is_bound(),
                restore: Some(restore),
            }
        }
    };

    debug!(
        "[Status] {entity}: {:?} {:?} ({:.2}s, x{:.2})",
        spec.kind, report.outcome, spec.duration, spec.strength
    );
    Ok(report)
}

fn begin(
    entity: Entity,
    spec: &EffectSpec,
    actor: Option<&SharedActor>,
    guard: &RestoreGuard,
) -> StatusEffectRecord {
    let mut record = StatusEffectRecord::new(spec.kind, spec.duration, spec.strength);
    if let Some(actor) = actor {
        if !bind(entity, &mut record, actor, guard) {
            warn!("[Status] {entity} has no health, {:?} will not heal", spec.kind);
        }
    }
    record
}

/// Snapshot the owned field and impose the record's modification.
/// Leaves the record unbound if the actor cannot take this effect.
pub(crate) fn bind(
    entity: Entity,
    record: &mut StatusEffectRecord,
    actor: &SharedActor,
    guard: &RestoreGuard,
) -> bool {
    if let Some(previous) = record.pending.take() {
        guard.restore(entity, &previous, Some(actor));
    }
    let mut actor = actor::lock(actor);
    match record.kind.target() {
        Some(EffectTarget::Field(field)) => {
            record.original_value = field.get(&*actor);
            let value = record.modified_value();
            field.set(&mut *actor, value);
            record.mark_written(value);
            true
        }
        Some(EffectTarget::Regeneration) => match actor.health_mut() {
            Some(health) => {
                health.set_regenerating(true);
                record.mark_written(1.0);
                true
            }
            None => false,
        },
        None => false,
    }
}
