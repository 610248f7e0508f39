//! Per-tick advance of every active effect.
//!
//! Each entity is either without an effect or has one active. `apply`
//! creates the active state; this module keeps it ticking and ends it on
//! expiry. Removals are queued during iteration and drained afterwards, so
//! no entity is skipped or perturbed by a neighbour's expiry.

use bevy::prelude::*;

use super::applicator;
use super::effect::{EffectId, EffectTarget, EffectType};
use super::guard::{RestoreGuard, RestoreOutcome};
use super::removal::DeferredRemovals;
use super::store::StatusEffectStore;
use crate::config::tuning::EffectTuning;
use crate::game::actor;
use crate::game::bridge::ActorRegistry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expired {
    pub entity: Entity,
    pub id: EffectId,
    pub kind: EffectType,
    pub restore: RestoreOutcome,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub expired: Vec<Expired>,
    /// Entities whose record was actually dropped from the store.
    pub removed: Vec<Entity>,
    /// Records bound to an actor that only became resolvable this tick.
    pub late_bound: Vec<Entity>,
    /// Active records with no live actor this tick.
    pub unresolved: usize,
    /// Entities whose linked actor was dropped by its owner. The caller
    /// holds the registry mutably and unlinks them.
    pub stale: Vec<Entity>,
    pub healed: usize,
}

/// Advance every active effect by `dt` seconds.
pub fn tick(
    store: &mut StatusEffectStore,
    registry: &ActorRegistry,
    removals: &mut DeferredRemovals,
    tuning: &EffectTuning,
    dt: f32,
) -> TickReport {
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        warn!("[Status] ignoring invalid dt={dt}");
        0.0
    };
    let guard = RestoreGuard::from_tuning(tuning);
    let mut report = TickReport::default();

    for (entity, record) in store.iter_mut() {
        record.remaining = record.remaining.dec(dt);
        let actor = registry.resolve_alive(entity);
        if actor.is_none() && registry.is_stale(entity) {
            report.stale.push(entity);
        }

        if record.remaining.is_expired() {
            let restore = guard.restore(entity, record, actor.as_ref());
            removals.enqueue(entity);
            report.expired.push(Expired {
                entity,
                id: record.id,
                kind: record.kind,
                restore,
            });
            continue;
        }

        let Some(actor) = actor else {
            report.unresolved += 1;
            debug!("[Status] {entity}: {:?} ticking without an actor", record.kind);
            continue;
        };

        if !record.is_bound() {
            if !applicator::bind(entity, record, &actor, &guard) {
                continue;
            }
            debug!("[Status] {entity}: {:?} bound late", record.kind);
            report.late_bound.push(entity);
        }

        let mut actor = actor::lock(&actor);
        match record.kind.target() {
            Some(EffectTarget::Field(field)) => {
                let value = record.modified_value();
                field.set(&mut *actor, value);
                record.mark_written(value);
            }
            Some(EffectTarget::Regeneration) => {
                if let Some(health) = actor.health_mut() {
                    if health.can_regenerate() {
                        health.heal(tuning.regen_heal_per_tick);
                        report.healed += 1;
                    }
                }
            }
            None => {}
        }
    }

    report.removed = removals.drain(store);
    for expired in &report.expired {
        debug!(
            "[Status] {}: {:?} expired ({:?})",
            expired.entity, expired.kind, expired.restore
        );
    }
    report
}
