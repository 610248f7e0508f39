use bevy::prelude::*;

use crate::config::tuning::EffectTuning;
use crate::game::{
    bridge::ActorRegistry,
    components::StatusTarget,
    events::{EffectChange, EffectLifecycle, EffectRequest},
    stats::types::Tick,
    status::{
        applicator, clock, guard::RestoreGuard, removal::DeferredRemovals,
        store::StatusEffectStore,
    },
    triggers,
};

// ── SystemSets (strict FixedUpdate ordering) ────────────────────────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusSet {
    /// Pickups, traps and projectiles detect contact and emit requests.
    TriggerSet,
    /// Requests are applied to the store and actors.
    ApplySet,
    /// Every active effect advances one step.
    ClockSet,
    CleanupSet,
}

pub struct StatusEffectPlugin;

impl Plugin for StatusEffectPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EffectTuning>();
        app.init_resource::<ActorRegistry>();
        app.init_resource::<StatusEffectStore>();
        app.init_resource::<DeferredRemovals>();
        app.add_message::<EffectRequest>();
        app.add_message::<EffectLifecycle>();

        app.configure_sets(
            FixedUpdate,
            (
                StatusSet::TriggerSet,
                StatusSet::ApplySet,
                StatusSet::ClockSet,
                StatusSet::CleanupSet,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                triggers::tick_trap_cooldowns,
                triggers::integrate_projectiles,
                triggers::detect_trigger_overlaps,
            )
                .chain()
                .in_set(StatusSet::TriggerSet),
        );

        app.add_systems(
            FixedUpdate,
            apply_effect_requests.in_set(StatusSet::ApplySet),
        );

        app.add_systems(
            FixedUpdate,
            tick_status_effects.in_set(StatusSet::ClockSet),
        );

        app.add_systems(
            FixedUpdate,
            (triggers::cleanup_projectiles, prune_registry)
                .chain()
                .in_set(StatusSet::CleanupSet),
        );

        app.add_observer(forget_removed_target);
    }
}

/// ApplySet: run the stacking policy for every request written this step.
pub fn apply_effect_requests(
    tuning: Res<EffectTuning>,
    registry: Res<ActorRegistry>,
    mut store: ResMut<StatusEffectStore>,
    mut requests: MessageReader<EffectRequest>,
    mut lifecycle: MessageWriter<EffectLifecycle>,
) {
    let guard = RestoreGuard::from_tuning(&tuning);
    for request in requests.read() {
        // Rejections are logged by the applicator; nothing else to do.
        if let Ok(report) =
            applicator::apply(&mut store, &registry, &guard, request.target, &request.spec)
        {
            lifecycle.write(EffectLifecycle {
                entity: request.target,
                id: report.id,
                effect: request.spec.kind,
                change: report.outcome.into(),
            });
        }
    }
}

/// ClockSet: advance durations, run per-tick behaviour, retire expired effects.
pub fn tick_status_effects(
    tuning: Res<EffectTuning>,
    mut registry: ResMut<ActorRegistry>,
    mut store: ResMut<StatusEffectStore>,
    mut removals: ResMut<DeferredRemovals>,
    mut lifecycle: MessageWriter<EffectLifecycle>,
) {
    let report = clock::tick(&mut store, &registry, &mut removals, &tuning, tuning.dt);
    for entity in &report.stale {
        registry.unregister(*entity);
        debug!("[Bridge] unlinked {entity}, its actor was dropped");
    }
    for expired in report.expired {
        lifecycle.write(EffectLifecycle {
            entity: expired.entity,
            id: expired.id,
            effect: expired.kind,
            change: EffectChange::Expired {
                restored: expired.restore.restored(),
            },
        });
    }
}

/// Observer: an entity that stops being a target (despawned or the marker
/// removed) loses its record and its actor link. Runs at removal time, so
/// it does not depend on `FixedUpdate` running that frame. The actor may
/// outlive the entity, so its field is restored first.
pub fn forget_removed_target(
    remove: On<Remove, StatusTarget>,
    tuning: Res<EffectTuning>,
    mut registry: ResMut<ActorRegistry>,
    mut store: ResMut<StatusEffectStore>,
) {
    let entity = remove.entity;
    let guard = RestoreGuard::from_tuning(&tuning);
    if let Some(record) = store.remove(entity) {
        let actor = registry.resolve_alive(entity);
        guard.restore(entity, &record, actor.as_ref());
        debug!("[Status] {entity} left with {:?} active", record.kind);
    }
    registry.unregister(entity);
}

/// CleanupSet: periodically drop links to actors their owners destroyed.
pub fn prune_registry(
    tuning: Res<EffectTuning>,
    mut registry: ResMut<ActorRegistry>,
    mut tick: Local<Tick>,
) {
    *tick = tick.next();
    if tick.every(tuning.prune_interval_ticks) {
        let pruned = registry.prune();
        if pruned > 0 {
            debug!("[Bridge] pruned {pruned} dead actor links");
        }
    }
}
