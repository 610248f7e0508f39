//! Call sites that impose effects: pickups, traps and projectiles.
//!
//! Overlap tests turn into `EffectRequest` messages; the engine applies
//! them later in the same fixed step.

use bevy::prelude::*;

use super::components::*;
use super::events::EffectRequest;
use crate::config::tuning::EffectTuning;

/// Tick trap re-arm timers.
pub fn tick_trap_cooldowns(tuning: Res<EffectTuning>, mut traps: Query<&mut Trap>) {
    let dt = tuning.dt;
    for mut trap in &mut traps {
        trap.tick(dt);
    }
}

/// Integrate projectile movement and tick lifetime.
pub fn integrate_projectiles(
    tuning: Res<EffectTuning>,
    mut query: Query<(&mut Transform, &Velocity, &mut Lifetime), With<ProjectileOwner>>,
) {
    let dt = tuning.dt;
    for (mut transform, vel, mut lifetime) in &mut query {
        transform.translation.x += vel.0.x * dt;
        transform.translation.y += vel.0.y * dt;
        lifetime.0 = lifetime.0.dec(dt);
    }
}

/// Trigger–target overlap: emit one request per contact the trigger allows.
pub fn detect_trigger_overlaps(
    mut commands: Commands,
    targets: Query<(Entity, &Transform, &CollisionRadius), With<StatusTarget>>,
    mut sources: Query<(
        Entity,
        &Transform,
        &CollisionRadius,
        &EffectSource,
        Option<&mut Trap>,
        Option<&ProjectileOwner>,
        Has<Pickup>,
    )>,
    mut requests: MessageWriter<EffectRequest>,
) {
    for (src, src_tf, src_radius, effect, mut trap, owner, is_pickup) in &mut sources {
        if trap.as_ref().is_some_and(|t| !t.is_armed()) {
            continue;
        }
        let src_pos = src_tf.translation.truncate();

        for (target, target_tf, target_radius) in &targets {
            if owner.is_some_and(|o| o.0 == Some(target)) {
                continue;
            }
            let dist = src_pos.distance(target_tf.translation.truncate());
            if dist >= src_radius.0 + target_radius.0 {
                continue;
            }

            requests.write(EffectRequest {
                target,
                source: Some(src),
                spec: effect.0,
            });

            if let Some(trap) = trap.as_mut() {
                trap.fire();
                break;
            }
            if is_pickup || owner.is_some() {
                commands.entity(src).try_despawn();
                break;
            }
        }
    }
}

/// Despawn projectiles whose lifetime ran out.
pub fn cleanup_projectiles(
    mut commands: Commands,
    projectiles: Query<(Entity, &Lifetime), With<ProjectileOwner>>,
) {
    for (entity, lifetime) in &projectiles {
        if lifetime.0.is_expired() {
            commands.entity(entity).try_despawn();
        }
    }
}
