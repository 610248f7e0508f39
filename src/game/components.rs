use bevy::prelude::*;

use super::stats::types::Seconds;
use super::status::effect::EffectSpec;

// ── Marker components ───────────────────────────────────────────────

/// Entity that can carry a status effect. Despawning it drops the
/// effect record and the actor link.
#[derive(Component, Default)]
pub struct StatusTarget;

/// Single-use trigger: consumed by the first target that touches it.
#[derive(Component)]
pub struct Pickup;

// ── Shared state ────────────────────────────────────────────────────

#[derive(Component)]
pub struct CollisionRadius(pub f32);

#[derive(Component)]
pub struct Velocity(pub Vec2);

#[derive(Component)]
pub struct Lifetime(pub Seconds);

// ── Trigger state ───────────────────────────────────────────────────

/// The effect a pickup, trap or projectile imposes on contact.
#[derive(Component, Debug, Clone, Copy)]
pub struct EffectSource(pub EffectSpec);

/// Re-armable trigger: fires on contact, then stays inert for `rearm`.
#[derive(Component)]
pub struct Trap {
    pub rearm: Seconds,
    pub cooldown: Seconds,
}

impl Trap {
    pub fn new(rearm: f32) -> Self {
        Self {
            rearm: Seconds::new(rearm),
            cooldown: Seconds::default(),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.cooldown.is_expired()
    }

    pub fn fire(&mut self) {
        self.cooldown = self.rearm;
    }

    pub fn tick(&mut self, dt: f32) {
        self.cooldown = self.cooldown.dec(dt);
    }
}

/// Projectile that applies its effect to the first non-owner it hits.
#[derive(Component)]
pub struct ProjectileOwner(pub Option<Entity>);
