use bevy::prelude::*;
use std::sync::{Arc, Mutex};

use super::status_plugin::StatusSet;
use crate::config::tuning::EffectTuning;
use crate::game::{
    actor::{ActorCapability, HealthCapability, SharedActor},
    bridge::ActorRegistry,
    components::*,
    events::EffectLifecycle,
    stats::types::{Seconds, Tick},
    status::{effect::{EffectSpec, EffectType}, store::StatusEffectStore},
};

/// Half-width of the looping track runners move along.
const TRACK_HALF_LEN: f32 = 20.0;

// ── Actor side ──────────────────────────────────────────────────────

/// Health owned by a runner.
#[derive(Debug, Clone)]
pub struct RunnerHealth {
    pub hp: i32,
    pub max_hp: i32,
    pub regenerating: bool,
}

impl HealthCapability for RunnerHealth {
    fn is_alive(&self) -> bool {
        self.hp > 0
    }

    fn can_regenerate(&self) -> bool {
        self.regenerating && self.is_alive() && self.hp < self.max_hp
    }

    fn set_regenerating(&mut self, enabled: bool) {
        self.regenerating = enabled;
    }

    fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).clamp(0, self.max_hp);
    }
}

/// Movement/health state of a runner, owned by the arena rather than the ECS.
#[derive(Debug, Clone)]
pub struct Runner {
    pub name: String,
    pub move_speed: f32,
    pub rotation_speed: f32,
    pub jump_force: f32,
    pub health: RunnerHealth,
}

impl Runner {
    pub fn new(name: &str, move_speed: f32) -> Self {
        Self {
            name: name.into(),
            move_speed,
            rotation_speed: std::f32::consts::PI,
            jump_force: 6.0,
            health: RunnerHealth {
                hp: 60,
                max_hp: 100,
                regenerating: false,
            },
        }
    }
}

impl ActorCapability for Runner {
    fn move_speed(&self) -> f32 {
        self.move_speed
    }
    fn set_move_speed(&mut self, v: f32) {
        self.move_speed = v;
    }
    fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }
    fn set_rotation_speed(&mut self, v: f32) {
        self.rotation_speed = v;
    }
    fn jump_force(&self) -> f32 {
        self.jump_force
    }
    fn set_jump_force(&mut self, v: f32) {
        self.jump_force = v;
    }
    fn health(&self) -> Option<&dyn HealthCapability> {
        Some(&self.health)
    }
    fn health_mut(&mut self) -> Option<&mut dyn HealthCapability> {
        Some(&mut self.health)
    }
}

/// Strong owner of every runner; the registry only holds weak links.
#[derive(Resource, Default)]
pub struct RunnerRoster {
    pub runners: Vec<(Entity, Arc<Mutex<Runner>>)>,
}

/// How long the demo runs before exiting.
#[derive(Resource)]
pub struct ArenaRun {
    pub ticks_left: u64,
}

// ── Plugin ──────────────────────────────────────────────────────────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArenaMoveSet;

pub struct ArenaPlugin {
    pub seconds: f32,
}

impl Default for ArenaPlugin {
    fn default() -> Self {
        Self { seconds: 20.0 }
    }
}

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        let dt = app
            .world()
            .get_resource::<EffectTuning>()
            .map_or(EffectTuning::default().dt, |t| t.dt);
        app.insert_resource(ArenaRun {
            ticks_left: (self.seconds / dt).ceil() as u64,
        });
        app.init_resource::<RunnerRoster>();

        app.configure_sets(FixedUpdate, ArenaMoveSet.before(StatusSet::TriggerSet));
        app.add_systems(Startup, setup_arena);
        app.add_systems(FixedUpdate, move_runners.in_set(ArenaMoveSet));
        app.add_systems(
            FixedUpdate,
            (log_lifecycle, report_runners, count_down_run)
                .chain()
                .after(StatusSet::CleanupSet),
        );
    }
}

fn setup_arena(
    mut commands: Commands,
    mut registry: ResMut<ActorRegistry>,
    mut roster: ResMut<RunnerRoster>,
) {
    for (name, speed, lane) in [("swift", 6.0, 0.0), ("steady", 4.0, 3.0)] {
        let runner = Arc::new(Mutex::new(Runner::new(name, speed)));
        let entity = commands
            .spawn((
                StatusTarget,
                CollisionRadius(0.5),
                Transform::from_translation(Vec3::new(-TRACK_HALF_LEN, lane, 0.0)),
            ))
            .id();
        let shared: SharedActor = runner.clone();
        registry.register(entity, &shared);
        roster.runners.push((entity, runner));
        info!("[Arena] {name} spawned as {entity}");
    }

    // Lane 0: a stackable speed pickup, then a slowing trap.
    commands.spawn((
        Pickup,
        EffectSource(EffectSpec::new(EffectType::SpeedBoost, 4.0, 1.5).stacking(8.0)),
        CollisionRadius(0.8),
        Transform::from_translation(Vec3::new(-12.0, 0.0, 0.0)),
    ));
    commands.spawn((
        Trap::new(3.0),
        EffectSource(EffectSpec::new(EffectType::Slowed, 2.0, 0.5)),
        CollisionRadius(0.8),
        Transform::from_translation(Vec3::new(8.0, 0.0, 0.0)),
    ));

    // Lane 3: regeneration, a bounce pad and a slippery patch.
    commands.spawn((
        Pickup,
        EffectSource(EffectSpec::new(EffectType::Regeneration, 5.0, 1.0)),
        CollisionRadius(0.8),
        Transform::from_translation(Vec3::new(-15.0, 3.0, 0.0)),
    ));
    commands.spawn((
        Trap::new(1.0),
        EffectSource(EffectSpec::new(EffectType::Bounced, 1.0, 2.0)),
        CollisionRadius(0.6),
        Transform::from_translation(Vec3::new(0.0, 3.0, 0.0)),
    ));
    commands.spawn((
        Trap::new(2.0),
        EffectSource(EffectSpec::new(EffectType::Slipping, 1.5, 0.25)),
        CollisionRadius(1.0),
        Transform::from_translation(Vec3::new(10.0, 3.0, 0.0)),
    ));

    // A bolt crossing lane 0 that pins whoever it hits.
    commands.spawn((
        ProjectileOwner(None),
        EffectSource(EffectSpec::new(EffectType::Immobilized, 1.0, 0.0)),
        CollisionRadius(0.3),
        Velocity(Vec2::new(0.0, -4.0)),
        Lifetime(Seconds::new(6.0)),
        Transform::from_translation(Vec3::new(2.0, 10.0, 0.0)),
    ));
}

/// Move each runner along its lane at the speed its actor reports.
fn move_runners(
    tuning: Res<EffectTuning>,
    roster: Res<RunnerRoster>,
    mut query: Query<&mut Transform, With<StatusTarget>>,
) {
    let dt = tuning.dt;
    for (entity, runner) in &roster.runners {
        let Ok(mut transform) = query.get_mut(*entity) else {
            continue;
        };
        let speed = runner.lock().map_or(0.0, |r| r.move_speed);
        transform.translation.x += speed * dt;
        if transform.translation.x > TRACK_HALF_LEN {
            transform.translation.x -= 2.0 * TRACK_HALF_LEN;
        }
    }
}

fn log_lifecycle(mut events: MessageReader<EffectLifecycle>) {
    for event in events.read() {
        info!("[Arena] {} {:?}: {:?}", event.entity, event.effect, event.change);
    }
}

fn report_runners(
    roster: Res<RunnerRoster>,
    store: Res<StatusEffectStore>,
    mut tick: Local<Tick>,
) {
    *tick = tick.next();
    if !tick.every(60) {
        return;
    }
    for (entity, runner) in &roster.runners {
        let Ok(r) = runner.lock() else { continue };
        info!(
            "[Arena] {} speed={:.2} turn={:.2} jump={:.2} hp={} effect={:?} ({:.2}s)",
            r.name,
            r.move_speed,
            r.rotation_speed,
            r.jump_force,
            r.health.hp,
            store.kind_of(*entity),
            store.remaining(*entity),
        );
    }
}

fn count_down_run(mut run: ResMut<ArenaRun>, mut exit: MessageWriter<AppExit>) {
    run.ticks_left = run.ticks_left.saturating_sub(1);
    if run.ticks_left == 0 {
        info!("[Arena] run finished");
        exit.write(AppExit::Success);
    }
}
