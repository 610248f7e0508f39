use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use status_bridge::config::tuning::EffectTuning;
use status_bridge::game::actor::{ActorCapability, HealthCapability, SharedActor};
use status_bridge::game::bridge::ActorRegistry;
use status_bridge::game::components::*;
use status_bridge::game::events::{EffectChange, EffectLifecycle, EffectRequest};
use status_bridge::game::stats::types::Seconds;
use status_bridge::game::status::effect::{EffectId, EffectSpec, EffectType};
use status_bridge::game::status::store::StatusEffectStore;
use status_bridge::plugins::status_plugin::{StatusEffectPlugin, StatusSet};

#[derive(Debug, Clone)]
struct Pawn {
    move_speed: f32,
    rotation_speed: f32,
    jump_force: f32,
    hp: i32,
    regenerating: bool,
}

impl HealthCapability for Pawn {
    fn is_alive(&self) -> bool {
        self.hp > 0
    }
    fn can_regenerate(&self) -> bool {
        self.regenerating && self.hp < 100
    }
    fn set_regenerating(&mut self, enabled: bool) {
        self.regenerating = enabled;
    }
    fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(100);
    }
}

impl ActorCapability for Pawn {
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
        Some(self)
    }
    fn health_mut(&mut self) -> Option<&mut dyn HealthCapability> {
        Some(self)
    }
}

#[derive(Resource, Default)]
struct Seen(Vec<(Entity, EffectType, EffectChange)>, Vec<EffectId>);

fn record_lifecycle(mut events: MessageReader<EffectLifecycle>, mut seen: ResMut<Seen>) {
    for e in events.read() {
        seen.0.push((e.entity, e.effect, e.change));
        seen.1.push(e.id);
    }
}

struct Harness {
    app: App,
    pawns: Vec<Arc<Mutex<Pawn>>>,
}

impl Harness {
    fn new(dt: f32) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(EffectTuning {
            dt,
            ..Default::default()
        });
        app.add_plugins(StatusEffectPlugin);
        app.init_resource::<Seen>();
        app.add_systems(FixedUpdate, record_lifecycle.after(StatusSet::CleanupSet));
        Self {
            app,
            pawns: Vec::new(),
        }
    }

    fn spawn_pawn(&mut self, move_speed: f32, at: Vec2) -> Entity {
        let entity = self
            .app
            .world_mut()
            .spawn((
                StatusTarget,
                CollisionRadius(0.5),
                Transform::from_translation(at.extend(0.0)),
            ))
            .id();
        let pawn = Arc::new(Mutex::new(Pawn {
            move_speed,
            rotation_speed: 2.0,
            jump_force: 5.0,
            hp: 40,
            regenerating: false,
        }));
        let shared: SharedActor = pawn.clone();
        self.app
            .world_mut()
            .resource_mut::<ActorRegistry>()
            .register(entity, &shared);
        self.pawns.push(pawn);
        entity
    }

    fn pawn(&self, index: usize) -> Pawn {
        self.pawns[index].lock().unwrap().clone()
    }

    fn request(&mut self, target: Entity, spec: EffectSpec) {
        self.app.world_mut().write_message(EffectRequest {
            target,
            source: None,
            spec,
        });
    }

    fn step(&mut self) {
        self.app.world_mut().run_schedule(FixedUpdate);
    }

    fn store(&self) -> &StatusEffectStore {
        self.app.world().resource::<StatusEffectStore>()
    }

    fn seen(&self) -> &[(Entity, EffectType, EffectChange)] {
        &self.app.world().resource::<Seen>().0
    }

    fn seen_ids(&self) -> &[EffectId] {
        &self.app.world().resource::<Seen>().1
    }

    fn is_linked(&self, entity: Entity) -> bool {
        self.app.world().resource::<ActorRegistry>().is_linked(entity)
    }
}

#[test]
fn request_is_applied_and_ticked_in_the_same_step() {
    let mut h = Harness::new(1.0);
    let e = h.spawn_pawn(5.0, Vec2::ZERO);
    h.request(e, EffectSpec::new(EffectType::SpeedBoost, 10.0, 1.5));

    h.step();

    assert_eq!(h.pawn(0).move_speed, 7.5);
    assert_eq!(h.store().remaining(e), 9.0);
    assert_eq!(
        h.seen(),
        &[(e, EffectType::SpeedBoost, EffectChange::Applied)]
    );
}

#[test]
fn speed_boost_lifecycle_restores_on_expiry() {
    let mut h = Harness::new(10.0);
    let e = h.spawn_pawn(5.0, Vec2::ZERO);
    h.request(e, EffectSpec::new(EffectType::SpeedBoost, 10.0, 1.5));

    h.step();

    assert!(h.store().is_empty());
    assert!((h.pawn(0).move_speed - 5.0).abs() < 1e-4);
    assert_eq!(h.seen_ids().len(), 2);
    assert_eq!(h.seen_ids()[0], h.seen_ids()[1]);
    assert_eq!(
        h.seen().last(),
        Some(&(
            e,
            EffectType::SpeedBoost,
            EffectChange::Expired { restored: true }
        ))
    );
}

#[test]
fn stacked_requests_are_capped() {
    let mut h = Harness::new(0.5);
    let e = h.spawn_pawn(5.0, Vec2::ZERO);
    let spec = EffectSpec::new(EffectType::TurnSpeedBoost, 5.0, 2.0).stacking(12.0);
    for _ in 0..3 {
        h.request(e, spec);
    }

    h.step();

    assert_eq!(h.store().remaining(e), 11.5);
    assert_eq!(h.pawn(0).rotation_speed, 4.0);
    let stacked = h
        .seen()
        .iter()
        .filter(|(_, _, c)| *c == EffectChange::Stacked)
        .count();
    assert_eq!(stacked, 2);
}

#[test]
fn invalid_request_is_dropped() {
    let mut h = Harness::new(1.0);
    let e = h.spawn_pawn(5.0, Vec2::ZERO);
    h.request(e, EffectSpec::new(EffectType::SpeedBoost, -1.0, 2.0));
    h.request(e, EffectSpec::new(EffectType::None, 1.0, 2.0));

    h.step();

    assert!(h.store().is_empty());
    assert!(h.seen().is_empty());
    assert_eq!(h.pawn(0).move_speed, 5.0);
}

#[test]
fn pickup_is_consumed_by_first_touch() {
    let mut h = Harness::new(0.1);
    let a = h.spawn_pawn(5.0, Vec2::ZERO);
    let _b = h.spawn_pawn(5.0, Vec2::new(0.2, 0.0));
    let pickup = h
        .app
        .world_mut()
        .spawn((
            Pickup,
            EffectSource(EffectSpec::new(EffectType::Regeneration, 3.0, 1.0)),
            CollisionRadius(1.0),
            Transform::default(),
        ))
        .id();

    h.step();
    h.step();

    assert!(h.app.world().get_entity(pickup).is_err());
    assert_eq!(h.store().len(), 1);
    let holder = h.store().iter().next().map(|(e, _)| e).unwrap();
    let index = if holder == a { 0 } else { 1 };
    let pawn = h.pawn(index);
    assert!(pawn.regenerating);
    assert_eq!(pawn.hp, 42);
}

#[test]
fn trap_fires_once_per_rearm_window() {
    let mut h = Harness::new(1.0);
    let e = h.spawn_pawn(5.0, Vec2::ZERO);
    h.app.world_mut().spawn((
        Trap::new(2.5),
        EffectSource(EffectSpec::new(EffectType::Slowed, 10.0, 0.5)),
        CollisionRadius(1.0),
        Transform::default(),
    ));

    for _ in 0..4 {
        h.step();
    }

    let applied = h
        .seen()
        .iter()
        .filter(|(who, _, _)| *who == e)
        .count();
    assert_eq!(applied, 2);
    assert_eq!(h.pawn(0).move_speed, 2.5);
    assert_eq!(h.store().remaining(e), 9.0);
}

#[test]
fn projectile_skips_its_owner() {
    let mut h = Harness::new(0.1);
    let owner = h.spawn_pawn(5.0, Vec2::ZERO);
    let victim = h.spawn_pawn(5.0, Vec2::new(1.5, 0.0));
    h.app.world_mut().spawn((
        ProjectileOwner(Some(owner)),
        EffectSource(EffectSpec::new(EffectType::Immobilized, 2.0, 0.0)),
        CollisionRadius(0.2),
        Velocity(Vec2::new(5.0, 0.0)),
        Lifetime(Seconds::new(5.0)),
        Transform::default(),
    ));

    for _ in 0..3 {
        h.step();
    }

    assert!(!h.store().contains(owner));
    assert!(h.store().contains(victim));
    assert_eq!(h.pawn(0).move_speed, 5.0);
    assert_eq!(h.pawn(1).move_speed, 0.0);
}

#[test]
fn despawned_target_drops_record_and_restores_actor() {
    let mut h = Harness::new(1.0);
    let e = h.spawn_pawn(5.0, Vec2::ZERO);
    h.request(e, EffectSpec::new(EffectType::SpeedBoost, 10.0, 2.0));
    h.step();
    assert_eq!(h.pawn(0).move_speed, 10.0);

    h.app.world_mut().despawn(e);
    h.step();

    assert!(h.store().is_empty());
    assert!(!h.is_linked(e));
    assert_eq!(h.pawn(0).move_speed, 5.0);
}

#[test]
fn despawn_between_fixed_steps_is_still_cleaned_up() {
    let mut h = Harness::new(1.0);
    let e = h.spawn_pawn(5.0, Vec2::ZERO);
    h.request(e, EffectSpec::new(EffectType::SpeedBoost, 10.0, 2.0));
    h.step();

    h.app.world_mut().despawn(e);
    // Frames where the fixed clock has not accumulated a full step.
    h.app.update();
    h.app.update();
    h.app.update();

    assert!(h.store().is_empty());
    assert!(!h.is_linked(e));
    assert_eq!(h.pawn(0).move_speed, 5.0);
}

#[test]
fn removing_the_target_marker_restores_and_unlinks() {
    let mut h = Harness::new(1.0);
    let e = h.spawn_pawn(5.0, Vec2::ZERO);
    h.request(e, EffectSpec::new(EffectType::Slowed, 10.0, 0.5));
    h.step();
    assert_eq!(h.pawn(0).move_speed, 2.5);

    h.app.world_mut().entity_mut(e).remove::<StatusTarget>();

    assert!(!h.store().contains(e));
    assert!(!h.is_linked(e));
    assert_eq!(h.pawn(0).move_speed, 5.0);
}

#[test]
fn dropped_actor_degrades_to_timer_only() {
    let mut h = Harness::new(1.0);
    let e = h.spawn_pawn(5.0, Vec2::ZERO);
    h.request(e, EffectSpec::new(EffectType::JumpHeightBoost, 3.0, 2.0));
    h.step();
    assert_eq!(h.pawn(0).jump_force, 10.0);

    h.pawns.clear();
    h.step();
    assert!(!h.is_linked(e));
    assert_eq!(h.store().remaining(e), 1.0);
    h.step();
    assert!(h.store().is_empty());
}
