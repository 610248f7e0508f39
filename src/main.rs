use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use status_bridge::config::tuning::EffectTuning;
use status_bridge::plugins::{arena_plugin::ArenaPlugin, status_plugin::StatusEffectPlugin};

fn main() {
    let tuning = EffectTuning::load_or_default();
    let step = Duration::from_secs_f64(tuning.dt as f64);

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(step)))
        .add_plugins(LogPlugin::default())
        .insert_resource(Time::<Fixed>::from_seconds(tuning.dt as f64))
        .insert_resource(tuning)
        .add_plugins(StatusEffectPlugin)
        .add_plugins(ArenaPlugin::default())
        .run();
}
