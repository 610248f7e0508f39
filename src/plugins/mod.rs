pub mod arena_plugin;
pub mod status_plugin;
