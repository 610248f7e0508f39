//! Single-slot status effects bridging ECS entities and externally owned
//! gameplay actors.

pub mod config;
pub mod game;
pub mod plugins;
