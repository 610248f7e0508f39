pub mod actor;
pub mod bridge;
pub mod components;
pub mod events;
pub mod stats;
pub mod status;
pub mod triggers;
