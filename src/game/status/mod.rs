pub mod applicator;
pub mod clock;
pub mod effect;
pub mod guard;
pub mod removal;
pub mod store;
