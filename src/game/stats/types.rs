use serde::{Deserialize, Serialize};

// ── Newtypes ────────────────────────────────────────────────────────

/// Duration in seconds. Always >= 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Seconds(pub f32);

impl Seconds {
    pub fn new(v: f32) -> Self {
        Self(v.max(0.0))
    }

    /// Decrement by dt, clamped to 0.
    pub fn dec(self, dt: f32) -> Self {
        Self((self.0 - dt).max(0.0))
    }

    /// Extend by `extra`, never past `cap`.
    pub fn extend_capped(self, extra: f32, cap: f32) -> Self {
        Self::new((self.0 + extra).min(cap))
    }

    pub fn is_expired(self) -> bool {
        self.0 <= 0.0
    }
}

/// Discrete tick counter (u64, wrapping is not expected in practice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Tick(pub u64);

impl Tick {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// True every `interval` ticks. An interval of 0 never fires.
    pub fn every(self, interval: u64) -> bool {
        interval != 0 && self.0 % interval == 0
    }
}
