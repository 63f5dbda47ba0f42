use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

// ---------------------------------------------------------------------------
// SimTime
// ---------------------------------------------------------------------------

/// Integer-nanosecond simulation clock.
///
/// Episode time and the valid-parking timer are both kept as `SimTime` so
/// that repeated fixed-step increments compare exactly against configured
/// durations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SimTime {
    nanos: u64,
}

impl SimTime {
    /// A clock at zero.
    pub const ZERO: Self = Self { nanos: 0 };

    #[must_use]
    pub const fn new() -> Self {
        Self::ZERO
    }

    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Create from seconds, rounded to the nearest nanosecond. Negative and
    /// non-finite inputs saturate to zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_secs(secs: f64) -> Self {
        Self {
            nanos: (secs * NANOS_PER_SEC).round() as u64,
        }
    }

    #[must_use]
    pub const fn nanos(&self) -> u64 {
        self.nanos
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn secs_f64(&self) -> f64 {
        self.nanos as f64 / NANOS_PER_SEC
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn secs_f32(&self) -> f32 {
        self.secs_f64() as f32
    }

    #[must_use]
    pub const fn to_duration(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }

    /// Advance the clock by `step`.
    pub const fn advance(&mut self, step: Self) {
        self.nanos = self.nanos.saturating_add(step.nanos);
    }

    pub const fn reset(&mut self) {
        self.nanos = 0;
    }

    pub const fn is_zero(&self) -> bool {
        self.nanos == 0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.nanos / 1_000_000_000;
        let millis = (self.nanos % 1_000_000_000) / 1_000_000;
        write!(f, "{total_secs}.{millis:03}s")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        assert!(SimTime::default().is_zero());
        assert_eq!(SimTime::new(), SimTime::ZERO);
    }

    #[test]
    fn from_secs_rounds_to_nanos() {
        assert_eq!(SimTime::from_secs(0.1).nanos(), 100_000_000);
        assert_eq!(SimTime::from_secs(0.02).nanos(), 20_000_000);
        assert_eq!(SimTime::from_secs(5.0).nanos(), 5_000_000_000);
    }

    #[test]
    fn from_secs_negative_saturates() {
        assert!(SimTime::from_secs(-1.0).is_zero());
    }

    #[test]
    fn repeated_steps_are_exact() {
        let step = SimTime::from_secs(0.1);
        let mut t = SimTime::new();
        for _ in 0..50 {
            t.advance(step);
        }
        assert_eq!(t, SimTime::from_secs(5.0));
        t.advance(step);
        assert!(t > SimTime::from_secs(5.0));
    }

    #[test]
    fn advance_saturates() {
        let mut t = SimTime::from_nanos(u64::MAX - 1);
        t.advance(SimTime::from_nanos(10));
        assert_eq!(t.nanos(), u64::MAX);
    }

    #[test]
    fn reset_clears() {
        let mut t = SimTime::from_secs(3.0);
        t.reset();
        assert!(t.is_zero());
    }

    #[test]
    fn secs_conversions() {
        let t = SimTime::from_nanos(2_500_000_000);
        assert!((t.secs_f64() - 2.5).abs() < f64::EPSILON);
        assert!((t.secs_f32() - 2.5).abs() < f32::EPSILON);
        assert_eq!(t.to_duration(), Duration::from_millis(2500));
    }

    #[test]
    fn display_format() {
        assert_eq!(SimTime::from_nanos(5_100_000_000).to_string(), "5.100s");
        assert_eq!(SimTime::ZERO.to_string(), "0.000s");
    }
}
