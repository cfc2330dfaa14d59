use crate::error::{StagegateError, StagegateResult};

/// Milliseconds of wall-clock time, as delivered by the host.
///
/// The engine never reads a system clock; every entry point takes an explicit
/// `now` so transitions are deterministic under test.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Elapsed time since `earlier`, saturating to zero if the host hands us
    /// out-of-order timestamps.
    pub fn since(self, earlier: Millis) -> Millis {
        Millis(self.0.saturating_sub(earlier.0))
    }

    pub fn add(self, delta: Millis) -> Millis {
        Millis(self.0.saturating_add(delta.0))
    }

    /// Wrap into `[0, period)` for loop-position arithmetic.
    ///
    /// Errors on a zero period rather than panicking on division.
    pub fn rem(self, period: Millis) -> StagegateResult<Millis> {
        if period.0 == 0 {
            return Err(StagegateError::validation("period must be non-zero"));
        }
        Ok(Millis(self.0 % period.0))
    }

    /// Fractional progress of `self` through `duration`, clamped to `[0, 1]`.
    ///
    /// A zero duration snaps to 1.0 (the transition is already complete).
    pub fn progress(self, duration: Millis) -> f64 {
        if duration.0 == 0 {
            return 1.0;
        }
        (self.0 as f64 / duration.0 as f64).clamp(0.0, 1.0)
    }
}
