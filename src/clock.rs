//! Clock - Time Source for Record Timestamps
//!
//! TigerStyle: All timestamps come from an injectable clock.
//!
//! The store never calls `Utc::now()` directly. Production wiring uses
//! [`SystemClock`]; tests use [`SimClock`], which only moves when told to.

use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Maximum single advance of a simulated clock (one day)
pub const SIM_TIME_ADVANCE_MS_MAX: i64 = 86_400_000;

/// Default start of a simulated clock: 2024-01-01T00:00:00Z
pub const SIM_TIME_START_MS_DEFAULT: i64 = 1_704_067_200_000;

/// Timestamp precision in fractional-second digits
pub const TIMESTAMP_SUBSEC_DIGITS: u16 = 3;

// =============================================================================
// Clock Trait
// =============================================================================

/// Source of "now" for record timestamps.
pub trait Clock: Debug + Send + Sync {
    /// Current time, truncated to millisecond precision.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(TIMESTAMP_SUBSEC_DIGITS)
    }
}

// =============================================================================
// Simulated Clock
// =============================================================================

/// A simulated clock for deterministic testing.
///
/// TigerStyle:
/// - Time only moves forward
/// - All time operations are explicit
/// - Clones share the same time, so a test can keep a handle while the
///   store owns another
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Current time in milliseconds since epoch
    current_ms: Arc<AtomicI64>,
}

impl SimClock {
    /// Create a clock starting at [`SIM_TIME_START_MS_DEFAULT`].
    #[must_use]
    pub fn new() -> Self {
        Self::at_ms(SIM_TIME_START_MS_DEFAULT)
    }

    /// Create a clock starting at the given time.
    ///
    /// # Panics
    /// Panics if `start_ms` is negative.
    #[must_use]
    pub fn at_ms(start_ms: i64) -> Self {
        assert!(start_ms >= 0, "start_ms must be non-negative, got {}", start_ms);
        Self {
            current_ms: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    /// Get current time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> i64 {
        self.current_ms.load(Ordering::SeqCst)
    }

    /// Advance time by the given milliseconds.
    ///
    /// # Panics
    /// Panics if ms is negative or exceeds [`SIM_TIME_ADVANCE_MS_MAX`].
    ///
    /// # Returns
    /// The new current time.
    pub fn advance_ms(&self, ms: i64) -> i64 {
        // Preconditions
        assert!(ms >= 0, "advance_ms({}) must be non-negative", ms);
        assert!(
            ms <= SIM_TIME_ADVANCE_MS_MAX,
            "advance_ms({}) exceeds max ({})",
            ms,
            SIM_TIME_ADVANCE_MS_MAX
        );

        let old_time = self.current_ms.fetch_add(ms, Ordering::SeqCst);
        old_time + ms
    }

    /// Set time to absolute value.
    ///
    /// # Panics
    /// Panics if new time is less than current time.
    pub fn set_ms(&self, ms: i64) {
        let current = self.now_ms();
        assert!(
            ms >= current,
            "cannot set time backwards: {} < {}",
            ms,
            current
        );
        self.current_ms.store(ms, Ordering::SeqCst);
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SimClock {
    fn now(&self) -> DateTime<Utc> {
        // at_ms rejects negatives and advance_ms only adds, so the value is
        // always representable.
        Utc.timestamp_millis_opt(self.now_ms())
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}
