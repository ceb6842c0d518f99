//! Earnings accrual for approved deposits
//!
//! Accrual starts at the approval instant and counts whole 24-hour days, capped
//! at the plan duration. A day is exactly 86,400 seconds; calendar and DST
//! boundaries are ignored.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in one accrual day
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Point-in-time view of a plan's accrued earnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualSnapshot {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub days_elapsed: i64,
    pub accrued_earnings: i64,
}

impl AccrualSnapshot {
    /// True when the snapshot was taken before the approval instant.
    ///
    /// Elapsed time is not clamped at zero, so such a snapshot carries
    /// negative days and earnings.
    pub fn is_before_start(&self) -> bool {
        self.days_elapsed < 0
    }

    /// True once every day of the plan has accrued
    pub fn is_complete(&self) -> bool {
        let duration_days = (self.end_date - self.start_date).num_milliseconds() / MILLIS_PER_DAY;
        self.days_elapsed >= duration_days
    }
}

/// Compute accrued earnings as of the current wall-clock time
pub fn compute_accrued_earnings(
    approved_at: DateTime<Utc>,
    duration_days: i64,
    daily_profit: i64,
) -> AccrualSnapshot {
    compute_accrued_earnings_at(approved_at, duration_days, daily_profit, Utc::now())
}

/// Compute accrued earnings as of `now`
///
/// Elapsed time is `min(now - start, end - start)`, floored to whole days and
/// capped at `duration_days`. When `now` precedes `approved_at` the floor runs
/// toward negative infinity and the negative result is returned unchanged.
pub fn compute_accrued_earnings_at(
    approved_at: DateTime<Utc>,
    duration_days: i64,
    daily_profit: i64,
    now: DateTime<Utc>,
) -> AccrualSnapshot {
    let span_ms = duration_days.saturating_mul(MILLIS_PER_DAY);
    let end_date = Duration::try_milliseconds(span_ms)
        .and_then(|span| approved_at.checked_add_signed(span))
        .unwrap_or(if span_ms < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });

    let since_start_ms = now
        .timestamp_millis()
        .saturating_sub(approved_at.timestamp_millis());
    let elapsed_ms = since_start_ms.min(span_ms);

    let days_elapsed = elapsed_ms.div_euclid(MILLIS_PER_DAY).min(duration_days);

    AccrualSnapshot {
        start_date: approved_at,
        end_date,
        days_elapsed,
        accrued_earnings: days_elapsed.saturating_mul(daily_profit),
    }
}

/// Convert a nanosecond approval timestamp to millisecond precision.
///
/// Returns `None` when the value is outside the representable range.
pub fn approval_instant_from_nanos(timestamp_nanos: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(timestamp_nanos / NANOS_PER_MILLI)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(0).unwrap()
    }

    fn days(d: f64) -> Duration {
        Duration::milliseconds((d * MILLIS_PER_DAY as f64) as i64)
    }

    #[test]
    fn test_no_time_elapsed() {
        let snapshot = compute_accrued_earnings_at(epoch(), 10, 5, epoch());
        assert_eq!(snapshot.days_elapsed, 0);
        assert_eq!(snapshot.accrued_earnings, 0);
        assert_eq!(snapshot.start_date, epoch());
        assert_eq!(snapshot.end_date, epoch() + Duration::days(10));
    }

    #[test]
    fn test_partial_days_are_not_counted() {
        let snapshot = compute_accrued_earnings_at(epoch(), 10, 5, epoch() + days(3.5));
        assert_eq!(snapshot.days_elapsed, 3);
        assert_eq!(snapshot.accrued_earnings, 15);
        assert!(!snapshot.is_complete());
    }

    #[test]
    fn test_capped_at_plan_duration() {
        let snapshot = compute_accrued_earnings_at(epoch(), 10, 5, epoch() + days(15.0));
        assert_eq!(snapshot.days_elapsed, 10);
        assert_eq!(snapshot.accrued_earnings, 50);
        assert!(snapshot.is_complete());
    }

    #[test]
    fn test_zero_duration_plan() {
        let now = epoch() + days(42.0);
        let snapshot = compute_accrued_earnings_at(epoch(), 0, 7, now);
        assert_eq!(snapshot.end_date, snapshot.start_date);
        assert_eq!(snapshot.days_elapsed, 0);
        assert_eq!(snapshot.accrued_earnings, 0);
    }

    #[test]
    fn test_one_millisecond_short_of_a_day() {
        let now = epoch() + Duration::milliseconds(MILLIS_PER_DAY - 1);
        let snapshot = compute_accrued_earnings_at(epoch(), 30, 100, now);
        assert_eq!(snapshot.days_elapsed, 0);

        let now = epoch() + Duration::milliseconds(MILLIS_PER_DAY);
        let snapshot = compute_accrued_earnings_at(epoch(), 30, 100, now);
        assert_eq!(snapshot.days_elapsed, 1);
        assert_eq!(snapshot.accrued_earnings, 100);
    }

    #[test]
    fn test_before_start_goes_negative() {
        let start = epoch() + Duration::days(5);
        let now = start - Duration::hours(1);
        let snapshot = compute_accrued_earnings_at(start, 10, 5, now);

        assert!(snapshot.is_before_start());
        assert_eq!(snapshot.days_elapsed, -1);
        assert_eq!(snapshot.accrued_earnings, -5);
    }

    #[test]
    fn test_huge_values_saturate() {
        let snapshot = compute_accrued_earnings_at(epoch(), i64::MAX, i64::MAX, epoch() + days(2.0));
        assert_eq!(snapshot.days_elapsed, 2);
        assert_eq!(snapshot.accrued_earnings, i64::MAX);
        assert_eq!(snapshot.end_date, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_approval_instant_from_nanos() {
        let nanos = 1_700_000_000_123_456_789i64;
        let instant = approval_instant_from_nanos(nanos).unwrap();
        assert_eq!(instant.timestamp_millis(), 1_700_000_000_123);

        assert_eq!(approval_instant_from_nanos(0), Some(epoch()));
    }

    #[test]
    fn test_wall_clock_variant_uses_now() {
        let approved_at = Utc::now() - Duration::days(2) - Duration::hours(1);
        let snapshot = compute_accrued_earnings(approved_at, 30, 10);
        assert_eq!(snapshot.days_elapsed, 2);
        assert_eq!(snapshot.accrued_earnings, 20);
    }
}
