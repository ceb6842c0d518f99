//! Behavioural properties of the earnings accrual calculator

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

use planvest_server::earnings::{compute_accrued_earnings_at, MILLIS_PER_DAY};

fn instant(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap()
}

#[test]
fn test_accrual_properties_hold_across_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..2_000 {
        let start = instant(rng.gen_range(1_600_000_000_000i64..1_900_000_000_000));
        let duration_days = rng.gen_range(0i64..400);
        let daily_profit = rng.gen_range(0i64..100_000);
        let offset_ms = rng.gen_range(0i64..500 * MILLIS_PER_DAY);
        let now = start + Duration::milliseconds(offset_ms);

        let s = compute_accrued_earnings_at(start, duration_days, daily_profit, now);

        assert!(s.days_elapsed >= 0);
        assert!(s.days_elapsed <= duration_days);
        assert_eq!(s.accrued_earnings, s.days_elapsed * daily_profit);
        assert_eq!(s.start_date, start);
        assert_eq!(s.end_date - s.start_date, Duration::days(duration_days));
        assert_eq!(
            s.days_elapsed,
            (offset_ms / MILLIS_PER_DAY).min(duration_days)
        );
    }
}

#[test]
fn test_accrual_is_monotonic_in_time() {
    let start = instant(1_700_000_000_000);
    let mut previous = compute_accrued_earnings_at(start, 30, 75, start);

    for hour in 1..=(40 * 24) {
        let now = start + Duration::hours(hour);
        let current = compute_accrued_earnings_at(start, 30, 75, now);

        assert!(current.days_elapsed >= previous.days_elapsed);
        assert!(current.accrued_earnings >= previous.accrued_earnings);
        previous = current;
    }

    assert_eq!(previous.days_elapsed, 30);
    assert_eq!(previous.accrued_earnings, 30 * 75);
}

#[test]
fn test_day_boundary_is_exact() {
    let start = instant(1_700_000_000_000);

    let before = compute_accrued_earnings_at(start, 10, 5, start + Duration::milliseconds(2 * MILLIS_PER_DAY - 1));
    let at = compute_accrued_earnings_at(start, 10, 5, start + Duration::milliseconds(2 * MILLIS_PER_DAY));

    assert_eq!(before.days_elapsed, 1);
    assert_eq!(at.days_elapsed, 2);
    assert_eq!(at.accrued_earnings, 10);
}

#[test]
fn test_snapshot_serializes_for_clients() {
    let start = instant(0);
    let snapshot = compute_accrued_earnings_at(start, 3, 40, start + Duration::days(2));
    let json = serde_json::to_value(snapshot).unwrap();

    assert_eq!(json["days_elapsed"], 2);
    assert_eq!(json["accrued_earnings"], 80);
    assert_eq!(json["start_date"], "1970-01-01T00:00:00Z");
    assert_eq!(json["end_date"], "1970-01-04T00:00:00Z");
}
