//! Period bucketing
//!
//! Builds the ordered bucket skeleton for a period and maps an order timestamp
//! onto its slot in that skeleton. All calendar arithmetic happens in the time
//! zone of `now`.

use chrono::{DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::domain::value_objects::{BucketKey, Period};

/// Ordered bucket keys for `period` as seen from `now`, oldest first.
pub fn build_buckets(period: Period, now: &DateTime<Tz>) -> Vec<BucketKey> {
    match period {
        Period::Yearly => (1..=12)
            .filter_map(|month| NaiveDate::from_ymd_opt(now.year(), month, 1))
            .map(|d| BucketKey::new(d.format("%b").to_string()))
            .collect(),
        Period::Monthly => (1..=days_in_month(now.year(), now.month()))
            .map(|day| BucketKey::new(day.to_string()))
            .collect(),
        Period::Weekly => trailing_days(now.date_naive(), 7)
            .map(|d| BucketKey::new(d.format("%a").to_string()))
            .collect(),
        Period::Daily => {
            let first = first_hour(now);
            let mut keys: Vec<BucketKey> = Vec::with_capacity(24);
            for i in 0..24 {
                let hour = first + Duration::hours(i);
                let mut label = hour.format("%H:00").to_string();
                // Clocks going back repeat a wall hour; the repeat carries its offset.
                if keys.iter().any(|k| k.as_str() == label) {
                    label = hour.format("%H:00 (%:z)").to_string();
                }
                keys.push(BucketKey::new(label));
            }
            keys
        }
    }
}

/// Index of the bucket `at` falls into, or `None` when it is outside the covered window.
///
/// Yearly and Monthly cover the whole calendar year/month of `now`; Weekly and
/// Daily are rolling windows that end at `now`.
pub fn slot_of(period: Period, now: &DateTime<Tz>, at: &DateTime<Utc>) -> Option<usize> {
    let local = at.with_timezone(&now.timezone());
    match period {
        Period::Yearly => (local.year() == now.year()).then(|| local.month0() as usize),
        Period::Monthly => {
            (local.year() == now.year() && local.month() == now.month()).then(|| local.day0() as usize)
        }
        Period::Weekly => {
            if local > *now { return None; }
            let back = (now.date_naive() - local.date_naive()).num_days();
            (0..7).contains(&back).then(|| (6 - back) as usize)
        }
        Period::Daily => {
            let first = first_hour(now);
            if local > *now || local < first { return None; }
            let hours = (local - first).num_hours();
            (0..24).contains(&hours).then(|| hours as usize)
        }
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (y, m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// `count` consecutive dates ending at `today`, oldest first.
pub(crate) fn trailing_days(today: NaiveDate, count: u64) -> impl Iterator<Item = NaiveDate> {
    (0..count).rev().filter_map(move |back| today.checked_sub_days(Days::new(back)))
}

/// Top of the hour containing `now`.
pub(crate) fn hour_start(now: &DateTime<Tz>) -> DateTime<Tz> {
    *now - Duration::minutes(now.minute() as i64)
        - Duration::seconds(now.second() as i64)
        - Duration::nanoseconds(now.nanosecond() as i64)
}

fn first_hour(now: &DateTime<Tz>) -> DateTime<Tz> { hour_start(now) - Duration::hours(23) }

/// Earliest instant for a local wall-clock time. Inside a DST gap this is the
/// first valid minute after the gap.
pub(crate) fn local_earliest(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    resolve_local(naive, tz, Duration::minutes(1), |t| t.earliest())
}

/// Latest instant for a local wall-clock time. Inside a DST gap this is the
/// last valid minute before the gap.
pub(crate) fn local_latest(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    resolve_local(naive, tz, Duration::minutes(-1), |t| t.latest())
}

fn resolve_local(
    naive: NaiveDateTime,
    tz: Tz,
    step: Duration,
    pick: impl Fn(LocalResult<DateTime<Tz>>) -> Option<DateTime<Tz>>,
) -> DateTime<Tz> {
    let mut probe = naive;
    for _ in 0..=MAX_GAP_MINUTES {
        if let Some(dt) = pick(probe.and_local_timezone(tz)) {
            return dt;
        }
        match probe.checked_add_signed(step) {
            Some(next) => probe = next,
            None => break,
        }
    }
    tz.from_utc_datetime(&naive)
}

/// No zone has ever skipped more than a day of wall-clock time.
const MAX_GAP_MINUTES: usize = 24 * 60;

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        Tz::UTC.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn labels(keys: &[BucketKey]) -> Vec<&str> { keys.iter().map(|k| k.as_str()).collect() }

    #[test]
    fn test_yearly_always_twelve() {
        let keys = build_buckets(Period::Yearly, &at(2024, 3, 15, 12, 0));
        assert_eq!(
            labels(&keys),
            ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"]
        );
    }

    #[test]
    fn test_monthly_length() {
        assert_eq!(build_buckets(Period::Monthly, &at(2024, 2, 10, 0, 0)).len(), 29);
        assert_eq!(build_buckets(Period::Monthly, &at(2023, 2, 10, 0, 0)).len(), 28);
        assert_eq!(build_buckets(Period::Monthly, &at(2024, 4, 30, 0, 0)).len(), 30);
        let jan = build_buckets(Period::Monthly, &at(2024, 1, 1, 0, 0));
        assert_eq!(jan.len(), 31);
        assert_eq!(jan[0], "1");
        assert_eq!(jan[30], "31");
    }

    #[test]
    fn test_weekly_ends_today() {
        let keys = build_buckets(Period::Weekly, &at(2024, 3, 15, 12, 0));
        assert_eq!(labels(&keys), ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"]);
    }

    #[test]
    fn test_daily_ends_current_hour() {
        let keys = build_buckets(Period::Daily, &at(2024, 3, 15, 14, 30));
        assert_eq!(keys.len(), 24);
        assert_eq!(keys[0], "15:00");
        assert_eq!(keys[9], "00:00");
        assert_eq!(keys[23], "14:00");
    }

    #[test]
    fn test_weekly_in_local_zone() {
        // 20:00 UTC on Friday is already Saturday in Kolkata.
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap().with_timezone(&chrono_tz::Asia::Kolkata);
        let keys = build_buckets(Period::Weekly, &now);
        assert_eq!(keys[6], "Sat");
        assert_eq!(slot_of(Period::Weekly, &now, &utc(2024, 3, 15, 19, 0)), Some(6));
        assert_eq!(slot_of(Period::Weekly, &now, &utc(2024, 3, 15, 18, 0)), Some(5));
    }

    #[test]
    fn test_slot_of_windows() {
        let now = at(2024, 3, 15, 14, 30);

        assert_eq!(slot_of(Period::Yearly, &now, &utc(2024, 12, 31, 23, 0)), Some(11));
        assert_eq!(slot_of(Period::Yearly, &now, &utc(2023, 12, 31, 23, 0)), None);

        assert_eq!(slot_of(Period::Monthly, &now, &utc(2024, 3, 1, 0, 0)), Some(0));
        assert_eq!(slot_of(Period::Monthly, &now, &utc(2024, 3, 31, 0, 0)), Some(30));
        assert_eq!(slot_of(Period::Monthly, &now, &utc(2024, 2, 29, 0, 0)), None);

        assert_eq!(slot_of(Period::Weekly, &now, &utc(2024, 3, 9, 0, 0)), Some(0));
        assert_eq!(slot_of(Period::Weekly, &now, &utc(2024, 3, 8, 23, 59)), None);
        assert_eq!(slot_of(Period::Weekly, &now, &utc(2024, 3, 15, 15, 0)), None);

        assert_eq!(slot_of(Period::Daily, &now, &utc(2024, 3, 14, 15, 5)), Some(0));
        assert_eq!(slot_of(Period::Daily, &now, &utc(2024, 3, 14, 14, 59)), None);
        assert_eq!(slot_of(Period::Daily, &now, &utc(2024, 3, 15, 14, 20)), Some(23));
        assert_eq!(slot_of(Period::Daily, &now, &utc(2024, 3, 15, 14, 31)), None);
    }

    #[test]
    fn test_daily_keys_unique_across_fall_back() {
        // New York leaves DST at 02:00 EDT on 2024-11-03, so 01:00 happens twice.
        let ny = chrono_tz::America::New_York;
        let now = Utc.with_ymd_and_hms(2024, 11, 3, 17, 30, 0).unwrap().with_timezone(&ny);
        let keys = build_buckets(Period::Daily, &now);
        assert_eq!(keys.len(), 24);
        assert_eq!(keys[11], "01:00");
        assert_eq!(keys[12], "01:00 (-05:00)");
        assert_eq!(keys[23], "12:00");
        let distinct: std::collections::HashSet<&str> = keys.iter().map(|k| k.as_str()).collect();
        assert_eq!(distinct.len(), 24);

        assert_eq!(slot_of(Period::Daily, &now, &utc(2024, 11, 3, 5, 30)), Some(11));
        assert_eq!(slot_of(Period::Daily, &now, &utc(2024, 11, 3, 6, 30)), Some(12));
    }

    #[test]
    fn test_midnight_inside_spring_gap() {
        // Santiago jumps from 00:00 to 01:00 on 2024-09-08.
        let santiago = chrono_tz::America::Santiago;
        let midnight = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let start = local_earliest(midnight, santiago);
        assert_eq!(start.with_timezone(&Utc), utc(2024, 9, 8, 4, 0));
        assert_eq!(start.date_naive(), midnight.date());

        let prev_end = NaiveDate::from_ymd_opt(2024, 9, 7).unwrap().and_hms_milli_opt(23, 59, 59, 999).unwrap();
        assert!(local_latest(prev_end, santiago) < start);

        let ordinary = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(10, 0, 0).unwrap();
        assert_eq!(local_earliest(ordinary, Tz::UTC), at(2024, 3, 15, 10, 0));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
    }
}
