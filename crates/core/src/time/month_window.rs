use anyhow::Context;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// The three-month span served for a calendar view of `year`/`month`:
/// first day of the previous month through the last day of the next
/// month, so adjacent-month cells on the grid stay populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    pub fn surrounding(year: i32, month: u32) -> anyhow::Result<Self> {
        anyhow::ensure!((1..=12).contains(&month), "month out of range: {month}");
        let (prev_year, prev_month) = if month == 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        };
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let start = NaiveDate::from_ymd_opt(prev_year, prev_month, 1)
            .with_context(|| format!("invalid window start for {year}-{month:02}"))?;
        let end = last_day_of_month(next_year, next_month)?;
        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn last_day_of_month(year: i32, month: u32) -> anyhow::Result<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .with_context(|| format!("invalid month {year}-{month:02}"))?;
    Ok(first_of_next - Duration::days(1))
}

/// Target month for an aggregation run: explicit arguments win, otherwise
/// the current month in KST (the job may run while UTC is still on the
/// previous day).
pub fn resolve_target_month(
    year_arg: Option<i32>,
    month_arg: Option<u32>,
    now_utc: DateTime<Utc>,
) -> anyhow::Result<(i32, u32)> {
    match (year_arg, month_arg) {
        (Some(year), Some(month)) => {
            anyhow::ensure!((1..=12).contains(&month), "month out of range: {month}");
            Ok((year, month))
        }
        (None, None) => {
            let kst =
                chrono::FixedOffset::east_opt(KST_OFFSET_SECS).context("invalid KST offset")?;
            let now_kst = now_utc.with_timezone(&kst);
            Ok((now_kst.year(), now_kst.month()))
        }
        _ => anyhow::bail!("provide both year and month, or neither"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_spans_previous_first_to_next_last() {
        let w = MonthWindow::surrounding(2025, 8).unwrap();
        assert_eq!(w.start, date(2025, 7, 1));
        assert_eq!(w.end, date(2025, 9, 30));
    }

    #[test]
    fn window_crosses_year_boundaries() {
        let w = MonthWindow::surrounding(2025, 1).unwrap();
        assert_eq!(w.start, date(2024, 12, 1));
        assert_eq!(w.end, date(2025, 2, 28));

        let w = MonthWindow::surrounding(2025, 12).unwrap();
        assert_eq!(w.start, date(2025, 11, 1));
        assert_eq!(w.end, date(2026, 1, 31));
    }

    #[test]
    fn window_handles_leap_february() {
        let w = MonthWindow::surrounding(2024, 1).unwrap();
        assert_eq!(w.end, date(2024, 2, 29));
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!(MonthWindow::surrounding(2025, 0).is_err());
        assert!(MonthWindow::surrounding(2025, 13).is_err());
    }

    #[test]
    fn contains_is_inclusive() {
        let w = MonthWindow::surrounding(2025, 8).unwrap();
        assert!(w.contains(date(2025, 7, 1)));
        assert!(w.contains(date(2025, 9, 30)));
        assert!(!w.contains(date(2025, 6, 30)));
        assert!(!w.contains(date(2025, 10, 1)));
    }

    #[test]
    fn explicit_target_month_wins() {
        let now = Utc.with_ymd_and_hms(2025, 8, 6, 12, 0, 0).unwrap();
        assert_eq!(resolve_target_month(Some(2025), Some(3), now).unwrap(), (2025, 3));
    }

    #[test]
    fn default_target_month_uses_kst() {
        // 2025-08-31 16:00 UTC is already 2025-09-01 01:00 in KST.
        let now = Utc.with_ymd_and_hms(2025, 8, 31, 16, 0, 0).unwrap();
        assert_eq!(resolve_target_month(None, None, now).unwrap(), (2025, 9));
    }

    #[test]
    fn half_specified_target_month_is_rejected() {
        let now = Utc.with_ymd_and_hms(2025, 8, 6, 12, 0, 0).unwrap();
        assert!(resolve_target_month(Some(2025), None, now).is_err());
        assert!(resolve_target_month(None, Some(3), now).is_err());
    }
}
