use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Named calendar window for statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsRange {
    Day,
    /// The seven days ending on the anchor.
    #[default]
    Week,
    /// The calendar month containing the anchor.
    Month,
    /// The calendar year containing the anchor.
    Year,
}

impl StatsRange {
    /// First and last calendar day of the range around `anchor`.
    pub fn bounds(&self, anchor: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            StatsRange::Day => Some((anchor, anchor)),
            StatsRange::Week => Some((anchor.checked_sub_days(Days::new(6))?, anchor)),
            StatsRange::Month => {
                let first = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 1)?;
                let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
                Some((first, last))
            }
            StatsRange::Year => {
                let year = anchor.year();
                Some((
                    NaiveDate::from_ymd_opt(year, 1, 1)?,
                    NaiveDate::from_ymd_opt(year, 12, 31)?,
                ))
            }
        }
    }

    /// Inclusive UTC instants spanning the range around `anchor`.
    pub fn window(&self, anchor: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let invalid = || CoreError::InvalidWindow { anchor };
        let (first, last) = self.bounds(anchor).ok_or_else(invalid)?;
        let end = end_of_day(last).ok_or_else(invalid)?;
        Ok((start_of_day(first), end))
    }

    /// Number of calendar days in the range around `anchor`.
    pub fn days(&self, anchor: NaiveDate) -> Option<u32> {
        let (first, last) = self.bounds(anchor)?;
        u32::try_from((last - first).num_days() + 1).ok()
    }

    /// Move the anchor by `steps` whole ranges (negative goes back).
    pub fn shift(&self, anchor: NaiveDate, steps: i32) -> Option<NaiveDate> {
        let magnitude = steps.unsigned_abs();
        match self {
            StatsRange::Day => shift_days(anchor, steps, u64::from(magnitude)),
            StatsRange::Week => shift_days(anchor, steps, u64::from(magnitude) * 7),
            StatsRange::Month => shift_months(anchor, steps, magnitude),
            StatsRange::Year => shift_months(anchor, steps, magnitude.checked_mul(12)?),
        }
    }
}

impl std::str::FromStr for StatsRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(StatsRange::Day),
            "week" => Ok(StatsRange::Week),
            "month" => Ok(StatsRange::Month),
            "year" => Ok(StatsRange::Year),
            other => Err(format!("unknown range '{other}' (expected day, week, month or year)")),
        }
    }
}

fn shift_days(anchor: NaiveDate, steps: i32, days: u64) -> Option<NaiveDate> {
    if steps >= 0 {
        anchor.checked_add_days(Days::new(days))
    } else {
        anchor.checked_sub_days(Days::new(days))
    }
}

fn shift_months(anchor: NaiveDate, steps: i32, months: u32) -> Option<NaiveDate> {
    if steps >= 0 {
        anchor.checked_add_months(Months::new(months))
    } else {
        anchor.checked_sub_months(Months::new(months))
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last representable instant of `date`, without stepping into the next day.
fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_nano_opt(23, 59, 59, 999_999_999).map(|end| end.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_ends_on_anchor() {
        let (first, last) = StatsRange::Week.bounds(date(2026, 10, 19)).unwrap();
        assert_eq!(first, date(2026, 10, 13));
        assert_eq!(last, date(2026, 10, 19));
        assert_eq!(StatsRange::Week.days(date(2026, 10, 19)), Some(7));
    }

    #[test]
    fn month_days_follow_calendar() {
        assert_eq!(StatsRange::Month.days(date(2024, 2, 10)), Some(29));
        assert_eq!(StatsRange::Month.days(date(2026, 2, 10)), Some(28));
        assert_eq!(StatsRange::Month.days(date(2026, 12, 31)), Some(31));
    }

    #[test]
    fn year_days_are_leap_aware() {
        assert_eq!(StatsRange::Year.days(date(2024, 6, 1)), Some(366));
        assert_eq!(StatsRange::Year.days(date(2100, 6, 1)), Some(365));
        assert_eq!(StatsRange::Year.days(date(2000, 6, 1)), Some(366));
    }

    #[test]
    fn window_covers_whole_days() {
        let (start, end) = StatsRange::Day.window(date(2026, 1, 1)).unwrap();
        assert_eq!(start.to_rfc3339(), "2026-01-01T00:00:00+00:00");
        assert_eq!(end.date_naive(), date(2026, 1, 1));
        assert!(end > start + TimeDelta::hours(23));
    }

    #[test]
    fn window_on_last_representable_date() {
        let (start, end) = StatsRange::Day.window(NaiveDate::MAX).unwrap();
        assert_eq!(start.date_naive(), NaiveDate::MAX);
        assert_eq!(end.date_naive(), NaiveDate::MAX);
        assert_eq!(end - start, TimeDelta::days(1) - TimeDelta::nanoseconds(1));
        assert!(StatsRange::Week.window(NaiveDate::MAX).is_ok());
    }

    #[test]
    fn shift_navigates_periods() {
        assert_eq!(StatsRange::Week.shift(date(2026, 10, 19), -1), Some(date(2026, 10, 12)));
        assert_eq!(StatsRange::Month.shift(date(2026, 1, 31), 1), Some(date(2026, 2, 28)));
        assert_eq!(StatsRange::Year.shift(date(2026, 5, 5), -2), Some(date(2024, 5, 5)));
        assert_eq!(StatsRange::Day.shift(date(2026, 12, 31), 1), Some(date(2027, 1, 1)));
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("Month".parse::<StatsRange>(), Ok(StatsRange::Month));
        assert!("fortnight".parse::<StatsRange>().is_err());
    }
}
