use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Utc};

/// Source of "today" for rules that depend on the calendar.
///
/// Services receive a clock explicitly so date-dependent rules (future-dated
/// expenses, the current-year edit lock) can be exercised with fixed dates.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn now(&self) -> NaiveDateTime;

    fn current_year(&self) -> i32 {
        self.today().year()
    }
}

/// Clock backed by the host's local date and UTC timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Clock pinned to a single date; timestamps still advance.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// First and last day of a calendar year.
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// First and last day of a calendar month. `None` for a month outside 1..=12.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next.pred_opt()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_reports_year_of_pinned_date() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(clock.current_year(), 2025);
    }

    #[test]
    fn test_year_bounds() {
        let (start, end) = year_bounds(2024).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_month_bounds() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(month_bounds(2024, 2), Some((date(2024, 2, 1), date(2024, 2, 29))));
        assert_eq!(month_bounds(2025, 12), Some((date(2025, 12, 1), date(2025, 12, 31))));
        assert_eq!(month_bounds(2025, 0), None);
        assert_eq!(month_bounds(2025, 13), None);
    }
}
