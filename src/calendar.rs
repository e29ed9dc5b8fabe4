use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};

use crate::config;
use crate::error::CalendarError;
use crate::holidays::HolidaySet;

/// Trading-day resolution over one immutable holiday snapshot.
///
/// Weekends are structural: Saturday/Sunday are never trading days no
/// matter what the snapshot says. A weekend date appearing in the
/// snapshot (dirty source data) is therefore a harmless no-op.
#[derive(Debug, Clone)]
pub struct TradingCalendar {
    holidays: HolidaySet,
    cutoff: NaiveTime,
}

impl TradingCalendar {
    pub fn new(holidays: HolidaySet) -> Self {
        Self {
            holidays,
            cutoff: config::time_cutoff(),
        }
    }

    pub fn with_cutoff(holidays: HolidaySet, cutoff: NaiveTime) -> Self {
        Self { holidays, cutoff }
    }

    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    pub fn cutoff(&self) -> NaiveTime {
        self.cutoff
    }

    // -----------------------------------------------
    // BUSINESS DAY RESOLUTION
    // -----------------------------------------------

    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.holidays.contains(date)
    }

    /// Next trading day strictly after `date`.
    ///
    /// Always advances, even when `date` itself is a trading day:
    /// given Friday 21-Jan-2022 the answer is Monday 24-Jan-2022, and
    /// given Tuesday 25-Jan-2022 with Republic Day (26th) listed the
    /// answer is Thursday 27-Jan-2022.
    pub fn next_trading_day(&self, date: NaiveDate) -> NaiveDate {
        let mut day = next_calendar_day(date);
        while !self.is_trading_day(day) {
            day = next_calendar_day(day);
        }
        day
    }

    /// Previous trading day strictly before `date`.
    pub fn previous_trading_day(&self, date: NaiveDate) -> NaiveDate {
        let mut day = previous_calendar_day(date);
        while !self.is_trading_day(day) {
            day = previous_calendar_day(day);
        }
        day
    }

    /// Step `n` trading days forward (n > 0) or backward (n < 0).
    /// A zero step has no meaning and is rejected.
    pub fn advance_trading_days(
        &self,
        date: NaiveDate,
        n: i32,
    ) -> Result<NaiveDate, CalendarError> {
        if n == 0 {
            return Err(CalendarError::InvalidStep);
        }

        let mut day = date;
        for _ in 0..n.unsigned_abs() {
            day = if n > 0 {
                self.next_trading_day(day)
            } else {
                self.previous_trading_day(day)
            };
        }
        Ok(day)
    }

    // -----------------------------------------------
    // TRADING DAY COUNTS
    // -----------------------------------------------

    /// Number of `next_trading_day` steps needed to reach or pass
    /// `target` from `date`, floored at 1.
    pub fn trading_days_until(&self, date: NaiveDate, target: NaiveDate) -> u32 {
        let mut day = date;
        let mut count = 0;

        while day < target {
            day = self.next_trading_day(day);
            count += 1;
        }

        count.max(1)
    }

    /// Trading days left between `date` (exclusive) and Dec 31 of its
    /// year (inclusive), holiday-aware.
    pub fn trading_days_until_year_end(&self, date: NaiveDate) -> u32 {
        let year_end = NaiveDate::from_ymd_opt(date.year(), 12, 31)
            .expect("Dec 31 exists in every year");

        let mut day = date;
        let mut count = 0;
        while day < year_end {
            day = self.next_trading_day(day);
            if day <= year_end {
                count += 1;
            }
        }
        count
    }

    /// Working days in the month *after* `date`'s month: weekday count
    /// across that whole month minus the holidays falling in it.
    pub fn working_days_in_month(&self, date: NaiveDate) -> u32 {
        let (year, month) = next_month(date.year(), date.month());

        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .expect("first of month exists");
        let last = last_day_of_month(year, month);

        let mut weekdays = 0;
        let mut day = first;
        while day <= last {
            if !is_weekend(day) {
                weekdays += 1;
            }
            day = next_calendar_day(day);
        }

        weekdays - self.holidays.count_in_month(year, month) as u32
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (ny, nm) = next_month(year, month);
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .expect("first of month exists")
        .pred_opt()
        .expect("month has a last day")
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn next_calendar_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).expect("date in range")
}

fn previous_calendar_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).expect("date in range")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn calendar_2022() -> TradingCalendar {
        // NSE trading holidays, early 2022
        TradingCalendar::new(HolidaySet::from_dates(vec![
            d(2022, 1, 26), // Republic Day (Wednesday)
            d(2022, 3, 1),  // Mahashivratri
            d(2022, 3, 18), // Holi
        ]))
    }

    #[test]
    fn test_weekends_never_trade() {
        let cal = calendar_2022();
        assert!(!cal.is_trading_day(d(2022, 1, 22))); // Saturday
        assert!(!cal.is_trading_day(d(2022, 1, 23))); // Sunday
        // Holds with an empty snapshot too
        let bare = TradingCalendar::new(HolidaySet::default());
        assert!(!bare.is_trading_day(d(2022, 1, 22)));
    }

    #[test]
    fn test_holiday_is_not_a_trading_day() {
        let cal = calendar_2022();
        assert!(!cal.is_trading_day(d(2022, 1, 26)));
        assert!(cal.is_trading_day(d(2022, 1, 25)));
    }

    #[test]
    fn test_next_over_weekend() {
        // Friday 21-Jan-2022 -> Monday 24-Jan-2022
        let cal = calendar_2022();
        assert_eq!(cal.next_trading_day(d(2022, 1, 21)), d(2022, 1, 24));
    }

    #[test]
    fn test_next_over_holiday() {
        // Tuesday 25-Jan-2022 -> Thursday 27-Jan-2022, skipping Republic Day
        let cal = calendar_2022();
        assert_eq!(cal.next_trading_day(d(2022, 1, 25)), d(2022, 1, 27));
    }

    #[test]
    fn test_next_always_strictly_advances() {
        let cal = calendar_2022();
        // Monday from a trading Monday still moves to Tuesday
        assert_eq!(cal.next_trading_day(d(2022, 1, 24)), d(2022, 1, 25));
    }

    #[test]
    fn test_previous_over_weekend_and_holiday() {
        let cal = calendar_2022();
        // Monday 24-Jan -> Friday 21-Jan
        assert_eq!(cal.previous_trading_day(d(2022, 1, 24)), d(2022, 1, 21));
        // Thursday 27-Jan -> Tuesday 25-Jan, skipping the 26th
        assert_eq!(cal.previous_trading_day(d(2022, 1, 27)), d(2022, 1, 25));
    }

    #[test]
    fn test_results_are_always_trading_days() {
        let cal = calendar_2022();
        let mut day = d(2022, 1, 1);
        for _ in 0..60 {
            let next = cal.next_trading_day(day);
            assert!(cal.is_trading_day(next));
            assert!(next > day);
            let prev = cal.previous_trading_day(day);
            assert!(cal.is_trading_day(prev));
            assert!(prev < day);
            day = next;
        }
    }

    #[test]
    fn test_weekend_holiday_entry_is_noop() {
        // A Saturday listed as a holiday changes nothing
        let cal = TradingCalendar::new(HolidaySet::from_dates(vec![d(2022, 1, 22)]));
        assert_eq!(cal.next_trading_day(d(2022, 1, 21)), d(2022, 1, 24));
    }

    #[test]
    fn test_advance_zero_is_an_error() {
        let cal = calendar_2022();
        assert_eq!(
            cal.advance_trading_days(d(2022, 1, 21), 0),
            Err(CalendarError::InvalidStep)
        );
    }

    #[test]
    fn test_advance_forward_and_backward() {
        let cal = calendar_2022();
        // Fri 21 -> Mon 24 -> Tue 25 -> Thu 27 (26th is a holiday)
        assert_eq!(cal.advance_trading_days(d(2022, 1, 21), 3), Ok(d(2022, 1, 27)));
        assert_eq!(cal.advance_trading_days(d(2022, 1, 27), -3), Ok(d(2022, 1, 21)));
    }

    #[test]
    fn test_trading_days_until() {
        let cal = calendar_2022();
        // Fri 21 -> Mon 24 -> Tue 25 -> Thu 27
        assert_eq!(cal.trading_days_until(d(2022, 1, 21), d(2022, 1, 27)), 3);
        // Already at target: floor of 1
        assert_eq!(cal.trading_days_until(d(2022, 1, 21), d(2022, 1, 21)), 1);
    }

    #[test]
    fn test_trading_days_until_year_end() {
        // From Mon 26-Dec-2022: trading days are 27, 28, 29, 30 (the
        // 31st is a Saturday)
        let cal = TradingCalendar::new(HolidaySet::from_dates(vec![]));
        assert_eq!(cal.trading_days_until_year_end(d(2022, 12, 26)), 4);
    }

    #[test]
    fn test_working_days_in_month_advances_first() {
        // Anchor in Feb-2022 counts March: 23 weekdays, minus the two
        // March holidays in the fixture
        let cal = calendar_2022();
        assert_eq!(cal.working_days_in_month(d(2022, 2, 15)), 21);
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 2), d(2024, 2, 29));
        assert_eq!(last_day_of_month(2023, 2), d(2023, 2, 28));
        assert_eq!(last_day_of_month(2022, 12), d(2022, 12, 31));
    }
}
