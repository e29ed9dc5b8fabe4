use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::calendar::{last_day_of_month, next_month, TradingCalendar};
use crate::config;
use crate::error::CalendarError;

/// Lazy, unbounded stream of weekly index expiries.
///
/// Candidates land on the symbol's contract weekday, seven days apart;
/// a candidate that falls on a holiday settles on the previous trading
/// day instead (exchange convention: expiry moves earlier, never
/// later). Each call to [`TradingCalendar::weekly_expiries`] starts a
/// fresh, independent cursor.
#[derive(Debug)]
pub struct WeeklyExpiries<'a> {
    calendar: &'a TradingCalendar,
    candidate: NaiveDate,
}

impl Iterator for WeeklyExpiries<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let candidate = self.candidate;
        self.candidate = candidate
            .checked_add_days(Days::new(7))
            .expect("date in range");

        Some(self.calendar.roll_off_holiday(candidate))
    }
}

/// Lazy, unbounded stream of monthly expiries: the last contract
/// weekday of each month, holiday-rolled like the weekly stream.
#[derive(Debug)]
pub struct MonthlyExpiries<'a> {
    calendar: &'a TradingCalendar,
    target: Weekday,
    year: i32,
    month: u32,
}

impl Iterator for MonthlyExpiries<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let last = last_day_of_month(self.year, self.month);
        let offset = days_back_to(last, self.target);
        let candidate = last
            .checked_sub_days(Days::new(offset))
            .expect("date in range");

        (self.year, self.month) = next_month(self.year, self.month);

        Some(self.calendar.roll_off_holiday(candidate))
    }
}

impl TradingCalendar {
    /// Weekly expiries for an index, starting at the first contract
    /// weekday on or after `anchor`.
    pub fn weekly_expiries(
        &self,
        symbol: &str,
        anchor: NaiveDate,
    ) -> Result<WeeklyExpiries<'_>, CalendarError> {
        let target = config::expiry_weekday_for(symbol)
            .ok_or_else(|| CalendarError::UnknownSymbol(symbol.to_string()))?;

        let offset = days_forward_to(anchor, target);
        let first = anchor
            .checked_add_days(Days::new(offset))
            .expect("date in range");

        Ok(WeeklyExpiries {
            calendar: self,
            candidate: first,
        })
    }

    /// Monthly expiries starting with `anchor`'s own month.
    ///
    /// When the anchor sits past its month's expiry the first element
    /// is already behind it; callers wanting only future expiries skip
    /// ahead.
    pub fn monthly_expiries(&self, anchor: NaiveDate) -> MonthlyExpiries<'_> {
        MonthlyExpiries {
            calendar: self,
            target: config::MONTHLY_EXPIRY_WEEKDAY,
            year: anchor.year(),
            month: anchor.month(),
        }
    }

    /// Trading days from `anchor` to its next weekly expiry. An expiry
    /// falling on `anchor` itself counts toward the following one.
    pub fn trading_days_until_expiry(
        &self,
        symbol: &str,
        anchor: NaiveDate,
    ) -> Result<u32, CalendarError> {
        let mut expiries = self.weekly_expiries(symbol, anchor)?;

        let mut expiry = expiries.next().expect("stream is unbounded");
        if expiry == anchor {
            expiry = expiries.next().expect("stream is unbounded");
        }

        Ok(self.trading_days_until(anchor, expiry))
    }

    /// Holiday roll-back: a candidate expiry that does not trade
    /// settles on the previous trading day.
    fn roll_off_holiday(&self, candidate: NaiveDate) -> NaiveDate {
        if self.is_trading_day(candidate) {
            candidate
        } else {
            self.previous_trading_day(candidate)
        }
    }
}

/// Days forward from `date` to the next occurrence of `target`,
/// zero when `date` already is one.
fn days_forward_to(date: NaiveDate, target: Weekday) -> u64 {
    let date_wd = date.weekday().num_days_from_monday();
    let target_wd = target.num_days_from_monday();
    ((target_wd + 7 - date_wd) % 7) as u64
}

/// Days back from `date` to the most recent occurrence of `target`,
/// zero when `date` already is one.
fn days_back_to(date: NaiveDate, target: Weekday) -> u64 {
    let date_wd = date.weekday().num_days_from_monday();
    let target_wd = target.num_days_from_monday();
    ((date_wd + 7 - target_wd) % 7) as u64
}
