use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::calendar::TradingCalendar;
use crate::config;
use crate::error::CalendarError;

/// "Effective today" resolution.
///
/// The answer to "which session does this date belong to" flips at a
/// fixed wall-clock cutoff (18:00 IST by default): before it the open
/// or just-closed session is still the live one and resolution leans
/// on the previous trading day; at or after it the session counts as
/// settled and resolution leans forward.
impl TradingCalendar {
    /// Resolve the trading anchor for `candidate` (defaults to the
    /// calendar date of `now`).
    ///
    /// Decision branches, with `prev`/`next` the trading days around
    /// `now`'s calendar date:
    /// - candidate outside `[prev, next]`: unambiguous, returned as-is
    /// - before cutoff: `next` stays `next`; everything else in the
    ///   window (today, `prev`, a weekend/holiday between) resolves to
    ///   `prev`
    /// - at/after cutoff: the candidate itself when it trades,
    ///   otherwise its next trading day
    pub fn resolve_anchor(
        &self,
        now: DateTime<FixedOffset>,
        candidate: Option<NaiveDate>,
    ) -> Result<NaiveDate, CalendarError> {
        if self.holidays().is_empty() {
            return Err(CalendarError::AmbiguousAnchor);
        }

        let today = now.date_naive();
        let prev = self.previous_trading_day(today);
        let next = self.next_trading_day(today);
        let candidate = candidate.unwrap_or(today);

        if candidate < prev || candidate > next {
            return Ok(candidate);
        }

        if now.time() < self.cutoff() {
            if candidate == next {
                Ok(next)
            } else {
                Ok(prev)
            }
        } else if self.is_trading_day(candidate) {
            Ok(candidate)
        } else {
            Ok(self.next_trading_day(candidate))
        }
    }

    /// Market-session window for the anchor date: fixed 09:15 start
    /// and `now` capped at the 15:30 close.
    pub fn session_window(
        &self,
        now: DateTime<FixedOffset>,
        anchor: NaiveDate,
    ) -> (NaiveDateTime, NaiveDateTime) {
        let start = anchor.and_time(config::market_start());
        let close = anchor.and_time(config::market_close());

        let effective_now = now.naive_local().min(close);
        (start, effective_now)
    }
}

/// Current instant on the exchange clock.
pub fn now_ist() -> DateTime<FixedOffset> {
    chrono::Utc::now().with_timezone(&config::ist())
}

/// Build an IST instant from date/time parts. Fixture helper.
pub fn ist_instant(date: NaiveDate, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    let time = chrono::NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time");
    config::ist()
        .from_local_datetime(&date.and_time(time))
        .single()
        .expect("IST has no ambiguous local times")
}
