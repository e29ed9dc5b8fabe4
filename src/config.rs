use std::time::Duration;

use chrono::{FixedOffset, NaiveTime, Weekday};

// -----------------------------------------------
// NSE API ENDPOINTS
// -----------------------------------------------
pub const NSE_BASE_URL: &str = "https://www.nseindia.com";

pub fn nse_holiday_url() -> String {
    format!("{}/api/holiday-master?type=trading", NSE_BASE_URL)
}

/// Market segment key inside the holiday-master payload.
/// "CM" is the capital-market segment; "FO" mirrors it for derivatives.
pub const HOLIDAY_SEGMENT: &str = "CM";
pub const HOLIDAY_SEGMENT_FALLBACK: &str = "FO";

// -----------------------------------------------
// INDICES WITH WEEKLY EXPIRIES
// -----------------------------------------------
pub const NSE_INDICES: &[&str] = &["NIFTY", "BANKNIFTY", "FINNIFTY"];

/// Contract weekday for a weekly index expiry.
pub fn expiry_weekday_for(symbol: &str) -> Option<Weekday> {
    match symbol {
        "NIFTY" | "BANKNIFTY" => Some(Weekday::Thu),
        "FINNIFTY" => Some(Weekday::Tue),
        _ => None,
    }
}

/// Monthly contracts settle on the last Thursday of the month.
pub const MONTHLY_EXPIRY_WEEKDAY: Weekday = Weekday::Thu;

// -----------------------------------------------
// EXCHANGE CLOCK
// -----------------------------------------------
/// IST never observes DST, so a fixed +05:30 offset is exact.
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("IST offset is in range")
}

/// After this wall-clock time the current session counts as settled.
pub fn time_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).expect("valid cutoff time")
}

pub fn market_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 15, 0).expect("valid open time")
}

pub fn market_close() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 30, 0).expect("valid close time")
}

/// NSE's date format, e.g. "26-Jan-2024".
pub const DATE_FMT: &str = "%d-%b-%Y";

// -----------------------------------------------
// HOLIDAY CACHE
// -----------------------------------------------
pub const HOLIDAY_CACHE_FILE: &str = "holiday-cache.json";

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/131.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.8",
    "en-IN,en;q=0.9",
];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// SESSION WARMUP
// -----------------------------------------------
pub const WARMUP_DELAY_MS: u64 = 200;

// -----------------------------------------------
// RETRY CONFIG
// -----------------------------------------------
pub const RETRY_BASE_DELAY_MS: u64 = 200;
pub const RETRY_FACTOR: u64 = 3;
pub const RETRY_MAX_DELAY_SECS: u64 = 5;
pub const RETRY_MAX_ATTEMPTS: usize = 5;
