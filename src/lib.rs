pub mod anchor;
pub mod calendar;
pub mod config;
pub mod error;
pub mod expiry;
pub mod holidays;
pub mod logging;
pub mod nse_client;

// Re-exports for convenience
pub use calendar::TradingCalendar;
pub use error::CalendarError;
pub use expiry::{MonthlyExpiries, WeeklyExpiries};
pub use holidays::{HolidayEntry, HolidaySet};
pub use nse_client::{HolidaySource, NSEClient};
