use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum CalendarError {
    /// `advance_trading_days` was asked to take zero steps.
    InvalidStep,
    /// Anchor resolution needs a non-empty holiday snapshot.
    AmbiguousAnchor,
    /// No weekly-expiry weekday is configured for this symbol.
    UnknownSymbol(String),
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CalendarError::InvalidStep => {
                write!(f, "Invalid step: advance_trading_days requires a non-zero step")
            }
            CalendarError::AmbiguousAnchor => {
                write!(f, "Ambiguous anchor: holiday snapshot is empty or missing")
            }
            CalendarError::UnknownSymbol(symbol) => {
                write!(f, "Unknown symbol: no expiry weekday configured for {}", symbol)
            }
        }
    }
}

impl std::error::Error for CalendarError {}
