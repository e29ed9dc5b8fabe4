use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::DATE_FMT;

/// One row of the NSE trading-holiday payload.
///
/// `week_day` and `description` are audit/reporting fields; resolution
/// logic only ever looks at the parsed date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayEntry {
    #[serde(rename = "tradingDate")]
    pub trading_date: String,

    #[serde(rename = "weekDay", default)]
    pub week_day: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl HolidayEntry {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.trading_date, DATE_FMT).ok()
    }
}

/// Immutable snapshot of the exchange's published holidays.
///
/// Built once per resolution session and shared by every calendar
/// operation so a mid-run refresh can never split a computation across
/// two different holiday lists.
#[derive(Debug, Clone, Default)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
    entries: Vec<HolidayEntry>,
}

impl HolidaySet {
    /// Parse raw NSE entries into a snapshot.
    ///
    /// Entries whose date fails to parse are logged and skipped; one
    /// dirty record must not sink an otherwise valid yearly list.
    /// Duplicate dates are deduped by the set itself.
    pub fn from_entries(entries: Vec<HolidayEntry>) -> Self {
        let mut dates = BTreeSet::new();

        for entry in &entries {
            match entry.date() {
                Some(date) => {
                    dates.insert(date);
                }
                None => {
                    warn!(
                        trading_date = %entry.trading_date,
                        "Skipping malformed holiday entry"
                    );
                }
            }
        }

        Self { dates, entries }
    }

    /// Build a snapshot straight from dates. Test and fixture helper.
    pub fn from_dates<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self {
            dates: dates.into_iter().collect(),
            entries: Vec::new(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Holiday dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    /// Raw entries as fetched, description and weekday included.
    pub fn entries(&self) -> &[HolidayEntry] {
        &self.entries
    }

    /// Number of holidays falling in the given month.
    pub fn count_in_month(&self, year: i32, month: u32) -> usize {
        self.dates
            .iter()
            .filter(|d| d.year() == year && d.month() == month)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_entries_skips_malformed() {
        let entries = vec![
            HolidayEntry {
                trading_date: "26-Jan-2024".to_string(),
                week_day: Some("Friday".to_string()),
                description: Some("Republic Day".to_string()),
            },
            HolidayEntry {
                trading_date: "not-a-date".to_string(),
                week_day: None,
                description: None,
            },
            HolidayEntry {
                trading_date: "25-Mar-2024".to_string(),
                week_day: Some("Monday".to_string()),
                description: Some("Holi".to_string()),
            },
        ];

        let set = HolidaySet::from_entries(entries);
        assert_eq!(set.len(), 2);
        assert!(set.contains(d(2024, 1, 26)));
        assert!(set.contains(d(2024, 3, 25)));
        // Raw entries are kept for audit, bad record included
        assert_eq!(set.entries().len(), 3);
    }

    #[test]
    fn test_duplicate_dates_dedupe() {
        let set = HolidaySet::from_dates(vec![d(2024, 1, 26), d(2024, 1, 26)]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_count_in_month() {
        let set = HolidaySet::from_dates(vec![
            d(2024, 1, 26),
            d(2024, 3, 25),
            d(2024, 3, 29),
            d(2023, 3, 30),
        ]);
        assert_eq!(set.count_in_month(2024, 3), 2);
        assert_eq!(set.count_in_month(2024, 2), 0);
        // Same month in another year does not leak in
        assert_eq!(set.count_in_month(2023, 3), 1);
    }

    #[test]
    fn test_nse_payload_field_names() {
        let json = r#"{
            "tradingDate": "15-Aug-2024",
            "weekDay": "Thursday",
            "description": "Independence Day",
            "Sr_no": 12
        }"#;
        let entry: HolidayEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date(), Some(d(2024, 8, 15)));
        assert_eq!(entry.week_day.as_deref(), Some("Thursday"));
    }
}
