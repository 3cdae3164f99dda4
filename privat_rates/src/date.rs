use chrono::{Days, Local, NaiveDate};
use std::fmt;

/// A calendar date, rendered as `DD.MM.YYYY` in outbound requests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `days` dates counting backwards from `from`, newest first.
    pub fn last_days(from: NaiveDate, days: u32) -> Vec<DateKey> {
        (0..u64::from(days))
            .filter_map(|offset| from.checked_sub_days(Days::new(offset)))
            .map(DateKey)
            .collect()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%d.%m.%Y"))
    }
}
