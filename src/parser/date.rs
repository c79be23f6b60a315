//! Incident date normalization

use crate::error::{Error, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use regex::Regex;

/// Layout of a listing date once the ordinal suffix is gone, e.g. `Mar 31 2025`
const DATE_FORMAT: &str = "%b %d %Y";

/// Whole-string shape of a listing date. chrono lets a format space match
/// no whitespace at all, so the separators are enforced here.
const DATE_SHAPE: &str = r"^(?i:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2}(?:st|nd|rd|th)?\s+\d{4}$";

/// Converts listing dates like `"Mar 31st 2025"` into UTC epoch seconds
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    shape: Regex,
    ordinal_suffix: Regex,
}

impl DateNormalizer {
    /// Compile the date shape and ordinal suffix patterns
    pub fn new() -> Result<Self> {
        let shape = Regex::new(DATE_SHAPE).map_err(Error::pattern("date shape"))?;
        let ordinal_suffix =
            Regex::new(r"(\d)(?:st|nd|rd|th)").map_err(Error::pattern("ordinal"))?;
        Ok(Self {
            shape,
            ordinal_suffix,
        })
    }

    /// Midnight UTC of the given day as seconds since the epoch.
    ///
    /// Returns `None` for an empty string or anything that is not a
    /// month-abbreviation/day/year date.
    pub fn normalize(&self, date_string: &str) -> Option<i64> {
        let date_string = date_string.trim();
        if !self.shape.is_match(date_string) {
            return None;
        }

        let cleaned = self.ordinal_suffix.replace_all(date_string, "$1");
        let date = NaiveDate::parse_from_str(&cleaned, DATE_FORMAT).ok()?;
        let midnight = date.and_hms_opt(0, 0, 0)?;

        Some(Utc.from_utc_datetime(&midnight).timestamp())
    }
}
