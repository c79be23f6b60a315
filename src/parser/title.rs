//! Headline decomposition into title, cause, date and location

use crate::error::{Error, Result};
use crate::parser::DateNormalizer;
use regex::Regex;
use tracing::warn;

/// Cause used when a headline has no trailing comma clause
pub const NOT_SPECIFIED: &str = "Not specified";

/// Location used when no preposition introduces a place name
pub const UNKNOWN_LOCATION: &str = "Unknown";

const DATE_PATTERN: &str =
    r"(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2}(?:st|nd|rd|th)?\s+\d{4}";

const LOCATION_PATTERN: &str =
    r"\b(?:at|near|over|enroute to)\s+([A-Z][a-zA-Z]*(?: [A-Z][a-zA-Z]*)*)";

/// Fields extracted from one headline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitle {
    /// Headline without the cause clause and the `on <date>` fragment
    pub title: String,

    /// Cause phrase with its first letter capitalized
    pub cause: String,

    /// Incident date as UTC epoch seconds
    pub timestamp: Option<i64>,

    /// Place name following `at`, `near`, `over` or `enroute to`
    pub location: String,
}

/// Intermediate state of a headline as it moves through the parsing stages
#[derive(Debug, Clone, PartialEq, Eq)]
struct TitleDraft {
    working: String,
    cause: String,
    timestamp: Option<i64>,
}

/// Parser for listing headlines
#[derive(Debug, Clone)]
pub struct TitleParser {
    date_pattern: Regex,
    location_pattern: Regex,
    dates: DateNormalizer,
}

impl TitleParser {
    /// Compile the date and location patterns
    pub fn new() -> Result<Self> {
        let date_pattern = Regex::new(DATE_PATTERN)
            .map_err(Error::pattern("date"))?;
        let location_pattern = Regex::new(LOCATION_PATTERN)
            .map_err(Error::pattern("location"))?;

        Ok(Self {
            date_pattern,
            location_pattern,
            dates: DateNormalizer::new()?,
        })
    }

    /// Parse one raw headline.
    ///
    /// The cause is split off first, then the date; the location is always
    /// searched in the untouched headline.
    pub fn parse(&self, raw: &str) -> ParsedTitle {
        let draft = TitleDraft {
            working: raw.trim().to_string(),
            cause: NOT_SPECIFIED.to_string(),
            timestamp: None,
        };
        let draft = self.strip_date(split_cause(draft));

        ParsedTitle {
            title: draft.working.trim().to_string(),
            cause: draft.cause,
            timestamp: draft.timestamp,
            location: self.locate(raw),
        }
    }

    fn strip_date(&self, draft: TitleDraft) -> TitleDraft {
        let Some(found) = self.date_pattern.find(&draft.working) else {
            return draft;
        };

        let date_text = found.as_str();
        let timestamp = self.dates.normalize(date_text);
        if timestamp.is_none() {
            warn!(date = %date_text, "Could not parse date string");
        }

        let working = draft
            .working
            .replace(&format!(" on {}", date_text), "")
            .trim()
            .to_string();

        TitleDraft {
            working,
            timestamp,
            ..draft
        }
    }

    fn locate(&self, original: &str) -> String {
        self.location_pattern
            .captures(original)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
    }
}

/// Split the clause after the last comma off as the cause
fn split_cause(draft: TitleDraft) -> TitleDraft {
    let Some(comma) = draft.working.rfind(',') else {
        return draft;
    };

    let cause = capitalize_first(draft.working[comma + 1..].trim());
    let working = draft.working[..comma].trim().to_string();

    TitleDraft {
        working,
        cause,
        ..draft
    }
}

/// Uppercase the first character and leave the rest untouched
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
