//! The incident record scraped from a listing page and persisted by the store

/// Category used when a listing row carries no icon
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Category of listing rows that are news items rather than incidents
pub const NEWS_CATEGORY: &str = "news";

/// One aviation incident as parsed from a listing headline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    /// Severity or type tag taken from the row icon filename
    pub category: String,

    /// Cleaned headline, unique across the store
    pub title: String,

    /// Place name extracted from the headline
    pub location: String,

    /// Cause phrase that trailed the last comma of the headline
    pub cause: String,

    /// UTC midnight of the incident date, in seconds since the epoch
    pub timestamp: Option<i64>,

    /// Absolute link to the full article
    pub url: String,
}

impl Incident {
    /// Whether this row is a news item, which is never stored
    pub fn is_news(&self) -> bool {
        self.category.eq_ignore_ascii_case(NEWS_CATEGORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(category: &str) -> Incident {
        Incident {
            category: category.to_string(),
            title: "Test Title".to_string(),
            location: "Test Location".to_string(),
            cause: "Test Cause".to_string(),
            timestamp: Some(1234567890),
            url: "http://example.com".to_string(),
        }
    }

    #[test]
    fn test_is_news_ignores_case() {
        assert!(incident("news").is_news());
        assert!(incident("NEWS").is_news());
        assert!(incident("News").is_news());
        assert!(!incident("incident").is_news());
        assert!(!incident("newsletter").is_news());
    }
}
