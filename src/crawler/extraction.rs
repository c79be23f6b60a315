//! Incident extraction from listing page markup

use crate::crawler::error::CrawlError;
use crate::incident::{Incident, UNKNOWN_CATEGORY};
use crate::parser::TitleParser;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

/// Class of the span holding each incident headline
const HEADLINE_SELECTOR: &str = "span.headline_avherald";

/// Image inside the pagination anchor that leads to the next page
const NEXT_PAGE_SELECTOR: &str = r#"img[src$="next.jpg"]"#;

/// Incidents found on one listing page and the link to the following page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Candidate incidents in document order
    pub incidents: Vec<Incident>,

    /// Absolute URL of the next listing page
    pub next_page: Option<Url>,
}

/// Extracts incidents and pagination from listing pages
#[derive(Debug, Clone)]
pub struct PageExtractor {
    base_url: Url,
    headline: Selector,
    image: Selector,
    next_page: Selector,
    titles: TitleParser,
}

impl PageExtractor {
    /// Create an extractor resolving relative links against `base_url`
    pub fn new(base_url: Url) -> Result<Self, CrawlError> {
        Ok(Self {
            base_url,
            headline: parse_selector(HEADLINE_SELECTOR)?,
            image: parse_selector("img")?,
            next_page: parse_selector(NEXT_PAGE_SELECTOR)?,
            titles: TitleParser::new()?,
        })
    }

    /// Extract every incident headline and the next page link from `html`
    #[instrument(skip_all, fields(bytes = html.len()))]
    pub fn extract(&self, html: &str) -> ExtractedPage {
        let document = Html::parse_document(html);

        let headlines: Vec<ElementRef> = document.select(&self.headline).collect();
        debug!(count = headlines.len(), "Found potential headline spans");
        if headlines.is_empty() {
            warn!("No headline spans found on this page");
        }

        let incidents = headlines
            .into_iter()
            .filter_map(|headline| self.incident_from_headline(headline))
            .collect();

        ExtractedPage {
            incidents,
            next_page: self.next_page_url(&document),
        }
    }

    fn incident_from_headline(&self, headline: ElementRef) -> Option<Incident> {
        let Some(link) = enclosing(headline, "a") else {
            debug!("Skipping headline without enclosing link");
            return None;
        };
        let Some(href) = link.value().attr("href") else {
            debug!("Skipping headline whose link has no href");
            return None;
        };

        let url = match self.base_url.join(href) {
            Ok(url) => url,
            Err(e) => {
                warn!(%href, error = %e, "Skipping headline with unresolvable link");
                return None;
            }
        };

        let category = enclosing(link, "tr")
            .and_then(|row| row.select(&self.image).next())
            .and_then(|icon| icon.value().attr("src"))
            .map(category_from_icon)
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

        let raw_title = headline.text().collect::<String>();
        let parsed = self.titles.parse(raw_title.trim());

        Some(Incident {
            category,
            title: parsed.title,
            location: parsed.location,
            cause: parsed.cause,
            timestamp: parsed.timestamp,
            url: url.to_string(),
        })
    }

    fn next_page_url(&self, document: &Html) -> Option<Url> {
        let href = document
            .select(&self.next_page)
            .find_map(|image| enclosing(image, "a"))
            .and_then(|link| link.value().attr("href"));

        let Some(href) = href else {
            debug!("No 'next.jpg' link found on this page");
            return None;
        };

        match self.base_url.join(href) {
            Ok(url) => {
                debug!(next = %url, "Found next page link");
                Some(url)
            }
            Err(e) => {
                warn!(%href, error = %e, "Ignoring unresolvable next page link");
                None
            }
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, CrawlError> {
    Selector::parse(selector).map_err(|e| {
        CrawlError::HtmlParse(format!("Failed to parse selector '{}': {}", selector, e))
    })
}

/// Nearest ancestor element with the given tag name
fn enclosing<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == tag)
}

/// Icon filename without a trailing `.gif`, e.g. `images/crash.gif` -> `crash`
fn category_from_icon(src: &str) -> String {
    let filename = src.rsplit('/').next().unwrap_or(src);
    if filename.to_ascii_lowercase().ends_with(".gif") {
        filename[..filename.len() - 4].to_string()
    } else {
        filename.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> PageExtractor {
        PageExtractor::new(Url::parse("https://avherald.com/").unwrap()).unwrap()
    }

    const SINGLE_ROW: &str = r#"
    <html>
    <body>
        <table>
            <tr>
                <td><img src="incident.gif"></td>
                <td>
                    <a href="/article1">
                        <span class="headline_avherald">Boeing 737 at Berlin on Mar 31st 2025, engine failure</span>
                    </a>
                </td>
            </tr>
        </table>
        <a href="/nextpage"><img src="next.jpg"></a>
    </body>
    </html>
    "#;

    #[test]
    fn test_single_row_with_next_page() {
        let page = extractor().extract(SINGLE_ROW);

        assert_eq!(page.incidents.len(), 1);
        let incident = &page.incidents[0];
        assert_eq!(incident.category, "incident");
        assert_eq!(incident.title, "Boeing 737 at Berlin");
        assert_eq!(incident.location, "Berlin");
        assert_eq!(incident.cause, "Engine failure");
        assert_eq!(incident.timestamp, Some(1743379200));
        assert_eq!(incident.url, "https://avherald.com/article1");

        let next = page.next_page.unwrap();
        assert!(next.as_str().ends_with("/nextpage"));
    }

    #[test]
    fn test_document_order_and_defaults() {
        let html = r#"
        <table>
            <tr>
                <td><img src="/images/crash.GIF"></td>
                <td><a href="h?article=1"><span class="headline_avherald">Crash at Madrid, fire</span></a></td>
            </tr>
            <tr>
                <td><a href="h?article=2"><span class="headline_avherald">No icon row</span></a></td>
            </tr>
            <tr>
                <td><span class="headline_avherald">Headline without link</span></td>
            </tr>
            <tr>
                <td><img src="/images/report.png"></td>
                <td><a name="anchor"><span class="headline_avherald">Link without href</span></a></td>
            </tr>
            <tr>
                <td><img src="/images/news.gif"></td>
                <td><a href="h?article=3"><span class="headline_avherald">Aviation news roundup</span></a></td>
            </tr>
        </table>
        "#;

        let page = extractor().extract(html);
        let titles: Vec<&str> = page.incidents.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Crash at Madrid", "No icon row", "Aviation news roundup"]
        );

        assert_eq!(page.incidents[0].category, "crash");
        assert_eq!(page.incidents[0].url, "https://avherald.com/h?article=1");
        assert_eq!(page.incidents[1].category, "Unknown");
        assert_eq!(page.incidents[2].category, "news");
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_link_outside_table() {
        let html = r#"<a href="/solo"><span class="headline_avherald">Lonely headline</span></a>"#;
        let page = extractor().extract(html);

        assert_eq!(page.incidents.len(), 1);
        assert_eq!(page.incidents[0].category, "Unknown");
        assert_eq!(page.incidents[0].url, "https://avherald.com/solo");
    }

    #[test]
    fn test_empty_page() {
        let page = extractor().extract("<html><body><p>Nothing here</p></body></html>");
        assert_eq!(page, ExtractedPage::default());
    }

    #[test]
    fn test_next_page_uses_next_icon_only() {
        let html = r#"
        <a href="/prev"><img src="/images/prev.jpg"></a>
        <a href="h?list=&amp;opt=0&amp;offset=40"><img src="/images/next.jpg"></a>
        "#;
        let page = extractor().extract(html);

        assert_eq!(
            page.next_page.unwrap().as_str(),
            "https://avherald.com/h?list=&opt=0&offset=40"
        );
    }

    #[test]
    fn test_category_from_icon() {
        assert_eq!(category_from_icon("incident.gif"), "incident");
        assert_eq!(category_from_icon("/images/accident.GIF"), "accident");
        assert_eq!(category_from_icon("/images/report.png"), "report.png");
        assert_eq!(category_from_icon("crash"), "crash");
    }
}
