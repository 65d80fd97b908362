//! Warnings feed parsing, classification and best-effort detail scraping.
//!
//! The BOM publishes Western Australia warnings as RSS feeds at a handful of
//! URLs; the fetch walks them in order and takes the first that yields any
//! items, treating total silence as a valid "no warnings" state. Detail pages
//! are plain product text wrapped in HTML; the extraction below is heuristic
//! by nature and a failure on one page must never disturb the rest of the
//! warning list.

use crate::bom::client::BomClient;
use crate::bom::error::BomError;
use log::{info, warn};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Feed URLs tried in order: all-WA, land, marine, then an HTTP fallback.
pub const WARNING_FEED_URLS: [&str; 4] = [
    "https://www.bom.gov.au/fwo/IDZ00060.warnings_wa.xml",
    "https://www.bom.gov.au/fwo/IDZ00059.warnings_land_wa.xml",
    "https://www.bom.gov.au/fwo/IDZ00058.warnings_marine_wa.xml",
    "http://www.bom.gov.au/fwo/IDZ00060.warnings_wa.xml",
];

static AREA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)for\s+(.+?)(?:\.|$)").unwrap());
static ISSUE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Issued at (\d+:\d+\s+\w+\s+\w+)").unwrap());
static NEXT_ISSUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Next issue[:\s]+(.+?)(?:\.|$)").unwrap());
static PRODUCT_DIV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*class="[^"]*product[^"]*"[^>]*>(.*?)</div>"#).unwrap()
});
static CONTENT_DIV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<div[^>]*id="content"[^>]*>(.*?)</div>"#).unwrap());
static PRE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());

/// Section headers that open the warning body in BOM product text.
const MESSAGE_SECTION_HEADERS: [&str; 4] =
    ["WEATHER SITUATION:", "WARNING:", "FORECAST:", "SITUATION:"];

/// One raw item from the RSS feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: String,
    pub category: String,
    pub guid: String,
}

/// The parsed feed plus the URL it actually came from (None when every URL
/// came back empty, which is the legitimate "no active warnings" state).
#[derive(Debug, Clone, Default)]
pub struct WarningFeed {
    pub entries: Vec<FeedEntry>,
    pub source_url: Option<String>,
}

/// A warning as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: String,
    pub category: String,
    pub guid: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<DetailOutcome>,
}

/// Outcome of the per-warning detail scrape. A failure is data, not an error:
/// it is attached to the one warning it belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DetailOutcome {
    Scraped(WarningDetails),
    Failed { error: String },
}

/// Fields heuristically extracted from a warning's product text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WarningDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_areas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
}

/// Coarse warning category derived from the title, first keyword match wins.
pub fn classify_warning(title: &str) -> &'static str {
    let title = title.to_lowercase();
    if title.contains("marine") {
        "Marine"
    } else if title.contains("severe weather") {
        "Severe Weather"
    } else if title.contains("fire") {
        "Fire Weather"
    } else if title.contains("sheep") {
        "Agricultural"
    } else if title.contains("flood") {
        "Flood"
    } else if title.contains("cyclone") {
        "Tropical Cyclone"
    } else {
        "General"
    }
}

/// Parses `channel/item` entries out of an RSS document.
pub fn parse_feed_entries(xml: &str) -> Result<Vec<FeedEntry>, BomError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event().map_err(BomError::FeedXml)? {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if tag == "item" {
                    current = Some(FeedEntry::default());
                } else if current.is_some() {
                    field = Some(tag);
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(BomError::FeedXml)?.into_owned();
                append_field(current.as_mut(), field.as_deref(), &text);
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t).into_owned();
                append_field(current.as_mut(), field.as_deref(), &text);
            }
            Event::End(e) => {
                if e.name().as_ref() == b"item" {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                } else {
                    field = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn append_field(entry: Option<&mut FeedEntry>, field: Option<&str>, text: &str) {
    let Some(entry) = entry else { return };
    let target = match field {
        Some("title") => &mut entry.title,
        Some("description") | Some("summary") => &mut entry.description,
        Some("link") => &mut entry.link,
        Some("pubDate") => &mut entry.pub_date,
        Some("category") => &mut entry.category,
        Some("guid") | Some("id") => &mut entry.guid,
        _ => return,
    };
    target.push_str(text);
}

/// Walks the feed URLs and returns the first non-empty parse. Every URL
/// failing or coming back empty yields an empty feed, not an error.
pub async fn fetch_warning_feed(client: &BomClient) -> WarningFeed {
    for url in WARNING_FEED_URLS {
        let body = match client.fetch_feed(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Warnings feed fetch failed for {url}: {e}");
                continue;
            }
        };
        match parse_feed_entries(&body) {
            Ok(entries) if !entries.is_empty() => {
                info!("Using warnings feed {url} ({} entries)", entries.len());
                return WarningFeed {
                    entries,
                    source_url: Some(url.to_string()),
                };
            }
            Ok(_) => continue,
            Err(e) => {
                warn!("Warnings feed parse failed for {url}: {e}");
                continue;
            }
        }
    }
    WarningFeed::default()
}

/// Turns feed entries into client-facing warnings, optionally enriching each
/// with a scraped detail payload. Detail fetches run sequentially and each
/// failure stays scoped to its own warning.
pub async fn build_warnings(
    client: &BomClient,
    feed: &WarningFeed,
    fetch_details: bool,
) -> Vec<Warning> {
    let mut warnings = Vec::with_capacity(feed.entries.len());
    for entry in &feed.entries {
        let title = collapse_whitespace(&entry.title);
        let kind = classify_warning(&title).to_string();
        let details = if fetch_details && !entry.link.is_empty() {
            Some(fetch_warning_details(client, &entry.link).await)
        } else {
            None
        };
        warnings.push(Warning {
            title,
            description: entry.description.clone(),
            link: entry.link.clone(),
            pub_date: entry.pub_date.clone(),
            category: entry.category.clone(),
            guid: entry.guid.clone(),
            kind,
            details,
        });
    }
    warnings
}

async fn fetch_warning_details(client: &BomClient, url: &str) -> DetailOutcome {
    match client.fetch_detail_page(url).await {
        Ok(html) => match product_text(&html) {
            Some(text) => DetailOutcome::Scraped(extract_details(&text)),
            None => DetailOutcome::Scraped(WarningDetails::default()),
        },
        Err(e) => DetailOutcome::Failed {
            error: format!("Failed to fetch details: {e}"),
        },
    }
}

/// Pulls the product text out of a warning detail page: the `product` div,
/// then the `content` div, then a bare `<pre>` block. Markup is stripped to
/// trimmed, non-empty lines.
pub fn product_text(html: &str) -> Option<String> {
    let container = PRODUCT_DIV_RE
        .captures(html)
        .or_else(|| CONTENT_DIV_RE.captures(html))
        .or_else(|| PRE_RE.captures(html))?;
    let inner = container.get(1)?.as_str();
    let stripped = TAG_RE.replace_all(inner, "\n");
    let decoded = decode_entities(&stripped);
    let lines: Vec<&str> = decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    Some(lines.join("\n"))
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Heuristic field extraction from stripped product text.
pub fn extract_details(text: &str) -> WarningDetails {
    let lines: Vec<&str> = text.lines().collect();
    let upper = text.to_uppercase();

    let warning_type = lines
        .iter()
        .take(5)
        .find(|line| {
            let u = line.to_uppercase();
            u.contains("WARNING") || u.contains("WEATHER")
        })
        .map(|line| line.trim().to_string());

    let affected_areas = lines
        .iter()
        .find_map(|line| AREA_RE.captures(line))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());

    let issue_time = lines
        .iter()
        .find_map(|line| ISSUE_TIME_RE.captures(line))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let severity = if upper.contains("SEVERE") {
        "Severe"
    } else if upper.contains("MODERATE") {
        "Moderate"
    } else if upper.contains("MINOR") {
        "Minor"
    } else {
        "Standard"
    };

    let next_issue = lines
        .iter()
        .find_map(|line| NEXT_ISSUE_RE.captures(line))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());

    let warning_message = MESSAGE_SECTION_HEADERS
        .iter()
        .find_map(|header| text.find(header))
        .map(|idx| {
            let excerpt: String = text[idx..].chars().take(500).collect();
            excerpt
                .split("\n\n")
                .next()
                .unwrap_or(excerpt.as_str())
                .to_string()
        });

    WarningDetails {
        full_text: Some(text.to_string()),
        warning_type,
        affected_areas,
        issue_time,
        severity: Some(severity.to_string()),
        next_issue,
        warning_message,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_follows_keyword_priority() {
        assert_eq!(classify_warning("Severe Weather Warning for Perth"), "Severe Weather");
        assert_eq!(classify_warning("Flood Watch"), "Flood");
        assert_eq!(classify_warning("Marine Wind Warning"), "Marine");
        assert_eq!(classify_warning("Sheep Graziers Alert"), "Agricultural");
        assert_eq!(classify_warning("Tropical Cyclone Advice"), "Tropical Cyclone");
        assert_eq!(classify_warning("Road Weather Alert"), "General");
    }

    #[test]
    fn marine_outranks_other_keywords() {
        // "marine" is checked first, even when "flood" also appears.
        assert_eq!(classify_warning("Marine and Flood Warning"), "Marine");
    }

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>WA Warnings</title>
    <item>
      <title>Severe Weather Warning
        for people in Perth</title>
      <description><![CDATA[Damaging winds expected.]]></description>
      <link>http://www.bom.gov.au/products/IDW21030.shtml</link>
      <pubDate>Wed, 01 May 2024 06:00:00 GMT</pubDate>
      <category>Warning</category>
      <guid>IDW21030-1</guid>
    </item>
    <item>
      <title>Flood Watch</title>
      <link>http://www.bom.gov.au/products/IDW20900.shtml</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn rss_items_are_parsed_with_their_fields() {
        let entries = parse_feed_entries(SAMPLE_RSS).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "Damaging winds expected.");
        assert_eq!(entries[0].guid, "IDW21030-1");
        assert_eq!(entries[1].title, "Flood Watch");
        assert!(entries[1].description.is_empty());
    }

    #[test]
    fn empty_feed_parses_to_no_entries() {
        let entries =
            parse_feed_entries("<rss><channel><title>WA</title></channel></rss>").unwrap();
        assert!(entries.is_empty());
    }

    const SAMPLE_TEXT: &str = "Severe Weather Warning\n\
For people in the Perth Metropolitan area.\n\
Issued at 4:30 pm Wednesday 1 May 2024\n\
WEATHER SITUATION: A strong cold front is approaching the west coast.\n\
Damaging winds with gusts to 100 km/h are possible.\n\
Next issue: The next warning will be issued by 11:00 pm WST.";

    #[test]
    fn detail_fields_are_extracted_from_product_text() {
        let details = extract_details(SAMPLE_TEXT);
        assert_eq!(details.warning_type.as_deref(), Some("Severe Weather Warning"));
        assert_eq!(
            details.affected_areas.as_deref(),
            Some("people in the Perth Metropolitan area")
        );
        assert_eq!(details.issue_time.as_deref(), Some("4:30 pm Wednesday"));
        assert_eq!(details.severity.as_deref(), Some("Severe"));
        assert_eq!(
            details.next_issue.as_deref(),
            Some("The next warning will be issued by 11:00 pm WST")
        );
        let message = details.warning_message.unwrap();
        assert!(message.starts_with("WEATHER SITUATION:"));
    }

    #[test]
    fn severity_defaults_to_standard() {
        let details = extract_details("Wind Warning\nGusty conditions expected.");
        assert_eq!(details.severity.as_deref(), Some("Standard"));
    }

    #[test]
    fn severity_priority_prefers_severe_over_minor() {
        let details = extract_details("Minor flooding, turning SEVERE overnight.");
        assert_eq!(details.severity.as_deref(), Some("Severe"));
    }

    #[test]
    fn product_text_falls_back_to_pre_block() {
        let html = "<html><body><pre>Flood Warning\nIssued at 9:00 am Monday</pre></body></html>";
        let text = product_text(html).unwrap();
        assert_eq!(text, "Flood Warning\nIssued at 9:00 am Monday");
    }

    #[test]
    fn product_div_takes_precedence_over_pre() {
        let html = r#"<div class="product">Primary <b>text</b></div><pre>fallback</pre>"#;
        assert_eq!(product_text(html).unwrap(), "Primary\ntext");
    }

    #[test]
    fn pages_without_a_known_container_yield_none() {
        assert!(product_text("<html><body><p>nothing here</p></body></html>").is_none());
    }
}
