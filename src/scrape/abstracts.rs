//! Per-venue abstract extraction from the proceedings sites that dblp links to.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::client::HttpClient;
use super::dblp::{selector, ListingEntry};
use crate::error::Result;
use crate::utils::{clean_whitespace, Venue};

/// Generic meta descriptions shorter than this are usually site blurbs.
const MIN_META_DESCRIPTION_LEN: usize = 120;

/// Where a venue's proceedings site keeps the abstract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbstractStrategy {
    /// ndss-symposium.org paper pages
    NdssPaperPage,
    /// usenix.org conference presentation pages
    UsenixPresentation,
    /// ieeexplore.ieee.org document pages
    IeeeXplore,
    /// dl.acm.org DOI landing pages
    AcmDigitalLibrary,
}

impl AbstractStrategy {
    pub fn for_venue(venue: Venue) -> Self {
        match venue {
            Venue::Ndss => AbstractStrategy::NdssPaperPage,
            Venue::Usenix | Venue::Osdi => AbstractStrategy::UsenixPresentation,
            Venue::IeeeSp => AbstractStrategy::IeeeXplore,
            Venue::Ccs | Venue::Pldi | Venue::Sosp => AbstractStrategy::AcmDigitalLibrary,
        }
    }

    /// Pull the abstract out of a fetched page. Falls back to the page's
    /// citation/description metadata when the venue-specific markup is absent.
    pub fn extract(self, html: &str) -> Result<Option<String>> {
        let document = Html::parse_document(html);

        let specific = match self {
            AbstractStrategy::NdssPaperPage => extract_ndss(&document)?,
            AbstractStrategy::UsenixPresentation => extract_usenix(&document)?,
            AbstractStrategy::IeeeXplore => extract_ieee_metadata(html),
            AbstractStrategy::AcmDigitalLibrary => extract_acm(&document)?,
        };

        match specific.filter(|a| !a.is_empty()) {
            Some(found) => Ok(Some(found)),
            None => extract_meta(&document),
        }
    }
}

/// The NDSS site has no abstracts for the 2016 and 2018 editions.
pub fn abstracts_available(venue: Venue, year: i32) -> bool {
    !(venue == Venue::Ndss && (year == 2016 || year == 2018))
}

/// Fetches the pages behind a listing entry's links and extracts the
/// abstract with the venue's strategy.
#[derive(Debug, Clone)]
pub struct AbstractExtractor {
    client: HttpClient,
}

impl AbstractExtractor {
    pub fn new(client: HttpClient) -> Self {
        AbstractExtractor { client }
    }

    /// Returns the first abstract found behind the entry's links, or an empty
    /// string. Fetch and parse failures are logged, never returned.
    pub async fn get_abstract(&self, venue: Venue, entry: &ListingEntry) -> String {
        let strategy = AbstractStrategy::for_venue(venue);

        for link in entry.links.iter().filter(|l| !is_dblp_link(l)) {
            let html = match self.client.fetch_text(link).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Failed to fetch abstract page for '{}': {}", entry.title, e);
                    continue;
                }
            };

            match strategy.extract(&html) {
                Ok(Some(found)) => return found,
                Ok(None) => debug!("No abstract at {} ({:?})", link, strategy),
                Err(e) => warn!("Failed to parse abstract page {}: {}", link, e),
            }
        }

        debug!("No abstract found for '{}'", entry.title);
        String::new()
    }
}

fn is_dblp_link(link: &str) -> bool {
    Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(|h| h == "dblp.org" || h.ends_with(".dblp.org") || h == "dblp.uni-trier.de"))
        .unwrap_or(false)
}

fn element_text(element: ElementRef<'_>) -> String {
    clean_whitespace(&element.text().collect::<String>())
}

fn join_paragraphs(paragraphs: Vec<String>) -> Option<String> {
    let paragraphs: Vec<String> = paragraphs.into_iter().filter(|p| !p.is_empty()).collect();
    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n"))
    }
}

fn extract_ndss(document: &Html) -> Result<Option<String>> {
    let container = selector("div.paper-data")?;
    let paragraph = selector("p")?;

    let Some(data) = document.select(&container).next() else {
        return Ok(None);
    };

    // first paragraph is the author line
    let paragraphs = data.select(&paragraph).skip(1).map(element_text).collect();

    Ok(join_paragraphs(paragraphs))
}

fn extract_usenix(document: &Html) -> Result<Option<String>> {
    let container = selector("div.field-name-field-paper-description")?;
    let paragraph = selector("p")?;

    let Some(description) = document.select(&container).next() else {
        return Ok(None);
    };

    let paragraphs: Vec<String> = description.select(&paragraph).map(element_text).collect();
    if paragraphs.iter().all(|p| p.is_empty()) {
        return Ok(Some(element_text(description)).filter(|t| !t.is_empty()));
    }
    Ok(join_paragraphs(paragraphs))
}

fn extract_acm(document: &Html) -> Result<Option<String>> {
    let current = selector(r#"section#abstract div[role="paragraph"]"#)?;
    let legacy = selector("div.abstractSection p")?;

    let paragraphs: Vec<String> = document.select(&current).map(element_text).collect();
    if let Some(found) = join_paragraphs(paragraphs) {
        return Ok(Some(found));
    }

    let paragraphs = document.select(&legacy).map(element_text).collect();
    Ok(join_paragraphs(paragraphs))
}

static IEEE_METADATA: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"xplGlobal\.document\.metadata\s*=\s*").ok());

/// IEEE Xplore embeds the document record as JSON in a script:
/// `xplGlobal.document.metadata={...};`
fn extract_ieee_metadata(html: &str) -> Option<String> {
    let start = IEEE_METADATA.as_ref()?.find(html)?.end();
    // the object may be followed by more script on the same line
    let metadata: serde_json::Value = serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<serde_json::Value>()
        .next()?
        .ok()?;
    let text = metadata.get("abstract")?.as_str()?;
    Some(clean_whitespace(text)).filter(|t| !t.is_empty())
}

fn extract_meta(document: &Html) -> Result<Option<String>> {
    let citation = selector(r#"meta[name="citation_abstract"], meta[name="dc.Description"]"#)?;
    let description = selector(r#"meta[property="og:description"], meta[name="description"]"#)?;

    let content = |sel: &Selector| {
        document
            .select(sel)
            .filter_map(|m| m.value().attr("content"))
            .map(clean_whitespace)
            .find(|c| !c.is_empty())
    };

    if let Some(found) = content(&citation) {
        return Ok(Some(found));
    }
    Ok(content(&description).filter(|d| d.chars().count() >= MIN_META_DESCRIPTION_LEN))
}
