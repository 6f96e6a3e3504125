//! Parser for dblp proceedings table-of-contents pages.
//!
//! A listing page (`/db/conf/<key>/<key><year>.html`) holds one
//! `li.inproceedings` entry per paper. Front matter, session headers and
//! the proceedings volume itself use other classes and are ignored.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{Error, Result};
use crate::utils::clean_whitespace;

/// One paper as listed on dblp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: String,
    pub authors: Vec<String>,
    /// Electronic-edition links (DOI, publisher page), in page order
    pub links: Vec<String>,
}

struct ListingSelectors {
    publ_list: Selector,
    entry: Selector,
    title: Selector,
    author: Selector,
    link: Selector,
}

impl ListingSelectors {
    fn new() -> Result<Self> {
        Ok(ListingSelectors {
            publ_list: selector("ul.publ-list")?,
            entry: selector("li.inproceedings")?,
            title: selector("span.title")?,
            author: selector(r#"span[itemprop="author"]"#)?,
            link: selector("nav.publ li.ee a[href]")?,
        })
    }
}

/// Parse a listing page fetched from `page_url`.
///
/// Fails with [`Error::Parse`] when the page has no publication list at all,
/// which usually means dblp served something other than a table of contents.
pub fn parse_listing(html: &str, page_url: &str) -> Result<Vec<ListingEntry>> {
    let selectors = ListingSelectors::new()?;
    let document = Html::parse_document(html);

    if document.select(&selectors.publ_list).next().is_none() {
        return Err(Error::Parse {
            url: page_url.to_string(),
            message: "no publication list on page".to_string(),
        });
    }

    let base = Url::parse(page_url).ok();

    let entries = document
        .select(&selectors.entry)
        .filter_map(|entry| parse_entry(entry, &selectors, base.as_ref()))
        .collect();

    Ok(entries)
}

fn parse_entry(entry: ElementRef<'_>, selectors: &ListingSelectors, base: Option<&Url>) -> Option<ListingEntry> {
    let title = entry
        .select(&selectors.title)
        .next()
        .map(|t| clean_title(&t.text().collect::<String>()))?;
    if title.is_empty() {
        return None;
    }

    let authors = entry
        .select(&selectors.author)
        .map(|a| clean_author(&a.text().collect::<String>()))
        .filter(|a| !a.is_empty())
        .collect();

    let mut links: Vec<String> = Vec::new();
    for anchor in entry.select(&selectors.link) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(link) = absolute_http_url(href, base) {
            if !links.contains(&link) {
                links.push(link);
            }
        }
    }

    Some(ListingEntry { title, authors, links })
}

/// dblp titles end with a period that is not part of the title.
fn clean_title(raw: &str) -> String {
    let title = clean_whitespace(raw);
    match title.strip_suffix('.') {
        Some(stripped) => stripped.trim_end().to_string(),
        None => title,
    }
}

/// Drop dblp's homonym suffix ("Wei Wang 0002").
fn clean_author(raw: &str) -> String {
    let name = clean_whitespace(raw);
    match name.rsplit_once(' ') {
        Some((rest, suffix)) if suffix.len() == 4 && suffix.chars().all(|c| c.is_ascii_digit()) => {
            rest.to_string()
        }
        _ => name,
    }
}

fn absolute_http_url(href: &str, base: Option<&Url>) -> Option<String> {
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base?.join(href).ok()?,
        Err(_) => return None,
    };

    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Parse {
        url: String::new(),
        message: format!("invalid selector '{}': {}", css, e),
    })
}
