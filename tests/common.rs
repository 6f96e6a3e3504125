#![allow(dead_code)]

use std::time::Duration;

use papergrep::{db, Settings};
use sqlx::SqlitePool;

/// Create an empty in-memory paper database
pub async fn create_test_pool() -> SqlitePool {
    db::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool")
}

/// Settings pointing the crawler at a mock dblp server, without delays
pub fn test_settings(dblp_base_url: &str) -> Settings {
    Settings {
        database_url: "sqlite::memory:".to_string(),
        dblp_base_url: dblp_base_url.to_string(),
        user_agent: "papergrep-tests".to_string(),
        timeout: Duration::from_secs(5),
        request_delay: Duration::ZERO,
    }
}

pub struct Entry<'a> {
    pub title: &'a str,
    pub authors: &'a [&'a str],
    pub links: Vec<String>,
}

/// A dblp table-of-contents page in the shape dblp serves it
pub fn listing_page(entries: &[Entry<'_>]) -> String {
    let mut items = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let links: String = entry
            .links
            .iter()
            .map(|l| format!(r#"<li class="ee"><a href="{}" itemprop="url">electronic edition</a></li>"#, l))
            .collect();
        let authors: Vec<String> = entry
            .authors
            .iter()
            .map(|a| format!(r#"<span itemprop="author" itemscope><a href="/pid/1"><span itemprop="name">{}</span></a></span>"#, a))
            .collect();

        items.push_str(&format!(
            r#"<li class="entry inproceedings toc" id="conf/test/Paper{i}">
  <nav class="publ"><ul><li class="drop-down"><div class="body"><ul>{links}</ul></div></li></ul></nav>
  <cite class="data" itemprop="headline">{authors}:<br> <span class="title" itemprop="name">{title}.</span></cite>
</li>
"#,
            i = i,
            links = links,
            authors = authors.join(", "),
            title = entry.title,
        ));
    }

    format!(
        r#"<!DOCTYPE html><html><body><div id="main">
<header class="h2"><h2>Technical Papers</h2></header>
<ul class="publ-list">
{}</ul>
</div></body></html>"#,
        items
    )
}

/// An ndss-symposium.org paper page
pub fn ndss_paper_page(abstract_text: &str) -> String {
    format!(
        r#"<html><body><div class="paper-data">
<p><strong>Someone (Somewhere)</strong></p>
<p>{}</p>
</div></body></html>"#,
        abstract_text
    )
}
