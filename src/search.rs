//! Keyword search over the local paper database.

use std::ops::RangeInclusive;

use sqlx::SqlitePool;

use crate::db::{self, PaperFilter};
use crate::error::Result;
use crate::models::Paper;
use crate::utils::{contains_all, Venue};

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Every keyword has to match.
    pub keywords: Vec<String>,
    pub venues: Vec<Venue>,
    pub years: Option<RangeInclusive<i32>>,
    /// Match against the abstract instead of the title.
    pub in_abstract: bool,
}

impl SearchQuery {
    /// Split a comma-separated keyword argument (`"fuzz,kernel"`).
    pub fn parse_keywords(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn matches(&self, paper: &Paper) -> bool {
        let haystack = if self.in_abstract {
            &paper.abstract_text
        } else {
            &paper.title
        };
        contains_all(haystack, &self.keywords)
    }
}

/// Papers matching `query`, newest first, then in venue table order.
pub async fn search_papers(pool: &SqlitePool, query: &SearchQuery) -> Result<Vec<Paper>> {
    let filter = PaperFilter {
        venues: query.venues.clone(),
        years: query.years.clone(),
    };

    let mut papers: Vec<Paper> = db::list_papers(pool, &filter)
        .await?
        .into_iter()
        .filter(|p| query.matches(p))
        .collect();

    sort_papers(&mut papers);
    Ok(papers)
}

fn sort_papers(papers: &mut [Paper]) {
    papers.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| a.venue().cmp(&b.venue()))
            .then_with(|| a.title.cmp(&b.title))
    });
}
