//! The crawl-and-dedupe loop over venue × year.

use std::ops::RangeInclusive;

use chrono::{Datelike, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::abstracts::{abstracts_available, AbstractExtractor};
use super::client::HttpClient;
use super::dblp::parse_listing;
use crate::config::Settings;
use crate::db;
use crate::error::{Error, Result};
use crate::models::{NewPaper, UpsertOutcome};
use crate::utils::Venue;

#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Venues to crawl; empty means every venue.
    pub venues: Vec<Venue>,
    /// Restrict the crawl to these years (still clipped to each venue's
    /// start year and the current year).
    pub years: Option<RangeInclusive<i32>>,
    pub with_abstracts: bool,
    /// Parse and log, but don't write to the database.
    pub dry_run: bool,
    /// Delete stored papers of the selected venues/years before crawling.
    pub force: bool,
}

/// Papers seen on one listing page and what happened to them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearReport {
    pub found: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl YearReport {
    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Totals for a whole crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Listing pages fetched and parsed
    pub pages: usize,
    /// Editions dblp has no page for
    pub missing: usize,
    /// Editions skipped because of an error
    pub failed: Vec<(Venue, i32)>,
    pub removed: u64,
    pub papers: YearReport,
}

impl CrawlReport {
    fn absorb(&mut self, year: &YearReport) {
        self.pages += 1;
        self.papers.found += year.found;
        self.papers.inserted += year.inserted;
        self.papers.updated += year.updated;
        self.papers.unchanged += year.unchanged;
    }
}

pub struct Crawler {
    pool: SqlitePool,
    client: HttpClient,
    abstracts: AbstractExtractor,
    dblp_base_url: String,
}

impl Crawler {
    pub fn new(pool: SqlitePool, settings: &Settings) -> Result<Self> {
        let client = HttpClient::new(settings)?;
        Ok(Crawler {
            pool,
            abstracts: AbstractExtractor::new(client.clone()),
            client,
            dblp_base_url: settings.dblp_base_url.clone(),
        })
    }

    /// Crawl every selected venue and year up to the current year.
    pub async fn build_db(&self, options: &CrawlOptions) -> Result<CrawlReport> {
        self.build_db_until(options, Utc::now().year()).await
    }

    /// Same as [`Crawler::build_db`] with an explicit last year.
    pub async fn build_db_until(&self, options: &CrawlOptions, current_year: i32) -> Result<CrawlReport> {
        let mut report = CrawlReport::default();

        for venue in Venue::ALL {
            if !options.venues.is_empty() && !options.venues.contains(&venue) {
                continue;
            }
            info!("Building paper DB for {}", venue);

            let years = clip_years(venue.year_range(current_year), options.years.as_ref());

            if options.force && !options.dry_run {
                let selected = options.years.as_ref().map(|_| years.clone());
                report.removed += self.remove_existing(venue, selected).await?;
            }

            for year in years {
                match self.crawl_year(venue, year, options.with_abstracts, options.dry_run).await {
                    Ok(year_report) => {
                        debug!("Found {} papers at {}-{}", year_report.found, venue, year);
                        report.absorb(&year_report);
                    }
                    Err(Error::NotFound(url)) => {
                        info!("No {} edition listed for {} ({})", venue, year, url);
                        report.missing += 1;
                    }
                    Err(e) => {
                        warn!("Failed to obtain papers at {}-{}: {}", venue, year, e);
                        report.failed.push((venue, year));
                    }
                }
            }
        }

        Ok(report)
    }

    /// Fetch one edition's listing and store its papers.
    pub async fn crawl_year(&self, venue: Venue, year: i32, with_abstracts: bool, dry_run: bool) -> Result<YearReport> {
        let extract_abstracts = if with_abstracts && !abstracts_available(venue, year) {
            warn!("Skipping the abstract for {} {} because the website does not contain abstracts", venue, year);
            false
        } else {
            with_abstracts
        };

        let url = venue.listing_url(&self.dblp_base_url, year);
        let html = self.client.fetch_text(&url).await?;
        let entries = parse_listing(&html, &url)?;

        let mut report = YearReport::default();
        for entry in &entries {
            let abstract_text = if extract_abstracts {
                self.abstracts.get_abstract(venue, entry).await
            } else {
                String::new()
            };

            report.found += 1;
            let paper = NewPaper::new(venue, year, &entry.title, &entry.authors, &abstract_text);

            if dry_run {
                info!("  - {} ({}) [{} chars of abstract]", paper.title, paper.authors, abstract_text.len());
                continue;
            }

            let outcome = db::upsert_paper(&self.pool, &paper).await?;
            report.record(outcome);
        }

        Ok(report)
    }

    /// `years` is already clipped to the venue's crawlable range.
    async fn remove_existing(&self, venue: Venue, years: Option<RangeInclusive<i32>>) -> Result<u64> {
        let removed = match years {
            None => db::remove_papers(&self.pool, venue, None).await?,
            Some(years) if years.is_empty() => 0,
            Some(years) => db::remove_papers_in(&self.pool, venue, years).await?,
        };
        info!("Removed {} stored {} papers", removed, venue);
        Ok(removed)
    }
}

fn clip_years(range: RangeInclusive<i32>, wanted: Option<&RangeInclusive<i32>>) -> RangeInclusive<i32> {
    match wanted {
        Some(wanted) => (*range.start()).max(*wanted.start())..=(*range.end()).min(*wanted.end()),
        None => range,
    }
}
