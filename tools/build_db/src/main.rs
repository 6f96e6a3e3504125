use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Parser;
use tracing::{info, warn};

use papergrep::{db, init_logging, CrawlOptions, CrawlReport, Crawler, Settings, Venue};

#[derive(Parser, Debug)]
#[command(name = "build_db")]
#[command(about = "Scrape dblp conference listings into the local paper database")]
struct Args {
    /// Conference to crawl (repeatable, or 'all'): NDSS, "IEEE S&P", USENIX, CCS, OSDI, PLDI, SOSP
    #[arg(short, long = "venue")]
    venues: Vec<String>,

    /// Only this year
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    year: Option<i32>,

    /// First year to crawl
    #[arg(long)]
    from: Option<i32>,

    /// Last year to crawl (default: current year)
    #[arg(long)]
    to: Option<i32>,

    /// Also extract abstracts from the proceedings sites
    #[arg(long)]
    abstracts: bool,

    /// Dry run - don't commit to database
    #[arg(long)]
    dry_run: bool,

    /// Delete stored papers of the selected conferences/years before crawling
    #[arg(long)]
    force: bool,

    /// Debug logging
    #[arg(short = 'V', long)]
    verbose: bool,
}

fn crawl_options(args: &Args) -> Result<CrawlOptions> {
    let mut venues = Vec::new();
    for name in &args.venues {
        if name.eq_ignore_ascii_case("all") {
            venues.clear();
            break;
        }
        let venue: Venue = name.parse().with_context(|| format!("Unknown conference '{}'", name))?;
        if !venues.contains(&venue) {
            venues.push(venue);
        }
    }

    // an open start begins at the earliest selected venue's first edition
    let selected = if venues.is_empty() { &Venue::ALL[..] } else { &venues[..] };
    let earliest = selected.iter().map(|v| v.start_year()).min().unwrap_or_default();

    let years = match (args.year, args.from, args.to) {
        (Some(year), _, _) => Some(year..=year),
        (None, None, None) => None,
        (None, from, to) => Some(from.unwrap_or(earliest)..=to.unwrap_or(Utc::now().year())),
    };
    if let Some(years) = &years {
        if years.is_empty() {
            anyhow::bail!("Empty year range {}..={}", years.start(), years.end());
        }
    }

    Ok(CrawlOptions {
        venues,
        years,
        with_abstracts: args.abstracts,
        dry_run: args.dry_run,
        force: args.force,
    })
}

fn log_summary(report: &CrawlReport) {
    info!(
        "Crawled {} listing pages ({} editions not on dblp): {} papers found, {} new, {} updated, {} unchanged",
        report.pages,
        report.missing,
        report.papers.found,
        report.papers.inserted,
        report.papers.updated,
        report.papers.unchanged,
    );
    if report.removed > 0 {
        info!("Removed {} previously stored papers", report.removed);
    }
    if !report.failed.is_empty() {
        let failed: Vec<String> = report
            .failed
            .iter()
            .map(|(venue, year)| format!("{}-{}", venue, year))
            .collect();
        warn!("{} editions failed and were skipped: {}", failed.len(), failed.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(args.verbose);

    let options = crawl_options(&args)?;
    let settings = Settings::from_env().context("Invalid configuration")?;

    let pool = db::connect(&settings.database_url)
        .await
        .context("Failed to open paper database")?;
    info!("Connected to database");

    let crawler = Crawler::new(pool, &settings).context("Failed to set up HTTP client")?;
    let report = crawler.build_db(&options).await.context("Crawl aborted")?;

    log_summary(&report);
    info!("Scraping complete!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_means_every_venue() {
        let args = Args::try_parse_from(["build_db", "-v", "ndss", "-v", "all"]).unwrap();
        assert!(crawl_options(&args).unwrap().venues.is_empty());
    }

    #[test]
    fn test_venues_deduplicated() {
        let args = Args::try_parse_from(["build_db", "-v", "sp", "-v", "IEEE S&P", "--abstracts"]).unwrap();
        let options = crawl_options(&args).unwrap();
        assert_eq!(options.venues, vec![Venue::IeeeSp]);
        assert!(options.with_abstracts);
    }

    #[test]
    fn test_unknown_venue_is_an_error() {
        let args = Args::try_parse_from(["build_db", "-v", "ICSE"]).unwrap();
        assert!(crawl_options(&args).is_err());
    }

    #[test]
    fn test_year_selection() {
        let args = Args::try_parse_from(["build_db", "--year", "2019"]).unwrap();
        assert_eq!(crawl_options(&args).unwrap().years, Some(2019..=2019));

        let args = Args::try_parse_from(["build_db", "--from", "2020", "--to", "2018"]).unwrap();
        assert!(crawl_options(&args).is_err());
    }

    #[test]
    fn test_open_start_begins_at_first_edition() {
        let args = Args::try_parse_from(["build_db", "-v", "ndss", "--to", "2005", "--force"]).unwrap();
        let options = crawl_options(&args).unwrap();
        assert_eq!(options.years, Some(Venue::Ndss.start_year()..=2005));
        assert!(options.force);
    }
}
