use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use papergrep::{db, init_logging, search_papers, Paper, SearchQuery, Settings, Venue};

#[derive(Parser, Debug)]
#[command(name = "papergrep")]
#[command(about = "Search the local database of systems and security papers")]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find papers whose title (or abstract) contains all keywords
    Search(SearchArgs),
    /// Paper counts per conference and year
    Stats,
    /// Delete stored papers of a conference
    Purge {
        /// Conference (NDSS, "IEEE S&P", USENIX, CCS, OSDI, PLDI, SOSP)
        #[arg(long)]
        venue: Venue,

        /// Only this year
        #[arg(short, long)]
        year: Option<i32>,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Comma-separated keywords, e.g. "fuzz,kernel"
    #[arg(short, long)]
    keywords: String,

    /// Restrict to conferences (repeatable)
    #[arg(long = "venue")]
    venues: Vec<Venue>,

    /// Only this year
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    year: Option<i32>,

    /// First year to include
    #[arg(long)]
    from: Option<i32>,

    /// Last year to include
    #[arg(long)]
    to: Option<i32>,

    /// Match keywords against abstracts instead of titles
    #[arg(long = "abstract")]
    in_abstract: bool,

    /// Print each match's abstract
    #[arg(long)]
    show_abstract: bool,

    /// Print matches as JSON
    #[arg(long)]
    json: bool,
}

fn year_range(year: Option<i32>, from: Option<i32>, to: Option<i32>) -> Option<RangeInclusive<i32>> {
    match (year, from, to) {
        (Some(year), _, _) => Some(year..=year),
        (None, None, None) => None,
        (None, from, to) => Some(from.unwrap_or(i32::MIN)..=to.unwrap_or(i32::MAX)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::from_env().context("Invalid configuration")?;
    let pool = db::connect(&settings.database_url)
        .await
        .context("Failed to open paper database")?;

    match cli.command {
        Command::Search(args) => {
            let query = SearchQuery {
                keywords: SearchQuery::parse_keywords(&args.keywords),
                venues: args.venues,
                years: year_range(args.year, args.from, args.to),
                in_abstract: args.in_abstract,
            };
            if query.keywords.is_empty() {
                anyhow::bail!("No keywords given");
            }

            let papers = search_papers(&pool, &query).await.context("Search failed")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&papers)?);
            } else {
                print_papers(&papers, args.show_abstract);
            }
            info!("{} matching papers", papers.len());
        }
        Command::Stats => {
            let counts = db::count_by_conference(&pool).await.context("Failed to count papers")?;
            if counts.is_empty() {
                println!("The database is empty. Run build_db first.");
            }
            for count in counts {
                println!("{:<9} {} {:>5}", count.conference, count.year, count.papers);
            }
        }
        Command::Purge { venue, year } => {
            let removed = db::remove_papers(&pool, venue, year)
                .await
                .context("Failed to remove papers")?;
            println!("Removed {} papers of {}", removed, venue);
        }
    }

    Ok(())
}

fn print_papers(papers: &[Paper], show_abstract: bool) {
    for paper in papers {
        println!("{:<9} {}: {}", paper.conference, paper.year, paper.title);
        if show_abstract && !paper.abstract_text.is_empty() {
            for line in paper.abstract_text.lines() {
                println!("    {}", line);
            }
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range() {
        assert_eq!(year_range(None, None, None), None);
        assert_eq!(year_range(Some(2020), None, None), Some(2020..=2020));
        assert_eq!(year_range(None, Some(2015), None), Some(2015..=i32::MAX));
        assert_eq!(year_range(None, Some(2015), Some(2017)), Some(2015..=2017));
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from([
            "papergrep", "search", "-k", "fuzz,kernel", "--venue", "ndss", "--venue", "IEEE S&P",
        ])
        .unwrap();
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.venues, vec![Venue::Ndss, Venue::IeeeSp]);
                assert_eq!(args.keywords, "fuzz,kernel");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_venue() {
        assert!(Cli::try_parse_from(["papergrep", "purge", "--venue", "ICSE"]).is_err());
    }
}
