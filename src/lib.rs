pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod scrape;
pub mod search;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use models::{NewPaper, Paper, UpsertOutcome};
pub use scrape::{CrawlOptions, CrawlReport, Crawler, ListingEntry};
pub use search::{search_papers, SearchQuery};
pub use utils::{init_logging, Venue};
