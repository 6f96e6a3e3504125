pub mod abstracts;
pub mod client;
pub mod crawler;
pub mod dblp;

pub use abstracts::{abstracts_available, AbstractExtractor, AbstractStrategy};
pub use client::HttpClient;
pub use crawler::{CrawlOptions, CrawlReport, Crawler, YearReport};
pub use dblp::{parse_listing, ListingEntry};
