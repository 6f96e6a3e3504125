use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::utils::Venue;

/// Separator used when authors are stored in a single column.
pub const AUTHOR_SEPARATOR: &str = ", ";

/// A stored paper
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Paper {
    pub id: i64,
    /// Venue display name, e.g. `IEEE S&P`
    pub conference: String,
    pub year: i32,
    pub title: String,
    pub authors: String,
    #[sqlx(rename = "abstract")]
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Paper {
    pub fn venue(&self) -> Option<Venue> {
        Venue::from_name(&self.conference)
    }

    pub fn author_list(&self) -> Vec<&str> {
        self.authors
            .split(AUTHOR_SEPARATOR)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect()
    }
}

/// Paper to be written by the crawler
#[derive(Debug, Clone, PartialEq)]
pub struct NewPaper {
    pub conference: String,
    pub year: i32,
    pub title: String,
    pub authors: String,
    pub abstract_text: String,
}

impl NewPaper {
    pub fn new(venue: Venue, year: i32, title: &str, authors: &[String], abstract_text: &str) -> Self {
        NewPaper {
            conference: venue.name().to_string(),
            year,
            title: title.to_string(),
            authors: authors.join(AUTHOR_SEPARATOR),
            abstract_text: abstract_text.to_string(),
        }
    }
}

/// What an upsert did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}
