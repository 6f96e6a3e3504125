use std::ops::RangeInclusive;

use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::Result;
use crate::models::{NewPaper, Paper, UpsertOutcome};
use crate::utils::Venue;

/// Venue/year restriction for listing papers. Empty `venues` means all.
#[derive(Debug, Clone, Default)]
pub struct PaperFilter {
    pub venues: Vec<Venue>,
    pub years: Option<RangeInclusive<i32>>,
}

/// Number of stored papers for one edition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionCount {
    pub conference: String,
    pub year: i32,
    pub papers: i64,
}

/// Whether exactly this paper (including its abstract) is already stored.
pub async fn paper_exists(
    pool: &SqlitePool,
    conference: &str,
    year: i32,
    title: &str,
    abstract_text: &str,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM papers
         WHERE conference = ? AND year = ? AND title = ? AND abstract = ?",
    )
    .bind(conference)
    .bind(year)
    .bind(title)
    .bind(abstract_text)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Insert a paper, or refresh the stored row for the same
/// (conference, year, title).
///
/// An empty abstract never overwrites a stored one, so a crawl without
/// abstracts does not undo an earlier crawl with them.
pub async fn upsert_paper(pool: &SqlitePool, paper: &NewPaper) -> Result<UpsertOutcome> {
    let existing = sqlx::query(
        "SELECT id, authors, abstract FROM papers
         WHERE conference = ? AND year = ? AND title = ?",
    )
    .bind(&paper.conference)
    .bind(paper.year)
    .bind(&paper.title)
    .fetch_optional(pool)
    .await?;

    let now = Utc::now();

    let Some(row) = existing else {
        sqlx::query(
            "INSERT INTO papers (conference, year, title, authors, abstract, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&paper.conference)
        .bind(paper.year)
        .bind(&paper.title)
        .bind(&paper.authors)
        .bind(&paper.abstract_text)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        debug!("Added paper '{}' ({} {})", paper.title, paper.conference, paper.year);
        return Ok(UpsertOutcome::Inserted);
    };

    let id: i64 = row.try_get("id")?;
    let stored_authors: String = row.try_get("authors")?;
    let stored_abstract: String = row.try_get("abstract")?;

    let abstract_text = if paper.abstract_text.is_empty() {
        stored_abstract.as_str()
    } else {
        paper.abstract_text.as_str()
    };

    if stored_authors == paper.authors && stored_abstract == abstract_text {
        return Ok(UpsertOutcome::Unchanged);
    }

    sqlx::query("UPDATE papers SET authors = ?, abstract = ?, updated_at = ? WHERE id = ?")
        .bind(&paper.authors)
        .bind(abstract_text)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    debug!("Updated paper '{}' ({} {})", paper.title, paper.conference, paper.year);
    Ok(UpsertOutcome::Updated)
}

/// Delete a venue's papers, optionally only those of `year`.
pub async fn remove_papers(pool: &SqlitePool, venue: Venue, year: Option<i32>) -> Result<u64> {
    let result = match year {
        Some(year) => {
            sqlx::query("DELETE FROM papers WHERE conference = ? AND year = ?")
                .bind(venue.name())
                .bind(year)
                .execute(pool)
                .await?
        }
        None => {
            sqlx::query("DELETE FROM papers WHERE conference = ?")
                .bind(venue.name())
                .execute(pool)
                .await?
        }
    };

    Ok(result.rows_affected())
}

/// Delete a venue's papers published within `years`.
pub async fn remove_papers_in(pool: &SqlitePool, venue: Venue, years: RangeInclusive<i32>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM papers WHERE conference = ? AND year BETWEEN ? AND ?")
        .bind(venue.name())
        .bind(*years.start())
        .bind(*years.end())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn list_papers(pool: &SqlitePool, filter: &PaperFilter) -> Result<Vec<Paper>> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT id, conference, year, title, authors, abstract, created_at, updated_at
         FROM papers WHERE 1 = 1",
    );
    push_filter(&mut query, filter);
    query.push(" ORDER BY year DESC, conference, title");

    let papers = query.build_query_as::<Paper>().fetch_all(pool).await?;
    Ok(papers)
}

/// Paper counts per (conference, year), newest editions first.
pub async fn count_by_conference(pool: &SqlitePool) -> Result<Vec<EditionCount>> {
    let rows = sqlx::query(
        "SELECT conference, year, COUNT(*) AS papers
         FROM papers
         GROUP BY conference, year
         ORDER BY conference, year DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<EditionCount> {
            Ok(EditionCount {
                conference: row.try_get("conference")?,
                year: row.try_get("year")?,
                papers: row.try_get("papers")?,
            })
        })
        .collect()
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &PaperFilter) {
    if !filter.venues.is_empty() {
        query.push(" AND conference IN (");
        let mut separated = query.separated(", ");
        for venue in &filter.venues {
            separated.push_bind(venue.name());
        }
        separated.push_unseparated(")");
    }

    if let Some(years) = &filter.years {
        query.push(" AND year BETWEEN ");
        query.push_bind(*years.start());
        query.push(" AND ");
        query.push_bind(*years.end());
    }
}
