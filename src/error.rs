use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("No page at {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unknown venue: {0}")]
    UnknownVenue(String),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Malformed page at {url}: {message}")]
    Parse { url: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
