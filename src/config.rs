use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_DB_PATH: &str = "data/papers.db";
pub const DEFAULT_DBLP_BASE_URL: &str = "https://dblp.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

/// Runtime settings, read from the environment (and `.env` via dotenvy in
/// the binaries).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub dblp_base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub request_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: sqlite_url(Path::new(DEFAULT_DB_PATH)),
            dblp_base_url: DEFAULT_DBLP_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Settings::default();

        let database_url = match (get("DATABASE_URL"), get("PAPERGREP_DB")) {
            (Some(url), _) => url,
            (None, Some(path)) => sqlite_url(Path::new(&path)),
            (None, None) => defaults.database_url,
        };

        let timeout = match get("PAPERGREP_HTTP_TIMEOUT_SECS") {
            Some(raw) => match parse_number("PAPERGREP_HTTP_TIMEOUT_SECS", &raw)? {
                0 => {
                    return Err(Error::Config {
                        message: "PAPERGREP_HTTP_TIMEOUT_SECS must be at least 1".to_string(),
                    })
                }
                secs => Duration::from_secs(secs),
            },
            None => defaults.timeout,
        };

        let request_delay = match get("PAPERGREP_REQUEST_DELAY_MS") {
            Some(raw) => Duration::from_millis(parse_number("PAPERGREP_REQUEST_DELAY_MS", &raw)?),
            None => defaults.request_delay,
        };

        Ok(Settings {
            database_url,
            dblp_base_url: get("DBLP_BASE_URL").unwrap_or(defaults.dblp_base_url),
            user_agent: get("PAPERGREP_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout,
            request_delay,
        })
    }
}

/// Connection string for a SQLite database file.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use papergrep::config::sqlite_url;
///
/// assert_eq!(sqlite_url(Path::new("data/papers.db")), "sqlite://data/papers.db");
/// ```
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.display())
}

fn default_user_agent() -> String {
    format!("papergrep/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_number(key: &str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| Error::Config {
        message: format!("{} must be a non-negative integer, got '{}'", key, raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.database_url, "sqlite://data/papers.db");
        assert_eq!(settings.dblp_base_url, "https://dblp.org");
        assert!(settings.user_agent.starts_with("papergrep/"));
        assert_eq!(settings.request_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_db_path_becomes_url() {
        let settings = Settings::from_lookup(lookup_from(&[("PAPERGREP_DB", "/tmp/p.db")])).unwrap();
        assert_eq!(settings.database_url, "sqlite:///tmp/p.db");
    }

    #[test]
    fn test_database_url_wins_over_path() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("PAPERGREP_DB", "/tmp/p.db"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();
        assert_eq!(settings.database_url, "sqlite::memory:");
    }

    #[test]
    fn test_empty_values_are_unset() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", ""),
            ("DBLP_BASE_URL", "  "),
        ]))
        .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_numeric_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("PAPERGREP_HTTP_TIMEOUT_SECS", "5"),
            ("PAPERGREP_REQUEST_DELAY_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.request_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_number() {
        let err = Settings::from_lookup(lookup_from(&[("PAPERGREP_REQUEST_DELAY_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("PAPERGREP_REQUEST_DELAY_MS"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Settings::from_lookup(lookup_from(&[("PAPERGREP_HTTP_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("PAPERGREP_HTTP_TIMEOUT_SECS"));
    }
}
