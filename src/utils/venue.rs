//! Venue table for the crawled conferences
//!
//! Each venue is stored under its display name (e.g. `IEEE S&P`) and listed on
//! dblp under a short key (e.g. `sp`).

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::Error;

/// First year crawled when a venue does not override it.
pub const DEFAULT_START_YEAR: i32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Venue {
    Ndss,
    IeeeSp,
    Usenix,
    Ccs,
    Osdi,
    Pldi,
    Sosp,
}

impl Venue {
    /// All venues in crawl order.
    pub const ALL: [Venue; 7] = [
        Venue::Ndss,
        Venue::IeeeSp,
        Venue::Usenix,
        Venue::Ccs,
        Venue::Osdi,
        Venue::Pldi,
        Venue::Sosp,
    ];

    /// Name stored in the `conference` column.
    pub fn name(self) -> &'static str {
        match self {
            Venue::Ndss => "NDSS",
            Venue::IeeeSp => "IEEE S&P",
            Venue::Usenix => "USENIX",
            Venue::Ccs => "CCS",
            Venue::Osdi => "OSDI",
            Venue::Pldi => "PLDI",
            Venue::Sosp => "SOSP",
        }
    }

    pub fn dblp_key(self) -> &'static str {
        match self {
            Venue::Ndss => "ndss",
            Venue::IeeeSp => "sp",
            Venue::Usenix => "uss",
            Venue::Ccs => "ccs",
            Venue::Osdi => "osdi",
            Venue::Pldi => "pldi",
            Venue::Sosp => "sosp",
        }
    }

    /// PLDI and SOSP go back further on dblp but earlier editions are skipped.
    pub fn start_year(self) -> i32 {
        match self {
            Venue::Pldi | Venue::Sosp => 2000,
            _ => DEFAULT_START_YEAR,
        }
    }

    /// Years to crawl, from the venue's start year up to `current_year`.
    pub fn year_range(self, current_year: i32) -> RangeInclusive<i32> {
        self.start_year()..=current_year
    }

    /// dblp table-of-contents page for one edition.
    ///
    /// # Examples
    /// ```
    /// use papergrep::Venue;
    ///
    /// assert_eq!(
    ///     Venue::IeeeSp.listing_url("https://dblp.org", 2021),
    ///     "https://dblp.org/db/conf/sp/sp2021.html"
    /// );
    /// ```
    pub fn listing_url(self, base_url: &str, year: i32) -> String {
        let key = self.dblp_key();
        format!("{}/db/conf/{}/{}{}.html", base_url.trim_end_matches('/'), key, key, year)
    }

    /// Look up a venue by the exact name stored in the database.
    pub fn from_name(name: &str) -> Option<Venue> {
        Venue::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Parse user input: display name, dblp key or a common alias, any case.
    ///
    /// # Examples
    /// ```
    /// use papergrep::Venue;
    ///
    /// assert_eq!(Venue::parse("ieee s&p"), Some(Venue::IeeeSp));
    /// assert_eq!(Venue::parse("uss"), Some(Venue::Usenix));
    /// assert_eq!(Venue::parse("ICSE"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Venue> {
        let wanted = input.trim().to_uppercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(venue) = Venue::ALL
            .into_iter()
            .find(|v| v.name() == wanted || v.dblp_key().to_uppercase() == wanted)
        {
            return Some(venue);
        }

        match wanted.as_str() {
            "SP" | "S&P" | "IEEESP" | "OAKLAND" => Some(Venue::IeeeSp),
            "USENIX SECURITY" | "USENIXSEC" => Some(Venue::Usenix),
            _ => None,
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Venue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Venue::parse(s).ok_or_else(|| Error::UnknownVenue(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names() {
        for venue in Venue::ALL {
            assert_eq!(Venue::parse(venue.name()), Some(venue));
        }
    }

    #[test]
    fn test_parse_dblp_keys() {
        assert_eq!(Venue::parse("ndss"), Some(Venue::Ndss));
        assert_eq!(Venue::parse("sp"), Some(Venue::IeeeSp));
        assert_eq!(Venue::parse("uss"), Some(Venue::Usenix));
        assert_eq!(Venue::parse("SOSP"), Some(Venue::Sosp));
    }

    #[test]
    fn test_parse_aliases_and_case() {
        assert_eq!(Venue::parse("  osdi "), Some(Venue::Osdi));
        assert_eq!(Venue::parse("s&p"), Some(Venue::IeeeSp));
        assert_eq!(Venue::parse("Usenix"), Some(Venue::Usenix));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Venue::parse(""), None);
        assert_eq!(Venue::parse("ICSE"), None);
        assert!(matches!("FSE".parse::<Venue>(), Err(Error::UnknownVenue(_))));
    }

    #[test]
    fn test_from_name_is_exact() {
        assert_eq!(Venue::from_name("IEEE S&P"), Some(Venue::IeeeSp));
        assert_eq!(Venue::from_name("ieee s&p"), None);
    }

    #[test]
    fn test_listing_url() {
        assert_eq!(
            Venue::Usenix.listing_url("https://dblp.org/", 2019),
            "https://dblp.org/db/conf/uss/uss2019.html"
        );
        assert_eq!(
            Venue::Ndss.listing_url("http://127.0.0.1:5000", 2020),
            "http://127.0.0.1:5000/db/conf/ndss/ndss2020.html"
        );
    }

    #[test]
    fn test_year_range() {
        let years = Venue::Ccs.year_range(2003);
        assert_eq!(years.collect::<Vec<_>>(), vec![2000, 2001, 2002, 2003]);
        assert!(Venue::Osdi.year_range(1999).next().is_none());
    }

    #[test]
    fn test_order_matches_table() {
        let mut sorted = Venue::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Venue::ALL.to_vec());
        assert_eq!(Venue::ALL[0], Venue::Ndss);
        assert_eq!(Venue::ALL[6], Venue::Sosp);
    }
}
