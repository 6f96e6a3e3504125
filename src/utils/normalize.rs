//! Text normalization for scraped titles and keyword matching.
//!
//! Scraped text is cleaned with [`clean_whitespace`] before it is stored.
//! Searches compare [`fold_text`] forms so that "Schrödinger" matches
//! "schrodinger" and line breaks inside titles do not matter.

use unicode_normalization::UnicodeNormalization;

/// Collapse runs of whitespace (including newlines and non-breaking spaces)
/// into single spaces and trim the ends.
///
/// # Examples
///
/// ```
/// use papergrep::utils::clean_whitespace;
///
/// assert_eq!(clean_whitespace("  Fuzzing\n   the   Kernel "), "Fuzzing the Kernel");
/// ```
pub fn clean_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Fold text for matching.
///
/// 1. Replace letters that don't decompose (ł, ø, æ, ß, ...)
/// 2. Unicode NFD, then drop combining marks
/// 3. Lowercase
/// 4. Collapse whitespace
///
/// # Examples
///
/// ```
/// use papergrep::utils::fold_text;
///
/// assert_eq!(fold_text("Schrödinger's  Cat"), "schrodinger's cat");
/// assert_eq!(fold_text("Łukasz"), "lukasz");
/// ```
pub fn fold_text(text: &str) -> String {
    let replaced = replace_special_chars(text);

    let stripped = replaced
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    clean_whitespace(&stripped)
}

/// True when every keyword occurs in `haystack` after folding both sides.
/// Blank keywords are ignored; a keyword list with nothing left matches
/// everything.
///
/// # Examples
///
/// ```
/// use papergrep::utils::contains_all;
///
/// let title = "Large-Scale Fuzzing of the Linux Kernel";
/// assert!(contains_all(title, &["fuzz", "KERNEL"]));
/// assert!(!contains_all(title, &["fuzz", "browser"]));
/// ```
pub fn contains_all<S: AsRef<str>>(haystack: &str, keywords: &[S]) -> bool {
    let folded = fold_text(haystack);
    keywords
        .iter()
        .map(|k| fold_text(k.as_ref()))
        .filter(|k| !k.is_empty())
        .all(|k| folded.contains(&k))
}

fn replace_special_chars(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'Ł' => 'L',
            'ł' => 'l',
            'Ø' => 'O',
            'ø' => 'o',
            'Æ' => 'A',
            'æ' => 'a',
            'ß' => 's',
            'Ð' | 'Đ' => 'D',
            'ð' | 'đ' => 'd',
            'Þ' => 'T',
            'þ' => 't',
            'ı' => 'i',
            // typographic punctuation common in dblp titles
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2010}' | '\u{2011}' | '\u{2013}' | '\u{2014}' => '-',
            _ => c,
        })
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    // See: https://unicode.org/charts/PDF/U0300.pdf
    matches!(c,
        '\u{0300}'..='\u{036F}' |
        '\u{1AB0}'..='\u{1AFF}' |
        '\u{1DC0}'..='\u{1DFF}' |
        '\u{20D0}'..='\u{20FF}' |
        '\u{FE20}'..='\u{FE2F}'
    )
}
