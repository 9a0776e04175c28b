//! Symbolic cost normalization
//!
//! Card text writes costs and actions as bracketed symbols: `{2}{R}`,
//! `{W/U}`, `{T}`. General-purpose embedding models read those poorly, so
//! before embedding they are rewritten into words.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Spelled-out generic costs. Larger numbers keep their digits.
const NUMBER_WORDS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

/// Symbol (without braces) to phrase
pub const SYMBOLS: &[(&str, &str)] = &[
    // basic
    ("W", "white"),
    ("U", "blue"),
    ("B", "black"),
    ("R", "red"),
    ("G", "green"),
    ("C", "colorless"),
    ("S", "snow"),
    ("X", "X"),
    ("Y", "Y"),
    ("Z", "Z"),
    // actions and counters
    ("T", "tap"),
    ("Q", "untap"),
    ("E", "energy"),
    ("TK", "ticket"),
    ("P", "phyrexian"),
    // half and unbounded
    ("½", "half"),
    ("HW", "half white"),
    ("HR", "half red"),
    ("∞", "infinity"),
    // hybrid
    ("W/U", "white or blue"),
    ("W/B", "white or black"),
    ("U/B", "blue or black"),
    ("U/R", "blue or red"),
    ("B/R", "black or red"),
    ("B/G", "black or green"),
    ("R/G", "red or green"),
    ("R/W", "red or white"),
    ("G/W", "green or white"),
    ("G/U", "green or blue"),
    // generic hybrid
    ("2/W", "two generic or white"),
    ("2/U", "two generic or blue"),
    ("2/B", "two generic or black"),
    ("2/R", "two generic or red"),
    ("2/G", "two generic or green"),
    // colorless hybrid
    ("C/W", "colorless or white"),
    ("C/U", "colorless or blue"),
    ("C/B", "colorless or black"),
    ("C/R", "colorless or red"),
    ("C/G", "colorless or green"),
    // phyrexian
    ("W/P", "phyrexian white"),
    ("U/P", "phyrexian blue"),
    ("B/P", "phyrexian black"),
    ("R/P", "phyrexian red"),
    ("G/P", "phyrexian green"),
    ("C/P", "phyrexian colorless"),
    // hybrid phyrexian
    ("W/U/P", "phyrexian white or blue"),
    ("W/B/P", "phyrexian white or black"),
    ("U/B/P", "phyrexian blue or black"),
    ("U/R/P", "phyrexian blue or red"),
    ("B/R/P", "phyrexian black or red"),
    ("B/G/P", "phyrexian black or green"),
    ("R/G/P", "phyrexian red or green"),
    ("R/W/P", "phyrexian red or white"),
    ("G/W/P", "phyrexian green or white"),
    ("G/U/P", "phyrexian green or blue"),
];

fn generic_cost() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("generic cost pattern is valid"))
}

/// Bracketed tokens ordered by descending length, so composites are
/// replaced before anything shorter.
pub fn symbol_table() -> &'static [(String, &'static str)] {
    static TABLE: OnceLock<Vec<(String, &'static str)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table: Vec<(String, &'static str)> = SYMBOLS
            .iter()
            .map(|(symbol, phrase)| (format!("{{{symbol}}}"), *phrase))
            .collect();
        table.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        table
    })
}

fn number_word(digits: &str) -> &str {
    digits
        .parse::<usize>()
        .ok()
        .and_then(|n| NUMBER_WORDS.get(n).copied())
        .unwrap_or(digits)
}

/// Rewrite bracketed cost and action symbols into words.
///
/// `{2}{R}` becomes `two red`, `{W/U}` becomes `white or blue`. Numbers past
/// twenty keep their digits (`{15}` becomes `15`). Unknown symbols are left
/// as they are. Whitespace is collapsed and the result trimmed.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut out = generic_cost()
        .replace_all(text, |caps: &Captures| format!(" {} ", number_word(&caps[1])))
        .into_owned();

    for (token, phrase) in symbol_table() {
        if out.contains(token.as_str()) {
            out = out.replace(token.as_str(), &format!(" {phrase} "));
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`normalize`] over an optional value; `None` stays `None`.
pub fn normalize_opt(text: Option<&str>) -> Option<String> {
    text.map(normalize)
}
