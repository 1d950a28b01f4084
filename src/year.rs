//! Code for working with years.
use crate::input::is_sorted_and_unique;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;

/// The most years a range may cover
pub const MAX_YEAR_RANGE: u32 = 100;

/// Parse a single year, with a helpful error message
fn parse_year(s: &str) -> Result<u32> {
    s.trim()
        .parse::<u32>()
        .ok()
        .with_context(|| format!("Invalid year: {}", s.trim()))
}

/// Parse a string of years into a vector of u32 years.
///
/// The string can be either an inclusive range of at most [`MAX_YEAR_RANGE`] years (e.g. "11-25"),
/// a single year or a semicolon-separated list of years (e.g. "11;12;13" or "11; 12; 13").
///
/// # Arguments
///
/// - `s` - Input string to parse
///
/// # Returns
///
/// A [`Vec`] of years in strictly ascending order or an error.
pub fn parse_year_str(s: &str) -> Result<Vec<u32>> {
    let s = s.trim();
    ensure!(!s.is_empty(), "No years provided");

    if let Some((first, last)) = s.split_once('-') {
        let first = parse_year(first)?;
        let last = parse_year(last)?;
        ensure!(first <= last, "Invalid year range: {s}");
        ensure!(
            last - first < MAX_YEAR_RANGE,
            "Year range {s} covers more than {MAX_YEAR_RANGE} years"
        );
        return Ok((first..=last).collect());
    }

    let years: Vec<_> = s.split(';').map(parse_year).try_collect()?;

    ensure!(
        is_sorted_and_unique(&years),
        "Years must be in order and unique"
    );

    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;

    #[rstest]
    #[case("11", &[11])]
    #[case("11;12;13", &[11, 12, 13])]
    #[case("  11;  12", &[11, 12])] // whitespace should be stripped
    #[case("11-14", &[11, 12, 13, 14])]
    #[case(" 11 - 12 ", &[11, 12])]
    #[case("25-25", &[25])]
    fn test_parse_year_str_valid(#[case] input: &str, #[case] expected: &[u32]) {
        assert_eq!(parse_year_str(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_year_str_longest_range() {
        let years = parse_year_str("1-100").unwrap();
        assert_eq!(years.len(), 100);
        assert_eq!(years.first(), Some(&1));
        assert_eq!(years.last(), Some(&100));
    }

    #[rstest]
    #[case("", "No years provided")]
    #[case("a;12", "Invalid year: a")]
    #[case("12;11", "Years must be in order and unique")] // out of order
    #[case("11;12;11", "Years must be in order and unique")] // duplicate
    #[case("14-11", "Invalid year range: 14-11")]
    #[case("11-x", "Invalid year: x")]
    #[case("0-4294967295", "Year range 0-4294967295 covers more than 100 years")]
    #[case("1-101", "Year range 1-101 covers more than 100 years")]
    fn test_parse_year_str_invalid(#[case] input: &str, #[case] error_msg: &str) {
        assert_error!(parse_year_str(input), error_msg);
    }
}
