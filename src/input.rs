//! Common routines for handling input data.
use crate::units::Dimensionless;
use anyhow::{Context, Result};
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fmt::Display;
use std::fs;
use std::path::Path;

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a value, checking that it is between 0 and 1 (inclusive)
pub fn deserialise_proportion<'de, D>(deserialiser: D) -> Result<Dimensionless, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserialiser)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(serde::de::Error::custom("Value must be between 0 and 1"));
    }

    Ok(Dimensionless(value))
}

/// Read a value, checking that it is greater than 0 and no more than 1
pub fn deserialise_proportion_nonzero<'de, D>(deserialiser: D) -> Result<Dimensionless, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserialiser)?;
    if !(value > 0.0 && value <= 1.0) {
        return Err(serde::de::Error::custom("Value must be > 0 and <= 1"));
    }

    Ok(Dimensionless(value))
}

/// Indicates whether the values are in strictly ascending order (i.e. sorted with no duplicates)
pub fn is_sorted_and_unique<T, I>(iter: I) -> bool
where
    T: PartialOrd + Clone,
    I: IntoIterator<Item = T>,
{
    let mut iter = iter.into_iter();
    let Some(mut prev) = iter.next() else {
        return true;
    };

    for value in iter {
        if value <= prev {
            return false;
        }
        prev = value;
    }

    true
}

/// Format a list of values for use in error and log messages
pub fn format_list<T: Display>(values: &[T]) -> String {
    let values: Vec<_> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        id: String,
        value: u32,
    }

    #[test]
    fn test_read_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id = \"hello\"\nvalue = 1").unwrap();
        }

        assert_eq!(
            read_toml::<Record>(&file_path).unwrap(),
            Record {
                id: "hello".to_string(),
                value: 1,
            }
        );

        // Missing file
        assert!(read_toml::<Record>(&dir.path().join("missing.toml")).is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Proportion {
        #[serde(deserialize_with = "deserialise_proportion")]
        value: Dimensionless,
    }

    #[derive(Debug, Deserialize)]
    struct ProportionNonzero {
        #[serde(deserialize_with = "deserialise_proportion_nonzero")]
        value: Dimensionless,
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(0.5, true)]
    #[case(1.0, true)]
    #[case(-0.01, false)]
    #[case(1.01, false)]
    fn test_deserialise_proportion(#[case] value: f64, #[case] expected_valid: bool) {
        let result = toml::from_str::<Proportion>(&format!("value = {value:?}"));
        assert_eq!(result.is_ok(), expected_valid);
        if let Ok(parsed) = result {
            assert_eq!(parsed.value, Dimensionless(value));
        }
    }

    #[rstest]
    #[case(0.0, false)]
    #[case(0.1, true)]
    #[case(1.0, true)]
    #[case(1.5, false)]
    fn test_deserialise_proportion_nonzero(#[case] value: f64, #[case] expected_valid: bool) {
        let result = toml::from_str::<ProportionNonzero>(&format!("value = {value:?}"));
        assert_eq!(result.is_ok(), expected_valid);
    }

    #[rstest]
    #[case(&[], true)]
    #[case(&[1], true)]
    #[case(&[1, 2, 3], true)]
    #[case(&[1, 1], false)]
    #[case(&[2, 1], false)]
    #[case(&[1, 3, 2], false)]
    fn test_is_sorted_and_unique(#[case] values: &[u32], #[case] expected: bool) {
        assert_eq!(is_sorted_and_unique(values), expected);
    }

    #[test]
    fn test_format_list() {
        assert_eq!(format_list(&[11, 12, 13]), "[11, 12, 13]");
        assert_eq!(format_list::<u32>(&[]), "[]");
    }
}
