//! Column name normalization.

use crate::error::Result;
use crate::utils::unique_name;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

/// Lowercase a name, trim it and join internal whitespace runs with `_`.
pub fn standardize_name(name: &str) -> String {
    WHITESPACE_RUN
        .replace_all(name.trim(), "_")
        .to_lowercase()
}

/// Standardize a full set of names, keeping them unique.
///
/// A name that collides with an earlier standardized name gets a numeric
/// suffix. Already standardized, unique input is returned unchanged.
pub fn standardize_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let standardized = unique_name(&standardize_name(name), &taken);
            taken.insert(standardized.clone());
            standardized
        })
        .collect()
}

/// Rename every column of the frame in place.
///
/// Returns `(old, new)` pairs for the names that changed.
pub(crate) fn standardize_column_names(df: &mut DataFrame) -> Result<Vec<(String, String)>> {
    let old_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let new_names = standardize_names(old_names.iter().map(String::as_str));

    let renamed: Vec<(String, String)> = old_names
        .iter()
        .zip(new_names.iter())
        .filter(|(old, new)| old != new)
        .map(|(old, new)| (old.clone(), new.clone()))
        .collect();

    if !renamed.is_empty() {
        df.set_column_names(new_names.iter().map(String::as_str))?;
        debug!("Renamed {} columns", renamed.len());
    }

    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standardize_name() {
        assert_eq!(standardize_name("First Name"), "first_name");
        assert_eq!(standardize_name("  Total\tAmount  Due "), "total_amount_due");
        assert_eq!(standardize_name("already_fine"), "already_fine");
        assert_eq!(standardize_name("ÄGE"), "äge");
        assert_eq!(standardize_name(""), "");
    }

    #[test]
    fn test_standardize_names_collisions_get_suffix() {
        let names = standardize_names(["Unit Price", "unit price", "unit_price"]);
        assert_eq!(names, vec!["unit_price", "unit_price_2", "unit_price_3"]);
    }

    #[test]
    fn test_standardize_names_idempotent() {
        let inputs = ["A b", "a_b_2", "a  B", "X", "x"];
        let once = standardize_names(inputs);
        let twice = standardize_names(once.iter().map(String::as_str));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_standardize_column_names_renames_frame() {
        let mut df = df![
            "Customer Name" => ["a"],
            "age" => [1i64],
        ]
        .unwrap();

        let renamed = standardize_column_names(&mut df).unwrap();
        assert_eq!(
            renamed,
            vec![("Customer Name".to_string(), "customer_name".to_string())]
        );
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["customer_name", "age"]);
    }
}
