use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Loads a JSON array of records. The column set is the union of keys across records.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, Vec<String>)> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_records(&json).with_context(|| format!("Failed to parse records from {}", path.display()))
}

pub fn parse_records<T: DeserializeOwned>(json: &str) -> Result<(Vec<T>, Vec<String>)> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        bail!("Expected a JSON array of records");
    };

    let columns = collect_columns(&items)?;
    let records = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<T>, _>>()?;

    Ok((records, columns))
}

fn collect_columns(items: &[Value]) -> Result<Vec<String>> {
    let mut columns = BTreeSet::new();
    for (idx, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            bail!("Record {} is not a JSON object", idx);
        };
        columns.extend(fields.keys().cloned());
    }
    Ok(columns.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRestaurant;

    #[test]
    fn test_columns_are_union_of_keys() {
        let (rows, columns) = parse_records::<RawRestaurant>(
            r#"[{"place_id": "a", "name": "A"}, {"place_id": "b", "rating": 4.0}]"#,
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(columns, vec!["name", "place_id", "rating"]);
    }

    #[test]
    fn test_non_array_is_rejected() {
        assert!(parse_records::<RawRestaurant>(r#"{"place_id": "a"}"#).is_err());
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        assert!(parse_records::<RawRestaurant>(r#"[{"place_id": "a"}, 3]"#).is_err());
    }
}
