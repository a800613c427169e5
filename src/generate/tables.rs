//! Fake incident table generation.
//!
//! Builds rows of plausible-looking random data for each incident, one
//! column per exported field. Known cloud/field combinations get shaped
//! values; everything else falls back to a random lowercase string.

use rand::Rng;

use crate::schema::Incident;

pub const ROWS_PER_INCIDENT: usize = 50;
pub const VALUE_LEN: usize = 10;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Column names for one incident: export field names, deduplicated while
/// preserving first occurrence.
pub fn incident_columns(incident: &Incident) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for field in &incident.export {
        if !columns.contains(&field.name.as_str()) {
            columns.push(&field.name);
        }
    }
    columns
}

/// A fake value for one column.
///
/// AWS account IDs are all-digit strings; unrecognized fields get a random
/// 10-character alphanumeric string.
pub fn fake_value(cloud: &str, field: &str) -> String {
    if cloud == "AWS" && field == "accountID" {
        return rand_digits(VALUE_LEN);
    }
    rand_string(VALUE_LEN)
}

/// Build the fake rows for one incident.
pub fn fake_rows(cloud: &str, incident: &Incident) -> Vec<serde_json::Value> {
    let columns = incident_columns(incident);
    (0..ROWS_PER_INCIDENT)
        .map(|_| {
            let mut row = serde_json::Map::new();
            for column in &columns {
                row.insert(column.to_string(), fake_value(cloud, column).into());
            }
            serde_json::Value::Object(row)
        })
        .collect()
}

fn rand_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn rand_digits(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldEntry;

    fn field(name: &str) -> FieldEntry {
        FieldEntry {
            name: name.to_string(),
            label: None,
            path: None,
        }
    }

    fn incident(fields: Vec<FieldEntry>) -> Incident {
        Incident {
            summary_template: None,
            detail_template: None,
            export: fields,
            path: None,
        }
    }

    #[test]
    fn columns_are_deduped_preserving_order() {
        let inc = incident(vec![field("b"), field("a"), field("b")]);
        assert_eq!(incident_columns(&inc), vec!["b", "a"]);
    }

    #[test]
    fn rows_have_exactly_the_expected_columns() {
        let inc = incident(vec![field("accountID"), field("region")]);
        let rows = fake_rows("AWS", &inc);
        assert_eq!(rows.len(), ROWS_PER_INCIDENT);
        for row in &rows {
            let obj = row.as_object().unwrap();
            assert_eq!(obj.len(), 2);
            assert!(obj.contains_key("accountID"));
            assert!(obj.contains_key("region"));
        }
    }

    #[test]
    fn aws_account_ids_are_all_digits() {
        let value = fake_value("AWS", "accountID");
        assert_eq!(value.len(), VALUE_LEN);
        assert!(value.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn fallback_values_are_lowercase_alphanumeric() {
        let value = fake_value("Azure", "resourceName");
        assert_eq!(value.len(), VALUE_LEN);
        assert!(value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn incident_without_fields_yields_empty_rows() {
        let rows = fake_rows("AWS", &incident(vec![]));
        assert_eq!(rows.len(), ROWS_PER_INCIDENT);
        assert!(rows.iter().all(|r| r.as_object().unwrap().is_empty()));
    }
}
