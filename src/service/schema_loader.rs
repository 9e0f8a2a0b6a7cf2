use crate::error::SearchError;
use crate::schema::{SchemaDescriptor, rate_card::rate_card};
use std::{fs, path::Path};
use tracing::{info, warn};

/// Resolve the descriptor the agent is grounded on: the JSON file at `path`
/// when one is configured, the built-in rate card otherwise.
pub fn load_descriptor(path: Option<&Path>) -> Result<SchemaDescriptor, SearchError> {
    let Some(path) = path else {
        return Ok(rate_card());
    };

    let descriptor = load_from_file(path)?;
    if descriptor.tables.is_empty() {
        warn!(path = %path.display(), "schema descriptor lists no tables");
    }
    info!(
        path = %path.display(),
        tables = descriptor.tables.len(),
        relationships = descriptor.relationships.len(),
        "loaded schema descriptor from file"
    );
    Ok(descriptor)
}

fn load_from_file(path: &Path) -> Result<SchemaDescriptor, SearchError> {
    let contents = fs::read_to_string(path)?;
    let descriptor: SchemaDescriptor = serde_json::from_str(&contents)?;
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("ratecard-{name}-{}-{nanos}.json", std::process::id()));
        fs::write(&path, contents).expect("write temp descriptor");
        path
    }

    #[test]
    fn no_path_yields_builtin_rate_card() {
        let descriptor = load_descriptor(None).expect("builtin descriptor");
        assert_eq!(descriptor, rate_card());
    }

    #[test]
    fn file_replaces_builtin_descriptor() {
        let path = temp_file(
            "schema",
            r#"{
                "tables": [
                    {"name": "ORDERS", "columns": [
                        {"name": "ORDER_ID", "description": "Order id", "type": "INTEGER"},
                        {"name": "CUSTOMER_ID", "type": "INTEGER"}
                    ]}
                ],
                "relationships": [
                    {"from_table": "ORDERS", "from_column": "CUSTOMER_ID",
                     "to_table": "CUSTOMER", "to_column": "ID"}
                ]
            }"#,
        );
        let descriptor = load_descriptor(Some(&path)).expect("descriptor loads");
        assert_eq!(descriptor.tables.len(), 1);
        assert_eq!(descriptor.tables[0].columns[1].description, "");
        assert_eq!(
            descriptor.relationships[0].to_string(),
            "Relationship : ORDERS.CUSTOMER_ID = CUSTOMER.ID"
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_file("broken", "{\"tables\": 3}");
        let err = load_descriptor(Some(&path)).expect_err("malformed descriptor");
        assert!(matches!(err, SearchError::Json(_)));
        let _ = fs::remove_file(&path);
    }
}
