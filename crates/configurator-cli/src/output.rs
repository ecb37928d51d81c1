//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One key/value row of a settings or configuration listing
#[derive(Debug, Serialize, Tabled)]
pub struct KeyValueRow {
    /// Key
    pub key: String,
    /// Value, rendered as JSON
    pub value: String,
}

impl KeyValueRow {
    /// Flatten a JSON object into rows, one per top-level key.
    pub fn from_object(object: &serde_json::Map<String, serde_json::Value>) -> Vec<Self> {
        object
            .iter()
            .map(|(key, value)| Self {
                key: key.clone(),
                value: value.to_string(),
            })
            .collect()
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                let table = Table::new(items).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a JSON value: as key/value rows for tables, verbatim otherwise
pub fn print_value(value: &serde_json::Value, format: OutputFormat) {
    match (format, value.as_object()) {
        (OutputFormat::Table, Some(object)) => print_list(&KeyValueRow::from_object(object), format),
        _ => {
            let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
            println!("{}", json);
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_from_object() {
        let value = json!({"autoLoad": true, "gamePath": "/games/heat"});
        let rows = KeyValueRow::from_object(value.as_object().unwrap());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "autoLoad");
        assert_eq!(rows[0].value, "true");
        assert_eq!(rows[1].value, "\"/games/heat\"");
    }
}
