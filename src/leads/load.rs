use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use super::types::LeadRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadFormat {
    Json,
    Yaml,
}

impl LeadFormat {
    /// Pick the format from a file extension; anything that is not YAML is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                LeadFormat::Yaml
            }
            _ => LeadFormat::Json,
        }
    }
}

/// An input item that could not be turned into a LeadRecord.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedItem {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedLeads {
    pub records: Vec<LeadRecord>,
    pub rejected: Vec<RejectedItem>,
}

/// Decode a lead file's contents.
///
/// The top level must be a sequence; anything else is a fatal error. Items
/// inside the sequence that do not decode are collected in `rejected` and
/// never abort the load.
pub fn parse_leads(content: &str, format: LeadFormat) -> Result<ParsedLeads> {
    let value: serde_json::Value = match format {
        LeadFormat::Json => {
            serde_json::from_str(content).context("Failed to parse leads: invalid JSON")?
        }
        LeadFormat::Yaml => serde_saphyr::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse leads: invalid YAML - {}", e))?,
    };

    let items = match value {
        serde_json::Value::Array(items) => items,
        other => bail!(
            "Expected a list of leads at the top level, found {}",
            describe_value(&other)
        ),
    };

    let mut parsed = ParsedLeads::default();
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            parsed.rejected.push(RejectedItem {
                index,
                reason: format!("expected a lead object, found {}", describe_value(&item)),
            });
            continue;
        }
        match serde_json::from_value::<LeadRecord>(item) {
            Ok(record) => parsed.records.push(record),
            Err(e) => parsed.rejected.push(RejectedItem {
                index,
                reason: e.to_string(),
            }),
        }
    }

    Ok(parsed)
}

/// Read and decode a lead file, choosing the format from its extension.
pub fn load_leads(path: &Path) -> Result<ParsedLeads> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read leads file at {}", path.display()))?;
    parse_leads(&content, LeadFormat::from_path(path))
        .with_context(|| format!("Invalid leads file {}", path.display()))
}

fn describe_value(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;

    #[test]
    fn test_parse_json_list() {
        let parsed = parse_leads(
            r#"[{"name": "Jane", "title": "Head of Safety"}, {"name": "John"}]"#,
            LeadFormat::Json,
        )
        .unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.records[0].title, "Head of Safety");
    }

    #[test]
    fn test_top_level_object_is_fatal() {
        let result = parse_leads(r#"{"name": "Jane"}"#, LeadFormat::Json);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Expected a list of leads"));
        assert!(err.contains("an object"));
    }

    #[test]
    fn test_invalid_json_is_fatal() {
        assert!(parse_leads("[{", LeadFormat::Json).is_err());
    }

    #[test]
    fn test_bad_items_are_rejected_not_fatal() {
        let parsed = parse_leads(
            r#"[42, {"name": "Jane", "title": "VP"}, {"name": ["not", "a", "string"]}]"#,
            LeadFormat::Json,
        )
        .unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.rejected.len(), 2);
        assert_eq!(parsed.rejected[0].index, 0);
        assert!(parsed.rejected[0].reason.contains("a number"));
        assert_eq!(parsed.rejected[1].index, 2);
    }

    #[test]
    fn test_parse_yaml_list() {
        let yaml = "- name: Jane\n  title: Director of Toxicology\n  funding:\n    round: Series B\n    date: \"2025-06-15\"\n";
        let parsed = parse_leads(yaml, LeadFormat::Yaml).unwrap();
        assert_eq!(parsed.records.len(), 1);
        let funding = parsed.records[0].funding.as_ref().unwrap();
        assert_eq!(funding.round, "Series B");
        assert_eq!(funding.date.as_deref(), Some("2025-06-15"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(LeadFormat::from_path(&PathBuf::from("a.yaml")), LeadFormat::Yaml);
        assert_eq!(LeadFormat::from_path(&PathBuf::from("a.YML")), LeadFormat::Yaml);
        assert_eq!(LeadFormat::from_path(&PathBuf::from("a.json")), LeadFormat::Json);
        assert_eq!(LeadFormat::from_path(&PathBuf::from("leads")), LeadFormat::Json);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let path = env::temp_dir().join("lead_ranker_test_missing_leads.json");
        let _ = std::fs::remove_file(&path);
        assert!(load_leads(&path).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = env::temp_dir().join("lead_ranker_test_load_leads.json");
        std::fs::write(&path, r#"[{"name": "Jane", "title": "Head of Safety"}]"#).unwrap();

        let parsed = load_leads(&path).unwrap();
        assert_eq!(parsed.records.len(), 1);

        let _ = std::fs::remove_file(&path);
    }
}
