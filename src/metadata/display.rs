/// Raw metadata rendering
///
/// Every top-level key of the bag becomes a label/value entry. The
/// prompt graph comes first and the workflow graph last, both shown in
/// full under the extracted summary.

use serde_json::Value;

use super::extract::{self, ExtractionSummary};
use crate::state::data::RawMetadata;

pub const PROMPT_KEY: &str = "prompt";
pub const WORKFLOW_KEY: &str = "workflow";

const PROMPT_LABEL: &str = "Prompt (API)";
const WORKFLOW_LABEL: &str = "Workflow (UI)";

/// One label/value row of the raw dump
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    pub label: String,
    pub value: String,
}

impl MetadataEntry {
    fn new(label: impl Into<String>, value: &Value) -> Self {
        Self {
            label: label.into(),
            value: render_value(value),
        }
    }
}

/// Everything the details panel shows for one metadata response
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataView {
    /// Present only when the extractor found something
    pub summary: Option<ExtractionSummary>,
    pub entries: Vec<MetadataEntry>,
}

impl MetadataView {
    pub fn from_raw(raw: &RawMetadata) -> Self {
        let summary = extract::extract(raw.get(PROMPT_KEY));
        Self {
            summary: summary.is_found().then_some(summary),
            entries: entries(raw),
        }
    }

    /// The service returned an empty bag
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.entries.is_empty()
    }
}

/// Label/value rows: prompt first, then the other keys in bag order,
/// then the workflow
pub fn entries(raw: &RawMetadata) -> Vec<MetadataEntry> {
    let mut entries = Vec::with_capacity(raw.len());

    if let Some(prompt) = raw.get(PROMPT_KEY) {
        entries.push(MetadataEntry::new(PROMPT_LABEL, prompt));
    }

    entries.extend(
        raw.iter()
            .filter(|(key, _)| key.as_str() != PROMPT_KEY && key.as_str() != WORKFLOW_KEY)
            .map(|(key, value)| MetadataEntry::new(key.as_str(), value)),
    );

    if let Some(workflow) = raw.get(WORKFLOW_KEY) {
        entries.push(MetadataEntry::new(WORKFLOW_LABEL, workflow));
    }

    entries
}

/// Strings verbatim, scalars as JSON text, structures (and null) as
/// indented JSON
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::extract::SamplerField;
    use serde_json::json;

    fn bag(value: Value) -> RawMetadata {
        match value {
            Value::Object(map) => map,
            _ => panic!("test metadata must be an object"),
        }
    }

    #[test]
    fn test_entry_order() {
        let raw = bag(json!({
            "workflow": {"nodes": []},
            "Software": "ComfyUI",
            "prompt": {"1": {"class_type": "SaveImage", "inputs": {}}},
            "dpi": 72
        }));
        let labels: Vec<String> = entries(&raw).into_iter().map(|e| e.label).collect();

        assert_eq!(labels, vec!["Prompt (API)", "Software", "dpi", "Workflow (UI)"]);
    }

    #[test]
    fn test_value_rendering() {
        assert_eq!(render_value(&json!("plain text")), "plain text");
        assert_eq!(render_value(&json!(72)), "72");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&Value::Null), "null");
        assert_eq!(render_value(&json!({"a": 1})), "{\n  \"a\": 1\n}");
        assert_eq!(render_value(&json!([1, 2])), "[\n  1,\n  2\n]");
    }

    #[test]
    fn test_summary_with_raw_graphs_still_shown() {
        let prompt = r#"{"1":{"class_type":"KSamplerAdvanced","inputs":{"seed":42,"steps":20}},"2":{"class_type":"CLIPTextEncode","inputs":{"text":"a cat"}}}"#;
        let raw = bag(json!({"prompt": prompt, "workflow": {"version": 0.4}}));
        let view = MetadataView::from_raw(&raw);

        let summary = view.summary.as_ref().unwrap();
        assert_eq!(summary.prompts, vec!["a cat"]);
        assert_eq!(summary.parameter(SamplerField::Seed), Some(json!(42)));

        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.entries[0].label, "Prompt (API)");
        assert_eq!(view.entries[0].value, prompt);
        assert_eq!(view.entries[1].label, "Workflow (UI)");
    }

    #[test]
    fn test_unparsable_prompt_still_dumped() {
        let raw = bag(json!({"prompt": "{broken", "parameters": "steps: 20"}));
        let view = MetadataView::from_raw(&raw);

        assert!(view.summary.is_none());
        assert!(!view.is_empty());
        assert_eq!(view.entries[0].value, "{broken");
        assert_eq!(view.entries[1].label, "parameters");
    }

    #[test]
    fn test_empty_bag() {
        let view = MetadataView::from_raw(&RawMetadata::new());
        assert!(view.is_empty());
    }
}
