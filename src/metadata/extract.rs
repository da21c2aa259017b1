/// Generation-graph summary heuristic
///
/// A generation graph maps node ids to `{ "class_type", "inputs" }`
/// records. The scan classifies each node by a marker substring in its
/// `class_type` and never follows the links between nodes, so it cannot
/// tell a positive prompt from a negative one or bind a sampler to the
/// text nodes that actually feed it. When several samplers exist, the
/// last one scanned wins.

use serde_json::{Map, Value};

/// Marker substring of text-encoding node types (CLIPTextEncode, ...)
pub const TEXT_ENCODER_MARKER: &str = "CLIPTextEncode";

/// Marker substring of sampler node types (KSampler, KSamplerAdvanced, ...)
pub const SAMPLER_MARKER: &str = "KSampler";

/// Sampler fields shown in the summary, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerField {
    Seed,
    Steps,
    Cfg,
    Sampler,
    Scheduler,
    Denoise,
}

impl SamplerField {
    pub const ALL: [SamplerField; 6] = [
        SamplerField::Seed,
        SamplerField::Steps,
        SamplerField::Cfg,
        SamplerField::Sampler,
        SamplerField::Scheduler,
        SamplerField::Denoise,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SamplerField::Seed => "Seed",
            SamplerField::Steps => "Steps",
            SamplerField::Cfg => "CFG",
            SamplerField::Sampler => "Sampler",
            SamplerField::Scheduler => "Scheduler",
            SamplerField::Denoise => "Denoise",
        }
    }

    /// Input names to try, in order
    fn keys(&self) -> &'static [&'static str] {
        match self {
            SamplerField::Seed => &["seed", "noise_seed"],
            SamplerField::Steps => &["steps"],
            SamplerField::Cfg => &["cfg"],
            SamplerField::Sampler => &["sampler_name"],
            SamplerField::Scheduler => &["scheduler"],
            SamplerField::Denoise => &["denoise"],
        }
    }
}

/// One extracted sampler parameter
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerParam {
    pub field: SamplerField,
    pub value: Value,
}

impl SamplerParam {
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// What the scan found in a graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionSummary {
    /// `inputs.text` of every text-encoding node, in scan order
    pub prompts: Vec<String>,
    /// `inputs` of the last sampler node
    pub sampler_params: Option<Map<String, Value>>,
}

impl ExtractionSummary {
    /// Whether there is anything worth a summary section
    pub fn is_found(&self) -> bool {
        !self.prompts.is_empty() || self.sampler_params.is_some()
    }

    /// The fixed sampler fields present in the captured inputs
    pub fn parameters(&self) -> Vec<SamplerParam> {
        let Some(inputs) = &self.sampler_params else {
            return Vec::new();
        };

        SamplerField::ALL
            .iter()
            .filter_map(|field| {
                field
                    .keys()
                    .iter()
                    .filter_map(|key| inputs.get(*key))
                    .find(|value| !value.is_null())
                    .map(|value| SamplerParam {
                        field: *field,
                        value: value.clone(),
                    })
            })
            .collect()
    }

    pub fn parameter(&self, field: SamplerField) -> Option<Value> {
        self.parameters()
            .into_iter()
            .find(|param| param.field == field)
            .map(|param| param.value)
    }
}

/// How the scan sees a single node
#[derive(Debug, PartialEq)]
enum NodeKind<'a> {
    /// Text-encoding node and its prompt, if it carries a literal one
    TextEncoder(Option<&'a str>),
    /// Sampler node and its inputs
    Sampler(Option<&'a Map<String, Value>>),
    Other,
}

fn classify(node: &Value) -> NodeKind<'_> {
    let Some(class_type) = node.get("class_type").and_then(Value::as_str) else {
        return NodeKind::Other;
    };
    let inputs = node.get("inputs").and_then(Value::as_object);

    if class_type.contains(SAMPLER_MARKER) {
        NodeKind::Sampler(inputs)
    } else if class_type.contains(TEXT_ENCODER_MARKER) {
        let text = inputs
            .and_then(|inputs| inputs.get("text"))
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty());
        NodeKind::TextEncoder(text)
    } else {
        NodeKind::Other
    }
}

/// Summarize the `prompt` entry of a metadata bag.
///
/// Accepts the graph itself or its JSON text. Anything unparsable or
/// not shaped like a graph yields an empty (not found) summary.
pub fn extract(prompt: Option<&Value>) -> ExtractionSummary {
    match prompt {
        Some(Value::Object(graph)) => extract_graph(graph),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(graph)) => extract_graph(&graph),
            Ok(_) => {
                tracing::warn!("prompt text is JSON but not a node graph");
                ExtractionSummary::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to parse prompt graph");
                ExtractionSummary::default()
            }
        },
        _ => ExtractionSummary::default(),
    }
}

/// Scan every node of a parsed graph
pub fn extract_graph(graph: &Map<String, Value>) -> ExtractionSummary {
    let mut summary = ExtractionSummary::default();

    for (_id, node) in scan_order(graph) {
        match classify(node) {
            NodeKind::TextEncoder(Some(text)) => summary.prompts.push(text.to_string()),
            NodeKind::Sampler(Some(inputs)) => summary.sampler_params = Some(inputs.clone()),
            NodeKind::TextEncoder(None) | NodeKind::Sampler(None) | NodeKind::Other => {}
        }
    }

    tracing::debug!(
        prompts = summary.prompts.len(),
        sampler = summary.sampler_params.is_some(),
        "extracted generation summary"
    );
    summary
}

/// Node ids in object-key order as a browser would enumerate them:
/// array-index ids ascending numerically, then the rest in document order.
fn scan_order(graph: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut indexed = Vec::new();
    let mut named = Vec::new();

    for (id, node) in graph {
        match array_index(id) {
            Some(index) => indexed.push((index, id, node)),
            None => named.push((id, node)),
        }
    }

    indexed.sort_by_key(|(index, _, _)| *index);
    indexed
        .into_iter()
        .map(|(_, id, node)| (id, node))
        .chain(named)
        .collect()
}

/// Canonical decimal below 2^32 - 1, e.g. "7" but not "07" or "-1"
fn array_index(id: &str) -> Option<u32> {
    let index: u32 = id.parse().ok()?;
    (index != u32::MAX && index.to_string() == id).then_some(index)
}
