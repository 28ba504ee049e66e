//! Diagram traversal: flattening a diagram's nodes into an ordered step list.
//!
//! Container nodes (`block`, `start`) list their children in `data.steps`.
//! Steps are yielded container by container, then any step node that no
//! container references is appended in file order.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use super::{Diagram, DiagramNode};

/// Node types that group steps instead of being steps themselves.
const CONTAINER_KINDS: &[&str] = &["block", "start"];

/// A typed diagram step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The flow waits for the user to say something matching an intent.
    IntentTrigger { intent: Option<String> },
    /// A spoken reply; one string per dialog variant.
    Speak { dialogs: Vec<String> },
    /// A displayed text reply, already flattened to plain text.
    Text { texts: Vec<String> },
    /// Anything the exporter does not interpret.
    Other { kind: String },
}

#[derive(Deserialize)]
struct IntentData {
    #[serde(default)]
    intent: Option<String>,
}

#[derive(Deserialize)]
struct SpeakData {
    #[serde(default)]
    dialogs: Vec<Dialog>,
}

#[derive(Deserialize)]
struct Dialog {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct TextData {
    #[serde(default)]
    texts: Vec<TextVariant>,
}

#[derive(Deserialize)]
struct TextVariant {
    #[serde(default)]
    content: Vec<Value>,
}

#[derive(Deserialize)]
struct ContainerData {
    #[serde(default)]
    steps: Vec<String>,
}

impl Step {
    /// Interpret a raw node. Payloads that do not match the expected shape
    /// degrade to [`Step::Other`].
    pub fn from_node(node: &DiagramNode) -> Self {
        let other = || Step::Other {
            kind: node.kind.clone(),
        };
        match node.kind.as_str() {
            "intent" => match IntentData::deserialize(&node.data) {
                Ok(data) => Step::IntentTrigger {
                    intent: data.intent.filter(|k| !k.is_empty()),
                },
                Err(e) => {
                    tracing::debug!(error = %e, "unreadable intent step payload");
                    other()
                }
            },
            "speak" => match SpeakData::deserialize(&node.data) {
                Ok(data) => Step::Speak {
                    dialogs: data.dialogs.into_iter().map(|d| d.content).collect(),
                },
                Err(e) => {
                    tracing::debug!(error = %e, "unreadable speak step payload");
                    other()
                }
            },
            "text" => match TextData::deserialize(&node.data) {
                Ok(data) => Step::Text {
                    texts: data
                        .texts
                        .iter()
                        .map(|t| slate_to_plaintext(&t.content))
                        .collect(),
                },
                Err(e) => {
                    tracing::debug!(error = %e, "unreadable text step payload");
                    other()
                }
            },
            _ => other(),
        }
    }

    /// Literal reply strings carried by a speak or text step.
    pub fn reply_texts(&self) -> Option<&[String]> {
        match self {
            Step::Speak { dialogs } => Some(dialogs),
            Step::Text { texts } => Some(texts),
            _ => None,
        }
    }
}

/// List a diagram's steps in flow order.
pub fn list_steps(diagram: &Diagram) -> Vec<Step> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut steps = Vec::new();

    for node in diagram.nodes.values() {
        if !is_container(node) {
            continue;
        }
        let Ok(container) = ContainerData::deserialize(&node.data) else {
            continue;
        };
        for child_id in &container.steps {
            let Some((key, child)) = diagram.nodes.get_key_value(child_id.as_str()) else {
                tracing::debug!(step = %child_id, "block references unknown step");
                continue;
            };
            if is_container(child) || !visited.insert(key.as_str()) {
                continue;
            }
            steps.push(Step::from_node(child));
        }
    }

    for (id, node) in &diagram.nodes {
        if is_container(node) || visited.contains(id.as_str()) {
            continue;
        }
        steps.push(Step::from_node(node));
    }

    steps
}

fn is_container(node: &DiagramNode) -> bool {
    CONTAINER_KINDS.contains(&node.kind.as_str())
}

/// Flatten a Slate rich-text value to plain text: one line per top-level node.
pub fn slate_to_plaintext(content: &[Value]) -> String {
    content
        .iter()
        .map(node_string)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn node_string(node: &Value) -> String {
    if let Some(text) = node.get("text").and_then(Value::as_str) {
        return text.to_string();
    }
    match node.get("children").and_then(Value::as_array) {
        Some(children) => children.iter().map(node_string).collect(),
        None => String::new(),
    }
}
