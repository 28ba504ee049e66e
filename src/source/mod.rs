//! Serde model of a Voiceflow project export (`.vf`).
//!
//! Only the parts the exporter reads are modeled; everything else in the
//! file is ignored. Maps are order-preserving so that diagram and node
//! order in the file is the order of the exported archive.

pub mod diagram;

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ExportResult, SourceError};

pub use diagram::{Step, list_steps};

/// A parsed Voiceflow project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceProject {
    pub project: ProjectMeta,
    pub version: VersionData,
    #[serde(default)]
    pub diagrams: IndexMap<String, Diagram>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionData {
    #[serde(rename = "platformData")]
    pub platform_data: PlatformData,
}

/// Intents and slots declared by the project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformData {
    #[serde(default)]
    pub slots: Vec<SourceSlot>,
    #[serde(default)]
    pub intents: Vec<SourceIntent>,
}

/// A typed variable with enumerable sample values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSlot {
    /// Identity key, unique within the project.
    pub key: String,
    /// Display name as entered by the designer.
    pub name: String,
    #[serde(rename = "type", default)]
    pub slot_type: SlotTypeTag,
    /// Comma-delimited rows: the first element is canonical, the rest synonyms.
    #[serde(default)]
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotTypeTag {
    #[serde(default)]
    pub value: Option<String>,
}

impl SourceSlot {
    pub fn new(key: impl Into<String>, name: impl Into<String>, type_tag: &str) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            slot_type: SlotTypeTag {
                value: Some(type_tag.to_string()),
            },
            inputs: Vec::new(),
        }
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// The semantic type tag, or `""` when the export omits it.
    pub fn type_tag(&self) -> &str {
        self.slot_type.value.as_deref().unwrap_or("")
    }
}

/// A recognizable user-utterance category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceIntent {
    pub key: String,
    pub name: String,
    /// Template utterances, possibly containing `{{[name].slotKey}}` placeholders.
    #[serde(default)]
    pub inputs: Vec<IntentInput>,
    /// Slots the intent declares, in declaration order.
    #[serde(default)]
    pub slots: Vec<IntentSlotRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSlotRef {
    pub id: String,
    #[serde(default)]
    pub required: bool,
}

impl SourceIntent {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            inputs: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub fn with_utterance(mut self, text: impl Into<String>) -> Self {
        self.inputs.push(IntentInput { text: text.into() });
        self
    }

    pub fn with_slot(mut self, slot_key: impl Into<String>) -> Self {
        self.slots.push(IntentSlotRef {
            id: slot_key.into(),
            required: false,
        });
        self
    }
}

/// One canvas of the conversation flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: IndexMap<String, DiagramNode>,
}

/// A raw diagram node. The payload is interpreted by [`diagram::Step::from_node`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl SourceProject {
    /// Read and parse a `.vf` file.
    pub fn load(path: &Path) -> ExportResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse a project from JSON text.
    pub fn from_json_str(content: &str) -> ExportResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> ExportResult<Self> {
        let project: Self = serde_json::from_str(content).map_err(|e| SourceError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(
            slots = project.version.platform_data.slots.len(),
            intents = project.version.platform_data.intents.len(),
            diagrams = project.diagrams.len(),
            "parsed source project"
        );
        Ok(project)
    }

    pub fn name(&self) -> &str {
        &self.project.name
    }

    pub fn slots(&self) -> &[SourceSlot] {
        &self.version.platform_data.slots
    }

    pub fn intents(&self) -> &[SourceIntent] {
        &self.version.platform_data.intents
    }
}

/// Key → intent lookup over a project's declared intents.
#[derive(Debug)]
pub struct IntentIndex<'a> {
    by_key: HashMap<&'a str, &'a SourceIntent>,
}

impl<'a> IntentIndex<'a> {
    pub fn new(intents: &'a [SourceIntent]) -> Self {
        Self {
            by_key: intents.iter().map(|i| (i.key.as_str(), i)).collect(),
        }
    }

    /// Look up an intent by key.
    pub fn get(&self, key: &str) -> Result<&'a SourceIntent, SourceError> {
        self.by_key
            .get(key)
            .copied()
            .ok_or_else(|| SourceError::MissingIntent {
                key: key.to_string(),
            })
    }
}
