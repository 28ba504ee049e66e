//! Dialogflow ES agent records.
//!
//! Field names and fixed values follow the agent zip import format; each
//! record serializes to the JSON resource the archive writer stores.

use serde::Serialize;
use uuid::Uuid;

/// The only language the exporter produces.
pub const LANGUAGE: &str = "en";

/// Dialogflow's default intent priority ("normal").
pub const DEFAULT_PRIORITY: u32 = 500_000;

/// A custom entity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetEntity {
    pub id: Uuid,
    pub name: String,
    pub is_overridable: bool,
    pub is_enum: bool,
    pub is_regexp: bool,
    pub automated_expansion: bool,
    pub allow_fuzzy_extraction: bool,
}

impl TargetEntity {
    pub fn new(id: Uuid, name: String) -> Self {
        Self {
            id,
            name,
            is_overridable: true,
            is_enum: false,
            is_regexp: false,
            automated_expansion: false,
            allow_fuzzy_extraction: false,
        }
    }
}

/// One row of an entity's value table. `synonyms` always contains `canonical`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetEntityValue {
    #[serde(rename = "value")]
    pub canonical: String,
    pub synonyms: Vec<String>,
}

/// A piece of an annotated training phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "SegmentRecord")]
pub enum Segment {
    Plain {
        text: String,
    },
    Entity {
        text: String,
        /// Entity reference, e.g. `@sys.geo-city` or `@Color_Choice`.
        meta: String,
        /// Parameter alias, the reference without `@` and `sys.`.
        alias: String,
    },
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain { text } | Segment::Entity { text, .. } => text,
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Segment::Entity { .. })
    }
}

/// Wire shape of a [`Segment`]: plain text omits `meta` and `alias`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SegmentRecord {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    user_defined: bool,
}

impl From<Segment> for SegmentRecord {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::Plain { text } => Self {
                text,
                meta: None,
                alias: None,
                user_defined: false,
            },
            Segment::Entity { text, meta, alias } => Self {
                text,
                meta: Some(meta),
                alias: Some(alias),
                user_defined: false,
            },
        }
    }
}

/// An annotated training phrase (`*_usersays_en.json` entry).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetUtterance {
    pub id: Uuid,
    pub data: Vec<Segment>,
    pub is_template: bool,
    pub count: u32,
    pub lang: String,
    pub updated: u64,
}

impl TargetUtterance {
    pub fn new(id: Uuid, data: Vec<Segment>) -> Self {
        Self {
            id,
            data,
            is_template: false,
            count: 0,
            lang: LANGUAGE.to_string(),
            updated: 0,
        }
    }

    /// The phrase text with segments joined by single spaces.
    pub fn display_text(&self) -> String {
        self.data
            .iter()
            .map(Segment::text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An intent parameter bound to a slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentParameter {
    pub id: Uuid,
    pub name: String,
    pub required: bool,
    pub data_type: String,
    pub value: String,
    pub default_value: String,
    pub is_list: bool,
    pub prompts: Vec<String>,
    pub prompt_messages: Vec<String>,
    pub no_match_prompt_messages: Vec<String>,
    pub no_input_prompt_messages: Vec<String>,
    pub output_dialog_contexts: Vec<String>,
}

impl IntentParameter {
    pub fn new(id: Uuid, name: String, data_type: String) -> Self {
        Self {
            id,
            value: format!("${name}"),
            name,
            required: false,
            data_type,
            default_value: String::new(),
            is_list: false,
            prompts: Vec::new(),
            prompt_messages: Vec::new(),
            no_match_prompt_messages: Vec::new(),
            no_input_prompt_messages: Vec::new(),
            output_dialog_contexts: Vec::new(),
        }
    }
}

/// A text response message; Dialogflow picks one `speech` entry at random.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub text_to_speech: String,
    pub lang: String,
    pub speech: Vec<String>,
    pub condition: String,
}

impl ResponseMessage {
    pub fn text<I, S>(speech: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: "0".into(),
            title: String::new(),
            text_to_speech: String::new(),
            lang: LANGUAGE.to_string(),
            speech: speech.into_iter().map(Into::into).collect(),
            condition: String::new(),
        }
    }
}

/// The response block of an intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub reset_contexts: bool,
    pub action: String,
    pub affected_contexts: Vec<String>,
    pub parameters: Vec<IntentParameter>,
    pub messages: Vec<ResponseMessage>,
    pub speech: Vec<String>,
}

/// An event that triggers an intent (e.g. `WELCOME`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentEvent {
    pub name: String,
}

/// An intent definition (`intents/<name>.json`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetIntent {
    pub id: Uuid,
    pub name: String,
    pub auto: bool,
    pub contexts: Vec<String>,
    pub responses: Vec<IntentResponse>,
    pub priority: u32,
    pub webhook_used: bool,
    pub webhook_for_slot_filling: bool,
    pub fallback_intent: bool,
    pub events: Vec<IntentEvent>,
    pub conditional_responses: Vec<String>,
    pub condition: String,
    pub conditional_followup_events: Vec<String>,
}

impl TargetIntent {
    /// An intent with one response block and every optional feature disabled.
    pub fn new(id: Uuid, name: String, priority: u32, response: IntentResponse) -> Self {
        Self {
            id,
            name,
            auto: true,
            contexts: Vec::new(),
            responses: vec![response],
            priority,
            webhook_used: false,
            webhook_for_slot_filling: false,
            fallback_intent: false,
            events: Vec::new(),
            conditional_responses: Vec::new(),
            condition: String::new(),
            conditional_followup_events: Vec::new(),
        }
    }

    pub fn parameters(&self) -> impl Iterator<Item = &IntentParameter> {
        self.responses.iter().flat_map(|r| r.parameters.iter())
    }

    pub fn messages(&self) -> impl Iterator<Item = &ResponseMessage> {
        self.responses.iter().flat_map(|r| r.messages.iter())
    }
}

/// An entity and its value table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityExport {
    pub entity: TargetEntity,
    pub values: Vec<TargetEntityValue>,
}

/// An intent and its training phrases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentExport {
    pub intent: TargetIntent,
    pub utterances: Vec<TargetUtterance>,
}

/// Everything the archive writer needs, in output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRepresentation {
    pub name: String,
    pub entities: Vec<EntityExport>,
    pub intents: Vec<IntentExport>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_segment_serialization() {
        let seg = Segment::Plain {
            text: "book a flight to".into(),
        };
        assert_eq!(
            serde_json::to_value(&seg).unwrap(),
            json!({ "text": "book a flight to", "userDefined": false })
        );
    }

    #[test]
    fn entity_segment_serialization() {
        let seg = Segment::Entity {
            text: "Paris".into(),
            meta: "@sys.geo-city".into(),
            alias: "geo-city".into(),
        };
        assert_eq!(
            serde_json::to_value(&seg).unwrap(),
            json!({ "text": "Paris", "meta": "@sys.geo-city", "alias": "geo-city", "userDefined": false })
        );
    }

    #[test]
    fn entity_uses_dialogflow_field_names() {
        let entity = TargetEntity::new(Uuid::nil(), "Color_Choice".into());
        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(value["isOverridable"], json!(true));
        assert_eq!(value["allowFuzzyExtraction"], json!(false));

        let row = TargetEntityValue {
            canonical: "red".into(),
            synonyms: vec!["red".into()],
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({ "value": "red", "synonyms": ["red"] })
        );
    }

    #[test]
    fn parameter_value_references_its_name() {
        let p = IntentParameter::new(Uuid::nil(), "city".into(), "@sys.geo-city".into());
        assert_eq!(p.value, "$city");
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["dataType"], json!("@sys.geo-city"));
        assert_eq!(v["noInputPromptMessages"], json!([]));
    }

    #[test]
    fn utterance_metadata_is_fixed() {
        let u = TargetUtterance::new(Uuid::nil(), vec![]);
        let v = serde_json::to_value(&u).unwrap();
        assert_eq!(v["lang"], json!("en"));
        assert_eq!(v["isTemplate"], json!(false));
        assert_eq!(v["count"], json!(0));
    }
}
