//! Fixed resources every Dialogflow ES agent archive carries.

use serde_json::{Value, json};

use crate::config::ExportConfig;
use crate::target::{
    DEFAULT_PRIORITY, IntentEvent, IntentResponse, LANGUAGE, ResponseMessage, Segment, TargetIntent,
    TargetUtterance,
};
use crate::translate::IdGenerator;

pub const FALLBACK_INTENT_NAME: &str = "Default Fallback Intent";
pub const WELCOME_INTENT_NAME: &str = "Default Welcome Intent";

/// Key Dialogflow expects in exported agents; it carries no secret.
const SECONDARY_KEY: &str = "72475410b7fb4cebafa12284672cb9ce";

const FALLBACK_REPLIES: &[&str] = &[
    "I didn't get that. Can you say it again?",
    "I missed what you said. What was that?",
    "Sorry, could you say that again?",
    "Sorry, can you say that again?",
    "Can you say that again?",
    "Sorry, I didn't get that. Can you rephrase?",
    "Sorry, what was that?",
    "One more time?",
    "What was that?",
    "Say that one more time?",
    "I didn't get that. Can you repeat?",
    "I missed that, say that again?",
];

const WELCOME_REPLIES: &[&str] = &[
    "Hi! How are you doing?",
    "Hello! How can I help you?",
    "Good day! What can I do for you today?",
    "Greetings! How can I assist?",
];

const WELCOME_PHRASES: &[&str] = &[
    "just going to say hi",
    "heya",
    "hello hi",
    "howdy",
    "hey there",
    "hi there",
    "greetings",
    "hey",
    "long time no see",
    "hello",
    "lovely day isn't it",
    "I greet you",
    "hello again",
    "hi",
    "hello there",
    "a good day",
];

pub fn package() -> Value {
    json!({ "version": "1.0.0" })
}

/// `agent.json` for a project.
pub fn agent(project_name: &str, config: &ExportConfig) -> Value {
    json!({
        "description": "",
        "language": LANGUAGE,
        "shortDescription": "",
        "examples": "",
        "linkToDocs": "",
        "displayName": agent_display_name(project_name),
        "disableInteractionLogs": false,
        "disableStackdriverLogs": true,
        "defaultTimezone": config.agent.default_timezone,
        "isPrivate": true,
        "mlMinConfidence": config.agent.ml_min_confidence,
        "supportedLanguages": [],
        "enableOnePlatformApi": true,
        "onePlatformApiVersion": "v2",
        "secondaryKey": SECONDARY_KEY,
        "analyzeQueryTextSentiment": false,
        "enabledKnowledgeBaseNames": [],
        "knowledgeServiceConfidenceAdjustment": 0.0,
        "dialogBuilderMode": false,
        "baseActionPackagesUrl": "",
        "enableSpellCorrection": false,
    })
}

/// Whitespace and underscore runs collapse to a single `_`.
pub fn agent_display_name(project_name: &str) -> String {
    let mut out = String::with_capacity(project_name.len());
    for ch in project_name.chars() {
        if ch.is_whitespace() || ch == '_' {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn canned_intent(
    ids: &mut IdGenerator,
    name: &str,
    action: &str,
    replies: &[&str],
) -> TargetIntent {
    let response = IntentResponse {
        reset_contexts: false,
        action: action.to_string(),
        affected_contexts: Vec::new(),
        parameters: Vec::new(),
        messages: vec![ResponseMessage::text(replies.iter().copied())],
        speech: Vec::new(),
    };
    TargetIntent::new(ids.next_id(), name.to_string(), DEFAULT_PRIORITY, response)
}

/// Dialogflow's stock intents always keep the normal priority, whatever
/// priority converted intents are given.
pub fn fallback_intent(ids: &mut IdGenerator) -> TargetIntent {
    let mut intent = canned_intent(ids, FALLBACK_INTENT_NAME, "input.unknown", FALLBACK_REPLIES);
    intent.fallback_intent = true;
    intent
}

pub fn welcome_intent(ids: &mut IdGenerator) -> TargetIntent {
    let mut intent = canned_intent(ids, WELCOME_INTENT_NAME, "input.welcome", WELCOME_REPLIES);
    intent.events.push(IntentEvent {
        name: "WELCOME".into(),
    });
    intent
}

pub fn welcome_utterances(ids: &mut IdGenerator) -> Vec<TargetUtterance> {
    WELCOME_PHRASES
        .iter()
        .map(|phrase| {
            TargetUtterance::new(
                ids.next_id(),
                vec![Segment::Plain {
                    text: (*phrase).to_string(),
                }],
            )
        })
        .collect()
}
