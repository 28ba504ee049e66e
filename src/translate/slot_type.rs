//! Slot type resolution: Voiceflow semantic types → Dialogflow data types.

use std::collections::HashMap;

use super::sanitize::sanitize_resource_name;
use crate::source::SourceSlot;

/// Type tag Voiceflow uses for designer-defined slots.
pub const CUSTOM_TYPE_TAG: &str = "Custom";

/// Namespace prefix of Dialogflow system entity types.
pub const BUILTIN_NAMESPACE: &str = "@sys.";

/// Voiceflow builtin types with a Dialogflow system-entity counterpart.
const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("VF.NUMBER", "@sys.number"),
    ("VF.ORDINAL", "@sys.ordinal"),
    ("VF.PERCENTAGE", "@sys.percentage"),
    ("VF.TEMPERATURE", "@sys.temperature"),
    ("VF.CURRENCY", "@sys.unit-currency"),
    ("VF.AGE", "@sys.age"),
    ("VF.DURATION", "@sys.duration"),
    ("VF.DATE", "@sys.date"),
    ("VF.TIME", "@sys.time"),
    ("VF.DATETIME", "@sys.date-time"),
    ("VF.EMAIL", "@sys.email"),
    ("VF.PHONENUMBER", "@sys.phone-number"),
    ("VF.URL", "@sys.url"),
    ("VF.NAME", "@sys.given-name"),
    ("VF.LASTNAME", "@sys.last-name"),
    ("VF.LANGUAGE", "@sys.language"),
    ("VF.COLOR", "@sys.color"),
    ("VF.GEOGRAPHY", "@sys.location"),
    ("VF.ADDRESS", "@sys.address"),
    ("VF.ZIPCODE", "@sys.zip-code"),
    ("VF.CITY", "@sys.geo-city"),
    ("VF.COUNTRY", "@sys.geo-country"),
    ("VF.STATE", "@sys.geo-state"),
    ("VF.AIRPORT", "@sys.airport"),
    ("VF.FLIGHTNUMBER", "@sys.flight-number"),
    ("VF.ANY", "@sys.any"),
];

/// Maps a slot's semantic type tag to a Dialogflow data-type token.
#[derive(Debug, Clone)]
pub struct SlotTypeResolver {
    table: HashMap<String, String>,
}

impl SlotTypeResolver {
    /// Resolver over the built-in mapping table.
    pub fn new() -> Self {
        Self {
            table: BUILTIN_TYPES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// Resolver with extra mappings layered over the built-in table.
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut resolver = Self::new();
        for (from, to) in overrides {
            resolver.table.insert(from.clone(), to.clone());
        }
        resolver
    }

    /// Resolve the data type for a slot. Never fails: unknown types fall
    /// back to a token named after the slot itself.
    pub fn resolve_type(&self, slot: &SourceSlot) -> String {
        let tag = slot.type_tag();
        if tag == CUSTOM_TYPE_TAG {
            return format!("@{CUSTOM_TYPE_TAG}");
        }
        if let Some(mapped) = self.table.get(tag) {
            return mapped.clone();
        }
        format!("@{}", sanitize_resource_name(&slot.name))
    }
}

impl Default for SlotTypeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a resolved data type names a Dialogflow system entity.
pub fn is_builtin(data_type: &str) -> bool {
    data_type.starts_with(BUILTIN_NAMESPACE)
}
