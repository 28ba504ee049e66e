//! Translation of Voiceflow slots and intents into Dialogflow records.
//!
//! - [`sanitize`]: resource-name sanitization
//! - [`slot_type`]: slot type → data type resolution
//! - [`identity`]: UUID generation and the slot → entity identity cache
//! - [`entity`]: slot → entity + value table
//! - [`segment`]: flat annotated text → plain/entity segments
//! - [`intent`]: intent → intent record and training phrases

pub mod entity;
pub mod identity;
pub mod intent;
pub mod sanitize;
pub mod segment;
pub mod slot_type;

use indexmap::IndexMap;

use crate::source::SourceSlot;

pub use identity::{IdGenerator, IdentityCache};
pub use sanitize::sanitize_resource_name;
pub use slot_type::{SlotTypeResolver, is_builtin};

/// A source slot with its sanitized name and resolved data type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlot<'a> {
    pub source: &'a SourceSlot,
    pub name: String,
    pub data_type: String,
}

impl<'a> ResolvedSlot<'a> {
    pub fn new(source: &'a SourceSlot, resolver: &SlotTypeResolver) -> Self {
        Self {
            source,
            name: sanitize_resource_name(&source.name),
            data_type: resolver.resolve_type(source),
        }
    }

    pub fn is_builtin(&self) -> bool {
        is_builtin(&self.data_type)
    }

    /// Tag used in utterance annotations: `sys.*` for system entities,
    /// the entity name otherwise.
    pub fn entity_tag(&self) -> String {
        if self.is_builtin() {
            self.data_type.trim_start_matches('@').to_string()
        } else {
            self.name.clone()
        }
    }

    /// Data type of intent parameters bound to this slot: the system entity
    /// for builtin slots, the exported entity (`@Seat_Class`) otherwise.
    pub fn parameter_type(&self) -> String {
        format!("@{}", self.entity_tag())
    }

    /// Canonical values usable as sample text, in row order. Falls back to
    /// the display name when the slot has no usable rows.
    pub fn samples(&self) -> Vec<&'a str> {
        let samples: Vec<&'a str> = self
            .source
            .inputs
            .iter()
            .filter_map(|row| row.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if !samples.is_empty() {
            return samples;
        }
        match self.source.name.trim() {
            "" => Vec::new(),
            name => vec![name],
        }
    }
}

/// Slot key → resolved slot, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SlotTable<'a> {
    slots: IndexMap<&'a str, ResolvedSlot<'a>>,
}

impl<'a> SlotTable<'a> {
    pub fn new(slots: &'a [SourceSlot], resolver: &SlotTypeResolver) -> Self {
        Self {
            slots: slots
                .iter()
                .map(|s| (s.key.as_str(), ResolvedSlot::new(s, resolver)))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ResolvedSlot<'a>> {
        self.slots.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedSlot<'a>> {
        self.slots.values()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
