//! Permutation expansion of utterance templates.
//!
//! A template such as `fly to {{[city].s1}}` is expanded into concrete
//! phrases by substituting slot sample values, recording where each value
//! landed as an [`EntitySpan`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::translate::{ResolvedSlot, SlotTable};

/// `{{[name].slotKey}}`
static SLOT_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\[([^ .\[\]{}]*?)\]\.([^ .\[\]{}]*?)\}\}").unwrap()
});

/// Where a slot value sits inside an expanded utterance.
///
/// Positions are character offsets; `end_pos` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySpan {
    pub start_pos: usize,
    pub end_pos: usize,
    pub type_tag: String,
}

/// A concrete utterance with its entity spans, sorted and non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedUtterance {
    pub text: String,
    pub entities: Vec<EntitySpan>,
}

struct Placeholder<'t, 's> {
    range: std::ops::Range<usize>,
    name: &'t str,
    slot: Option<&'s ResolvedSlot<'s>>,
    samples: Vec<&'s str>,
}

/// Expand every template against the slot table.
///
/// Each template yields as many phrases as its richest slot has sample
/// values, capped at `limit`; phrase `k` uses sample `k mod n` of every slot.
pub fn expand_permutations<'t, I>(
    templates: I,
    slots: &SlotTable<'_>,
    limit: usize,
) -> Vec<ExpandedUtterance>
where
    I: IntoIterator<Item = &'t str>,
{
    let mut out = Vec::new();
    for template in templates {
        expand_template(template, slots, limit, &mut out);
    }
    out
}

fn expand_template<'t>(
    template: &'t str,
    slots: &SlotTable<'_>,
    limit: usize,
    out: &mut Vec<ExpandedUtterance>,
) {
    let placeholders: Vec<Placeholder<'t, '_>> = SLOT_PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1).map_or("", |m| m.as_str());
            let key = caps.get(2).map_or("", |m| m.as_str());
            let slot = slots.get(key);
            if slot.is_none() {
                tracing::debug!(slot = key, template, "placeholder references unknown slot");
            }
            Some(Placeholder {
                range: whole.range(),
                name,
                slot,
                samples: slot.map(ResolvedSlot::samples).unwrap_or_default(),
            })
        })
        .collect();

    if placeholders.is_empty() {
        out.push(ExpandedUtterance {
            text: template.to_string(),
            entities: Vec::new(),
        });
        return;
    }

    let count = placeholders
        .iter()
        .map(|p| p.samples.len())
        .max()
        .unwrap_or(0)
        .clamp(1, limit.max(1));

    for k in 0..count {
        let mut text = String::with_capacity(template.len());
        let mut chars = 0usize;
        let mut entities = Vec::with_capacity(placeholders.len());
        let mut cursor = 0;

        for p in &placeholders {
            let literal = &template[cursor..p.range.start];
            text.push_str(literal);
            chars += literal.chars().count();

            match p.slot.filter(|_| !p.samples.is_empty()) {
                Some(slot) => {
                    let sample = p.samples[k % p.samples.len()];
                    let len = sample.chars().count();
                    entities.push(EntitySpan {
                        start_pos: chars,
                        end_pos: chars + len - 1,
                        type_tag: slot.entity_tag(),
                    });
                    text.push_str(sample);
                    chars += len;
                }
                None => {
                    text.push_str(p.name);
                    chars += p.name.chars().count();
                }
            }
            cursor = p.range.end;
        }
        text.push_str(&template[cursor..]);

        out.push(ExpandedUtterance { text, entities });
    }
}
