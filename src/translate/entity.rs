//! Slot → entity translation.

use super::ResolvedSlot;
use super::identity::{IdGenerator, IdentityCache};
use crate::target::{EntityExport, TargetEntity, TargetEntityValue};

/// Translate a slot into an entity and its value table.
///
/// Returns `None` for system-typed slots: they are referenced by parameter
/// type only and produce no entity.
pub fn translate_entity(
    slot: &ResolvedSlot<'_>,
    cache: &mut IdentityCache,
    ids: &mut IdGenerator,
) -> Option<EntityExport> {
    if slot.is_builtin() {
        return None;
    }
    let id = cache.resolve(&slot.source.key, ids);
    Some(EntityExport {
        entity: TargetEntity::new(id, slot.name.clone()),
        values: slot.source.inputs.iter().map(|row| parse_value_row(row)).collect(),
    })
}

/// Split a `canonical, synonym, …` row. The canonical value is kept in its
/// own synonym list, and blank rows are passed through as-is.
pub fn parse_value_row(row: &str) -> TargetEntityValue {
    let synonyms: Vec<String> = row.split(',').map(|s| s.trim().to_string()).collect();
    TargetEntityValue {
        canonical: synonyms[0].clone(),
        synonyms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceSlot;
    use crate::translate::SlotTypeResolver;

    #[test]
    fn color_choice_scenario() {
        let source = SourceSlot::new("slot-1", "Color Choice", "Custom")
            .with_inputs(["red, crimson, scarlet"]);
        let slot = ResolvedSlot::new(&source, &SlotTypeResolver::new());
        let mut cache = IdentityCache::new();
        let mut ids = IdGenerator::seeded(1);

        let export = translate_entity(&slot, &mut cache, &mut ids).unwrap();
        assert_eq!(export.entity.name, "Color_Choice");
        assert!(export.entity.is_overridable);
        assert!(!export.entity.is_enum);
        assert_eq!(
            export.values,
            vec![TargetEntityValue {
                canonical: "red".into(),
                synonyms: vec!["red".into(), "crimson".into(), "scarlet".into()],
            }]
        );
        assert_eq!(cache.get("slot-1"), Some(export.entity.id));
    }

    #[test]
    fn repeated_translation_reuses_id() {
        let source = SourceSlot::new("slot-1", "size", "Custom");
        let slot = ResolvedSlot::new(&source, &SlotTypeResolver::new());
        let mut cache = IdentityCache::new();
        let mut ids = IdGenerator::from_entropy();
        let a = translate_entity(&slot, &mut cache, &mut ids).unwrap();
        let b = translate_entity(&slot, &mut cache, &mut ids).unwrap();
        assert_eq!(a.entity.id, b.entity.id);
    }

    #[test]
    fn cache_is_keyed_by_slot_key_not_name() {
        let first = SourceSlot::new("k1", "same", "Custom");
        let second = SourceSlot::new("k2", "same", "Custom");
        let resolver = SlotTypeResolver::new();
        let mut cache = IdentityCache::new();
        let mut ids = IdGenerator::from_entropy();
        let a = translate_entity(&ResolvedSlot::new(&first, &resolver), &mut cache, &mut ids);
        let b = translate_entity(&ResolvedSlot::new(&second, &resolver), &mut cache, &mut ids);
        assert_eq!(a.as_ref().unwrap().entity.name, b.as_ref().unwrap().entity.name);
        assert_ne!(a.unwrap().entity.id, b.unwrap().entity.id);
    }

    #[test]
    fn builtin_slots_produce_no_entity() {
        let source = SourceSlot::new("s1", "amount", "VF.NUMBER").with_inputs(["1"]);
        let slot = ResolvedSlot::new(&source, &SlotTypeResolver::new());
        let mut cache = IdentityCache::new();
        let mut ids = IdGenerator::from_entropy();
        assert!(translate_entity(&slot, &mut cache, &mut ids).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn malformed_rows_are_passed_through() {
        assert_eq!(
            parse_value_row(""),
            TargetEntityValue {
                canonical: String::new(),
                synonyms: vec![String::new()],
            }
        );
        assert_eq!(
            parse_value_row("  solo  "),
            TargetEntityValue {
                canonical: "solo".into(),
                synonyms: vec!["solo".into()],
            }
        );
    }

    #[test]
    fn canonical_is_always_a_synonym() {
        for row in ["a", "a,b", " x , y , z ", ",", "only,", ",lead"] {
            let value = parse_value_row(row);
            assert!(value.synonyms.contains(&value.canonical), "row {row:?}");
        }
    }
}
