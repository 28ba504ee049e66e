//! Intent → Dialogflow intent record and training phrases.

use super::identity::IdGenerator;
use super::sanitize::{clean_display_name, sanitize_resource_name};
use super::segment::segment;
use super::SlotTable;
use crate::error::ExportResult;
use crate::permutation::expand_permutations;
use crate::source::SourceIntent;
use crate::target::{
    IntentParameter, IntentResponse, ResponseMessage, TargetIntent, TargetUtterance,
};

/// Builds intent records against one project's slot table.
#[derive(Debug)]
pub struct IntentTranslator<'s, 'a> {
    slots: &'s SlotTable<'a>,
    priority: u32,
    permutation_limit: usize,
}

impl<'s, 'a> IntentTranslator<'s, 'a> {
    pub fn new(slots: &'s SlotTable<'a>, priority: u32, permutation_limit: usize) -> Self {
        Self {
            slots,
            priority,
            permutation_limit,
        }
    }

    /// Build the intent record. `responses` become one text message each.
    pub fn translate(
        &self,
        intent: &SourceIntent,
        responses: &[String],
        ids: &mut IdGenerator,
    ) -> TargetIntent {
        let parameters = intent
            .slots
            .iter()
            .filter_map(|slot_ref| {
                let Some(slot) = self.slots.get(&slot_ref.id) else {
                    tracing::debug!(
                        intent = %intent.name,
                        slot = %slot_ref.id,
                        "intent references unknown slot, no parameter emitted"
                    );
                    return None;
                };
                let name = slot.name.strip_prefix('@').unwrap_or(&slot.name).to_string();
                Some(IntentParameter::new(ids.next_id(), name, slot.parameter_type()))
            })
            .collect();

        let response = IntentResponse {
            reset_contexts: false,
            action: String::new(),
            affected_contexts: Vec::new(),
            parameters,
            messages: responses
                .iter()
                .map(|r| ResponseMessage::text([r.as_str()]))
                .collect(),
            speech: Vec::new(),
        };

        TargetIntent::new(
            ids.next_id(),
            sanitize_resource_name(clean_display_name(&intent.name)),
            self.priority,
            response,
        )
    }

    /// Expand the intent's templates and segment every resulting phrase.
    pub fn generate_utterances(
        &self,
        intent: &SourceIntent,
        ids: &mut IdGenerator,
    ) -> ExportResult<Vec<TargetUtterance>> {
        let templates = intent.inputs.iter().map(|input| input.text.as_str());
        expand_permutations(templates, self.slots, self.permutation_limit)
            .into_iter()
            .map(|expanded| {
                let data = segment(&expanded.text, &expanded.entities)?;
                Ok(TargetUtterance::new(ids.next_id(), data))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceSlot;
    use crate::target::{DEFAULT_PRIORITY, Segment};
    use crate::translate::SlotTypeResolver;

    fn fixture_slots() -> Vec<SourceSlot> {
        vec![
            SourceSlot::new("s1", "city", "VF.CITY").with_inputs(["Paris"]),
            SourceSlot::new("s2", "Seat Class", "Custom").with_inputs(["economy, coach", "business"]),
        ]
    }

    #[test]
    fn parameters_follow_declaration_order() {
        let slots = fixture_slots();
        let table = SlotTable::new(&slots, &SlotTypeResolver::new());
        let translator = IntentTranslator::new(&table, DEFAULT_PRIORITY, 22);
        let intent = SourceIntent::new("i1", "book flight").with_slot("s2").with_slot("s1");
        let mut ids = IdGenerator::seeded(3);

        let record = translator.translate(&intent, &[], &mut ids);
        assert_eq!(record.name, "book_flight");
        let params: Vec<_> = record.parameters().collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "Seat_Class");
        assert_eq!(params[0].data_type, "@Seat_Class");
        assert_eq!(params[0].value, "$Seat_Class");
        assert_eq!(params[1].name, "city");
        assert_eq!(params[1].data_type, "@sys.geo-city");
        assert!(params.iter().all(|p| !p.required && !p.is_list));
        assert_eq!(record.messages().count(), 0);
    }

    #[test]
    fn responses_become_messages() {
        let slots = fixture_slots();
        let table = SlotTable::new(&slots, &SlotTypeResolver::new());
        let translator = IntentTranslator::new(&table, DEFAULT_PRIORITY, 22);
        let intent = SourceIntent::new("i1", "greet");
        let mut ids = IdGenerator::seeded(3);

        let record = translator.translate(
            &intent,
            &["Hi there".to_string(), "Hello!".to_string()],
            &mut ids,
        );
        assert_eq!(record.responses.len(), 1);
        let speech: Vec<&[String]> = record.messages().map(|m| m.speech.as_slice()).collect();
        assert_eq!(speech, vec![&["Hi there".to_string()][..], &["Hello!".to_string()][..]]);
        assert!(record.messages().all(|m| m.lang == "en" && m.kind == "0"));
    }

    #[test]
    fn custom_parameter_matches_utterance_annotation() {
        let slots = fixture_slots();
        let table = SlotTable::new(&slots, &SlotTypeResolver::new());
        let translator = IntentTranslator::new(&table, DEFAULT_PRIORITY, 22);
        let intent = SourceIntent::new("i1", "pick seat")
            .with_utterance("{{[Seat_Class].s2}} please")
            .with_slot("s2");
        let mut ids = IdGenerator::seeded(4);

        let record = translator.translate(&intent, &[], &mut ids);
        let utterances = translator.generate_utterances(&intent, &mut ids).unwrap();
        let param = record.parameters().next().unwrap();
        let Segment::Entity { meta, .. } = &utterances[0].data[0] else {
            panic!("expected an entity segment");
        };
        assert_eq!(&param.data_type, meta);
        assert_eq!(param.data_type, "@Seat_Class");
    }

    #[test]
    fn fixed_defaults() {
        let table = SlotTable::default();
        let translator = IntentTranslator::new(&table, 250_000, 22);
        let record = translator.translate(
            &SourceIntent::new("i1", "VF.HELP"),
            &[],
            &mut IdGenerator::seeded(0),
        );
        assert_eq!(record.name, "HELP");
        assert_eq!(record.priority, 250_000);
        assert!(record.auto);
        assert!(!record.webhook_used && !record.webhook_for_slot_filling && !record.fallback_intent);
        assert!(record.events.is_empty());
    }

    #[test]
    fn unknown_slots_are_skipped() {
        let table = SlotTable::default();
        let translator = IntentTranslator::new(&table, DEFAULT_PRIORITY, 22);
        let intent = SourceIntent::new("i1", "x").with_slot("ghost");
        let record = translator.translate(&intent, &[], &mut IdGenerator::seeded(0));
        assert_eq!(record.parameters().count(), 0);
    }

    #[test]
    fn intents_get_fresh_ids() {
        let table = SlotTable::default();
        let translator = IntentTranslator::new(&table, DEFAULT_PRIORITY, 22);
        let intent = SourceIntent::new("i1", "x");
        let mut ids = IdGenerator::from_entropy();
        let a = translator.translate(&intent, &[], &mut ids);
        let b = translator.translate(&intent, &[], &mut ids);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn utterances_are_segmented() {
        let slots = fixture_slots();
        let table = SlotTable::new(&slots, &SlotTypeResolver::new());
        let translator = IntentTranslator::new(&table, DEFAULT_PRIORITY, 22);
        let intent = SourceIntent::new("i1", "book")
            .with_utterance("fly {{[Seat_Class].s2}} to {{[city].s1}} please")
            .with_utterance("book a flight");
        let utterances = translator
            .generate_utterances(&intent, &mut IdGenerator::seeded(9))
            .unwrap();

        assert_eq!(utterances.len(), 3);
        assert_eq!(
            utterances[0].data,
            vec![
                Segment::Plain { text: "fly".into() },
                Segment::Entity {
                    text: "economy".into(),
                    meta: "@Seat_Class".into(),
                    alias: "Seat_Class".into(),
                },
                Segment::Plain { text: "to".into() },
                Segment::Entity {
                    text: "Paris".into(),
                    meta: "@sys.geo-city".into(),
                    alias: "geo-city".into(),
                },
                Segment::Plain { text: "please".into() },
            ]
        );
        assert_eq!(utterances[1].display_text(), "fly business to Paris please");
        assert_eq!(utterances[2].data, vec![Segment::Plain { text: "book a flight".into() }]);
        assert!(utterances.iter().all(|u| u.lang == "en" && !u.is_template && u.count == 0));
    }
}
