//! Project assembly: drives the translators over a whole source project.
//!
//! The [`Assembler`] owns the identity cache and ID generator for its
//! lifetime, so entity identifiers stay stable across repeated runs on the
//! same assembler while separate assemblers never share state.

use serde::Serialize;

use crate::config::ExportConfig;
use crate::error::{ExportResult, SourceError};
use crate::source::{IntentIndex, SourceProject, Step, list_steps};
use crate::target::{IntentExport, ProjectRepresentation};
use crate::translate::entity::translate_entity;
use crate::translate::intent::IntentTranslator;
use crate::translate::{IdGenerator, IdentityCache, SlotTable, SlotTypeResolver};

/// Counters and diagnostics from one assembly run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportReport {
    pub intents: usize,
    pub entities: usize,
    pub utterances: usize,
    /// Slots typed as system entities (exported as parameter types only).
    pub builtin_slots: usize,
    /// Intent keys referenced by trigger steps but not defined in the project.
    pub skipped_intents: Vec<String>,
}

impl std::fmt::Display for ExportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} intents, {} entities, {} training phrases",
            self.intents, self.entities, self.utterances
        )?;
        if !self.skipped_intents.is_empty() {
            write!(f, " ({} dangling intent references skipped)", self.skipped_intents.len())?;
        }
        Ok(())
    }
}

/// Result of [`Assembler::assemble`].
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutput {
    pub project: ProjectRepresentation,
    pub report: ExportReport,
}

/// Converts source projects into [`ProjectRepresentation`]s.
#[derive(Debug)]
pub struct Assembler {
    config: ExportConfig,
    resolver: SlotTypeResolver,
    cache: IdentityCache,
    ids: IdGenerator,
}

impl Assembler {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            resolver: SlotTypeResolver::with_overrides(&config.slot_types),
            config,
            cache: IdentityCache::new(),
            ids: IdGenerator::from_entropy(),
        }
    }

    /// Start from a previously saved identity cache.
    pub fn with_identity_cache(mut self, cache: IdentityCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn identity_cache(&self) -> &IdentityCache {
        &self.cache
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// The generator later stages (the archive writer) draw IDs from, so a
    /// seeded run stays reproducible end to end.
    pub fn id_generator(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    /// Translate every reachable intent and every custom slot.
    ///
    /// Output order follows the source: diagrams and their steps for intents,
    /// slot declaration order for entities.
    pub fn assemble(&mut self, source: &SourceProject) -> ExportResult<ExportOutput> {
        let slots = SlotTable::new(source.slots(), &self.resolver);
        let index = IntentIndex::new(source.intents());
        let translator = IntentTranslator::new(
            &slots,
            self.config.intent_priority,
            self.config.permutation_limit,
        );

        let mut report = ExportReport::default();
        let mut project = ProjectRepresentation {
            name: source.name().to_string(),
            entities: Vec::new(),
            intents: Vec::new(),
        };

        for (diagram_id, diagram) in &source.diagrams {
            let steps = list_steps(diagram);
            tracing::debug!(diagram = %diagram_id, steps = steps.len(), "walking diagram");

            for (position, step) in steps.iter().enumerate() {
                let Step::IntentTrigger { intent: Some(key) } = step else {
                    continue;
                };
                let intent = match index.get(key) {
                    Ok(intent) => intent,
                    Err(SourceError::MissingIntent { key }) => {
                        tracing::debug!(diagram = %diagram_id, intent = %key, "skipping trigger for unknown intent");
                        report.skipped_intents.push(key);
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };

                let responses = steps
                    .get(position + 1)
                    .and_then(Step::reply_texts)
                    .unwrap_or_default();

                let record = translator.translate(intent, responses, &mut self.ids);
                let utterances = translator.generate_utterances(intent, &mut self.ids)?;
                report.utterances += utterances.len();
                project.intents.push(IntentExport {
                    intent: record,
                    utterances,
                });
            }
        }

        for slot in slots.iter() {
            match translate_entity(slot, &mut self.cache, &mut self.ids) {
                Some(entity) => project.entities.push(entity),
                None => report.builtin_slots += 1,
            }
        }

        report.intents = project.intents.len();
        report.entities = project.entities.len();
        tracing::info!(
            project = %project.name,
            intents = report.intents,
            entities = report.entities,
            utterances = report.utterances,
            skipped = report.skipped_intents.len(),
            "assembled project"
        );

        Ok(ExportOutput { project, report })
    }
}
