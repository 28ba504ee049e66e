//! Dialogflow ES agent zip writer.
//!
//! Resources are written in the order Dialogflow's own exporter uses:
//! package and agent metadata, entities, intent definitions (including the
//! default fallback and welcome intents), then training phrases. Entry names
//! are unique; when two records sanitize to the same name the first one is
//! kept and later ones are skipped with a warning.

pub mod boilerplate;

use std::collections::HashSet;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::ExportConfig;
use crate::error::{ArchiveError, ExportResult};
use crate::target::{LANGUAGE, ProjectRepresentation};
use crate::translate::IdGenerator;

pub use boilerplate::agent_display_name;

/// What [`write_archive`] put into the bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArchiveSummary {
    /// Number of entries written.
    pub entries: usize,
    /// Entry names dropped because an earlier record already claimed them.
    pub skipped_duplicates: Vec<String>,
}

/// Write `project` as an importable agent archive at `path`.
///
/// The default intents draw their identifiers from `ids`.
pub fn write_archive(
    project: &ProjectRepresentation,
    config: &ExportConfig,
    ids: &mut IdGenerator,
    path: &Path,
) -> ExportResult<ArchiveSummary> {
    let file = File::create(path).map_err(|source| ArchiveError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let summary = write_archive_to(file, project, config, ids)?;
    tracing::info!(
        path = %path.display(),
        entries = summary.entries,
        skipped = summary.skipped_duplicates.len(),
        "wrote agent archive"
    );
    Ok(summary)
}

/// Write the archive into any seekable sink.
pub fn write_archive_to<W: Write + Seek>(
    sink: W,
    project: &ProjectRepresentation,
    config: &ExportConfig,
    ids: &mut IdGenerator,
) -> ExportResult<ArchiveSummary> {
    let mut bundle = Bundle::new(sink);

    bundle.put("package.json".into(), &boilerplate::package())?;
    bundle.put("agent.json".into(), &boilerplate::agent(&project.name, config))?;

    for export in &project.entities {
        let name = &export.entity.name;
        // Both files of a colliding entity are dropped together.
        if bundle.put(format!("entities/{name}.json"), &export.entity)? {
            bundle.put(
                format!("entities/{name}_entries_{LANGUAGE}.json"),
                &export.values,
            )?;
        }
    }

    let mut written_intents = Vec::with_capacity(project.intents.len());
    for export in &project.intents {
        if bundle.put(format!("intents/{}.json", export.intent.name), &export.intent)? {
            written_intents.push(export);
        }
    }

    let fallback = boilerplate::fallback_intent(ids);
    bundle.put(format!("intents/{}.json", fallback.name), &fallback)?;
    let welcome = boilerplate::welcome_intent(ids);
    bundle.put(format!("intents/{}.json", welcome.name), &welcome)?;

    for export in written_intents {
        bundle.put(
            format!("intents/{}_usersays_{LANGUAGE}.json", export.intent.name),
            &export.utterances,
        )?;
    }
    bundle.put(
        format!("intents/{}_usersays_{LANGUAGE}.json", welcome.name),
        &boilerplate::welcome_utterances(ids),
    )?;

    bundle.finish()
}

// ---------------------------------------------------------------------------
// Entry bookkeeping
// ---------------------------------------------------------------------------

struct Bundle<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    seen: HashSet<String>,
    summary: ArchiveSummary,
}

impl<W: Write + Seek> Bundle<W> {
    fn new(sink: W) -> Self {
        Self {
            zip: ZipWriter::new(sink),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            seen: HashSet::new(),
            summary: ArchiveSummary::default(),
        }
    }

    /// Serialize `value` as pretty JSON under `name`. Returns `false` when the
    /// name was already taken and nothing was written.
    fn put<T: Serialize + ?Sized>(&mut self, name: String, value: &T) -> ExportResult<bool> {
        if self.seen.contains(&name) {
            tracing::warn!(entry = %name, "duplicate archive entry, keeping the first one");
            self.summary.skipped_duplicates.push(name);
            return Ok(false);
        }

        let bytes = serde_json::to_vec_pretty(value).map_err(|e| ArchiveError::Serialize {
            entry: name.clone(),
            message: e.to_string(),
        })?;
        self.zip
            .start_file(name.as_str(), self.options)
            .map_err(|e| ArchiveError::Zip {
                entry: name.clone(),
                message: e.to_string(),
            })?;
        self.zip.write_all(&bytes).map_err(|source| ArchiveError::Io {
            path: name.clone(),
            source,
        })?;

        tracing::trace!(entry = %name, bytes = bytes.len(), "archive entry written");
        self.seen.insert(name);
        self.summary.entries += 1;
        Ok(true)
    }

    fn finish(self) -> ExportResult<ArchiveSummary> {
        self.zip.finish().map_err(|e| ArchiveError::Zip {
            entry: "<central directory>".into(),
            message: e.to_string(),
        })?;
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use uuid::Uuid;
    use zip::ZipArchive;

    use super::*;
    use crate::target::{
        EntityExport, IntentExport, IntentResponse, Segment, TargetEntity, TargetEntityValue,
        TargetIntent, TargetUtterance,
    };

    fn intent(name: &str) -> IntentExport {
        let response = IntentResponse {
            reset_contexts: false,
            action: String::new(),
            affected_contexts: Vec::new(),
            parameters: Vec::new(),
            messages: Vec::new(),
            speech: Vec::new(),
        };
        IntentExport {
            intent: TargetIntent::new(Uuid::nil(), name.into(), 500_000, response),
            utterances: vec![TargetUtterance::new(
                Uuid::nil(),
                vec![Segment::Plain { text: format!("say {name}") }],
            )],
        }
    }

    fn entity(name: &str, value: &str) -> EntityExport {
        EntityExport {
            entity: TargetEntity::new(Uuid::nil(), name.into()),
            values: vec![TargetEntityValue {
                canonical: value.into(),
                synonyms: vec![value.into()],
            }],
        }
    }

    fn write(project: &ProjectRepresentation) -> (ArchiveSummary, ZipArchive<Cursor<Vec<u8>>>) {
        let mut buffer = Cursor::new(Vec::new());
        let summary = write_archive_to(
            &mut buffer,
            project,
            &ExportConfig::default(),
            &mut IdGenerator::seeded(5),
        )
        .unwrap();
        let archive = ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        (summary, archive)
    }

    fn read_json(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> serde_json::Value {
        let mut text = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut text).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn entries_follow_dialogflow_layout() {
        let project = ProjectRepresentation {
            name: "Travel Bot".into(),
            entities: vec![entity("Seat_Class", "economy")],
            intents: vec![intent("book_flight")],
        };
        let (summary, archive) = write(&project);
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        let mut expected = vec![
            "package.json",
            "agent.json",
            "entities/Seat_Class.json",
            "entities/Seat_Class_entries_en.json",
            "intents/book_flight.json",
            "intents/Default Fallback Intent.json",
            "intents/Default Welcome Intent.json",
            "intents/book_flight_usersays_en.json",
            "intents/Default Welcome Intent_usersays_en.json",
        ];
        expected.sort_unstable();
        assert_eq!(names, expected);
        assert_eq!(summary.entries, 9);
        assert!(summary.skipped_duplicates.is_empty());
    }

    #[test]
    fn entry_contents() {
        let project = ProjectRepresentation {
            name: "Travel Bot".into(),
            entities: vec![entity("Seat_Class", "economy")],
            intents: vec![intent("book_flight")],
        };
        let (_, mut archive) = write(&project);

        assert_eq!(read_json(&mut archive, "package.json"), serde_json::json!({ "version": "1.0.0" }));
        assert_eq!(read_json(&mut archive, "agent.json")["displayName"], "Travel_Bot");
        assert_eq!(
            read_json(&mut archive, "entities/Seat_Class_entries_en.json"),
            serde_json::json!([{ "value": "economy", "synonyms": ["economy"] }])
        );
        let says = read_json(&mut archive, "intents/book_flight_usersays_en.json");
        assert_eq!(says[0]["data"][0]["text"], "say book_flight");
        let fallback = read_json(&mut archive, "intents/Default Fallback Intent.json");
        assert_eq!(fallback["fallbackIntent"], true);
    }

    #[test]
    fn json_is_pretty_printed() {
        let project = ProjectRepresentation {
            name: "x".into(),
            entities: Vec::new(),
            intents: Vec::new(),
        };
        let (_, mut archive) = write(&project);
        let mut text = String::new();
        archive.by_name("package.json").unwrap().read_to_string(&mut text).unwrap();
        assert!(text.contains('\n'));
    }

    #[test]
    fn colliding_names_keep_first_writer() {
        let project = ProjectRepresentation {
            name: "x".into(),
            entities: vec![entity("size", "small"), entity("size", "large")],
            intents: vec![intent("order"), intent("order")],
        };
        let (summary, mut archive) = write(&project);
        assert_eq!(
            summary.skipped_duplicates,
            vec!["entities/size.json".to_string(), "intents/order.json".to_string()]
        );
        assert_eq!(
            read_json(&mut archive, "entities/size_entries_en.json")[0]["value"],
            "small"
        );
        assert_eq!(archive.len(), summary.entries);
    }
}
