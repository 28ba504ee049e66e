// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # dfes-export
//!
//! Converts Voiceflow `.vf` projects into importable Dialogflow ES agent
//! archives: intents, entities and annotated training phrases.
//!
//! ## Architecture
//!
//! - **Source model** (`source`): serde model of the project file and diagram traversal
//! - **Translation** (`translate`): slot types, entity identity, entities, intents, segmentation
//! - **Permutations** (`permutation`): template utterances expanded with slot samples
//! - **Assembly** (`project`): drives translation over a whole project
//! - **Archive** (`archive`): the Dialogflow zip layout and its fixed resources
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use dfes_export::archive::write_archive;
//! use dfes_export::config::ExportConfig;
//! use dfes_export::project::Assembler;
//! use dfes_export::source::SourceProject;
//!
//! let source = SourceProject::load(Path::new("bot.vf")).unwrap();
//! let mut assembler = Assembler::new(ExportConfig::default());
//! let output = assembler.assemble(&source).unwrap();
//! let config = assembler.config().clone();
//! write_archive(&output.project, &config, assembler.id_generator(), Path::new("bot.zip")).unwrap();
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod permutation;
pub mod project;
pub mod source;
pub mod target;
pub mod translate;
