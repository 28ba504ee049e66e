//! Rich diagnostic error types for the exporter.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for an export run.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, sources) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Segment(#[from] SegmentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Archive(#[from] ArchiveError),
}

// ---------------------------------------------------------------------------
// Source project errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("failed to read project file: {path}")]
    #[diagnostic(
        code(dfes::source::read),
        help("Check that the .vf file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse project file {path}: {message}")]
    #[diagnostic(
        code(dfes::source::parse),
        help(
            "The file is not a valid Voiceflow project export. \
             Re-export the project from the Voiceflow creator and try again."
        )
    )]
    Parse { path: String, message: String },

    #[error("intent not found: {key}")]
    #[diagnostic(
        code(dfes::source::missing_intent),
        help(
            "A diagram step triggers an intent that is not defined in the project's \
             platform data. The step is skipped during export."
        )
    )]
    MissingIntent { key: String },
}

// ---------------------------------------------------------------------------
// Segmentation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SegmentError {
    #[error("entity span {start}..={end} runs past the end of a {len}-character utterance")]
    #[diagnostic(
        code(dfes::segment::out_of_bounds),
        help(
            "Entity spans must lie inside the utterance text. \
             This usually means a slot sample value was changed after expansion."
        )
    )]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("entity span ends at {end} before it starts at {start}")]
    #[diagnostic(
        code(dfes::segment::inverted),
        help("Span end positions are inclusive and must not precede the start position.")
    )]
    Inverted { start: usize, end: usize },

    #[error("entity span starting at {start} overlaps the span ending at {previous_end}")]
    #[diagnostic(
        code(dfes::segment::overlap),
        help("Entity spans within one utterance must be pairwise non-overlapping.")
    )]
    Overlap { start: usize, previous_end: usize },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read export config: {path}")]
    #[diagnostic(
        code(dfes::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse export config {path}: {message}")]
    #[diagnostic(
        code(dfes::config::parse),
        help("Check the TOML syntax and the field names in the export config.")
    )]
    Parse { path: String, message: String },

    #[error("invalid export config: {message}")]
    #[diagnostic(code(dfes::config::invalid), help("{message}"))]
    Invalid { message: String },
}

// ---------------------------------------------------------------------------
// Identity cache errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IdentityError {
    #[error("failed to access identity cache: {path}")]
    #[diagnostic(
        code(dfes::identity::io),
        help("Check that the cache file's directory exists and is writable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("identity cache {path} is corrupt: {message}")]
    #[diagnostic(
        code(dfes::identity::corrupt),
        help(
            "The cache must be a JSON object mapping slot keys to UUIDs. \
             Delete it to start over; entity IDs will be regenerated."
        )
    )]
    Corrupt { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Archive errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ArchiveError {
    #[error("failed to write archive {path}")]
    #[diagnostic(
        code(dfes::archive::io),
        help(
            "A filesystem operation failed. Check that the output directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("zip error while writing {entry}: {message}")]
    #[diagnostic(
        code(dfes::archive::zip),
        help("The zip writer rejected an entry. If the problem persists, file a bug report.")
    )]
    Zip { entry: String, message: String },

    #[error("failed to serialize {entry}: {message}")]
    #[diagnostic(code(dfes::archive::serialize))]
    Serialize { entry: String, message: String },
}

/// Convenience alias for functions returning exporter results.
pub type ExportResult<T> = std::result::Result<T, ExportError>;
