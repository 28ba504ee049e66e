//! dfes-export CLI: Voiceflow project → Dialogflow ES agent archive.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use dfes_export::archive::write_archive;
use dfes_export::config::ExportConfig;
use dfes_export::project::Assembler;
use dfes_export::source::SourceProject;
use dfes_export::translate::{IdGenerator, IdentityCache};

#[derive(Parser)]
#[command(
    name = "dfes-export",
    version,
    about = "Convert Voiceflow projects into Dialogflow ES agent archives"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a Dialogflow ES agent zip for a .vf project.
    Export {
        /// Path to the .vf project file.
        #[arg(default_value = "project.vf")]
        input: PathBuf,

        /// Output archive (defaults to the input path with a .zip extension).
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// TOML export configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON file keeping entity identifiers stable across runs.
        #[arg(long)]
        id_cache: Option<PathBuf>,

        /// Seed for identifier generation (reproducible archives).
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the converted project and export report as JSON.
    Inspect {
        /// Path to the .vf project file.
        #[arg(default_value = "project.vf")]
        input: PathBuf,

        /// TOML export configuration.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
            id_cache,
            seed,
        } => {
            let config = load_config(config.as_deref())?;
            let source = SourceProject::load(&input)?;

            let cache = match &id_cache {
                Some(path) => IdentityCache::load(path)?,
                None => IdentityCache::new(),
            };
            let ids = match seed {
                Some(seed) => IdGenerator::seeded(seed),
                None => IdGenerator::from_entropy(),
            };

            let mut assembler = Assembler::new(config.clone())
                .with_identity_cache(cache)
                .with_id_generator(ids);
            let out = assembler.assemble(&source)?;

            let output = output.unwrap_or_else(|| input.with_extension("zip"));
            let summary = write_archive(&out.project, &config, assembler.id_generator(), &output)?;

            if let Some(path) = &id_cache {
                assembler.identity_cache().save(path)?;
            }

            println!("Exported \"{}\" to {}", out.project.name, output.display());
            println!("  {}", out.report);
            println!("  {} archive entries", summary.entries);
            for key in &out.report.skipped_intents {
                println!("  skipped trigger for unknown intent {key}");
            }
            for entry in &summary.skipped_duplicates {
                println!("  skipped duplicate entry {entry}");
            }
        }

        Commands::Inspect { input, config } => {
            let config = load_config(config.as_deref())?;
            let source = SourceProject::load(&input)?;
            let out = Assembler::new(config).assemble(&source)?;
            let json = serde_json::to_string_pretty(&out).into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ExportConfig> {
    match path {
        Some(path) => Ok(ExportConfig::load(path)?),
        None => Ok(ExportConfig::default()),
    }
}
