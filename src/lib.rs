//! coordreg: dimension identity and registry dispatch for coordinate-transform
//! documents.
//!
//! Coordinate systems name their axes ("dimensions") with ids that must stay
//! unique when systems authored independently are combined, and documents
//! describing them use namespace-qualified keys that must be dispatched to the
//! right constructor on the way in and shortened again on the way out.
//!
//! # Modules
//!
//! - [`identity`]: Dimensions, coordinate systems and their global ids
//! - [`registry`]: Identifier-to-constructor dispatch and reverse lookup
//! - [`namespace`]: Collision-free namespace prefixes
//! - [`normalize`]: Plain values from expanded graph values
//! - [`transform`]: Transform entities and transform chain steps
//! - [`validation`]: Tiered compatibility checks for transform chains
//! - [`document`]: Document decode/encode and chain documents
//! - [`error`]: Error types for coordreg operations

pub mod document;
pub mod error;
pub mod identity;
pub mod namespace;
pub mod normalize;
pub mod registry;
pub mod transform;
pub mod validation;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::CoordregError;

/// The coordreg CLI application.
#[derive(Parser)]
#[command(name = "coordreg")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check that a transform chain connects compatible dimensions.
    Validate(ValidateArgs),
    /// Decode a document through the registry and encode it again.
    Roundtrip(RoundtripArgs),
    /// Show the prefixes assigned to a set of namespaces.
    Abbreviate(AbbreviateArgs),
    /// List the identifiers of the built-in registry.
    Kinds,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Chain document to validate.
    input: PathBuf,

    /// Input format ('json', 'yaml', or 'auto' to pick by extension).
    #[arg(long, default_value = "auto")]
    format: String,

    /// Fail on any violation instead of reporting it as a warning.
    #[arg(long, env = "COORDREG_STRICT")]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the roundtrip subcommand.
#[derive(clap::Args)]
struct RoundtripArgs {
    /// JSON document to decode.
    input: PathBuf,

    /// Write the re-encoded document here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Arguments for the abbreviate subcommand.
#[derive(clap::Args)]
struct AbbreviateArgs {
    /// Namespaces, in the order they are first used.
    #[arg(required = true)]
    namespaces: Vec<String>,
}

/// Run the coordreg CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), CoordregError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Roundtrip(args)) => run_roundtrip(args),
        Some(Commands::Abbreviate(args)) => run_abbreviate(args),
        Some(Commands::Kinds) => run_kinds(),
        None => {
            println!("coordreg {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Dimension identity and registry dispatch for coordinate-transform documents.");
            println!();
            println!("Run 'coordreg --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), CoordregError> {
    let format: document::ChainFormat = args.format.parse()?;
    if !matches!(args.output.as_str(), "text" | "json") {
        return Err(CoordregError::UnsupportedFormat(format!(
            "'{}' (supported output: text, json)",
            args.output
        )));
    }

    let chain_doc = document::read_chain(&args.input, format)?;
    let chain = chain_doc.build(registry::default_registry())?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };

    match validation::validate_chain(&chain, &opts) {
        Ok(report) => print_report(&report, &args.output),
        Err(CoordregError::ChainValidationFailed {
            violation_count,
            report,
        }) => {
            print_report(&report, &args.output)?;
            Err(CoordregError::ChainValidationFailed {
                violation_count,
                report,
            })
        }
        Err(e) => Err(e),
    }
}

fn print_report(report: &validation::ChainReport, output: &str) -> Result<(), CoordregError> {
    match output {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        _ => print!("{}", report),
    }
    Ok(())
}

/// Execute the roundtrip subcommand.
fn run_roundtrip(args: RoundtripArgs) -> Result<(), CoordregError> {
    let registry = registry::default_registry();
    let input = document::read_document(&args.input)?;
    let decoded = document::decode(&input, registry)?;
    let encoded = document::encode(&decoded, registry)?;

    match args.out {
        Some(path) => document::write_document(&path, &encoded),
        None => {
            println!("{}", serde_json::to_string_pretty(&encoded)?);
            Ok(())
        }
    }
}

/// Execute the abbreviate subcommand.
fn run_abbreviate(args: AbbreviateArgs) -> Result<(), CoordregError> {
    let mut abbrev = namespace::NamespaceAbbreviator::new();
    for ns in &args.namespaces {
        let prefix = abbrev.abbreviation_for(ns);
        println!("{prefix}\t{ns}");
    }
    Ok(())
}

/// Execute the kinds subcommand.
fn run_kinds() -> Result<(), CoordregError> {
    for entry in registry::default_registry().entries() {
        match entry.kind {
            Some(kind) => println!("{}\t{}", entry.id, kind),
            None => println!("{}", entry.id),
        }
    }
    Ok(())
}
