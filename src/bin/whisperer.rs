//! whisperer CLI - suggest and apply field mappings between JSON documents

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use data_whisperer::{
    load_mappings, AnalyzeRequest, EngineConfig, ExportRequest, MapperError, MappingEngine,
    NdjsonWriter, PreviewRequest,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "whisperer")]
#[command(version, about = "Suggest and apply field mappings between JSON documents", long_about = None)]
struct Cli {
    /// Minimum confidence for suggestions (overrides WHISPERER_THRESHOLD)
    #[arg(short, long, global = true)]
    threshold: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sorted field paths of a JSON document
    Fields {
        /// Path to the JSON document
        document: PathBuf,
    },

    /// Suggest mappings from a source document to a target document
    Analyze {
        /// Path to the source JSON document
        #[arg(short, long)]
        source: PathBuf,

        /// Path to the target JSON document
        #[arg(short = 'g', long)]
        target: PathBuf,

        /// Print one suggestion per line instead of the full report
        #[arg(long)]
        ndjson: bool,
    },

    /// Reshape a source document with a mapping file (JSON or YAML)
    Preview {
        /// Path to the source JSON document
        #[arg(short, long)]
        source: PathBuf,

        /// Path to a mapping list or exported configuration
        #[arg(short, long)]
        mappings: PathBuf,
    },

    /// Package a mapping file as an exportable configuration
    Export {
        /// Path to a mapping list or exported configuration
        #[arg(short, long)]
        mappings: PathBuf,

        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// List the available value transforms
    Transforms,
}

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env();
    if let Some(threshold) = cli.threshold {
        config = config.with_threshold(threshold);
    }
    let engine = MappingEngine::new(config);

    let result = match cli.command {
        Commands::Fields { document } => list_fields(&engine, &document),
        Commands::Analyze { source, target, ndjson } => analyze(&engine, &source, &target, ndjson),
        Commands::Preview { source, mappings } => preview(&engine, &source, &mappings),
        Commands::Export { mappings, yaml } => export(&engine, &mappings, yaml),
        Commands::Transforms => {
            for name in engine.registry().list_transforms() {
                println!("{}", name);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn read_document(path: &Path) -> Result<Value, MapperError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| MapperError::ParseError(format!("Invalid JSON in {}: {}", path.display(), e)))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), MapperError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list_fields(engine: &MappingEngine, document: &Path) -> Result<(), MapperError> {
    let document = read_document(document)?;
    for field in engine.extract_fields(&document)? {
        println!("{}", field);
    }
    Ok(())
}

fn analyze(
    engine: &MappingEngine,
    source: &Path,
    target: &Path,
    ndjson: bool,
) -> Result<(), MapperError> {
    let request = AnalyzeRequest {
        source_json: Some(read_document(source)?),
        target_json: Some(read_document(target)?),
        threshold: None,
    };
    let response = engine.analyze(request)?;

    tracing::info!(
        "Suggested {} mappings ({} matched)",
        response.mappings.len(),
        response.mappings.iter().filter(|m| m.is_complete()).count()
    );

    if ndjson {
        let stdout = io::stdout();
        let mut writer = NdjsonWriter::new(stdout.lock());
        writer.write_all(&response.mappings)?;
        writer.flush()
    } else {
        print_json(&response)
    }
}

fn preview(engine: &MappingEngine, source: &Path, mappings: &Path) -> Result<(), MapperError> {
    let request = PreviewRequest {
        source_json: Some(read_document(source)?),
        mappings: load_mappings(mappings)?,
    };
    print_json(&engine.preview(request)?.transformed)
}

fn export(engine: &MappingEngine, mappings: &Path, yaml: bool) -> Result<(), MapperError> {
    let config = engine
        .export(ExportRequest {
            mappings: load_mappings(mappings)?,
        })
        .config;

    if yaml {
        print!("{}", config.to_yaml()?);
        Ok(())
    } else {
        print_json(&config)
    }
}
