use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use miette::IntoDiagnostic;
use serde::Serialize;

use compendium::config::{AppConfig, ConfigSource};
use compendium::core::logging;
use compendium::ingestion::ttrpg::{
    parse_documents_as, DocumentKind, ExtractionReport, IngestError,
};

/// Extract creature statblocks and spell cards from SRD-style Markdown.
#[derive(Debug, Parser)]
#[command(name = "compendium", version, about)]
struct Cli {
    /// Documents to parse.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Force a pipeline instead of detecting the document type.
    #[arg(long, value_enum, default_value_t = KindArg::Auto)]
    kind: KindArg,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Read configuration from this file instead of the default location.
    #[arg(long, env = "COMPENDIUM_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Auto,
    Beasts,
    Spells,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Auto => DocumentKind::Unknown,
            KindArg::Beasts => DocumentKind::Beasts,
            KindArg::Spells => DocumentKind::Spells,
        }
    }
}

/// One file's entry in the JSON output.
#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    #[serde(flatten)]
    report: ExtractionReport,
}

fn read_document(path: &Path) -> Result<String, IngestError> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::io(path.display().to_string(), e))?;
    String::from_utf8(bytes).map_err(|e| IngestError::NotText {
        source_name: path.display().to_string(),
        offset: e.utf8_error().valid_up_to(),
    })
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let (config, source) = match &cli.config {
        Some(path) => (AppConfig::load_from(path)?, ConfigSource::File(path.clone())),
        None => AppConfig::load_with_source(),
    };

    // Logging depends on the config, so the load outcome is reported after.
    let _log_guard = logging::init(&config);
    log::info!("{} v{} starting", compendium::NAME, compendium::VERSION);
    source.log();

    let documents = cli
        .files
        .iter()
        .map(|path| read_document(path))
        .collect::<Result<Vec<_>, _>>()?;

    let reports = parse_documents_as(&documents, cli.kind.into(), &config.grammar);

    for (path, report) in cli.files.iter().zip(&reports) {
        let summary = format!(
            "{}: {} {} record(s), {} warning(s), {} skipped",
            path.display(),
            report.document.len(),
            report.document.kind(),
            report.warnings.len(),
            report.skipped_segments
        );
        if report.document.is_empty() {
            logging::print_warning(&summary);
        } else {
            logging::print_success(&summary);
        }
    }

    let output: Vec<FileReport> = cli
        .files
        .iter()
        .zip(reports)
        .map(|(path, report)| FileReport {
            path: path.display().to_string(),
            report,
        })
        .collect();

    let json = if cli.pretty || config.output.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .into_diagnostic()?;
    println!("{json}");

    Ok(())
}
