//! docsift command line: feed `.docx` files and criteria to the extraction
//! core, then persist the assembled review report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use docsift::config::Config;
use docsift::extract::models::Criteria;
use docsift::{DocumentInput, assemble_report, build_sections, extract_batch};

#[derive(Parser, Debug)]
#[command(name = "docsift", version, about)]
struct Args {
    /// Input .docx files, reported in the order given.
    #[arg(required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Output path for the review report.
    #[arg(short, long, default_value = "review-report.docx")]
    output: PathBuf,

    /// Keep paragraphs with tracked changes (insertions, deletions, moves).
    #[arg(long)]
    redline: bool,

    /// Keep paragraphs containing highlighted runs.
    #[arg(long)]
    highlight: bool,

    /// Keep paragraphs whose visible text contains square brackets.
    #[arg(long)]
    brackets: bool,

    /// Keep paragraphs with comment ranges.
    #[arg(long)]
    comments: bool,

    /// Keep paragraphs referencing footnotes.
    #[arg(long)]
    footnotes: bool,

    /// Keep paragraphs referencing endnotes.
    #[arg(long)]
    endnotes: bool,

    /// Print extraction records as JSON instead of writing the report.
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Explicit criteria flags win; with none given, the configured
    /// defaults apply.
    fn criteria(&self, config: &Config) -> Criteria {
        let selected = Criteria {
            redline: self.redline,
            highlight: self.highlight,
            square_brackets: self.brackets,
            comments: self.comments,
            footnotes: self.footnotes,
            endnotes: self.endnotes,
        };
        if selected.any_enabled() {
            selected
        } else {
            config.criteria.to_criteria()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load().unwrap_or_else(|err| {
        warn!(%err, "config file unusable, falling back to defaults");
        Config::default()
    });
    let criteria = args.criteria(&config);

    let mut inputs = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        validate_extension(path);
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        inputs.push(DocumentInput {
            name: display_name(path),
            bytes,
        });
    }

    let batch = extract_batch(inputs, criteria).await;
    for failure in &batch.failures {
        error!("{failure}");
    }
    if batch.documents.is_empty() {
        bail!("no document could be extracted");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&batch.documents)?);
        return Ok(());
    }

    let table = build_sections(&batch.documents);
    let bytes = assemble_report(&table, &config.colors)?;
    tokio::fs::write(&args.output, &bytes)
        .await
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(
        documents = batch.documents.len(),
        rows = table.row_count(),
        output = %args.output.display(),
        "report written"
    );
    Ok(())
}

fn validate_extension(path: &Path) {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("docx") => {}
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls") => {
            warn!(
                file = %path.display(),
                "this looks like an Excel workbook; only Word documents can be sifted"
            );
        }
        _ => warn!(file = %path.display(), "input does not have a .docx extension"),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document.docx")
        .to_string()
}
