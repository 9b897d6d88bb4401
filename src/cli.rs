use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use lottery_api::api::{self, GenerateOptions, IndexOptions, layout};
use lottery_api::config::ApiConfig;
use lottery_api::mapping::MappingKind;
use lottery_api::record::ApiRecord;
use lottery_api::upstream::UpstreamResult;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "lottery-api",
    version,
    about = "Generate a static JSON API from lottery draw history"
)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true, env = "LOTTERY_API_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write rolling log files to this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a CSV export into draw documents, latest.json and index.json
    Convert {
        /// CSV file with a header row
        csv_path: PathBuf,

        /// Directory receiving `<id>.json` and `latest.json`
        output_dir: PathBuf,

        /// Row mapper to apply
        #[arg(default_value = "default")]
        mapping_type: String,

        /// Lottery name used in the index. Defaults to the parent directory name.
        #[arg(long)]
        lottery: Option<String>,

        /// Force the field delimiter instead of sniffing it (e.g. ';' or 'tab')
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Do not rebuild index.json after the conversion
        #[arg(long)]
        skip_index: bool,
    },
    /// Rebuild index.json from the documents in a draws directory
    Index {
        /// Directory holding `<id>.json` documents
        draws_dir: PathBuf,

        /// Lottery name used in the index. Defaults to the parent directory name.
        #[arg(long)]
        lottery: Option<String>,
    },
    /// Publish an upstream "latest result" document as the newest draw
    UpdateLatest {
        /// Result document, or '-' to read standard input
        payload: PathBuf,

        #[arg(long, default_value = "federal")]
        lottery: String,

        /// Root of the published tree. Defaults to the configured `api_root`.
        #[arg(long)]
        api_root: Option<PathBuf>,
    },
}

pub fn run_command(command: Commands, config: &ApiConfig) -> Result<()> {
    match command {
        Commands::Convert {
            csv_path,
            output_dir,
            mapping_type,
            lottery,
            delimiter,
            skip_index,
        } => handle_convert(
            &csv_path,
            &output_dir,
            &mapping_type,
            lottery,
            delimiter,
            skip_index,
            config,
        ),
        Commands::Index { draws_dir, lottery } => handle_index(&draws_dir, lottery, config),
        Commands::UpdateLatest {
            payload,
            lottery,
            api_root,
        } => handle_update_latest(&payload, &lottery, api_root, config),
    }
}

fn handle_convert(
    csv_path: &Path,
    output_dir: &Path,
    mapping_type: &str,
    lottery: Option<String>,
    delimiter: Option<u8>,
    skip_index: bool,
    config: &ApiConfig,
) -> Result<()> {
    let mapping: MappingKind = mapping_type.parse()?;

    println!("Converting {} using '{mapping}' mapping...", csv_path.display());

    let mut ingest = config.ingest_options();
    ingest.delimiter = delimiter;
    let options = GenerateOptions {
        progress_interval: config.progress_interval,
    };

    let report = api::convert_file(csv_path, output_dir, mapping, &ingest, &options)
        .with_context(|| format!("Conversion of {} failed", csv_path.display()))?;

    info!("{}", report.summary());
    println!("Conversion complete!");
    println!("Processed: {} rows", report.processed);
    println!("Errors: {} rows", report.errors());
    println!("Output directory: {}", report.output_dir.display());
    if let Some(latest) = &report.latest {
        println!("Latest: {}", latest.display());
    }

    if skip_index {
        return Ok(());
    }

    let lottery = lottery_label(lottery, output_dir, mapping.name());
    write_index(output_dir, lottery, config)
}

fn handle_index(draws_dir: &Path, lottery: Option<String>, config: &ApiConfig) -> Result<()> {
    if !draws_dir.is_dir() {
        anyhow::bail!("Draws directory not found: {}", draws_dir.display());
    }

    let lottery = lottery_label(lottery, draws_dir, layout::DRAWS_DIR);
    write_index(draws_dir, lottery, config)
}

fn handle_update_latest(
    payload: &Path,
    lottery: &str,
    api_root: Option<PathBuf>,
    config: &ApiConfig,
) -> Result<()> {
    let result = if payload == Path::new("-") {
        UpstreamResult::from_reader(std::io::stdin().lock())?
    } else {
        let file = File::open(payload)
            .with_context(|| format!("Failed to open result document {}", payload.display()))?;
        UpstreamResult::from_reader(BufReader::new(file))?
    };

    let record = result.to_draw_record()?;
    println!("Latest draw: #{} from {}", record.id, record.date);

    let api_root = api_root.unwrap_or_else(|| config.api_root.clone());
    let draws_dir = layout::draws_dir(&api_root, lottery);

    let published = api::publish_record(&ApiRecord::from(record), &draws_dir)?;
    if published.replaced {
        println!("Draw already existed, updated anyway");
    }
    println!("Saved: {}", published.path.display());
    println!("Updated: {}", published.latest.display());

    write_index(&draws_dir, lottery.to_owned(), config)
}

fn write_index(draws_dir: &Path, lottery: String, config: &ApiConfig) -> Result<()> {
    let options = IndexOptions {
        lottery,
        endpoint_template: config.endpoint_template.clone(),
    };
    let (path, index) = api::write_index(draws_dir, &options)
        .with_context(|| format!("Failed to build index for {}", draws_dir.display()))?;
    println!("Index: {} ({} draws)", path.display(), index.total);
    Ok(())
}

/// Explicit name, else the draws directory's parent, else `fallback`.
fn lottery_label(explicit: Option<String>, draws_dir: &Path, fallback: &str) -> String {
    explicit
        .or_else(|| layout::lottery_name(draws_dir))
        .unwrap_or_else(|| fallback.to_owned())
}

fn parse_delimiter(value: &str) -> std::result::Result<u8, String> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() && !byte.is_ascii_alphanumeric() => Ok(*byte),
            _ => Err(format!(
                "delimiter must be a single ASCII punctuation character or 'tab', got {value:?}"
            )),
        },
    }
}
