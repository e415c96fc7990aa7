//! FDC Branded Foods merger
//!
//! Command line entry point: merge the download, summarize it, export it to
//! CSV or verify it against API fixtures.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fdc_branded::build_info;
use fdc_branded::data::load_raw_data;
use fdc_branded::merge::{merge_sources_with, MergeOptions};
use fdc_branded::models::MergedDocument;
use fdc_branded::tools::{export_csv, summarize, verify_test_data, ExportConfig};

#[derive(Parser)]
#[command(name = "fdc-branded", version, about = "Merge the FDC Branded Foods download into API documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write merged documents as a JSON array
    Merge {
        #[arg(long)]
        raw_data_dir: Option<PathBuf>,
        /// Output file, stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
        /// Keep nutrients whose unit code is not in the unit table
        #[arg(long)]
        allow_unknown_units: bool,
    },
    /// Write value frequency tables
    Summarize {
        #[arg(long)]
        raw_data_dir: Option<PathBuf>,
        #[arg(long)]
        summary_dir: PathBuf,
    },
    /// Write merged documents as CSV, columns chosen by a config file
    ExportCsv {
        #[arg(long)]
        raw_data_dir: Option<PathBuf>,
        #[arg(long)]
        export_config_file: PathBuf,
        #[arg(long)]
        merged_data_dir: PathBuf,
    },
    /// Compare merged documents with `<fdc_id>.json` API fixtures
    Verify {
        #[arg(long)]
        test_data_dir: PathBuf,
        /// Documents to check, every fixture in the directory when omitted
        fdc_ids: Vec<String>,
    },
}

/// Get the raw data directory from the argument, environment or default
fn get_raw_data_dir(arg: Option<PathBuf>) -> PathBuf {
    arg.or_else(|| std::env::var("FDC_RAW_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("fdc");
            path
        })
}

fn load_documents(raw_data_dir: &Path, options: MergeOptions) -> Result<Vec<MergedDocument>, Box<dyn std::error::Error>> {
    eprintln!("Raw data directory: {}", raw_data_dir.display());
    let raw_data = load_raw_data(raw_data_dir)?;
    Ok(merge_sources_with(&raw_data, options)?)
}

fn write_documents<W: Write>(
    documents: &[MergedDocument],
    mut writer: W,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, documents)?;
    } else {
        serde_json::to_writer(&mut writer, documents)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so merged JSON can be piped from stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fdc_branded=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    match Cli::parse().command {
        Command::Merge {
            raw_data_dir,
            output,
            pretty,
            allow_unknown_units,
        } => {
            let options = MergeOptions { allow_unknown_units };
            let documents = load_documents(&get_raw_data_dir(raw_data_dir), options)?;
            match output {
                Some(path) => {
                    write_documents(&documents, BufWriter::new(File::create(&path)?), pretty)?;
                    eprintln!("Wrote {} documents to {}", documents.len(), path.display());
                }
                None => write_documents(&documents, std::io::stdout().lock(), pretty)?,
            }
        }
        Command::Summarize {
            raw_data_dir,
            summary_dir,
        } => {
            let documents = load_documents(&get_raw_data_dir(raw_data_dir), MergeOptions::default())?;
            std::fs::create_dir_all(&summary_dir)?;
            for path in summarize(&documents, &summary_dir)? {
                eprintln!("Wrote {}", path.display());
            }
        }
        Command::ExportCsv {
            raw_data_dir,
            export_config_file,
            merged_data_dir,
        } => {
            let config = ExportConfig::from_file(&export_config_file)?;
            let documents = load_documents(&get_raw_data_dir(raw_data_dir), MergeOptions::default())?;
            std::fs::create_dir_all(&merged_data_dir)?;
            let path = export_csv(&documents, &config, &merged_data_dir)?;
            eprintln!("Wrote {}", path.display());
        }
        Command::Verify {
            test_data_dir,
            fdc_ids,
        } => {
            let count = verify_test_data(&test_data_dir, &fdc_ids)?;
            eprintln!("Verified {} documents", count);
        }
    }

    Ok(())
}
