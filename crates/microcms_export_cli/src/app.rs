use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use export_logging::{export_debug, export_info, export_warn};
use log::LevelFilter;
use microcms_export::{export_from_config, ExportConfig};

/// Export microCMS blog entries as Hugo Markdown files.
///
/// Reads MICROCMS_BASE_URL, X_MICROCMS_API_KEY, MD_OUTPUT_DIR and the optional
/// MICROCMS_PAGE_SIZE from the environment, after loading the dotenv file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dotenv file loaded before reading the environment. A missing file is ignored.
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub fn run(args: &Args) -> Result<()> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    export_logging::initialize(level, args.log_file.as_deref());

    load_env_file(&args.env_file);
    let config = ExportConfig::from_env().context("invalid configuration")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let summary = runtime
        .block_on(export_from_config(&config))
        .context("export failed")?;

    if summary.skipped > 0 {
        export_warn!("{} records were skipped, see warnings above", summary.skipped);
    }
    export_info!(
        "Wrote {} Markdown files to {:?}",
        summary.written,
        summary.output_dir
    );
    Ok(())
}

fn load_env_file(path: &Path) {
    match dotenv::from_path(path) {
        Ok(()) => export_debug!("Loaded environment from {:?}", path),
        Err(dotenv::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            export_debug!("No env file at {:?}", path);
        }
        Err(err) => export_warn!("Failed to load env file {:?}: {}", path, err),
    }
}
