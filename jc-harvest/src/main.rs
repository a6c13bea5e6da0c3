//! jc-harvest - build the journal club data file
//!
//! `populate` refreshes `sessions.csv` from the PubMed exports, `build` writes
//! `data/journal_club.json`, and `tag` assigns subject categories.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jc_common::config::{self, TomlConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jc_harvest::{assemble, populate, tagger, SUBJECT_SUMMARY_FILE};

/// Command-line arguments for jc-harvest
#[derive(Parser, Debug)]
#[command(name = "jc-harvest")]
#[command(about = "Journal club data pipeline: populate, build and tag")]
#[command(version)]
struct Args {
    /// Root folder holding sessions.csv and the export folders
    #[arg(short, long, global = true)]
    root_folder: Option<PathBuf>,

    /// Data file (overrides the root folder's data/journal_club.json)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Config file (defaults to the platform config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge exported articles into sessions.csv
    Populate,
    /// Write the data file from sessions.csv
    Build {
        /// Output file (defaults to the data file)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Assign subjects to the data file and write the subject summary
    Tag {
        /// Summary file (defaults to data/subject_summary.json under the root)
        #[arg(short, long)]
        summary: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = TomlConfig::load_or_default(args.config.as_deref());

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("jc-harvest {}", jc_harvest::build_label());

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let data_path = config::resolve_data_file(args.data.as_deref(), &root_folder, &toml_config);
    info!("Root folder: {}", root_folder.display());

    match args.command {
        Command::Populate => {
            let report = populate::populate(&root_folder)
                .with_context(|| format!("Failed to populate {}", root_folder.display()))?;
            println!("Wrote {} sessions to {}", report.rows, report.path.display());
        }
        Command::Build { out } => {
            let out = out.unwrap_or(data_path);
            let report = assemble::build(&root_folder, &out)
                .with_context(|| format!("Failed to build {}", out.display()))?;
            println!(
                "Wrote {} sessions and {} monthly summaries to {} ({} skipped)",
                report.sessions,
                report.summaries,
                report.path.display(),
                report.skipped
            );
        }
        Command::Tag { summary } => {
            let summary = summary.unwrap_or_else(|| root_folder.join(SUBJECT_SUMMARY_FILE));
            let report = tagger::tag(&data_path, &summary)
                .with_context(|| format!("Failed to tag {}", data_path.display()))?;
            println!(
                "Tagged {} sessions; {} months in {}",
                report.sessions,
                report.months,
                report.summary_path.display()
            );
        }
    }

    Ok(())
}
