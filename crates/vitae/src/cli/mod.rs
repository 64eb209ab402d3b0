pub mod delete;
pub mod extract;
pub mod list;
pub mod parse;
pub mod search;
pub mod show;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;
use vitae_core::ingest::ResumePipeline;
use vitae_core::{ParseStatus, Storage, TracingPublisher, VitaeConfig};

#[derive(Parser)]
#[command(name = "vitae", about = "Pattern-based résumé parser", version)]
pub struct Cli {
    /// SQLite database file (overrides VITAE_DATABASE)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Staging directory for uploads (overrides VITAE_UPLOAD_DIR)
    #[arg(long, global = true)]
    pub upload_dir: Option<PathBuf>,
    /// Log resume.parsed and resume.deleted events
    #[arg(long, global = true)]
    pub publish: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a résumé and store the result
    Parse {
        /// PDF or DOCX file
        file: PathBuf,
        /// Owner recorded with the résumé
        #[arg(long)]
        owner: Option<String>,
    },
    /// Print the parsed fields of a résumé without storing anything
    Extract {
        /// PDF or DOCX file
        file: PathBuf,
    },
    /// Show a stored résumé
    Show {
        id: Uuid,
        /// Include the extracted text
        #[arg(long)]
        raw: bool,
    },
    /// List stored résumés, newest first
    List {
        #[arg(long)]
        owner: Option<String>,
        /// pending, completed or failed
        #[arg(long)]
        status: Option<ParseStatus>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size (defaults to VITAE_PAGE_SIZE)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Find completed résumés listing any of the given skills
    Search {
        #[arg(required = true)]
        skills: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete a stored résumé
    Delete { id: Uuid },
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn config(&self) -> Result<VitaeConfig> {
        let mut config = VitaeConfig::from_env().context("invalid VITAE_* environment")?;

        if let Some(db) = &self.db {
            config = config.with_database_path(db.clone());
        }
        if let Some(dir) = &self.upload_dir {
            config = config.with_upload_dir(dir.clone());
        }
        if self.publish {
            config = config.with_publish_events(true);
        }

        Ok(config)
    }
}

pub async fn open_pipeline(config: &VitaeConfig) -> Result<ResumePipeline> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let path = config.database_path.to_string_lossy();
    tracing::debug!(%path, "Opening database");
    let storage = Storage::open(&path)
        .await
        .with_context(|| format!("failed to open database {path}"))?;

    Ok(ResumePipeline::new(Box::new(storage))?
        .with_publisher(Box::new(TracingPublisher))
        .with_publish_events(config.publish_events))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
