use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Runtime configuration for the parser service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitaeConfig {
    /// SQLite database file holding parsed resumes
    pub database_path: PathBuf,
    /// Directory where uploads are staged before parsing
    pub upload_dir: PathBuf,
    /// Announce parse and delete events
    #[serde(default)]
    pub publish_events: bool,
    /// Default number of resumes per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for VitaeConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            upload_dir: std::env::temp_dir().join("vitae-uploads"),
            publish_events: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vitae")
        .join("vitae.db")
}

impl VitaeConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("VITAE_DATABASE") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("VITAE_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("VITAE_PUBLISH_EVENTS") {
            config.publish_events = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
        if let Some(size) = lookup("VITAE_PAGE_SIZE") {
            config.page_size = size
                .parse()
                .map_err(|_| Error::Config(format!("VITAE_PAGE_SIZE is not a number: {size}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(Error::Config(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database_path = path;
        self
    }

    #[must_use]
    pub fn with_upload_dir(mut self, dir: PathBuf) -> Self {
        self.upload_dir = dir;
        self
    }

    #[must_use]
    pub fn with_publish_events(mut self, publish: bool) -> Self {
        self.publish_events = publish;
        self
    }
}
