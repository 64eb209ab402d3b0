use std::path::Path;

use anyhow::{Context, Result};
use vitae_core::ingest::Upload;
use vitae_core::VitaeConfig;

use super::{open_pipeline, print_json};

pub async fn run(config: &VitaeConfig, file: &Path, owner: Option<String>) -> Result<()> {
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("not a file name: {}", file.display()))?
        .to_string();

    let pipeline = open_pipeline(config).await?;
    let upload = stage(config, file, &file_name)?.with_owner(owner);

    let resume = pipeline
        .parse_upload(upload)
        .await
        .with_context(|| format!("failed to parse {file_name}"))?;

    print_json(&resume)
}

/// Copies the input into the upload directory. Call only once the pipeline
/// is open: from here on the copy is owned by `parse_upload`.
fn stage(config: &VitaeConfig, file: &Path, file_name: &str) -> Result<Upload> {
    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("failed to create {}", config.upload_dir.display()))?;

    let suffix = file
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let staged = tempfile::Builder::new()
        .prefix("vitae-")
        .suffix(&suffix)
        .tempfile_in(&config.upload_dir)?;

    let size = std::fs::copy(file, staged.path())
        .with_context(|| format!("failed to read {}", file.display()))?;
    let path = staged.into_temp_path().keep()?;

    Ok(Upload::new(path, file_name).with_size(size))
}
