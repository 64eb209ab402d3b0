use std::path::Path;

use anyhow::{Context, Result};
use vitae_core::ingest::{CompositeExtractor, EntityParser, Extractor};
use vitae_core::FileType;

use super::print_json;

pub async fn run(file: &Path) -> Result<()> {
    let file_type = file
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(FileType::from_file_name)
        .with_context(|| format!("unsupported file type: {}", file.display()))?;

    let text = CompositeExtractor::default()
        .extract_file(file, file_type)
        .await
        .with_context(|| format!("failed to extract {}", file.display()))?;
    let entity = EntityParser::new()?.parse(&text)?;

    print_json(&entity)
}
