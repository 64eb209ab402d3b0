use anyhow::Result;
use uuid::Uuid;
use vitae_core::VitaeConfig;

use super::{open_pipeline, print_json};

pub async fn run(config: &VitaeConfig, id: Uuid, raw: bool) -> Result<()> {
    let pipeline = open_pipeline(config).await?;
    let resume = pipeline.get(id, raw).await?;
    print_json(&resume)
}
