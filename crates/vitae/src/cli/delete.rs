use anyhow::Result;
use console::style;
use uuid::Uuid;
use vitae_core::VitaeConfig;

use super::open_pipeline;

pub async fn run(config: &VitaeConfig, id: Uuid) -> Result<()> {
    let pipeline = open_pipeline(config).await?;
    pipeline.delete(id).await?;
    println!("{} {id}", style("Deleted").green());
    Ok(())
}
