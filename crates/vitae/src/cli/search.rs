use anyhow::Result;
use vitae_core::VitaeConfig;

use super::list::print_page;
use super::open_pipeline;

pub async fn run(
    config: &VitaeConfig,
    skills: Vec<String>,
    page: u32,
    limit: Option<u32>,
) -> Result<()> {
    let pipeline = open_pipeline(config).await?;
    let page = pipeline
        .search_by_skills(skills, page, limit.unwrap_or(config.page_size))
        .await?;
    print_page(&page);
    Ok(())
}
