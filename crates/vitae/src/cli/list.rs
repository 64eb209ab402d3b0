use anyhow::Result;
use console::style;
use vitae_core::storage::ResumePage;
use vitae_core::{ParseStatus, Resume, VitaeConfig};

use super::open_pipeline;

pub async fn run(
    config: &VitaeConfig,
    owner: Option<String>,
    status: Option<ParseStatus>,
    page: u32,
    limit: Option<u32>,
) -> Result<()> {
    let pipeline = open_pipeline(config).await?;
    let page = pipeline
        .list(owner, status, page, limit.unwrap_or(config.page_size))
        .await?;
    print_page(&page);
    Ok(())
}

pub fn print_page(page: &ResumePage) {
    if page.resumes.is_empty() {
        println!("{}", style("No résumés found").dim());
        return;
    }

    for resume in &page.resumes {
        print_resume(resume);
    }
    println!(
        "{}",
        style(format!(
            "page {} of {} ({} total)",
            page.page, page.total_pages, page.total
        ))
        .dim()
    );
}

fn print_resume(resume: &Resume) {
    let status = match resume.parse_status {
        ParseStatus::Completed => style(resume.parse_status.as_str()).green(),
        ParseStatus::Failed => style(resume.parse_status.as_str()).red(),
        ParseStatus::Pending => style(resume.parse_status.as_str()).yellow(),
    };
    let name = resume
        .parsed_data
        .as_ref()
        .and_then(|p| p.name.as_deref())
        .unwrap_or("-");

    println!(
        "{}  {:<9}  {}  {}",
        resume.id,
        status,
        resume.file_name,
        style(name).bold()
    );
}
