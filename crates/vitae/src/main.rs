mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    match cli.command {
        Commands::Parse { file, owner } => cli::parse::run(&config, &file, owner).await,
        Commands::Extract { file } => cli::extract::run(&file).await,
        Commands::Show { id, raw } => cli::show::run(&config, id, raw).await,
        Commands::List {
            owner,
            status,
            page,
            limit,
        } => cli::list::run(&config, owner, status, page, limit).await,
        Commands::Search {
            skills,
            page,
            limit,
        } => cli::search::run(&config, skills, page, limit).await,
        Commands::Delete { id } => cli::delete::run(&config, id).await,
    }
}
