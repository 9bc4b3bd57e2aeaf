mod crawl;

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "alkoteka-cli")]
#[command(about = "Crawl the alkoteka.com catalog into JSON lines")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl every category in the links file for one city
    Crawl(CrawlArgs),
    /// List the crawl targets defined in the targets file
    Targets,
}

#[derive(Debug, Args)]
pub(crate) struct CrawlArgs {
    /// Crawl target block to use from the targets file
    #[arg(long, default_value = "products_by_category")]
    pub target: String,
    /// City to crawl for; defaults to the target's `default_city_name`
    #[arg(long)]
    pub city: Option<String>,
    /// Category links file; overrides `ALKOTEKA_LINKS_PATH`
    #[arg(long)]
    pub links: Option<PathBuf>,
    /// Write records here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Abort on the first record that fails validation
    #[arg(long)]
    pub strict: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = alkoteka_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Crawl(args)) => crawl::run_crawl(&config, &args).await,
        Some(Commands::Targets) => crawl::list_targets(&config),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
