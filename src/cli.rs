use std::path::PathBuf;

use clap::Parser;

use crate::marketplace::Marketplace;

/// Search a marketplace through the scraping proxy and print the listings as JSON.
#[derive(Parser, Debug)]
#[command(name = "marketplace_search_scraper")]
#[command(version)]
pub struct Cli {
    #[arg(value_enum, help = "Marketplace to search")]
    pub marketplace: Marketplace,

    #[arg(help = "Free-text search query")]
    pub query: String,

    #[arg(long, help = "Extract from a saved results page instead of fetching")]
    pub html: Option<PathBuf>,

    #[arg(long, help = "Keep the raw fetched page at this path")]
    pub save_html: Option<PathBuf>,

    #[arg(short, long, help = "Archive the result to this JSON file instead of printing it")]
    pub output: Option<PathBuf>,
}
