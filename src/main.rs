mod archiver;
mod cli;
mod config;
mod dispatcher;
mod fetcher;
mod logging;
mod marketplace;
mod models;
mod parser;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::fetcher::{Fetcher, ProxyFetcher, SavedPageFetcher};
use crate::models::SearchArchive;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match &cli.html {
        Some(path) => run(Dispatcher::new(SavedPageFetcher::new(path))?, &cli),
        None => {
            let config = Config::from_env()?;
            run(Dispatcher::new(ProxyFetcher::new(&config)?)?, &cli)
        }
    }
}

fn run<F: Fetcher>(dispatcher: Dispatcher<F>, cli: &Cli) -> Result<()> {
    let outcome = match &cli.save_html {
        Some(path) => {
            let html = dispatcher.fetch_page(cli.marketplace, &cli.query)?;
            std::fs::write(path, &html)
                .with_context(|| format!("failed to write HTML to {}", path.display()))?;
            dispatcher.process_html(cli.marketplace, &html)
        }
        None => dispatcher.search(cli.marketplace, &cli.query)?,
    };

    match &cli.output {
        Some(path) => {
            let archive = SearchArchive::new(cli.marketplace, &cli.query, outcome);
            archiver::save_to_file(&archive, path)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(())
}
