use crate::prelude::{println, *};
use folio_core::books::OPENLIBRARY_API_BASE;

pub mod client;
pub mod search;
pub mod server;
mod views;

#[derive(Debug, clap::Parser)]
#[command(name = "books")]
#[command(about = "Search the OpenLibrary catalog")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Search books by title and print one page of results
    #[clap(name = "search")]
    Search(search::SearchOptions),

    /// Serve the book search web application
    #[clap(name = "serve")]
    Serve(server::BooksServeOptions),
}

#[derive(Debug, Clone, clap::Args)]
pub struct CatalogOptions {
    /// OpenLibrary host to query
    #[arg(long, env = "OPENLIBRARY_API_BASE", default_value = OPENLIBRARY_API_BASE)]
    pub api_base: String,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Search(options) => {
            if global.verbose {
                println!("OpenLibrary API Base: {}", options.catalog.api_base);
                println!();
            }
            search::run(options, global).await
        }
        Commands::Serve(options) => server::run(options, global).await,
    }
}
