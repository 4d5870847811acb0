use crate::prelude::*;
use clap::Parser;

mod blog;
mod books;
mod error;
mod prelude;
mod web;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Book search and blog web applications"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "FOLIO_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Search the OpenLibrary catalog from the terminal or over HTTP
    Books(crate::books::App),

    /// Serve the blog post manager
    Blog(crate::blog::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Books(sub_app) => crate::books::run(sub_app, app.global).await,
        SubCommands::Blog(sub_app) => crate::blog::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
