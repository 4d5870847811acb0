use crate::prelude::*;

pub mod server;
mod views;

#[derive(Debug, clap::Parser)]
#[command(name = "blog")]
#[command(about = "In-memory blog post manager")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Serve the blog web application
    #[clap(name = "serve")]
    Serve(server::BlogServeOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Serve(options) => server::run(options, global).await,
    }
}
