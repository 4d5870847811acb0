//! Pieces shared by the book search and blog servers

use crate::prelude::{eprintln, *};
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Router,
};
use folio_core::pagination::PageToken;
use std::path::PathBuf;
use tower_http::services::ServeDir;

const DEFAULT_PUBLIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public");

#[derive(Debug, Clone, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding the stylesheet and other static assets
    #[arg(long, env = "FOLIO_PUBLIC_DIR", default_value = DEFAULT_PUBLIC_DIR)]
    pub public_dir: PathBuf,
}

/// Bind `host:port` and serve `router` until the process is stopped
pub async fn serve(
    router: Router,
    options: &ServeOptions,
    global: &crate::Global,
    name: &str,
) -> Result<()> {
    let addr = f!("{}:{}", options.host, options.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    if global.verbose {
        eprintln!("{} listening on http://{}", name, addr);
        eprintln!("Static files: {}", options.public_dir.display());
    }
    log::info!("{name} listening on http://{addr}");

    axum::serve(listener, router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

/// Static file service used as the router fallback
pub fn static_files(options: &ServeOptions) -> ServeDir {
    ServeDir::new(&options.public_dir)
}

/// Render a template, logging and answering 500 if rendering fails
pub fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            log::error!("Template rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering error").into_response()
        }
    }
}

/// One entry of the rendered page navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub current: bool,
    pub gap: bool,
}

/// Attach hrefs to page tokens
pub fn nav_links(
    tokens: &[PageToken],
    current_page: usize,
    href: impl Fn(usize) -> String,
) -> Vec<NavLink> {
    tokens
        .iter()
        .map(|token| match token.page_number() {
            Some(page) => NavLink {
                label: page.to_string(),
                href: href(page),
                current: page == current_page,
                gap: false,
            },
            None => NavLink {
                label: token.to_string(),
                href: String::new(),
                current: false,
                gap: true,
            },
        })
        .collect()
}
