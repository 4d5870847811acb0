use crate::prelude::*;
use crate::web::{render_template, serve, static_files, ServeOptions};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use folio_core::books::{search_page_url, transform_search};
use folio_core::pagination::{PageOutcome, PageRequest, PageView};
use serde::Deserialize;
use std::sync::Arc;

use super::client::{build_client, search_books};
use super::views::{IndexTemplate, ResultsTemplate};
use super::CatalogOptions;

#[derive(Debug, clap::Args)]
pub struct BooksServeOptions {
    #[clap(flatten)]
    pub serve: ServeOptions,

    #[clap(flatten)]
    pub catalog: CatalogOptions,
}

pub struct BooksState {
    pub client: reqwest::Client,
    pub api_base: String,
}

/// Raw `/books/search` query; numbers stay strings so bad input falls back to
/// defaults instead of failing extraction
#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
}

pub async fn run(options: BooksServeOptions, global: crate::Global) -> Result<()> {
    let state = Arc::new(BooksState {
        client: build_client()?,
        api_base: options.catalog.api_base.clone(),
    });

    serve(
        router(state, &options.serve),
        &options.serve,
        &global,
        "Book search",
    )
    .await
}

pub fn router(state: Arc<BooksState>, options: &ServeOptions) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/books/search", get(search))
        .fallback_service(static_files(options))
        .with_state(state)
}

async fn index() -> Response {
    render_template(IndexTemplate)
}

async fn search(
    State(state): State<Arc<BooksState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.as_deref().unwrap_or_default().trim().to_string();
    let request = PageRequest::from_raw(params.page.as_deref(), params.per_page.as_deref());
    let page_size = request.page_size.get();

    if query.is_empty() {
        return render_template(ResultsTemplate::new(
            query,
            PageView::empty(page_size),
            request.page_size,
        ));
    }

    let response = match search_books(&state.client, &state.api_base, &query, &request).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Search for {query:?} failed: {e}");
            return render_template(ResultsTemplate::failed(query));
        }
    };

    match PageView::build(transform_search(&response, page_size), request.page, page_size) {
        PageOutcome::Redirect { page } => {
            Redirect::to(&search_page_url(&query, page, request.page_size)).into_response()
        }
        PageOutcome::Render(view) => {
            render_template(ResultsTemplate::new(query, view, request.page_size))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::testing::{client, spawn};
    use axum::http::StatusCode;
    use axum::Json;
    use std::collections::HashMap;
    use std::path::PathBuf;

    const FAKE_TOTAL: usize = 100;

    /// Stand-in for OpenLibrary: 100 matches, always answering with a full
    /// batch of 100 docs regardless of `limit`
    async fn fake_catalog(Query(params): Query<HashMap<String, String>>) -> Response {
        let q = params.get("q").cloned().unwrap_or_default();
        let page: usize = params
            .get("page")
            .and_then(|page| page.parse().ok())
            .unwrap_or(1);

        match q.as_str() {
            "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            "nothing" => Json(serde_json::json!({ "numFound": 0, "docs": [] })).into_response(),
            "garbled" => Json(serde_json::json!({ "numFound": 5, "docs": "oops" })).into_response(),
            _ => {
                let docs: Vec<serde_json::Value> = (0..100)
                    .map(|i| {
                        serde_json::json!({
                            "title": format!("{q} {page}-{i}"),
                            "author_name": ["Frank Herbert"],
                            "first_publish_year": 1965,
                            "cover_i": 1000 + i,
                        })
                    })
                    .collect();
                Json(serde_json::json!({ "numFound": FAKE_TOTAL, "docs": docs })).into_response()
            }
        }
    }

    fn serve_options() -> ServeOptions {
        ServeOptions {
            port: 0,
            host: "127.0.0.1".to_string(),
            public_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/public")),
        }
    }

    async fn spawn_app() -> String {
        let catalog = spawn(Router::new().route("/search.json", get(fake_catalog))).await;
        let state = Arc::new(BooksState {
            client: build_client().unwrap(),
            api_base: catalog,
        });
        spawn(router(state, &serve_options())).await
    }

    async fn get_text(url: &str) -> (StatusCode, String) {
        let response = client().get(url).send().await.unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    #[tokio::test]
    async fn test_index_renders_search_form() {
        let base = spawn_app().await;

        let (status, body) = get_text(&format!("{base}/")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"action="/books/search""#));
        assert!(body.contains(r#"name="q""#));
    }

    #[tokio::test]
    async fn test_search_renders_page_of_books() {
        let base = spawn_app().await;

        let (status, body) = get_text(&format!("{base}/books/search?q=dune&page=2")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("dune 2-0"));
        assert!(body.contains("dune 2-23"));
        assert!(!body.contains("dune 2-24"));
        assert!(body.contains("Frank Herbert"));
        assert!(body.contains("1000-M.jpg"));
        assert!(body.contains(r#"<span class="current" aria-current="page">2</span>"#));
        assert_eq!(body.matches(r#"<li class="book">"#).count(), 24);
    }

    #[tokio::test]
    async fn test_search_respects_page_size() {
        let base = spawn_app().await;

        let (_, body) = get_text(&format!("{base}/books/search?q=dune&perPage=12")).await;
        assert_eq!(body.matches(r#"<li class="book">"#).count(), 12);
        assert!(body.contains("page=9&amp;perPage=12"));

        let (_, body) = get_text(&format!("{base}/books/search?q=dune&perPage=13")).await;
        assert_eq!(body.matches(r#"<li class="book">"#).count(), 24);
    }

    #[tokio::test]
    async fn test_search_past_last_page_redirects() {
        let base = spawn_app().await;

        let response = client()
            .get(format!("{base}/books/search?q=dune%20messiah&page=7"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()["location"],
            "/books/search?q=dune%20messiah&page=5&perPage=24"
        );
    }

    #[tokio::test]
    async fn test_search_blank_query_renders_empty_page() {
        let base = spawn_app().await;

        let (status, body) = get_text(&format!("{base}/books/search?q=%20%20&page=3")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains(r#"<li class="book">"#));
        assert!(!body.contains(r#"class="error""#));
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let base = spawn_app().await;

        let (status, body) = get_text(&format!("{base}/books/search?q=nothing&page=4")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No books found"));
    }

    #[tokio::test]
    async fn test_search_upstream_failure_renders_error() {
        let base = spawn_app().await;

        let (status, body) = get_text(&format!("{base}/books/search?q=broken")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Could not reach OpenLibrary"));
        assert!(!body.contains(r#"<li class="book">"#));
    }

    #[tokio::test]
    async fn test_search_undecodable_response_renders_error() {
        let base = spawn_app().await;

        let (status, body) = get_text(&format!("{base}/books/search?q=garbled")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Could not reach OpenLibrary"));
        assert!(!body.contains(r#"<li class="book">"#));
    }

    #[tokio::test]
    async fn test_search_unreachable_catalog_renders_error() {
        // Nothing listens on port 1, so the request fails before any HTTP exchange
        let state = Arc::new(BooksState {
            client: build_client().unwrap(),
            api_base: "http://127.0.0.1:1".to_string(),
        });
        let base = spawn(router(state, &serve_options())).await;

        let (status, body) = get_text(&format!("{base}/books/search?q=dune")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Could not reach OpenLibrary"));
        assert!(!body.contains(r#"<li class="book">"#));
    }

    #[tokio::test]
    async fn test_static_stylesheet() {
        let base = spawn_app().await;

        let (status, body) = get_text(&format!("{base}/styles.css")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(".pagination"));
    }
}
