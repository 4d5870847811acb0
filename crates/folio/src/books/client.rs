use crate::prelude::*;
use folio_core::books::{search_api_url, SearchResponse};
use folio_core::pagination::PageRequest;
use std::time::Duration;

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch one page of title search results from the catalog
pub async fn search_books(
    client: &reqwest::Client,
    api_base: &str,
    query: &str,
    request: &PageRequest,
) -> Result<SearchResponse, Error> {
    let url = search_api_url(api_base, query, request.page, request.page_size.get());
    log::debug!("GET {url}");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::Status(response.status().as_u16()));
    }

    response
        .json::<SearchResponse>()
        .await
        .map_err(|e| Error::Decode(e.to_string()))
}
