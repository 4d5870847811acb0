use serde::{Deserialize, Serialize};

use crate::pagination::{slice_items, PageSize, ResultSet};

/// Default OpenLibrary host
pub const OPENLIBRARY_API_BASE: &str = "https://openlibrary.org";

/// Host serving cover images by cover id
pub const COVERS_BASE: &str = "https://covers.openlibrary.org";

const UNTITLED: &str = "Untitled";
const UNKNOWN_AUTHOR: &str = "Unknown author";
const UNKNOWN_YEAR: &str = "—";

/// OpenLibrary `/search.json` response
///
/// `numFound` is kept as a raw JSON value because anything that is not a
/// non-negative number has to be read as zero results.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SearchResponse {
    #[serde(rename = "numFound", default)]
    pub num_found: Option<serde_json::Value>,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

impl SearchResponse {
    /// Total number of matches reported by the catalog
    pub fn total_found(&self) -> usize {
        let Some(value) = &self.num_found else {
            return 0;
        };

        if let Some(count) = value.as_u64() {
            return usize::try_from(count).unwrap_or(usize::MAX);
        }

        match value.as_f64() {
            Some(count) if count.is_finite() && count > 0.0 => count.ceil() as usize,
            _ => 0,
        }
    }
}

/// Single document from an OpenLibrary search
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SearchDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub first_publish_year: Option<i64>,
    pub cover_i: Option<i64>,
}

/// Book as shown on the results page
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub year: String,
    pub cover_id: Option<u64>,
}

impl Book {
    /// Medium-sized cover image, when the catalog has one
    pub fn cover_url(&self) -> Option<String> {
        self.cover_id.map(|id| format!("{COVERS_BASE}/b/id/{id}-M.jpg"))
    }
}

impl From<&SearchDoc> for Book {
    fn from(doc: &SearchDoc) -> Self {
        let title = doc
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(UNTITLED);

        let author = doc
            .author_name
            .as_ref()
            .and_then(|names| names.first())
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR);

        let year = doc
            .first_publish_year
            .filter(|year| *year != 0)
            .map(|year| year.to_string())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());

        Self {
            title: title.to_string(),
            author: author.to_string(),
            year,
            cover_id: doc
                .cover_i
                .and_then(|id| u64::try_from(id).ok())
                .filter(|id| *id != 0),
        }
    }
}

/// Turn a search response into a result set of at most `page_size` books
pub fn transform_search(response: &SearchResponse, page_size: usize) -> ResultSet<Book> {
    ResultSet {
        total_count: response.total_found(),
        items: slice_items(&response.docs, page_size)
            .iter()
            .map(Book::from)
            .collect(),
    }
}

/// Catalog URL for one page of a title search
///
/// The catalog is asked for `limit` documents per page so that its page
/// numbers line up with ours.
pub fn search_api_url(api_base: &str, query: &str, page: usize, limit: usize) -> String {
    format!(
        "{}/search.json?q={}&page={}&limit={}",
        api_base.trim_end_matches('/'),
        urlencoding::encode(query),
        page,
        limit
    )
}

/// Local results page URL, used for navigation links and redirects
pub fn search_page_url(query: &str, page: usize, page_size: PageSize) -> String {
    format!(
        "/books/search?q={}&page={}&perPage={}",
        urlencoding::encode(query),
        page,
        page_size
    )
}
