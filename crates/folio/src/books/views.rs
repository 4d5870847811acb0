//! Book search templates and their view models

use askama::Template;
use folio_core::books::{search_page_url, Book};
use folio_core::pagination::{PageSize, PageView};

use crate::web::{nav_links, NavLink};

pub const UPSTREAM_ERROR: &str = "Could not reach OpenLibrary. Please try again.";

#[derive(Template)]
#[template(path = "books/index.html")]
pub struct IndexTemplate;

#[derive(Debug, Clone)]
pub struct BookRow {
    pub title: String,
    pub author: String,
    pub year: String,
    pub cover_url: String,
}

impl From<Book> for BookRow {
    fn from(book: Book) -> Self {
        let cover_url = book.cover_url().unwrap_or_default();
        Self {
            title: book.title,
            author: book.author,
            year: book.year,
            cover_url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SizeOption {
    pub value: usize,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "books/results.html")]
pub struct ResultsTemplate {
    pub query: String,
    pub error: String,
    pub books: Vec<BookRow>,
    pub total_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub nav: Vec<NavLink>,
    pub prev_href: String,
    pub next_href: String,
    pub sizes: Vec<SizeOption>,
}

impl ResultsTemplate {
    pub fn new(query: String, view: PageView<Book>, page_size: PageSize) -> Self {
        let href = |page: usize| search_page_url(&query, page, page_size);

        let nav = nav_links(&view.page_tokens, view.current_page, href);
        let prev_href = view.previous_page().map(href).unwrap_or_default();
        let next_href = view.next_page().map(href).unwrap_or_default();

        Self {
            error: String::new(),
            books: view.items.into_iter().map(BookRow::from).collect(),
            total_count: view.total_count,
            current_page: view.current_page,
            total_pages: view.total_pages,
            nav,
            prev_href,
            next_href,
            sizes: PageSize::ALL
                .into_iter()
                .map(|size| SizeOption {
                    value: size.get(),
                    selected: size == page_size,
                })
                .collect(),
            query,
        }
    }

    /// Results page for a search that never reached the catalog
    pub fn failed(query: String) -> Self {
        let page_size = PageSize::default();
        Self {
            error: UPSTREAM_ERROR.to_string(),
            ..Self::new(query, PageView::empty(page_size.get()), page_size)
        }
    }
}
