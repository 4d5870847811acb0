use askama::Template;
use chrono::{DateTime, Utc};
use folio_core::blog::{Post, PostForm};
use folio_core::pagination::PageView;

use crate::web::{nav_links, NavLink};

const EXCERPT_CHARS: usize = 160;

fn published(created_at: &DateTime<Utc>) -> String {
    created_at.format("%B %-d, %Y").to_string()
}

pub fn index_href(page: usize) -> String {
    format!("/?page={page}")
}

#[derive(Debug, Clone)]
pub struct PostRow {
    pub id: u64,
    pub title: String,
    pub excerpt: String,
    pub published: String,
}

impl From<Post> for PostRow {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            excerpt: post.excerpt(EXCERPT_CHARS),
            published: published(&post.created_at),
            title: post.title,
        }
    }
}

#[derive(Template)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub posts: Vec<PostRow>,
    pub total_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub nav: Vec<NavLink>,
    pub prev_href: String,
    pub next_href: String,
}

impl BlogIndexTemplate {
    pub fn new(view: PageView<Post>) -> Self {
        Self {
            nav: nav_links(&view.page_tokens, view.current_page, index_href),
            prev_href: view.previous_page().map(index_href).unwrap_or_default(),
            next_href: view.next_page().map(index_href).unwrap_or_default(),
            total_count: view.total_count,
            current_page: view.current_page,
            total_pages: view.total_pages,
            posts: view.items.into_iter().map(PostRow::from).collect(),
        }
    }
}

/// Create and edit form
#[derive(Template)]
#[template(path = "blog/form.html")]
pub struct PostFormTemplate {
    pub heading: String,
    pub action: String,
    pub method: String,
    pub title: String,
    pub content: String,
    pub error: String,
}

impl PostFormTemplate {
    pub fn create(form: PostForm) -> Self {
        Self {
            heading: "New post".to_string(),
            action: "/posts".to_string(),
            method: String::new(),
            title: form.title,
            content: form.content,
            error: String::new(),
        }
    }

    pub fn edit(id: u64, form: PostForm) -> Self {
        Self {
            heading: "Edit post".to_string(),
            action: format!("/posts/{id}"),
            method: "PUT".to_string(),
            ..Self::create(form)
        }
    }

    pub fn with_error(self, error: String) -> Self {
        Self { error, ..self }
    }
}

#[derive(Template)]
#[template(path = "blog/view.html")]
pub struct PostTemplate {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub published: String,
}

impl From<&Post> for PostTemplate {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            published: published(&post.created_at),
        }
    }
}
