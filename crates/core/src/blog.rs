//! In-memory blog posts
//!
//! [`PostStore`] owns the post list and hands out ids. It performs no I/O and
//! takes the current time as an argument, so the shell decides where time and
//! locking come from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::{PageOutcome, PageView};

/// Posts shown per page on the index
pub const DEFAULT_POSTS_PER_PAGE: usize = 6;

/// Error type for post operations
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PostError {
    #[error("Post not found: {0}")]
    NotFound(u64),

    #[error("A post needs a title")]
    EmptyTitle,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// First `max_chars` characters of the content, with an ellipsis when cut
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut chars = self.content.char_indices();
        match chars.nth(max_chars) {
            Some((cut, _)) => format!("{}…", self.content[..cut].trim_end()),
            None => self.content.clone(),
        }
    }
}

/// Submitted create/edit form
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl PostForm {
    fn validated(self) -> Result<(String, String), PostError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(PostError::EmptyTitle);
        }

        Ok((title.to_string(), self.content))
    }
}

#[derive(Debug, Clone)]
pub struct PostStore {
    posts: Vec<Post>,
    next_id: u64,
}

impl PostStore {
    pub fn new(posts: Vec<Post>) -> Self {
        let next_id = posts.iter().map(|post| post.id).max().unwrap_or(0) + 1;
        Self { posts, next_id }
    }

    /// Store pre-filled with the starter tips
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let posts = SEED_POSTS
            .iter()
            .zip(1..)
            .map(|((title, content), id)| Post {
                id,
                title: title.to_string(),
                content: content.to_string(),
                created_at: now,
            })
            .collect();

        Self::new(posts)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, id: u64) -> Result<&Post, PostError> {
        self.posts
            .iter()
            .find(|post| post.id == id)
            .ok_or(PostError::NotFound(id))
    }

    /// Append a post, assigning the next free id
    ///
    /// Ids only ever grow, so a deleted post's id is never handed out again.
    pub fn create(&mut self, form: PostForm, now: DateTime<Utc>) -> Result<&Post, PostError> {
        let (title, content) = form.validated()?;

        let id = self.next_id;
        self.next_id += 1;
        self.posts.push(Post {
            id,
            title,
            content,
            created_at: now,
        });

        self.get(id)
    }

    /// Replace a post's title and content; a missing id wins over a bad form
    pub fn update(&mut self, id: u64, form: PostForm) -> Result<&Post, PostError> {
        let post = self
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(PostError::NotFound(id))?;
        let (title, content) = form.validated()?;

        post.title = title;
        post.content = content;

        Ok(post)
    }

    pub fn delete(&mut self, id: u64) -> Result<Post, PostError> {
        let index = self
            .posts
            .iter()
            .position(|post| post.id == id)
            .ok_or(PostError::NotFound(id))?;

        Ok(self.posts.remove(index))
    }

    /// One page of posts in insertion order
    pub fn page(&self, requested_page: usize, per_page: usize) -> PageOutcome<Post> {
        PageView::build_local(self.posts.clone(), requested_page, per_page)
    }
}

const SEED_POSTS: [(&str, &str); 8] = [
    (
        "Tip: Prefer const and let over var",
        "Modern JavaScript code declares values with const and reassignable bindings with let. Block scoping avoids a whole family of redeclaration and hoisting bugs.",
    ),
    (
        "Node.js: async/await instead of nested callbacks",
        "Flatten callback pyramids with async/await. The control flow reads top to bottom and errors surface through ordinary try/catch.",
    ),
    (
        "Express.js: Centralize error handling in middleware",
        "A single error-handling middleware keeps failure responses consistent and makes debugging far less painful.",
    ),
    (
        "Tip: Template literals",
        "Template literals interpolate variables and expressions straight into strings: `Hello, ${name}!`.",
    ),
    (
        "Node.js: Keep the event loop free",
        "Long synchronous work blocks every other request. Reach for the asynchronous file and network APIs instead.",
    ),
    (
        "Express.js: Split routes into modules",
        "Group related routes into their own router modules so the application entry point stays small and readable.",
    ),
    (
        "Tip: Strict mode",
        "Putting 'use strict' at the top of a file or function turns silent mistakes into thrown errors.",
    ),
    (
        "Node.js: Load configuration with dotenv",
        "Keep secrets such as API keys in a .env file and load them into process.env at startup instead of hard-coding them.",
    ),
];
