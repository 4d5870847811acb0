use crate::prelude::*;
use crate::web::{render_template, serve, static_files, ServeOptions};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::Utc;
use folio_core::blog::{PostError, PostForm, PostStore, DEFAULT_POSTS_PER_PAGE};
use folio_core::pagination::{parse_page, PageOutcome};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::views::{index_href, BlogIndexTemplate, PostFormTemplate, PostTemplate};

#[derive(Debug, clap::Args)]
pub struct BlogServeOptions {
    #[clap(flatten)]
    pub serve: ServeOptions,

    /// Posts shown per page on the index
    #[arg(long, env = "BLOG_PER_PAGE", default_value_t = DEFAULT_POSTS_PER_PAGE)]
    pub per_page: usize,
}

pub struct BlogState {
    pub posts: RwLock<PostStore>,
    pub per_page: usize,
}

impl BlogState {
    pub fn new(posts: PostStore, per_page: usize) -> Self {
        Self {
            posts: RwLock::new(posts),
            per_page: per_page.max(1),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct IndexParams {
    pub page: Option<String>,
}

/// HTML forms can only POST, so edit and delete forms name the real method
/// in a `_method` field
#[derive(Debug, Deserialize)]
pub struct MethodOverrideForm {
    #[serde(rename = "_method", default)]
    pub method: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

pub async fn run(options: BlogServeOptions, global: crate::Global) -> Result<()> {
    let state = Arc::new(BlogState::new(
        PostStore::seeded(Utc::now()),
        options.per_page,
    ));

    serve(router(state, &options.serve), &options.serve, &global, "Blog").await
}

pub fn router(state: Arc<BlogState>, options: &ServeOptions) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/new", get(new_post))
        .route("/posts", post(create_post))
        .route(
            "/posts/{id}",
            get(show_post)
                .put(update_post)
                .delete(delete_post)
                .post(override_method),
        )
        .route("/edit/{id}", get(edit_post))
        .fallback_service(static_files(options))
        .with_state(state)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Post not found").into_response()
}

fn post_error(err: PostError, form: PostFormTemplate) -> Response {
    match err {
        PostError::NotFound(_) => not_found(),
        PostError::EmptyTitle => (
            StatusCode::BAD_REQUEST,
            render_template(form.with_error(err.to_string())),
        )
            .into_response(),
    }
}

async fn index(
    State(state): State<Arc<BlogState>>,
    Query(params): Query<IndexParams>,
) -> Response {
    let page = parse_page(params.page.as_deref());
    let posts = state.posts.read().await;

    match posts.page(page, state.per_page) {
        PageOutcome::Redirect { page } => Redirect::to(&index_href(page)).into_response(),
        PageOutcome::Render(view) => render_template(BlogIndexTemplate::new(view)),
    }
}

async fn new_post() -> Response {
    render_template(PostFormTemplate::create(PostForm::default()))
}

async fn create_post(
    State(state): State<Arc<BlogState>>,
    Form(form): Form<PostForm>,
) -> Response {
    let mut posts = state.posts.write().await;

    match posts.create(form.clone(), Utc::now()) {
        Ok(post) => {
            log::info!("Created post {} ({:?})", post.id, post.title);
            Redirect::to("/").into_response()
        }
        Err(err) => post_error(err, PostFormTemplate::create(form)),
    }
}

async fn show_post(State(state): State<Arc<BlogState>>, Path(id): Path<u64>) -> Response {
    let posts = state.posts.read().await;

    match posts.get(id) {
        Ok(post) => render_template(PostTemplate::from(post)),
        Err(_) => not_found(),
    }
}

async fn edit_post(State(state): State<Arc<BlogState>>, Path(id): Path<u64>) -> Response {
    let posts = state.posts.read().await;

    match posts.get(id) {
        Ok(post) => render_template(PostFormTemplate::edit(
            id,
            PostForm {
                title: post.title.clone(),
                content: post.content.clone(),
            },
        )),
        Err(_) => not_found(),
    }
}

async fn update_post(
    State(state): State<Arc<BlogState>>,
    Path(id): Path<u64>,
    Form(form): Form<PostForm>,
) -> Response {
    apply_update(&state, id, form).await
}

async fn delete_post(State(state): State<Arc<BlogState>>, Path(id): Path<u64>) -> Response {
    apply_delete(&state, id).await
}

async fn override_method(
    State(state): State<Arc<BlogState>>,
    Path(id): Path<u64>,
    Form(form): Form<MethodOverrideForm>,
) -> Response {
    match form.method.to_ascii_uppercase().as_str() {
        "PUT" => {
            let post = PostForm {
                title: form.title,
                content: form.content,
            };
            apply_update(&state, id, post).await
        }
        "DELETE" => apply_delete(&state, id).await,
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn apply_update(state: &BlogState, id: u64, form: PostForm) -> Response {
    let mut posts = state.posts.write().await;

    match posts.update(id, form.clone()) {
        Ok(post) => {
            log::info!("Updated post {}", post.id);
            Redirect::to("/").into_response()
        }
        Err(err) => post_error(err, PostFormTemplate::edit(id, form)),
    }
}

async fn apply_delete(state: &BlogState, id: u64) -> Response {
    let mut posts = state.posts.write().await;

    match posts.delete(id) {
        Ok(post) => {
            log::info!("Deleted post {}", post.id);
            Redirect::to("/").into_response()
        }
        Err(_) => not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::testing::{client, spawn};
    use chrono::TimeZone;
    use std::path::PathBuf;

    async fn spawn_blog() -> String {
        let created = Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
        let state = Arc::new(BlogState::new(
            PostStore::seeded(created),
            DEFAULT_POSTS_PER_PAGE,
        ));
        let options = ServeOptions {
            port: 0,
            host: "127.0.0.1".to_string(),
            public_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/public")),
        };

        spawn(router(state, &options)).await
    }

    async fn get_text(url: &str) -> (StatusCode, String) {
        let response = client().get(url).send().await.unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    fn location(response: &reqwest::Response) -> &str {
        response.headers()["location"].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_index_first_page() {
        let base = spawn_blog().await;

        let (status, body) = get_text(&format!("{base}/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches(r#"<li class="post">"#).count(), 6);
        assert!(body.contains("Tip: Prefer const and let over var"));
        assert!(body.contains("8 posts, page 1 of 2"));
        assert!(body.contains(r#"<span class="current" aria-current="page">1</span>"#));
        assert!(body.contains("October 18, 2026"));
    }

    #[tokio::test]
    async fn test_index_second_page() {
        let base = spawn_blog().await;

        let (_, body) = get_text(&format!("{base}/?page=2")).await;

        assert_eq!(body.matches(r#"<li class="post">"#).count(), 2);
        assert!(body.contains("Tip: Strict mode"));
        assert!(!body.contains("Tip: Prefer const and let over var"));
    }

    #[tokio::test]
    async fn test_index_bad_page_falls_back_to_first() {
        let base = spawn_blog().await;

        let (status, body) = get_text(&format!("{base}/?page=abc")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("page 1 of 2"));
    }

    #[tokio::test]
    async fn test_index_past_last_page_redirects() {
        let base = spawn_blog().await;

        let response = client().get(format!("{base}/?page=9")).send().await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/?page=2");
    }

    #[tokio::test]
    async fn test_new_post_form() {
        let base = spawn_blog().await;

        let (status, body) = get_text(&format!("{base}/new")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"action="/posts""#));
        assert!(!body.contains(r#"name="_method""#));
    }

    #[tokio::test]
    async fn test_create_post() {
        let base = spawn_blog().await;

        let response = client()
            .post(format!("{base}/posts"))
            .form(&[
                ("title", "Rust: Borrow, don't clone"),
                ("content", "Slices are cheap."),
            ])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let (status, body) = get_text(&format!("{base}/posts/9")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Slices are cheap."));

        let (_, body) = get_text(&format!("{base}/?page=2")).await;
        assert_eq!(body.matches(r#"<li class="post">"#).count(), 3);
    }

    #[tokio::test]
    async fn test_create_post_requires_title() {
        let base = spawn_blog().await;

        let response = client()
            .post(format!("{base}/posts"))
            .form(&[("title", "  "), ("content", "Orphaned body")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.text().await.unwrap();
        assert!(body.contains("A post needs a title"));
        assert!(body.contains("Orphaned body"));
    }

    #[tokio::test]
    async fn test_show_missing_post() {
        let base = spawn_blog().await;

        let (status, body) = get_text(&format!("{base}/posts/999")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Post not found");
    }

    #[tokio::test]
    async fn test_show_post_rejects_non_numeric_id() {
        let base = spawn_blog().await;

        let (status, _) = get_text(&format!("{base}/posts/first")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edit_form_prefilled() {
        let base = spawn_blog().await;

        let (status, body) = get_text(&format!("{base}/edit/7")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"value="Tip: Strict mode""#));
        assert!(body.contains(r#"name="_method" value="PUT""#));

        let (status, _) = get_text(&format!("{base}/edit/70")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_with_put() {
        let base = spawn_blog().await;

        let response = client()
            .put(format!("{base}/posts/2"))
            .form(&[("title", "Edited title"), ("content", "Edited body")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let (_, body) = get_text(&format!("{base}/posts/2")).await;
        assert!(body.contains("Edited title"));
        assert!(body.contains("Edited body"));
    }

    #[tokio::test]
    async fn test_update_through_method_override() {
        let base = spawn_blog().await;

        let response = client()
            .post(format!("{base}/posts/3"))
            .form(&[("_method", "put"), ("title", "Overridden"), ("content", "")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let (_, body) = get_text(&format!("{base}/posts/3")).await;
        assert!(body.contains("Overridden"));
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let base = spawn_blog().await;

        let response = client()
            .put(format!("{base}/posts/404"))
            .form(&[("title", "Nothing here"), ("content", "")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_missing_post_with_blank_title() {
        let base = spawn_blog().await;

        let response = client()
            .put(format!("{base}/posts/404"))
            .form(&[("title", " "), ("content", "")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!response.text().await.unwrap().contains("A post needs a title"));
    }

    #[tokio::test]
    async fn test_delete_through_method_override() {
        let base = spawn_blog().await;

        let response = client()
            .post(format!("{base}/posts/1"))
            .form(&[("_method", "DELETE")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let (status, _) = get_text(&format!("{base}/posts/1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = get_text(&format!("{base}/")).await;
        assert!(body.contains("7 posts, page 1 of 2"));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let base = spawn_blog().await;

        let first = client().delete(format!("{base}/posts/4")).send().await.unwrap();
        assert_eq!(first.status(), StatusCode::SEE_OTHER);

        let second = client().delete(format!("{base}/posts/4")).send().await.unwrap();
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_method_override() {
        let base = spawn_blog().await;

        let response = client()
            .post(format!("{base}/posts/1"))
            .form(&[("_method", "PATCH")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
