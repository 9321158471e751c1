//! In-memory imitation of the JSONPlaceholder `/posts` API.
//!
//! Unlike the real service, writes are kept for the lifetime of the app, so
//! tests can observe create-then-read and delete-then-delete sequences.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Deserialize)]
pub struct NewPost {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Deserialize)]
pub struct PatchPost {
    #[serde(rename = "userId")]
    pub user_id: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Query parameters understood by `GET /posts`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(rename = "userId")]
    pub user_id: Option<u64>,
    #[serde(rename = "_start")]
    pub start: Option<usize>,
    #[serde(rename = "_limit")]
    pub limit: Option<usize>,
    #[serde(rename = "_page")]
    pub page: Option<usize>,
}

pub type Db = Arc<RwLock<BTreeMap<u64, Post>>>;

/// An app with no posts.
pub fn app() -> Router {
    app_with(Vec::new())
}

pub fn app_with(posts: impl IntoIterator<Item = Post>) -> Router {
    let db: Db = Arc::new(RwLock::new(posts.into_iter().map(|p| (p.id, p)).collect()));
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post)
                .put(replace_post)
                .patch(patch_post)
                .delete(delete_post),
        )
        .with_state(db)
}

/// Deterministic fixture posts `1..=count`, ten per user.
pub fn seed_posts(count: u64) -> Vec<Post> {
    (1..=count)
        .map(|id| Post {
            user_id: (id - 1) / 10 + 1,
            id,
            title: format!("post {id}"),
            body: format!("body of post {id}"),
        })
        .collect()
}

pub async fn run(listener: TcpListener, posts: Vec<Post>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(posts)).await
}

/// Apply filter and slicing the way json-server does: `_page` wins over
/// `_start`, and `_page` without `_limit` uses pages of ten.
fn select(posts: impl Iterator<Item = Post>, params: &ListParams) -> Vec<Post> {
    let filtered = posts.filter(|p| params.user_id.map_or(true, |uid| p.user_id == uid));
    let (skip, take) = match (params.page, params.start, params.limit) {
        (Some(page), _, limit) => {
            let limit = limit.unwrap_or(10);
            (page.saturating_sub(1).saturating_mul(limit), Some(limit))
        }
        (None, start, limit) => (start.unwrap_or(0), limit),
    };
    let sliced = filtered.skip(skip);
    match take {
        Some(n) => sliced.take(n).collect(),
        None => sliced.collect(),
    }
}

async fn list_posts(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Post>> {
    let posts = db.read().await;
    tracing::debug!(?params, "list posts");
    Json(select(posts.values().cloned(), &params))
}

async fn create_post(
    State(db): State<Db>,
    Json(input): Json<NewPost>,
) -> (StatusCode, Json<Post>) {
    let mut posts = db.write().await;
    let id = posts.keys().next_back().map_or(1, |last| last + 1);
    let post = Post {
        user_id: input.user_id,
        id,
        title: input.title,
        body: input.body,
    };
    posts.insert(id, post.clone());
    tracing::debug!(id, "created post");
    (StatusCode::CREATED, Json(post))
}

async fn get_post(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Post>, StatusCode> {
    let posts = db.read().await;
    posts.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<NewPost>,
) -> Result<Json<Post>, StatusCode> {
    let mut posts = db.write().await;
    let post = posts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    post.user_id = input.user_id;
    post.title = input.title;
    post.body = input.body;
    Ok(Json(post.clone()))
}

async fn patch_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<PatchPost>,
) -> Result<Json<Post>, StatusCode> {
    let mut posts = db.write().await;
    let post = posts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(user_id) = input.user_id {
        post.user_id = user_id;
    }
    if let Some(title) = input.title {
        post.title = title;
    }
    if let Some(body) = input.body {
        post.body = body;
    }
    Ok(Json(post.clone()))
}

async fn delete_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut posts = db.write().await;
    posts
        .remove(&id)
        .map(|_| Json(serde_json::json!({})))
        .ok_or(StatusCode::NOT_FOUND)
}
