//! Stateless HTTP request builder and response parser for the posts API.
//!
//! # Design
//! `PostsClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `ResourceClient` drives the round-trip through a `Transport`; tests can
//! call the halves directly.

use serde::de::DeserializeOwned;

use crate::error::{ApiError, ErrorEnvelope};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewPost, PageRequest, Post, PostPatch};

/// Synchronous, stateless request builder for the posts resource.
#[derive(Debug, Clone)]
pub struct PostsClient {
    base_url: String,
}

impl PostsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    fn item(&self, id: u64) -> String {
        format!("{}/posts/{id}", self.base_url)
    }

    pub fn build_list_posts(&self, page: &PageRequest) -> HttpRequest {
        let mut req = HttpRequest::new(HttpMethod::Get, self.collection());
        if let Some(offset) = page.offset {
            req = req.with_query("_start", offset);
        }
        if let Some(limit) = page.limit {
            req = req.with_query("_limit", limit);
        }
        req
    }

    pub fn build_list_user_posts(&self, user_id: u64) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.collection()).with_query("userId", user_id)
    }

    pub fn build_get_post(&self, id: u64) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.item(id))
    }

    pub fn build_create_post(&self, input: &NewPost) -> Result<HttpRequest, ApiError> {
        let body = encode(input)?;
        Ok(HttpRequest::new(HttpMethod::Post, self.collection()).with_json_body(body))
    }

    pub fn build_update_post(&self, id: u64, input: &NewPost) -> Result<HttpRequest, ApiError> {
        let body = encode(input)?;
        Ok(HttpRequest::new(HttpMethod::Put, self.item(id)).with_json_body(body))
    }

    pub fn build_patch_post(&self, id: u64, input: &PostPatch) -> Result<HttpRequest, ApiError> {
        let body = encode(input)?;
        Ok(HttpRequest::new(HttpMethod::Patch, self.item(id)).with_json_body(body))
    }

    pub fn build_delete_post(&self, id: u64) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, self.item(id))
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    /// Parse a single post and check that it is the one that was requested.
    pub fn parse_get_post(&self, id: u64, response: HttpResponse) -> Result<Post, ApiError> {
        check_status(&response)?;
        let post: Post = decode(&response.body)?;
        if post.id != id {
            return Err(ApiError::Decode(format!(
                "requested post {id} but response carried id {}",
                post.id
            )));
        }
        Ok(post)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_update_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    /// A 404 counts as success: the post is already gone.
    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<(), ApiError> {
        match check_status(&response) {
            Ok(()) | Err(ApiError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http(ErrorEnvelope::from_response(
        response.status,
        &response.body,
    )))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::decode)
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::validation(format!("cannot encode payload: {e}")))
}
