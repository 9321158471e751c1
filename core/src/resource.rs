//! Blocking client for the posts resource.
//!
//! # Design
//! `ResourceClient` pairs a `PostsClient` (request building, response
//! parsing) with a `Transport` (the round-trip). Every operation validates
//! its input first, so a `Validation` error never costs a request. Each
//! HTTP exchange is attempted exactly once.
//!
//! `create_post` checks for an identical post before creating one. The check
//! and the create are separate requests and the remote service has no
//! create-if-absent primitive, so two racing callers can still both create.

use tracing::{debug, info};

use crate::client::PostsClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{require_positive, NewPost, Page, PageRequest, Post, PostPatch};

/// Page size used by `list_page` when neither the caller nor the config
/// sets one.
pub const FALLBACK_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct ResourceClient<T = UreqTransport> {
    posts: PostsClient,
    transport: T,
    default_page_size: Option<u32>,
}

impl ResourceClient<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> ResourceClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            posts: PostsClient::new(&config.base_url),
            transport,
            default_page_size: config.default_page_size,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[tracing::instrument(skip(self))]
    pub fn get_post(&self, id: u64) -> Result<Post, ApiError> {
        require_positive("id", id)?;
        let response = self.transport.execute(self.posts.build_get_post(id))?;
        self.posts.parse_get_post(id, response)
    }

    /// Fetch one page of posts in server order.
    ///
    /// The result is exactly the page the server returned; nothing is
    /// cached and no further pages are fetched.
    #[tracing::instrument(skip(self))]
    pub fn list_posts(&self, page: PageRequest) -> Result<Vec<Post>, ApiError> {
        let page = PageRequest {
            limit: page.limit.or(self.default_page_size),
            ..page
        };
        page.validate()?;
        let response = self.transport.execute(self.posts.build_list_posts(&page))?;
        let mut posts = self.posts.parse_list_posts(response)?;
        if let Some(limit) = page.limit {
            posts.truncate(limit as usize);
        }
        debug!(count = posts.len(), "listed posts");
        Ok(posts)
    }

    /// Fetch page `page` (1-based) and wrap it with its coordinates.
    #[tracing::instrument(skip(self))]
    pub fn list_page(&self, page: u32, limit: Option<u32>) -> Result<Page, ApiError> {
        let limit = limit
            .or(self.default_page_size)
            .unwrap_or(FALLBACK_PAGE_SIZE);
        let posts = self.list_posts(PageRequest::page(page, limit)?)?;
        Ok(Page { page, limit, posts })
    }

    #[tracing::instrument(skip(self))]
    pub fn list_user_posts(&self, user_id: u64) -> Result<Vec<Post>, ApiError> {
        require_positive("userId", user_id)?;
        let response = self
            .transport
            .execute(self.posts.build_list_user_posts(user_id))?;
        self.posts.parse_list_posts(response)
    }

    /// Create a post unless an identical one already exists.
    ///
    /// "Identical" means equal title, body and user id. When a match is
    /// found it is returned and no create request is sent.
    #[tracing::instrument(skip(self, title, body))]
    pub fn create_post(&self, title: &str, body: &str, user_id: u64) -> Result<Post, ApiError> {
        let input = NewPost::new(title, body, user_id)?;

        if let Some(existing) = self.find_existing(&input)? {
            info!(id = existing.id, "identical post already exists, skipping create");
            return Ok(existing);
        }

        let response = self.transport.execute(self.posts.build_create_post(&input)?)?;
        let post = self.posts.parse_create_post(response)?;
        info!(id = post.id, "created post");
        Ok(post)
    }

    fn find_existing(&self, input: &NewPost) -> Result<Option<Post>, ApiError> {
        let candidates = self.list_user_posts(input.user_id)?;
        Ok(candidates.into_iter().find(|post| post.matches(input)))
    }

    /// Send only the fields set in `fields`.
    #[tracing::instrument(skip(self))]
    pub fn update_post_partial(&self, id: u64, fields: &PostPatch) -> Result<Post, ApiError> {
        require_positive("id", id)?;
        fields.validate()?;
        let response = self
            .transport
            .execute(self.posts.build_patch_post(id, fields)?)?;
        self.posts.parse_update_post(response)
    }

    /// Replace the whole representation of post `id`.
    #[tracing::instrument(skip(self, title, body))]
    pub fn update_post_full(
        &self,
        id: u64,
        title: &str,
        body: &str,
        user_id: u64,
    ) -> Result<Post, ApiError> {
        require_positive("id", id)?;
        let input = NewPost::new(title, body, user_id)?;
        let response = self
            .transport
            .execute(self.posts.build_update_post(id, &input)?)?;
        self.posts.parse_update_post(response)
    }

    /// Delete post `id`. Deleting a post that is already gone succeeds.
    #[tracing::instrument(skip(self))]
    pub fn delete_post(&self, id: u64) -> Result<(), ApiError> {
        require_positive("id", id)?;
        let response = self.transport.execute(self.posts.build_delete_post(id))?;
        self.posts.parse_delete_post(response)
    }
}
