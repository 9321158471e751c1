//! Domain types for the posts resource.
//!
//! # Design
//! Responses are decoded into explicit records instead of untyped maps, so a
//! missing or mistyped field surfaces as a decode error at the boundary. The
//! wire spelling `userId` is kept through serde renames; Rust code sees
//! `user_id`. Payload types validate themselves so that bad input is
//! rejected before a request is built.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A single post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

impl Post {
    /// True when `self` carries the same content as `new`, ignoring `id`.
    pub fn matches(&self, new: &NewPost) -> bool {
        self.user_id == new.user_id && self.title == new.title && self.body == new.body
    }
}

/// Payload for creating a post or replacing one in full.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        user_id: u64,
    ) -> Result<Self, ApiError> {
        let post = Self {
            title: title.into(),
            body: body.into(),
            user_id,
        };
        post.validate()?;
        Ok(post)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("title", &self.title)?;
        require_text("body", &self.body)?;
        require_positive("userId", self.user_id)
    }
}

/// Payload for a partial update. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

impl PostPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn user_id(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Build a patch from dynamic `(field, value)` pairs.
    ///
    /// Only `title`, `body` and `userId` are accepted. Strings must be JSON
    /// strings and `userId` a non-negative JSON integer. A field given twice
    /// keeps its last value.
    pub fn from_fields<I, K>(fields: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = (K, serde_json::Value)>,
        K: AsRef<str>,
    {
        let mut patch = Self::default();
        for (name, value) in fields {
            match name.as_ref() {
                "title" => patch.title = Some(expect_string("title", value)?),
                "body" => patch.body = Some(expect_string("body", value)?),
                "userId" => {
                    let id = value.as_u64().ok_or_else(|| {
                        ApiError::validation(format!("field `userId` must be an integer, got {value}"))
                    })?;
                    patch.user_id = Some(id);
                }
                other => {
                    return Err(ApiError::validation(format!(
                        "unrecognized post field `{other}` (expected title, body or userId)"
                    )))
                }
            }
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.user_id.is_none()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Err(ApiError::validation("partial update has no fields"));
        }
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(body) = &self.body {
            require_text("body", body)?;
        }
        if let Some(user_id) = self.user_id {
            require_positive("userId", user_id)?;
        }
        Ok(())
    }
}

/// Which slice of the collection to request.
///
/// `limit` and `offset` map onto the remote `_limit` and `_start` query
/// parameters; an unset value is simply not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Page-number form: page `1` starts at offset `0`.
    pub fn page(page: u32, limit: u32) -> Result<Self, ApiError> {
        if page == 0 {
            return Err(ApiError::validation("page numbers start at 1"));
        }
        require_positive("limit", u64::from(limit))?;
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| ApiError::validation(format!("page {page} with limit {limit} is out of range")))?;
        Ok(Self {
            limit: Some(limit),
            offset: Some(offset),
        })
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.limit == Some(0) {
            return Err(ApiError::validation("limit must be greater than 0"));
        }
        Ok(())
    }
}

/// One page of posts together with the page coordinates that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
    pub posts: Vec<Post>,
}

pub(crate) fn require_positive(field: &str, value: u64) -> Result<(), ApiError> {
    if value == 0 {
        return Err(ApiError::validation(format!("{field} must be a positive integer")));
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn expect_string(field: &str, value: serde_json::Value) -> Result<String, ApiError> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        other => Err(ApiError::validation(format!(
            "field `{field}` must be a string, got {other}"
        ))),
    }
}
