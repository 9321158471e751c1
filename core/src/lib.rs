//! Blocking client for the JSONPlaceholder `posts` resource.
//!
//! # Overview
//! `ResourceClient` offers get, list, create, full and partial update, and
//! delete over `/posts`. Create is idempotent on a best-effort basis, list
//! passes offset/limit straight through to the server, and every failure is
//! reported as a typed `ApiError`.
//!
//! # Design
//! - `PostsClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`.
//! - `Transport` executes requests; `UreqTransport` is the network-backed
//!   implementation and the only place that performs I/O.
//! - Types are explicit records; a body that does not match fails with
//!   `ApiError::Decode` instead of leaking untyped JSON.
//! - No retries. Timeouts surface as `ApiError::Transport` with kind
//!   `Timeout`, and the remote effect of a timed-out write is unknown.
//!
//! ```no_run
//! use posts_core::{ClientConfig, PageRequest, ResourceClient};
//!
//! let client = ResourceClient::new(&ClientConfig::default());
//! let first = client.list_posts(PageRequest::new().with_limit(10))?;
//! let post = client.get_post(first[0].id)?;
//! # Ok::<(), posts_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resource;
pub mod transport;
pub mod types;

pub use client::PostsClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorEnvelope, StatusCategory, TransportErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resource::ResourceClient;
pub use transport::{Transport, UreqTransport};
pub use types::{NewPost, Page, PageRequest, Post, PostPatch};
