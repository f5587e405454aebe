/// Chirp Service Library
///
/// Social feed backend: users register with an api key, follow each other,
/// post tweets with optional images, like tweets and read a feed of followed
/// accounts ranked by likes.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `models`: Table rows and JSON views
/// - `services`: Business logic layer
/// - `db`: Database access layer, repositories and migrations
/// - `storage`: Blob storage for uploaded media
/// - `middleware`: Api-key extraction
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::{AppError, Result};

use services::{FeedService, FollowService, LikeService, MediaService, TweetService, UserService};
use sqlx::PgPool;
use std::sync::Arc;
use storage::BlobStore;

/// Shared state handed to every handler through `web::Data`
pub struct AppState {
    pub pool: PgPool,
    pub users: UserService,
    pub follows: FollowService,
    pub tweets: TweetService,
    pub likes: LikeService,
    pub feed: FeedService,
    pub media: MediaService,
    /// Api key the feed falls back to when the header is absent
    pub default_api_key: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        blob_store: Arc<dyn BlobStore>,
        default_api_key: impl Into<String>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            users: UserService::new(pool.clone()),
            follows: FollowService::new(pool.clone()),
            tweets: TweetService::new(pool.clone()),
            likes: LikeService::new(pool.clone()),
            feed: FeedService::new(pool.clone()),
            media: MediaService::new(pool.clone(), blob_store),
            pool,
            default_api_key: default_api_key.into(),
            max_upload_bytes,
        }
    }
}
