/// Media service - stores uploaded images and registers their locators
use crate::db::media_repo;
use crate::error::{codes, AppError, Result};
use crate::models::User;
use crate::services::{identity, SERVICE_NAME};
use crate::storage::BlobStore;
use db_pool::acquire_with_metrics;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

pub struct MediaService {
    pool: PgPool,
    blob_store: Arc<dyn BlobStore>,
}

impl MediaService {
    pub fn new(pool: PgPool, blob_store: Arc<dyn BlobStore>) -> Self {
        Self { pool, blob_store }
    }

    /// Resolve the uploading caller. Handlers call this before reading the
    /// request body so unknown callers never get an upload buffered.
    pub async fn resolve_uploader(&self, api_key: &str) -> Result<User> {
        let mut conn = acquire_with_metrics(&self.pool, SERVICE_NAME).await?;
        identity::resolve_api_key(&mut conn, api_key).await
    }

    /// Store an upload from `uploader` and register it as unattached media.
    ///
    /// If registration fails the stored blob is removed again.
    pub async fn upload(
        &self,
        uploader: &User,
        original_name: Option<&str>,
        content_type: Option<&mime::Mime>,
        bytes: Vec<u8>,
    ) -> Result<i64> {
        let locator = self
            .blob_store
            .put(original_name, content_type, bytes)
            .await?;

        match self.register(&locator).await {
            Ok(media_id) => {
                info!(media_id = %media_id, user_id = %uploader.id, "media uploaded");
                Ok(media_id)
            }
            Err(err) => {
                if let Err(cleanup) = self.blob_store.delete(&locator).await {
                    warn!(%locator, error = %cleanup, "failed to remove orphaned blob");
                }
                Err(err)
            }
        }
    }

    /// Record a locator handed back by the blob store
    pub async fn register(&self, locator: &str) -> Result<i64> {
        if locator.trim().is_empty() {
            return Err(AppError::invalid_input(codes::BAD_FILE, "Empty media locator"));
        }

        let mut conn = acquire_with_metrics(&self.pool, SERVICE_NAME).await?;
        let media_id = media_repo::insert_media(&mut conn, locator).await?;

        info!(media_id = %media_id, %locator, "media registered");
        Ok(media_id)
    }
}
