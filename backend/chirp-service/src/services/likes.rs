/// Like service - one like per user and tweet
use crate::db::{like_repo, tweet_repo};
use crate::error::{codes, AppError, Result};
use crate::services::tweets::tweet_not_found;
use crate::services::{identity, SERVICE_NAME};
use db_pool::begin_with_metrics;
use sqlx::PgPool;
use tracing::{debug, info};

pub struct LikeService {
    pool: PgPool,
}

impl LikeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn like(&self, api_key: &str, tweet_id: i64) -> Result<()> {
        let mut tx = begin_with_metrics(&self.pool, SERVICE_NAME).await?;
        let user = identity::resolve_api_key(&mut tx, api_key).await?;

        if tweet_repo::find_tweet(&mut tx, tweet_id).await?.is_none() {
            return Err(tweet_not_found());
        }

        like_repo::insert_like(&mut tx, user.id, tweet_id)
            .await
            .map_err(|e| {
                match AppError::from_constraint(e, codes::BAD_LIKE, "Such like already exists") {
                    AppError::NotFound { .. } => tweet_not_found(),
                    other => other,
                }
            })?;

        tx.commit().await?;
        info!(user_id = %user.id, tweet_id = %tweet_id, "like created");
        Ok(())
    }

    pub async fn unlike(&self, api_key: &str, tweet_id: i64) -> Result<()> {
        let mut tx = begin_with_metrics(&self.pool, SERVICE_NAME).await?;
        let user = identity::resolve_api_key(&mut tx, api_key).await?;

        if tweet_repo::find_tweet(&mut tx, tweet_id).await?.is_none() {
            return Err(tweet_not_found());
        }

        if !like_repo::delete_like(&mut tx, user.id, tweet_id).await? {
            debug!(user_id = %user.id, tweet_id = %tweet_id, "unlike of missing like");
            return Err(AppError::not_found(
                codes::BAD_LIKE_DELETE,
                "No like for tweet from user",
            ));
        }

        tx.commit().await?;
        info!(user_id = %user.id, tweet_id = %tweet_id, "like removed");
        Ok(())
    }
}
