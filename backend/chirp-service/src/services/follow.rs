/// Follow service - maintains the directed follow relation
use crate::db::{follow_repo, user_repo};
use crate::error::{codes, AppError, Result};
use crate::services::{identity, SERVICE_NAME};
use db_pool::begin_with_metrics;
use sqlx::PgPool;
use tracing::{debug, info};

pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Make the caller follow `followee_id`
    pub async fn follow(&self, api_key: &str, followee_id: i64) -> Result<()> {
        let mut tx = begin_with_metrics(&self.pool, SERVICE_NAME).await?;
        let follower = identity::resolve_api_key(&mut tx, api_key).await?;

        if follower.id == followee_id {
            return Err(AppError::invalid_input(
                codes::BAD_FOLLOW,
                "User can't follow himself",
            ));
        }

        if user_repo::find_by_id(&mut tx, followee_id).await?.is_none() {
            return Err(AppError::not_found(
                codes::NO_USER,
                "No user with user_id to follow",
            ));
        }

        // A concurrent identical follow loses on the primary key; a followee
        // deleted in between loses on the foreign key.
        follow_repo::insert_follow(&mut tx, follower.id, followee_id)
            .await
            .map_err(|e| {
                let err =
                    AppError::from_constraint(e, codes::BAD_FOLLOW, "Such follow already exists");
                match err {
                    AppError::NotFound { .. } => {
                        AppError::not_found(codes::NO_USER, "No user with user_id to follow")
                    }
                    other => other,
                }
            })?;

        tx.commit().await?;
        info!(follower_id = %follower.id, followee_id = %followee_id, "follow created");
        Ok(())
    }

    /// Remove the caller's follow edge to `followee_id`
    pub async fn unfollow(&self, api_key: &str, followee_id: i64) -> Result<()> {
        let mut tx = begin_with_metrics(&self.pool, SERVICE_NAME).await?;
        let follower = identity::resolve_api_key(&mut tx, api_key).await?;

        if !follow_repo::delete_follow(&mut tx, follower.id, followee_id).await? {
            debug!(
                follower_id = %follower.id,
                followee_id = %followee_id,
                "unfollow of missing edge"
            );
            return Err(AppError::not_found(
                codes::BAD_FOLLOW_DELETE,
                "No such follow",
            ));
        }

        tx.commit().await?;
        info!(follower_id = %follower.id, followee_id = %followee_id, "follow removed");
        Ok(())
    }
}
