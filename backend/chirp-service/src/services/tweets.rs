/// Tweet service - tweet creation, retrieval and deletion
use crate::db::{like_repo, media_repo, tweet_repo};
use crate::error::{codes, AppError, Result};
use crate::models::{Liker, TweetView, TweetWithStats, UserSummary};
use crate::services::{identity, SERVICE_NAME};
use db_pool::{acquire_with_metrics, begin_with_metrics};
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use tracing::{info, warn};

pub struct TweetService {
    pool: PgPool,
}

pub(crate) fn tweet_not_found() -> AppError {
    AppError::not_found(codes::NO_TWEET, "No tweet with such id")
}

impl TweetService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a tweet for the caller and attach uploaded media to it.
    ///
    /// The insert and the attachment commit together. Media ids that do not
    /// exist or are already attached to another tweet are skipped.
    pub async fn create_tweet(
        &self,
        api_key: &str,
        content: &str,
        media_ids: &[i64],
    ) -> Result<i64> {
        let mut tx = begin_with_metrics(&self.pool, SERVICE_NAME).await?;
        let author = identity::resolve_api_key(&mut tx, api_key).await?;

        let tweet_id = tweet_repo::insert_tweet(&mut tx, author.id, content).await?;

        let mut requested = media_ids.to_vec();
        requested.sort_unstable();
        requested.dedup();

        let attached = media_repo::attach_to_tweet(&mut tx, tweet_id, &requested).await?;
        let skipped = requested.len() as u64 - attached;
        if skipped > 0 {
            warn!(
                tweet_id = %tweet_id,
                skipped,
                "skipped unknown or already attached media"
            );
        }

        tx.commit().await?;
        info!(tweet_id = %tweet_id, user_id = %author.id, attached, "tweet created");
        Ok(tweet_id)
    }

    /// Tweet `tweet_id` with author, attachments and likers resolved
    pub async fn get_tweet(&self, tweet_id: i64) -> Result<TweetView> {
        let mut conn = acquire_with_metrics(&self.pool, SERVICE_NAME).await?;
        let tweet = tweet_repo::find_tweet_with_stats(&mut conn, tweet_id)
            .await?
            .ok_or_else(tweet_not_found)?;

        let mut views = hydrate_tweets(&mut conn, vec![tweet]).await?;
        views.pop().ok_or_else(tweet_not_found)
    }

    /// Delete one of the caller's tweets along with its likes, detaching its media
    pub async fn delete_tweet(&self, api_key: &str, tweet_id: i64) -> Result<()> {
        let mut tx = begin_with_metrics(&self.pool, SERVICE_NAME).await?;
        let caller = identity::resolve_api_key(&mut tx, api_key).await?;

        let tweet = tweet_repo::find_tweet(&mut tx, tweet_id)
            .await?
            .ok_or_else(tweet_not_found)?;

        if tweet.user_id != caller.id {
            warn!(tweet_id = %tweet_id, user_id = %caller.id, "delete of foreign tweet refused");
            return Err(AppError::forbidden(
                codes::NO_ACCESS,
                "Tweet belongs to other user",
            ));
        }

        let likes_removed = like_repo::delete_likes_for_tweet(&mut tx, tweet_id).await?;
        let media_detached = media_repo::detach_from_tweet(&mut tx, tweet_id).await?;

        if !tweet_repo::delete_tweet(&mut tx, tweet_id, caller.id).await? {
            return Err(tweet_not_found());
        }

        tx.commit().await?;
        info!(
            tweet_id = %tweet_id,
            user_id = %caller.id,
            likes_removed,
            media_detached,
            "tweet deleted"
        );
        Ok(())
    }
}

/// Turn tweet rows into views, fetching attachments and likers for all of
/// them in two batched queries. Output order follows `tweets`.
pub(crate) async fn hydrate_tweets(
    conn: &mut PgConnection,
    tweets: Vec<TweetWithStats>,
) -> Result<Vec<TweetView>> {
    if tweets.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = tweets.iter().map(|t| t.id).collect();

    let mut attachments: HashMap<i64, Vec<String>> = HashMap::new();
    for row in media_repo::find_locators_for_tweets(conn, &ids).await? {
        attachments.entry(row.tweet_id).or_default().push(row.locator);
    }

    let mut likes: HashMap<i64, Vec<Liker>> = HashMap::new();
    for row in like_repo::find_likers_for_tweets(conn, &ids).await? {
        likes.entry(row.tweet_id).or_default().push(Liker {
            user_id: row.user_id,
            name: row.name,
        });
    }

    let views = tweets
        .into_iter()
        .map(|t| TweetView {
            attachments: attachments.remove(&t.id).unwrap_or_default(),
            likes: likes.remove(&t.id).unwrap_or_default(),
            author: UserSummary {
                id: t.author_id,
                name: t.author_name,
            },
            id: t.id,
            content: t.content,
        })
        .collect();

    Ok(views)
}
