/// Feed service - tweets from followed accounts ranked by likes
use crate::db::tweet_repo;
use crate::error::Result;
use crate::metrics::FEED_SIZE;
use crate::models::{TweetView, TweetWithStats};
use crate::services::tweets::hydrate_tweets;
use crate::services::{identity, SERVICE_NAME};
use db_pool::acquire_with_metrics;
use sqlx::PgPool;
use tracing::debug;

pub struct FeedService {
    pool: PgPool,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Feed for the holder of `api_key`: every tweet written by an account
    /// they follow, most liked first.
    pub async fn feed_for(&self, api_key: &str) -> Result<Vec<TweetView>> {
        let mut conn = acquire_with_metrics(&self.pool, SERVICE_NAME).await?;
        let user = identity::resolve_api_key(&mut conn, api_key).await?;

        let mut tweets = tweet_repo::find_followee_tweets_with_stats(&mut conn, user.id).await?;
        rank_by_likes(&mut tweets);

        let views = hydrate_tweets(&mut conn, tweets).await?;
        FEED_SIZE.observe(views.len() as f64);
        debug!(user_id = %user.id, size = views.len(), "feed assembled");

        Ok(views)
    }
}

/// Order by like count descending. The sort is stable, so tweets with equal
/// counts keep their incoming (insertion) order.
pub fn rank_by_likes(tweets: &mut [TweetWithStats]) {
    tweets.sort_by(|a, b| b.like_count.cmp(&a.like_count));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(id: i64, like_count: i64) -> TweetWithStats {
        TweetWithStats {
            id,
            content: format!("tweet {}", id),
            author_id: 1,
            author_name: "author".to_string(),
            like_count,
        }
    }

    fn ids(tweets: &[TweetWithStats]) -> Vec<i64> {
        tweets.iter().map(|t| t.id).collect()
    }

    #[test]
    fn most_liked_first() {
        let mut tweets = vec![tweet(1, 0), tweet(2, 5), tweet(3, 2)];
        rank_by_likes(&mut tweets);
        assert_eq!(ids(&tweets), vec![2, 3, 1]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut tweets = vec![
            tweet(1, 1),
            tweet(2, 3),
            tweet(3, 1),
            tweet(4, 3),
            tweet(5, 0),
            tweet(6, 1),
        ];
        rank_by_likes(&mut tweets);
        assert_eq!(ids(&tweets), vec![2, 4, 1, 3, 6, 5]);
    }

    #[test]
    fn empty_feed_is_fine() {
        let mut tweets: Vec<TweetWithStats> = Vec::new();
        rank_by_likes(&mut tweets);
        assert!(tweets.is_empty());
    }
}
