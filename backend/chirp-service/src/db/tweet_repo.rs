use crate::models::{Tweet, TweetWithStats};
use sqlx::PgConnection;

/// Insert a tweet and return its id
pub async fn insert_tweet(
    conn: &mut PgConnection,
    user_id: i64,
    content: &str,
) -> Result<i64, sqlx::Error> {
    let (id,) = sqlx::query_as::<_, (i64,)>(
        r#"
        INSERT INTO tweets (user_id, content)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(content)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

pub async fn find_tweet(
    conn: &mut PgConnection,
    tweet_id: i64,
) -> Result<Option<Tweet>, sqlx::Error> {
    let tweet = sqlx::query_as::<_, Tweet>(
        r#"
        SELECT id, user_id, content, created_at
        FROM tweets
        WHERE id = $1
        "#,
    )
    .bind(tweet_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(tweet)
}

/// Find a tweet together with its author and like count
pub async fn find_tweet_with_stats(
    conn: &mut PgConnection,
    tweet_id: i64,
) -> Result<Option<TweetWithStats>, sqlx::Error> {
    let tweet = sqlx::query_as::<_, TweetWithStats>(
        r#"
        SELECT t.id, t.content, u.id AS author_id, u.name AS author_name,
               COUNT(l.id) AS like_count
        FROM tweets t
        JOIN users u ON u.id = t.user_id
        LEFT JOIN likes l ON l.tweet_id = t.id
        WHERE t.id = $1
        GROUP BY t.id, u.id
        "#,
    )
    .bind(tweet_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(tweet)
}

/// All tweets written by accounts `follower_id` follows, with like counts.
///
/// Rows come back in insertion order (ascending id); ranking happens in the
/// feed service.
pub async fn find_followee_tweets_with_stats(
    conn: &mut PgConnection,
    follower_id: i64,
) -> Result<Vec<TweetWithStats>, sqlx::Error> {
    let tweets = sqlx::query_as::<_, TweetWithStats>(
        r#"
        SELECT t.id, t.content, u.id AS author_id, u.name AS author_name,
               COUNT(l.id) AS like_count
        FROM follows f
        JOIN tweets t ON t.user_id = f.followee_id
        JOIN users u ON u.id = t.user_id
        LEFT JOIN likes l ON l.tweet_id = t.id
        WHERE f.follower_id = $1
        GROUP BY t.id, u.id
        ORDER BY t.id ASC
        "#,
    )
    .bind(follower_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(tweets)
}

/// Delete a tweet owned by `author_id`; returns true if a row was removed
pub async fn delete_tweet(
    conn: &mut PgConnection,
    tweet_id: i64,
    author_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM tweets
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(tweet_id)
    .bind(author_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
