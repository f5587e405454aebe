use crate::models::TweetLikeRow;
use sqlx::PgConnection;

/// Create a like on a tweet.
///
/// Fails with a unique violation if the user already liked it and with a
/// foreign-key violation if the tweet is gone.
pub async fn insert_like(
    conn: &mut PgConnection,
    user_id: i64,
    tweet_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO likes (user_id, tweet_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(user_id)
    .bind(tweet_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Delete a like; returns true if a row was removed
pub async fn delete_like(
    conn: &mut PgConnection,
    user_id: i64,
    tweet_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM likes
        WHERE user_id = $1 AND tweet_id = $2
        "#,
    )
    .bind(user_id)
    .bind(tweet_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove every like on a tweet; returns the number removed
pub async fn delete_likes_for_tweet(
    conn: &mut PgConnection,
    tweet_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM likes WHERE tweet_id = $1")
        .bind(tweet_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Likes on any of `tweet_ids` with liker names, oldest like first
pub async fn find_likers_for_tweets(
    conn: &mut PgConnection,
    tweet_ids: &[i64],
) -> Result<Vec<TweetLikeRow>, sqlx::Error> {
    if tweet_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, TweetLikeRow>(
        r#"
        SELECT l.tweet_id, u.id AS user_id, u.name
        FROM likes l
        JOIN users u ON u.id = l.user_id
        WHERE l.tweet_id = ANY($1)
        ORDER BY l.id
        "#,
    )
    .bind(tweet_ids)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}
