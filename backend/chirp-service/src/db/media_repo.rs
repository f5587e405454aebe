use crate::models::{Media, TweetMediaRow};
use sqlx::PgConnection;

/// Register a stored blob and return the new media id
pub async fn insert_media(conn: &mut PgConnection, locator: &str) -> Result<i64, sqlx::Error> {
    let (id,) = sqlx::query_as::<_, (i64,)>(
        r#"
        INSERT INTO medias (locator)
        VALUES ($1)
        RETURNING id
        "#,
    )
    .bind(locator)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

pub async fn find_media(
    conn: &mut PgConnection,
    media_id: i64,
) -> Result<Option<Media>, sqlx::Error> {
    let media = sqlx::query_as::<_, Media>(
        r#"
        SELECT id, locator, tweet_id, created_at
        FROM medias
        WHERE id = $1
        "#,
    )
    .bind(media_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(media)
}

/// Attach every still-unattached media in `media_ids` to `tweet_id`.
///
/// Unknown ids and media already attached elsewhere are left untouched.
/// Returns the number of media attached.
pub async fn attach_to_tweet(
    conn: &mut PgConnection,
    tweet_id: i64,
    media_ids: &[i64],
) -> Result<u64, sqlx::Error> {
    if media_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        r#"
        UPDATE medias
        SET tweet_id = $1
        WHERE id = ANY($2) AND tweet_id IS NULL
        "#,
    )
    .bind(tweet_id)
    .bind(media_ids)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Detach all media from `tweet_id`; returns the number detached
pub async fn detach_from_tweet(conn: &mut PgConnection, tweet_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE medias
        SET tweet_id = NULL
        WHERE tweet_id = $1
        "#,
    )
    .bind(tweet_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Locators attached to any of `tweet_ids`, in upload order
pub async fn find_locators_for_tweets(
    conn: &mut PgConnection,
    tweet_ids: &[i64],
) -> Result<Vec<TweetMediaRow>, sqlx::Error> {
    if tweet_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, TweetMediaRow>(
        r#"
        SELECT tweet_id, locator
        FROM medias
        WHERE tweet_id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(tweet_ids)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}
