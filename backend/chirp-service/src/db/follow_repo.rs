use crate::models::UserSummary;
use sqlx::PgConnection;

/// Insert a follow edge.
///
/// Fails with a unique violation when the edge already exists and with a
/// check violation on a self-follow.
pub async fn insert_follow(
    conn: &mut PgConnection,
    follower_id: i64,
    followee_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followee_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Delete a follow edge; returns true if a row was removed
pub async fn delete_follow(
    conn: &mut PgConnection,
    follower_id: i64,
    followee_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND followee_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Users following `user_id`, oldest edge first
pub async fn list_followers(
    conn: &mut PgConnection,
    user_id: i64,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.name
        FROM follows f
        JOIN users u ON u.id = f.follower_id
        WHERE f.followee_id = $1
        ORDER BY f.created_at, u.id
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(users)
}

/// Users that `user_id` follows, oldest edge first
pub async fn list_following(
    conn: &mut PgConnection,
    user_id: i64,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.name
        FROM follows f
        JOIN users u ON u.id = f.followee_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at, u.id
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(users)
}
