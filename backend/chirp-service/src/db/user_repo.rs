use crate::models::User;
use sqlx::PgConnection;

/// Insert a new user and return the stored row
pub async fn insert_user(
    conn: &mut PgConnection,
    api_key: &str,
    name: &str,
    password: Option<&str>,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (api_key, name, password)
        VALUES ($1, $2, $3)
        RETURNING id, api_key, name, password, created_at
        "#,
    )
    .bind(api_key)
    .bind(name)
    .bind(password)
    .fetch_one(&mut *conn)
    .await?;

    Ok(user)
}

/// Find the user holding `api_key`
pub async fn find_by_api_key(
    conn: &mut PgConnection,
    api_key: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, api_key, name, password, created_at
        FROM users
        WHERE api_key = $1
        "#,
    )
    .bind(api_key)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(user)
}

pub async fn find_by_id(
    conn: &mut PgConnection,
    user_id: i64,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, api_key, name, password, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(user)
}
