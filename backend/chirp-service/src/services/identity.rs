/// Api-key resolution
///
/// The api key carried in the `api-key` header is the only credential in the
/// system; resolving it is the authorization step for every operation.
use crate::db::user_repo;
use crate::error::{codes, AppError, Result};
use crate::models::User;
use sqlx::PgConnection;
use tracing::debug;

/// Resolve `api_key` to its user, failing with `NO USER` if nobody holds it.
pub async fn resolve_api_key(conn: &mut PgConnection, api_key: &str) -> Result<User> {
    match user_repo::find_by_api_key(conn, api_key).await? {
        Some(user) => Ok(user),
        None => {
            debug!("api key does not resolve to a user");
            Err(AppError::not_found(
                codes::NO_USER,
                "No user with such api-key",
            ))
        }
    }
}
