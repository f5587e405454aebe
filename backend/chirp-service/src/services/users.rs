/// User service - registration and profile views
use crate::db::{follow_repo, user_repo};
use crate::error::{codes, AppError, Result};
use crate::models::{User, UserProfile};
use crate::services::{identity, SERVICE_NAME};
use db_pool::acquire_with_metrics;
use sqlx::{PgConnection, PgPool};
use tracing::info;

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new account holding `api_key`
    pub async fn register(
        &self,
        api_key: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<User> {
        let api_key = api_key.trim();
        let name = name.trim();
        if api_key.is_empty() || name.is_empty() {
            return Err(AppError::invalid_input(
                codes::BAD_USER,
                "api_key and name must not be empty",
            ));
        }

        let mut conn = acquire_with_metrics(&self.pool, SERVICE_NAME).await?;
        let user = user_repo::insert_user(&mut conn, api_key, name, password)
            .await
            .map_err(|e| {
                AppError::from_constraint(
                    e,
                    codes::BAD_USER,
                    "User with such api-key already exists",
                )
            })?;

        info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    /// Profile of the user holding `api_key`
    pub async fn profile_by_api_key(&self, api_key: &str) -> Result<UserProfile> {
        let mut conn = acquire_with_metrics(&self.pool, SERVICE_NAME).await?;
        let user = identity::resolve_api_key(&mut conn, api_key).await?;
        load_profile(&mut conn, &user).await
    }

    /// Profile of user `user_id`
    pub async fn profile_by_id(&self, user_id: i64) -> Result<UserProfile> {
        let mut conn = acquire_with_metrics(&self.pool, SERVICE_NAME).await?;
        let user = user_repo::find_by_id(&mut conn, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(codes::NO_USER, "No user with such id"))?;
        load_profile(&mut conn, &user).await
    }
}

async fn load_profile(conn: &mut PgConnection, user: &User) -> Result<UserProfile> {
    let followers = follow_repo::list_followers(conn, user.id).await?;
    let following = follow_repo::list_following(conn, user.id).await?;

    Ok(UserProfile {
        id: user.id,
        name: user.name.clone(),
        followers,
        following,
    })
}
