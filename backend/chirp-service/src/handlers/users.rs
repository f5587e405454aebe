/// User handlers - registration, profiles and follows
use crate::error::Result;
use crate::handlers::ResultResponse;
use crate::metrics::record_outcome;
use crate::middleware::ApiKey;
use crate::models::UserProfile;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub api_key: String,
    pub name: String,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub api_key: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub result: bool,
    pub user: UserProfile,
}

/// Register a new user
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let user = record_outcome(
        "register",
        state
            .users
            .register(&req.api_key, &req.name, req.password.as_deref())
            .await,
    )?;

    Ok(HttpResponse::Ok().json(RegisterResponse {
        id: user.id,
        api_key: user.api_key,
        name: user.name,
    }))
}

/// Profile of the caller
pub async fn get_me(state: web::Data<AppState>, api_key: ApiKey) -> Result<HttpResponse> {
    let user = record_outcome(
        "get_me",
        state.users.profile_by_api_key(api_key.as_str()).await,
    )?;

    Ok(HttpResponse::Ok().json(ProfileResponse { result: true, user }))
}

/// Profile of any user by id
pub async fn get_user(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let user = record_outcome(
        "get_user",
        state.users.profile_by_id(path.into_inner()).await,
    )?;

    Ok(HttpResponse::Ok().json(ProfileResponse { result: true, user }))
}

pub async fn follow(
    state: web::Data<AppState>,
    api_key: ApiKey,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    record_outcome(
        "follow",
        state
            .follows
            .follow(api_key.as_str(), path.into_inner())
            .await,
    )?;

    Ok(HttpResponse::Ok().json(ResultResponse::ok()))
}

pub async fn unfollow(
    state: web::Data<AppState>,
    api_key: ApiKey,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    record_outcome(
        "unfollow",
        state
            .follows
            .unfollow(api_key.as_str(), path.into_inner())
            .await,
    )?;

    Ok(HttpResponse::Ok().json(ResultResponse::ok()))
}
