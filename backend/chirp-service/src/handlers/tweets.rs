/// Tweet handlers - feed, tweet lifecycle and likes
use crate::error::Result;
use crate::handlers::ResultResponse;
use crate::metrics::record_outcome;
use crate::middleware::ApiKey;
use crate::models::TweetView;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateTweetRequest {
    pub tweet_data: String,
    #[serde(default)]
    pub tweet_media_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub struct CreateTweetResponse {
    pub result: bool,
    pub tweet_id: i64,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub result: bool,
    pub tweets: Vec<TweetView>,
}

/// Ranked feed of followed accounts.
///
/// Falls back to the configured default api key when the header is absent.
pub async fn get_feed(
    state: web::Data<AppState>,
    api_key: Option<ApiKey>,
) -> Result<HttpResponse> {
    let api_key = match api_key {
        Some(key) => key.0,
        None => state.default_api_key.clone(),
    };

    let tweets = record_outcome("get_feed", state.feed.feed_for(&api_key).await)?;

    Ok(HttpResponse::Ok().json(FeedResponse {
        result: true,
        tweets,
    }))
}

pub async fn create_tweet(
    state: web::Data<AppState>,
    api_key: ApiKey,
    req: web::Json<CreateTweetRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let media_ids = req.tweet_media_ids.unwrap_or_default();

    let tweet_id = record_outcome(
        "create_tweet",
        state
            .tweets
            .create_tweet(api_key.as_str(), &req.tweet_data, &media_ids)
            .await,
    )?;

    Ok(HttpResponse::Ok().json(CreateTweetResponse {
        result: true,
        tweet_id,
    }))
}

pub async fn get_tweet(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let tweet = record_outcome(
        "get_tweet",
        state.tweets.get_tweet(path.into_inner()).await,
    )?;

    Ok(HttpResponse::Ok().json(tweet))
}

pub async fn delete_tweet(
    state: web::Data<AppState>,
    api_key: ApiKey,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    record_outcome(
        "delete_tweet",
        state
            .tweets
            .delete_tweet(api_key.as_str(), path.into_inner())
            .await,
    )?;

    Ok(HttpResponse::Ok().json(ResultResponse::ok()))
}

pub async fn like(
    state: web::Data<AppState>,
    api_key: ApiKey,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    record_outcome(
        "like",
        state.likes.like(api_key.as_str(), path.into_inner()).await,
    )?;

    Ok(HttpResponse::Ok().json(ResultResponse::ok()))
}

pub async fn unlike(
    state: web::Data<AppState>,
    api_key: ApiKey,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    record_outcome(
        "unlike",
        state
            .likes
            .unlike(api_key.as_str(), path.into_inner())
            .await,
    )?;

    Ok(HttpResponse::Ok().json(ResultResponse::ok()))
}
