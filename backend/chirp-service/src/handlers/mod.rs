/// HTTP handlers for chirp-service
///
/// Routes live under `/api`:
/// - Users: registration, profiles, follow/unfollow
/// - Tweets: feed, create, read, delete, like/unlike
/// - Media: image upload
/// - Health: legacy liveness probe and database health
pub mod health;
pub mod media;
pub mod tweets;
pub mod users;

use actix_web::{web, HttpRequest};
use serde::Serialize;

use crate::error::{codes, AppError};

/// `{"result": true}` acknowledgement
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub result: bool,
}

impl ResultResponse {
    pub fn ok() -> Self {
        Self { result: true }
    }
}

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid_input(codes::BAD_REQUEST, err.to_string()).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid_input(codes::BAD_REQUEST, err.to_string()).into()
}

/// Register every `/api` route together with the extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/api")
                .route("/test", web::get().to(health::legacy_test))
                .route("/health", web::get().to(health::health))
                .service(
                    web::scope("/users")
                        .route("", web::post().to(users::register))
                        .route("/me", web::get().to(users::get_me))
                        .route("/{id}", web::get().to(users::get_user))
                        .service(
                            web::resource("/{id}/follow")
                                .route(web::post().to(users::follow))
                                .route(web::delete().to(users::unfollow)),
                        ),
                )
                .service(
                    web::scope("/tweets")
                        .service(
                            web::resource("")
                                .route(web::get().to(tweets::get_feed))
                                .route(web::post().to(tweets::create_tweet)),
                        )
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(tweets::get_tweet))
                                .route(web::delete().to(tweets::delete_tweet)),
                        )
                        .service(
                            web::resource("/{id}/likes")
                                .route(web::post().to(tweets::like))
                                .route(web::delete().to(tweets::unlike)),
                        ),
                )
                .route("/medias", web::post().to(media::upload_media)),
        );
}
