/// Database access layer
///
/// Repository functions take `&mut PgConnection` so that a caller can run them
/// on a pooled connection or inside an open transaction.
pub mod follow_repo;
pub mod like_repo;
pub mod media_repo;
pub mod tweet_repo;
pub mod user_repo;

use sqlx::migrate::Migrator;

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
