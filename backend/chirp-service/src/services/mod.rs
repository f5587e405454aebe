/// Business logic layer for chirp-service
///
/// Each service owns a `PgPool` and runs every operation on its own pooled
/// connection or transaction, resolving the caller's api key first.
pub mod feed;
pub mod follow;
pub mod identity;
pub mod likes;
pub mod media;
pub mod tweets;
pub mod users;

pub use feed::FeedService;
pub use follow::FollowService;
pub use likes::LikeService;
pub use media::MediaService;
pub use tweets::TweetService;
pub use users::UserService;

/// Service label used for pool metrics
pub const SERVICE_NAME: &str = "chirp-service";
