/// Data models for chirp-service
///
/// Row types map one-to-one onto the tables created by the migrations;
/// view types are the JSON shapes returned to API clients.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered account, identified by its api key
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub api_key: String,
    pub name: String,
    pub password: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `{id, name}` pair used wherever another user is referenced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tweet {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Media {
    pub id: i64,
    pub locator: String,
    pub tweet_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Tweet joined with its author and current like count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TweetWithStats {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    pub author_name: String,
    pub like_count: i64,
}

/// One attached media locator, keyed by tweet
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TweetMediaRow {
    pub tweet_id: i64,
    pub locator: String,
}

/// One like on a tweet together with the liker's name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TweetLikeRow {
    pub tweet_id: i64,
    pub user_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liker {
    pub user_id: i64,
    pub name: String,
}

/// Fully resolved tweet as returned by `GET /api/tweets/{id}` and the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetView {
    pub id: i64,
    pub content: String,
    pub attachments: Vec<String>,
    pub author: UserSummary,
    pub likes: Vec<Liker>,
}

/// Profile with both directions of the follow relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub followers: Vec<UserSummary>,
    pub following: Vec<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweet_view_serializes_with_wire_field_names() {
        let view = TweetView {
            id: 1,
            content: "hello".to_string(),
            attachments: vec!["/images/a.png".to_string()],
            author: UserSummary {
                id: 7,
                name: "Oleg".to_string(),
            },
            likes: vec![Liker {
                user_id: 8,
                name: "Serega".to_string(),
            }],
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "content": "hello",
                "attachments": ["/images/a.png"],
                "author": {"id": 7, "name": "Oleg"},
                "likes": [{"user_id": 8, "name": "Serega"}],
            })
        );
    }
}
