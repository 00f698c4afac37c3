use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::engagement::ReactionView;
use crate::domain::projection::MyReaction;
use crate::domain::user::UserShort;

pub const TITLE_MAX_LEN: usize = 64;

/// Body prefix shown in post lists.
pub const LIST_BODY_MAX_LEN: usize = 60;
/// Body prefix shown in the admin post listing.
pub const ADMIN_BODY_MAX_LEN: usize = 50;

#[derive(Debug, Clone)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: OffsetDateTime,
}

/// Response to create and update.
#[derive(Debug, Clone, Serialize)]
pub struct PostWritten {
    pub id: Uuid,
    pub title: String,
    pub body: String,
}

impl From<Post> for PostWritten {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListItem {
    pub id: Uuid,
    pub author: UserShort,
    pub title: String,
    #[serde(serialize_with = "crate::domain::timestamp::serialize")]
    pub created_at: OffsetDateTime,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: UserShort,
    pub reactions: Vec<ReactionView>,
    pub my_reaction: MyReaction,
}

/// Post as embedded in a user profile.
#[derive(Debug, Clone, Serialize)]
pub struct NestedPost {
    pub id: Uuid,
    pub body: String,
    #[serde(serialize_with = "crate::domain::timestamp::serialize")]
    pub created_at: OffsetDateTime,
    pub title: String,
}

/// Clips `body` to `max_len` characters: anything longer keeps its first
/// `max_len - 3` characters followed by `...`.
pub fn truncate_body(body: &str, max_len: usize) -> String {
    if body.chars().count() <= max_len {
        return body.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut clipped: String = body.chars().take(keep).collect();
    clipped.push_str("...");
    clipped
}
