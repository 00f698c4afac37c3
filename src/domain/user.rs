use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::post::NestedPost;

/// Account record. The password hash never leaves the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub date_joined: Option<OffsetDateTime>,
}

pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserShort {
    pub id: Uuid,
    pub username: String,
}

/// Row of the user list, `is_friend` is relative to the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct UserListItem {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_friend: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_friend: bool,
    pub friend_count: i64,
    pub posts: Vec<NestedPost>,
    pub friends: Vec<UserShort>,
}
