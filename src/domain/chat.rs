use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::social_graph::UserPair;

#[derive(Debug, Clone, Serialize)]
pub struct Chat {
    pub id: Uuid,
    pub user_1: Uuid,
    pub user_2: Uuid,
    #[serde(skip_serializing)]
    pub created_at: OffsetDateTime,
}

impl Chat {
    pub fn pair(&self) -> Option<UserPair> {
        UserPair::new(self.user_1, self.user_2)
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.pair().is_some_and(|pair| pair.contains(user_id))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub chat: Uuid,
    pub content: String,
    #[serde(serialize_with = "crate::domain::timestamp::serialize")]
    pub created_at: OffsetDateTime,
    #[serde(skip_serializing)]
    pub author_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct ChatMember {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

/// A chat joined with both members and its newest message.
#[derive(Debug, Clone)]
pub struct ChatSummary {
    pub id: Uuid,
    pub user_1: ChatMember,
    pub user_2: ChatMember,
    pub last_message_content: String,
    pub last_message_datetime: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatListItem {
    pub id: Uuid,
    pub companion_name: String,
    pub last_message_content: String,
    #[serde(serialize_with = "crate::domain::timestamp::serialize")]
    pub last_message_datetime: OffsetDateTime,
}

/// A stored message plus what the labeling needs to know about its author.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_first_name: String,
    pub content: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: Uuid,
    pub content: String,
    pub message_author: String,
    #[serde(serialize_with = "crate::domain::timestamp::serialize")]
    pub created_at: OffsetDateTime,
}
