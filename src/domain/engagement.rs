use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::user::UserShort;

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub body: String,
    #[serde(serialize_with = "crate::domain::timestamp::serialize")]
    pub created_at: OffsetDateTime,
    pub post: Uuid,
    #[serde(skip_serializing)]
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub body: String,
    #[serde(serialize_with = "crate::domain::timestamp::serialize")]
    pub created_at: OffsetDateTime,
    pub post: Uuid,
    pub author: UserShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionValue {
    Smile,
    ThumbUp,
    Sad,
    Heart,
    Laugh,
}

impl ReactionValue {
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "smile" => Some(Self::Smile),
            "thumb_up" => Some(Self::ThumbUp),
            "sad" => Some(Self::Sad),
            "heart" => Some(Self::Heart),
            "laugh" => Some(Self::Laugh),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Smile => "smile",
            Self::ThumbUp => "thumb_up",
            Self::Sad => "sad",
            Self::Heart => "heart",
            Self::Laugh => "laugh",
        }
    }

    /// Value an existing reaction takes after the author reacts with
    /// `requested`: the same value again clears it, anything else replaces it.
    pub fn toggled(current: Option<Self>, requested: Option<Self>) -> Option<Self> {
        if current == requested {
            None
        } else {
            requested
        }
    }
}

/// Decodes a nullable `value` column.
pub fn reaction_value_from_db(value: Option<String>) -> anyhow::Result<Option<ReactionValue>> {
    match value {
        Some(value) => ReactionValue::from_db(&value)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("unknown reaction value: {}", value)),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Reaction {
    pub id: Uuid,
    pub value: Option<ReactionValue>,
    #[serde(serialize_with = "crate::domain::timestamp::serialize")]
    pub created_at: OffsetDateTime,
    pub post: Uuid,
    #[serde(skip_serializing)]
    pub author_id: Uuid,
}

/// Reaction as embedded in a post detail.
#[derive(Debug, Clone, Serialize)]
pub struct ReactionView {
    pub id: Uuid,
    pub value: Option<ReactionValue>,
    pub author: UserShort,
}
