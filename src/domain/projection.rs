//! Viewer-relative read models. Every function here takes the viewer
//! explicitly and is recomputed per request.

use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::domain::chat::{ChatListItem, ChatSummary, MessageRecord, MessageView};
use crate::domain::engagement::{ReactionValue, ReactionView};
use crate::domain::social_graph::UserPair;
use crate::domain::user::full_name;

/// Label for messages written by the viewer.
pub const YOU_LABEL: &str = "you";

/// Shown as `my_reaction` when the viewer never reacted to the post.
pub const NO_REACTION: &str = "you have not react on this post";

/// The viewer's own reaction to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MyReaction {
    /// A reaction row exists; `None` once it has been toggled off.
    Reacted(Option<ReactionValue>),
    NoReaction,
}

impl MyReaction {
    pub fn for_viewer(reactions: &[ReactionView], viewer_id: Uuid) -> Self {
        reactions
            .iter()
            .rev()
            .find(|reaction| reaction.author.id == viewer_id)
            .map(|reaction| Self::Reacted(reaction.value))
            .unwrap_or(Self::NoReaction)
    }
}

impl Serialize for MyReaction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Reacted(Some(value)) => value.serialize(serializer),
            Self::Reacted(None) => serializer.serialize_none(),
            Self::NoReaction => serializer.serialize_str(NO_REACTION),
        }
    }
}

pub fn message_author_label(author_id: Uuid, author_first_name: &str, viewer_id: Uuid) -> String {
    if author_id == viewer_id {
        YOU_LABEL.to_string()
    } else {
        author_first_name.to_string()
    }
}

pub fn message_view(record: MessageRecord, viewer_id: Uuid) -> MessageView {
    let message_author = message_author_label(record.author_id, &record.author_first_name, viewer_id);
    MessageView {
        id: record.id,
        content: record.content,
        message_author,
        created_at: record.created_at,
    }
}

/// Full name of whichever participant is not the viewer.
pub fn companion_name(summary: &ChatSummary, viewer_id: Uuid) -> String {
    let companion_id = UserPair::new(summary.user_1.id, summary.user_2.id)
        .and_then(|pair| pair.other(viewer_id));
    let companion = if companion_id == Some(summary.user_1.id) {
        &summary.user_1
    } else {
        &summary.user_2
    };
    full_name(&companion.first_name, &companion.last_name)
}

pub fn chat_list_item(summary: ChatSummary, viewer_id: Uuid) -> ChatListItem {
    let companion_name = companion_name(&summary, viewer_id);
    ChatListItem {
        id: summary.id,
        companion_name,
        last_message_content: summary.last_message_content,
        last_message_datetime: summary.last_message_datetime,
    }
}
