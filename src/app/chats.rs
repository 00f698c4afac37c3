use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::app::ServiceError;
use crate::domain::chat::{Chat, ChatListItem, ChatMember, ChatSummary, Message, MessageRecord, MessageView};
use crate::domain::projection::{chat_list_item, message_view};
use crate::domain::social_graph::UserPair;
use crate::infra::db::Db;

pub const NOT_A_PARTICIPANT: &str = "author is not a participant in this chat";

#[derive(Clone)]
pub struct ChatService {
    db: Db,
}

impl ChatService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn get_chat(&self, chat_id: Uuid) -> Result<Option<Chat>, ServiceError> {
        let row = sqlx::query("SELECT id, user_1, user_2, created_at FROM chats WHERE id = $1")
            .bind(chat_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|row| chat_from_row(&row)))
    }

    /// The chat between the two users in either ordering.
    pub async fn find_chat(&self, pair: UserPair) -> Result<Option<Chat>, ServiceError> {
        let row = sqlx::query(
            "SELECT id, user_1, user_2, created_at FROM chats \
             WHERE (user_1 = $1 AND user_2 = $2) OR (user_1 = $2 AND user_2 = $1)",
        )
        .bind(pair.low())
        .bind(pair.high())
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| chat_from_row(&row)))
    }

    /// Returns the pair's chat, creating it with `user_id` as `user_1` when
    /// neither ordering exists yet. The boolean is `true` when created.
    pub async fn get_or_create_chat(
        &self,
        user_id: Uuid,
        other_id: Uuid,
    ) -> Result<(Chat, bool), ServiceError> {
        let pair = UserPair::new(user_id, other_id)
            .ok_or_else(|| ServiceError::invalid_field("user_2", "cannot start a chat with yourself"))?;

        if let Some(chat) = self.find_chat(pair).await? {
            return Ok((chat, false));
        }

        let other_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(other_id)
                .fetch_one(self.db.pool())
                .await?;
        if !other_exists {
            return Err(ServiceError::invalid_field(
                "user_2",
                format!("Invalid pk \"{}\" - object does not exist.", other_id),
            ));
        }

        let inserted = sqlx::query(
            "INSERT INTO chats (user_1, user_2) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING \
             RETURNING id, user_1, user_2, created_at",
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_optional(self.db.pool())
        .await?;

        if let Some(row) = inserted {
            return Ok((chat_from_row(&row), true));
        }

        tracing::debug!(user_id = %user_id, other_id = %other_id, "chat insert raced, re-reading");
        let chat = self
            .find_chat(pair)
            .await?
            .ok_or_else(|| ServiceError::Conflict("chat changed concurrently".to_string()))?;
        Ok((chat, false))
    }

    /// Chats of the viewer that have at least one message, most recently
    /// active first.
    pub async fn list_chats(
        &self,
        viewer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<ChatListItem>), ServiceError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chats c \
             WHERE (c.user_1 = $1 OR c.user_2 = $1) \
               AND EXISTS (SELECT 1 FROM messages m WHERE m.chat_id = c.id)",
        )
        .bind(viewer_id)
        .fetch_one(self.db.pool())
        .await?;

        let rows = sqlx::query(
            "SELECT c.id, \
                    u1.id AS user_1_id, u1.first_name AS user_1_first_name, u1.last_name AS user_1_last_name, \
                    u2.id AS user_2_id, u2.first_name AS user_2_first_name, u2.last_name AS user_2_last_name, \
                    lm.content AS last_message_content, lm.created_at AS last_message_datetime \
             FROM chats c \
             JOIN users u1 ON u1.id = c.user_1 \
             JOIN users u2 ON u2.id = c.user_2 \
             JOIN LATERAL ( \
                 SELECT m.content, m.created_at FROM messages m \
                 WHERE m.chat_id = c.id \
                 ORDER BY m.created_at DESC, m.id DESC \
                 LIMIT 1 \
             ) lm ON TRUE \
             WHERE c.user_1 = $1 OR c.user_2 = $1 \
             ORDER BY lm.created_at DESC, c.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(viewer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let summary = ChatSummary {
                    id: row.get("id"),
                    user_1: ChatMember {
                        id: row.get("user_1_id"),
                        first_name: row.get("user_1_first_name"),
                        last_name: row.get("user_1_last_name"),
                    },
                    user_2: ChatMember {
                        id: row.get("user_2_id"),
                        first_name: row.get("user_2_first_name"),
                        last_name: row.get("user_2_last_name"),
                    },
                    last_message_content: row.get("last_message_content"),
                    last_message_datetime: row.get("last_message_datetime"),
                };
                chat_list_item(summary, viewer_id)
            })
            .collect();

        Ok((count, items))
    }

    /// Messages of a chat the viewer takes part in, newest first.
    pub async fn list_messages(
        &self,
        chat_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<Vec<MessageView>, ServiceError> {
        let chat = self.participant_chat(chat_id, viewer_id).await?;

        let rows = sqlx::query(
            "SELECT m.id, m.author_id, m.content, m.created_at, u.first_name AS author_first_name \
             FROM messages m \
             JOIN users u ON u.id = m.author_id \
             WHERE m.chat_id = $1 \
             ORDER BY m.created_at DESC, m.id DESC",
        )
        .bind(chat.id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let record = MessageRecord {
                    id: row.get("id"),
                    author_id: row.get("author_id"),
                    author_first_name: row.get("author_first_name"),
                    content: row.get("content"),
                    created_at: row.get("created_at"),
                };
                message_view(record, viewer_id)
            })
            .collect())
    }

    pub async fn delete_chat(&self, chat_id: Uuid, viewer_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM chats WHERE id = $1 AND (user_1 = $2 OR user_2 = $2)")
            .bind(chat_id)
            .bind(viewer_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("chat not found"));
        }
        Ok(())
    }

    pub async fn post_message(
        &self,
        author_id: Uuid,
        chat_id: Uuid,
        content: String,
    ) -> Result<Message, ServiceError> {
        let chat = self.get_chat(chat_id).await?.ok_or_else(|| {
            ServiceError::invalid_field(
                "chat",
                format!("Invalid pk \"{}\" - object does not exist.", chat_id),
            )
        })?;

        if !chat.is_participant(author_id) {
            return Err(ServiceError::invalid(NOT_A_PARTICIPANT));
        }

        let row = sqlx::query(
            "INSERT INTO messages (chat_id, author_id, content) VALUES ($1, $2, $3) \
             RETURNING id, chat_id, author_id, content, created_at",
        )
        .bind(chat.id)
        .bind(author_id)
        .bind(content)
        .fetch_one(self.db.pool())
        .await?;

        Ok(Message {
            id: row.get("id"),
            chat: row.get("chat_id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
            author_id: row.get("author_id"),
        })
    }

    pub async fn delete_message(&self, message_id: Uuid, actor_id: Uuid) -> Result<(), ServiceError> {
        let mut tx = self.db.pool().begin().await?;

        let author_id: Option<Uuid> =
            sqlx::query_scalar("SELECT author_id FROM messages WHERE id = $1 FOR UPDATE")
                .bind(message_id)
                .fetch_optional(&mut *tx)
                .await?;

        match author_id {
            None => return Err(ServiceError::not_found("message not found")),
            Some(author_id) if author_id != actor_id => {
                return Err(ServiceError::forbidden("you are not the author of this message"))
            }
            Some(_) => {}
        }

        sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(message_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn participant_chat(&self, chat_id: Uuid, viewer_id: Uuid) -> Result<Chat, ServiceError> {
        match self.get_chat(chat_id).await? {
            Some(chat) if chat.is_participant(viewer_id) => Ok(chat),
            _ => Err(ServiceError::not_found("chat not found")),
        }
    }
}

fn chat_from_row(row: &PgRow) -> Chat {
    Chat {
        id: row.get("id"),
        user_1: row.get("user_1"),
        user_2: row.get("user_2"),
        created_at: row.get("created_at"),
    }
}
