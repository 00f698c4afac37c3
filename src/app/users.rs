use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::app::social::SocialService;
use crate::app::ServiceError;
use crate::domain::post::NestedPost;
use crate::domain::user::{User, UserListItem, UserProfile};
use crate::infra::db::Db;

#[derive(Clone)]
pub struct UserService {
    db: Db,
}

impl UserService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, ServiceError> {
        let row = sqlx::query(
            "SELECT id, username, email, first_name, last_name, date_joined \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    /// Every account, newest first, with `is_friend` relative to the viewer.
    pub async fn list_users(
        &self,
        viewer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<UserListItem>), ServiceError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.db.pool())
            .await?;

        let rows = sqlx::query(
            "SELECT u.id, u.username, u.first_name, u.last_name, \
                    EXISTS ( \
                        SELECT 1 FROM friendships f \
                        WHERE f.user_low = LEAST(u.id, $1) AND f.user_high = GREATEST(u.id, $1) \
                    ) AS is_friend \
             FROM users u \
             ORDER BY u.date_joined DESC, u.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(viewer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        let items = rows
            .into_iter()
            .map(|row| UserListItem {
                id: row.get("id"),
                username: row.get("username"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                is_friend: row.get("is_friend"),
            })
            .collect();

        Ok((count, items))
    }

    /// Full profile of `user_id` as seen by the viewer.
    pub async fn profile(
        &self,
        viewer_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<UserProfile>, ServiceError> {
        let Some(user) = self.get_user(user_id).await? else {
            return Ok(None);
        };

        let social = SocialService::new(self.db.clone());
        let is_friend = social.is_friend(viewer_id, user_id).await?;
        let friend_count = social.friend_count(user_id).await?;
        let friends = social.friends_short(user_id).await?;

        let rows = sqlx::query(
            "SELECT id, title, body, created_at FROM posts \
             WHERE author_id = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let posts = rows
            .into_iter()
            .map(|row| NestedPost {
                id: row.get("id"),
                body: row.get("body"),
                created_at: row.get("created_at"),
                title: row.get("title"),
            })
            .collect();

        Ok(Some(UserProfile {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_friend,
            friend_count,
            posts,
            friends,
        }))
    }

    /// Deletes the account; posts, comments, reactions, friendships, chats
    /// and messages cascade.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<bool, ServiceError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        date_joined: Some(row.get("date_joined")),
    }
}
