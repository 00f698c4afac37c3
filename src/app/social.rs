use sqlx::Row;
use uuid::Uuid;

use crate::app::ServiceError;
use crate::domain::social_graph::UserPair;
use crate::domain::user::{UserListItem, UserShort};
use crate::infra::db::Db;

/// Undirected friendship graph. Each friendship is one `friendships` row
/// keyed by the canonical pair, so both members observe it.
#[derive(Clone)]
pub struct SocialService {
    db: Db,
}

impl SocialService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Returns `false` when the two users were already friends.
    pub async fn add_friend(&self, actor_id: Uuid, target_id: Uuid) -> Result<bool, ServiceError> {
        let pair = UserPair::new(actor_id, target_id)
            .ok_or_else(|| ServiceError::invalid("cannot add yourself as a friend"))?;

        let result = sqlx::query(
            "INSERT INTO friendships (user_low, user_high) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(pair.low())
        .bind(pair.high())
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` when the two users were not friends.
    pub async fn remove_friend(&self, actor_id: Uuid, target_id: Uuid) -> Result<bool, ServiceError> {
        let pair = UserPair::new(actor_id, target_id)
            .ok_or_else(|| ServiceError::invalid("cannot remove yourself from friends"))?;

        let result = sqlx::query("DELETE FROM friendships WHERE user_low = $1 AND user_high = $2")
            .bind(pair.low())
            .bind(pair.high())
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_friend(&self, a: Uuid, b: Uuid) -> Result<bool, ServiceError> {
        let Some(pair) = UserPair::new(a, b) else {
            return Ok(false);
        };

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM friendships WHERE user_low = $1 AND user_high = $2)",
        )
        .bind(pair.low())
        .bind(pair.high())
        .fetch_one(self.db.pool())
        .await?;

        Ok(exists)
    }

    pub async fn friend_count(&self, user_id: Uuid) -> Result<i64, ServiceError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM friendships WHERE user_low = $1 OR user_high = $1",
        )
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(count)
    }

    /// Friends of `user_id`, newest accounts first, flagged relative to the viewer.
    pub async fn list_friends(
        &self,
        viewer_id: Uuid,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<UserListItem>), ServiceError> {
        let count = self.friend_count(user_id).await?;

        let rows = sqlx::query(
            "SELECT u.id, u.username, u.first_name, u.last_name, \
                    EXISTS ( \
                        SELECT 1 FROM friendships v \
                        WHERE v.user_low = LEAST(u.id, $2) AND v.user_high = GREATEST(u.id, $2) \
                    ) AS is_friend \
             FROM friendships f \
             JOIN users u ON u.id = CASE WHEN f.user_low = $1 THEN f.user_high ELSE f.user_low END \
             WHERE f.user_low = $1 OR f.user_high = $1 \
             ORDER BY u.date_joined DESC, u.id DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
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

    /// Id and username of every friend, for embedding in a profile.
    pub async fn friends_short(&self, user_id: Uuid) -> Result<Vec<UserShort>, ServiceError> {
        let rows = sqlx::query(
            "SELECT u.id, u.username \
             FROM friendships f \
             JOIN users u ON u.id = CASE WHEN f.user_low = $1 THEN f.user_high ELSE f.user_low END \
             WHERE f.user_low = $1 OR f.user_high = $1 \
             ORDER BY u.username",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserShort {
                id: row.get("id"),
                username: row.get("username"),
            })
            .collect())
    }
}
