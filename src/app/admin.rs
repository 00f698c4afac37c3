use anyhow::Result;
use serde::Serialize;
use sqlx::Row;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::engagement::{reaction_value_from_db, ReactionValue};
use crate::domain::post::{truncate_body, ADMIN_BODY_MAX_LEN};
use crate::infra::db::Db;

/// Read-only listings for staff tooling.
#[derive(Clone)]
pub struct AdminService {
    db: Db,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub joined_from: Option<Date>,
    pub joined_to: Option<Date>,
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub search: Option<String>,
    pub author: Option<Uuid>,
    pub created_from: Option<Date>,
    pub created_to: Option<Date>,
}

#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub author: Option<Uuid>,
    pub post: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ReactionFilter {
    pub author: Option<Uuid>,
    pub post: Option<Uuid>,
    pub value: Option<ReactionValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_superuser: bool,
    #[serde(serialize_with = "crate::domain::timestamp::serialize")]
    pub date_joined: OffsetDateTime,
    #[serde(serialize_with = "crate::domain::timestamp::option::serialize")]
    pub last_login: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminPost {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: String,
    pub comments_count: i64,
    #[serde(serialize_with = "crate::domain::timestamp::serialize")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminComment {
    pub id: Uuid,
    pub body: String,
    pub author: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminReaction {
    pub id: Uuid,
    pub value: Option<ReactionValue>,
    pub author: String,
}

impl AdminService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Ordered by username. `search` matches id, username or email.
    pub async fn list_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<AdminUser>)> {
        const WHERE: &str = "WHERE ($1::text IS NULL \
                   OR u.id::text ILIKE '%' || $1 || '%' \
                   OR u.username ILIKE '%' || $1 || '%' \
                   OR u.email ILIKE '%' || $1 || '%') \
               AND ($2::date IS NULL OR u.date_joined >= $2::date) \
               AND ($3::date IS NULL OR u.date_joined < $3::date + 1)";

        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users u {}", WHERE))
            .bind(&filter.search)
            .bind(filter.joined_from)
            .bind(filter.joined_to)
            .fetch_one(self.db.pool())
            .await?;

        let rows = sqlx::query(&format!(
            "SELECT u.id, u.username, u.first_name, u.last_name, u.email, \
                    u.is_staff, u.is_active, u.is_superuser, u.date_joined, u.last_login \
             FROM users u {} \
             ORDER BY u.username \
             LIMIT $4 OFFSET $5",
            WHERE
        ))
        .bind(&filter.search)
        .bind(filter.joined_from)
        .bind(filter.joined_to)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        let users = rows
            .into_iter()
            .map(|row| AdminUser {
                id: row.get("id"),
                username: row.get("username"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                email: row.get("email"),
                is_staff: row.get("is_staff"),
                is_active: row.get("is_active"),
                is_superuser: row.get("is_superuser"),
                date_joined: row.get("date_joined"),
                last_login: row.get("last_login"),
            })
            .collect();

        Ok((count, users))
    }

    /// Newest first, body clipped to the admin prefix length.
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<AdminPost>)> {
        const WHERE: &str = "WHERE ($1::text IS NULL OR p.title ILIKE '%' || $1 || '%') \
               AND ($2::uuid IS NULL OR p.author_id = $2) \
               AND ($3::date IS NULL OR p.created_at >= $3::date) \
               AND ($4::date IS NULL OR p.created_at < $4::date + 1)";

        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM posts p {}", WHERE))
            .bind(&filter.search)
            .bind(filter.author)
            .bind(filter.created_from)
            .bind(filter.created_to)
            .fetch_one(self.db.pool())
            .await?;

        let rows = sqlx::query(&format!(
            "SELECT p.id, p.title, p.body, p.created_at, u.username AS author, \
                    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count \
             FROM posts p \
             JOIN users u ON u.id = p.author_id {} \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT $5 OFFSET $6",
            WHERE
        ))
        .bind(&filter.search)
        .bind(filter.author)
        .bind(filter.created_from)
        .bind(filter.created_to)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        let posts = rows
            .into_iter()
            .map(|row| {
                let body: String = row.get("body");
                AdminPost {
                    id: row.get("id"),
                    title: row.get("title"),
                    body: truncate_body(&body, ADMIN_BODY_MAX_LEN),
                    author: row.get("author"),
                    comments_count: row.get("comments_count"),
                    created_at: row.get("created_at"),
                }
            })
            .collect();

        Ok((count, posts))
    }

    pub async fn list_comments(
        &self,
        filter: &CommentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<AdminComment>)> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments c \
             WHERE ($1::uuid IS NULL OR c.author_id = $1) \
               AND ($2::uuid IS NULL OR c.post_id = $2)",
        )
        .bind(filter.author)
        .bind(filter.post)
        .fetch_one(self.db.pool())
        .await?;

        let rows = sqlx::query(
            "SELECT c.id, c.body, u.username AS author \
             FROM comments c \
             JOIN users u ON u.id = c.author_id \
             WHERE ($1::uuid IS NULL OR c.author_id = $1) \
               AND ($2::uuid IS NULL OR c.post_id = $2) \
             ORDER BY c.created_at DESC, c.id DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(filter.author)
        .bind(filter.post)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        let comments = rows
            .into_iter()
            .map(|row| AdminComment {
                id: row.get("id"),
                body: row.get("body"),
                author: row.get("author"),
            })
            .collect();

        Ok((count, comments))
    }

    pub async fn list_reactions(
        &self,
        filter: &ReactionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<AdminReaction>)> {
        let value = filter.value.map(|value| value.as_db());

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reactions r \
             WHERE ($1::uuid IS NULL OR r.author_id = $1) \
               AND ($2::uuid IS NULL OR r.post_id = $2) \
               AND ($3::text IS NULL OR r.value = $3)",
        )
        .bind(filter.author)
        .bind(filter.post)
        .bind(value)
        .fetch_one(self.db.pool())
        .await?;

        let rows = sqlx::query(
            "SELECT r.id, r.value, u.username AS author \
             FROM reactions r \
             JOIN users u ON u.id = r.author_id \
             WHERE ($1::uuid IS NULL OR r.author_id = $1) \
               AND ($2::uuid IS NULL OR r.post_id = $2) \
               AND ($3::text IS NULL OR r.value = $3) \
             ORDER BY r.created_at DESC, r.id DESC \
             LIMIT $4 OFFSET $5",
        )
        .bind(filter.author)
        .bind(filter.post)
        .bind(value)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        let mut reactions = Vec::with_capacity(rows.len());
        for row in rows {
            reactions.push(AdminReaction {
                id: row.get("id"),
                value: reaction_value_from_db(row.get("value"))?,
                author: row.get("author"),
            });
        }

        Ok((count, reactions))
    }
}
