use sqlx::Row;
use uuid::Uuid;

use crate::app::ServiceError;
use crate::domain::engagement::{reaction_value_from_db, ReactionView};
use crate::domain::post::{truncate_body, Post, PostDetail, PostListItem, LIST_BODY_MAX_LEN};
use crate::domain::projection::MyReaction;
use crate::domain::user::UserShort;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct PostService {
    db: Db,
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl PostService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create_post(
        &self,
        author_id: Uuid,
        title: String,
        body: String,
    ) -> Result<Post, ServiceError> {
        let row = sqlx::query(
            "INSERT INTO posts (author_id, title, body) VALUES ($1, $2, $3) \
             RETURNING id, author_id, title, body, created_at",
        )
        .bind(author_id)
        .bind(title)
        .bind(body)
        .fetch_one(self.db.pool())
        .await?;

        Ok(Post {
            id: row.get("id"),
            author_id: row.get("author_id"),
            title: row.get("title"),
            body: row.get("body"),
            created_at: row.get("created_at"),
        })
    }

    /// Oldest first, body clipped for list display.
    pub async fn list_posts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<PostListItem>), ServiceError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.db.pool())
            .await?;

        let rows = sqlx::query(
            "SELECT p.id, p.title, p.body, p.created_at, u.id AS author_id, u.username AS author_username \
             FROM posts p \
             JOIN users u ON u.id = p.author_id \
             ORDER BY p.created_at ASC, p.id ASC \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let body: String = row.get("body");
                PostListItem {
                    id: row.get("id"),
                    author: UserShort {
                        id: row.get("author_id"),
                        username: row.get("author_username"),
                    },
                    title: row.get("title"),
                    created_at: row.get("created_at"),
                    body: truncate_body(&body, LIST_BODY_MAX_LEN),
                }
            })
            .collect();

        Ok((count, items))
    }

    /// Post with all reactions and the viewer's own reaction.
    pub async fn post_detail(
        &self,
        post_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<Option<PostDetail>, ServiceError> {
        let row = sqlx::query(
            "SELECT p.id, p.title, p.body, u.id AS author_id, u.username AS author_username \
             FROM posts p \
             JOIN users u ON u.id = p.author_id \
             WHERE p.id = $1",
        )
        .bind(post_id)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let reaction_rows = sqlx::query(
            "SELECT r.id, r.value, u.id AS author_id, u.username AS author_username \
             FROM reactions r \
             JOIN users u ON u.id = r.author_id \
             WHERE r.post_id = $1 \
             ORDER BY r.created_at ASC, r.id ASC",
        )
        .bind(post_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut reactions = Vec::with_capacity(reaction_rows.len());
        for reaction in reaction_rows {
            reactions.push(ReactionView {
                id: reaction.get("id"),
                value: reaction_value_from_db(reaction.get("value"))?,
                author: UserShort {
                    id: reaction.get("author_id"),
                    username: reaction.get("author_username"),
                },
            });
        }

        let my_reaction = MyReaction::for_viewer(&reactions, viewer_id);

        Ok(Some(PostDetail {
            id: row.get("id"),
            title: row.get("title"),
            body: row.get("body"),
            author: UserShort {
                id: row.get("author_id"),
                username: row.get("author_username"),
            },
            reactions,
            my_reaction,
        }))
    }

    /// Applies `changes` when `actor_id` wrote the post.
    pub async fn update_post(
        &self,
        post_id: Uuid,
        actor_id: Uuid,
        changes: PostChanges,
    ) -> Result<Post, ServiceError> {
        let mut tx = self.db.pool().begin().await?;

        let author_id: Option<Uuid> =
            sqlx::query_scalar("SELECT author_id FROM posts WHERE id = $1 FOR UPDATE")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;

        match author_id {
            None => return Err(ServiceError::not_found("post not found")),
            Some(author_id) if author_id != actor_id => {
                return Err(ServiceError::forbidden("you are not the author of this post"))
            }
            Some(_) => {}
        }

        let row = sqlx::query(
            "UPDATE posts \
             SET title = COALESCE($2, title), \
                 body = COALESCE($3, body) \
             WHERE id = $1 \
             RETURNING id, author_id, title, body, created_at",
        )
        .bind(post_id)
        .bind(changes.title)
        .bind(changes.body)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Post {
            id: row.get("id"),
            author_id: row.get("author_id"),
            title: row.get("title"),
            body: row.get("body"),
            created_at: row.get("created_at"),
        })
    }

    pub async fn delete_post(&self, post_id: Uuid, actor_id: Uuid) -> Result<(), ServiceError> {
        let mut tx = self.db.pool().begin().await?;

        let author_id: Option<Uuid> =
            sqlx::query_scalar("SELECT author_id FROM posts WHERE id = $1 FOR UPDATE")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;

        match author_id {
            None => return Err(ServiceError::not_found("post not found")),
            Some(author_id) if author_id != actor_id => {
                return Err(ServiceError::forbidden("you are not the author of this post"))
            }
            Some(_) => {}
        }

        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
