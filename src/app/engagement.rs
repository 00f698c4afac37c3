use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::app::ServiceError;
use crate::domain::engagement::{
    reaction_value_from_db, Comment, CommentView, Reaction, ReactionValue,
};
use crate::domain::user::UserShort;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct EngagementService {
    db: Db,
}

impl EngagementService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create_comment(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        body: String,
    ) -> Result<Comment, ServiceError> {
        let row = sqlx::query(
            "INSERT INTO comments (author_id, post_id, body) \
             SELECT $1, p.id, $3 FROM posts p WHERE p.id = $2 \
             RETURNING id, author_id, post_id, body, created_at",
        )
        .bind(author_id)
        .bind(post_id)
        .bind(body)
        .fetch_optional(self.db.pool())
        .await?;

        let row = row.ok_or_else(|| invalid_post(post_id))?;

        Ok(Comment {
            id: row.get("id"),
            body: row.get("body"),
            created_at: row.get("created_at"),
            post: row.get("post_id"),
            author_id: row.get("author_id"),
        })
    }

    /// Newest first, optionally restricted to one post.
    pub async fn list_comments(
        &self,
        post_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<CommentView>), ServiceError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE ($1::uuid IS NULL OR post_id = $1)",
        )
        .bind(post_id)
        .fetch_one(self.db.pool())
        .await?;

        let rows = sqlx::query(
            "SELECT c.id, c.body, c.created_at, c.post_id, u.id AS author_id, u.username AS author_username \
             FROM comments c \
             JOIN users u ON u.id = c.author_id \
             WHERE ($1::uuid IS NULL OR c.post_id = $1) \
             ORDER BY c.created_at DESC, c.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        let items = rows
            .into_iter()
            .map(|row| CommentView {
                id: row.get("id"),
                body: row.get("body"),
                created_at: row.get("created_at"),
                post: row.get("post_id"),
                author: UserShort {
                    id: row.get("author_id"),
                    username: row.get("author_username"),
                },
            })
            .collect();

        Ok((count, items))
    }

    pub async fn delete_comment(&self, comment_id: Uuid, actor_id: Uuid) -> Result<(), ServiceError> {
        let mut tx = self.db.pool().begin().await?;

        let author_id: Option<Uuid> =
            sqlx::query_scalar("SELECT author_id FROM comments WHERE id = $1 FOR UPDATE")
                .bind(comment_id)
                .fetch_optional(&mut *tx)
                .await?;

        match author_id {
            None => return Err(ServiceError::not_found("comment not found")),
            Some(author_id) if author_id != actor_id => {
                return Err(ServiceError::forbidden("you are not the author of this comment"))
            }
            Some(_) => {}
        }

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Toggle-upsert of the author's single reaction to a post.
    ///
    /// With no row yet, the reaction is created with `value` and returned as
    /// is. Otherwise reacting with the stored value clears it and any other
    /// value replaces it. A concurrent first reaction that wins the
    /// `(author, post)` unique key is re-read and toggled instead.
    pub async fn set_reaction(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        value: Option<ReactionValue>,
    ) -> Result<Reaction, ServiceError> {
        let mut tx = self.db.pool().begin().await?;

        let post_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&mut *tx)
                .await?;
        if !post_exists {
            return Err(invalid_post(post_id));
        }

        if let Some(existing) = latest_reaction_for_update(&mut tx, author_id, post_id).await? {
            let reaction = apply_toggle(&mut tx, existing, value).await?;
            tx.commit().await?;
            return Ok(reaction);
        }

        let inserted = sqlx::query(
            "INSERT INTO reactions (author_id, post_id, value) VALUES ($1, $2, $3) \
             ON CONFLICT (author_id, post_id) DO NOTHING \
             RETURNING id, author_id, post_id, value, created_at",
        )
        .bind(author_id)
        .bind(post_id)
        .bind(value.map(|value| value.as_db()))
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = inserted {
            let reaction = reaction_from_row(&row)?;
            tx.commit().await?;
            return Ok(reaction);
        }

        tracing::debug!(author_id = %author_id, post_id = %post_id, "reaction insert raced, re-reading");
        let existing = latest_reaction_for_update(&mut tx, author_id, post_id)
            .await?
            .ok_or_else(|| ServiceError::Conflict("reaction changed concurrently".to_string()))?;
        let reaction = apply_toggle(&mut tx, existing, value).await?;
        tx.commit().await?;
        Ok(reaction)
    }
}

async fn latest_reaction_for_update(
    tx: &mut Transaction<'_, Postgres>,
    author_id: Uuid,
    post_id: Uuid,
) -> Result<Option<Reaction>, ServiceError> {
    let row = sqlx::query(
        "SELECT id, author_id, post_id, value, created_at \
         FROM reactions \
         WHERE author_id = $1 AND post_id = $2 \
         ORDER BY created_at DESC, id DESC \
         LIMIT 1 \
         FOR UPDATE",
    )
    .bind(author_id)
    .bind(post_id)
    .fetch_optional(&mut **tx)
    .await?;

    row.map(|row| reaction_from_row(&row)).transpose()
}

async fn apply_toggle(
    tx: &mut Transaction<'_, Postgres>,
    existing: Reaction,
    requested: Option<ReactionValue>,
) -> Result<Reaction, ServiceError> {
    let next = ReactionValue::toggled(existing.value, requested);

    let row = sqlx::query(
        "UPDATE reactions SET value = $2 WHERE id = $1 \
         RETURNING id, author_id, post_id, value, created_at",
    )
    .bind(existing.id)
    .bind(next.map(|value| value.as_db()))
    .fetch_one(&mut **tx)
    .await?;

    reaction_from_row(&row)
}

fn reaction_from_row(row: &PgRow) -> Result<Reaction, ServiceError> {
    Ok(Reaction {
        id: row.get("id"),
        value: reaction_value_from_db(row.get("value"))?,
        created_at: row.get("created_at"),
        post: row.get("post_id"),
        author_id: row.get("author_id"),
    })
}

fn invalid_post(post_id: Uuid) -> ServiceError {
    ServiceError::invalid_field(
        "post",
        format!("Invalid pk \"{}\" - object does not exist.", post_id),
    )
}
