//! Repository for friendship edges.
//!
//! At most one row exists per unordered pair, enforced by a unique
//! expression index on `(least(requester_id, recipient_id),
//! greatest(requester_id, recipient_id))`. Concurrent duplicate requests
//! lose the race at the index instead of at a check-then-act read.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use waypost_authority::{Friendship, FriendshipStatus};
use waypost_core::{FriendshipId, UserId};

use crate::auth::db::decode_err;

/// Row type for friendship queries.
#[derive(FromRow)]
struct FriendshipRow {
    id: String,
    requester_id: String,
    recipient_id: String,
    status: String,
    blocked_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FriendshipRow {
    fn try_into_friendship(self) -> Result<Friendship, sqlx::Error> {
        let id = FriendshipId::from_str(&self.id)
            .map_err(|e| decode_err("friendship id", &self.id, e))?;
        let requester = UserId::from_str(&self.requester_id)
            .map_err(|e| decode_err("user id", &self.requester_id, e))?;
        let recipient = UserId::from_str(&self.recipient_id)
            .map_err(|e| decode_err("user id", &self.recipient_id, e))?;
        let status = FriendshipStatus::from_str(&self.status)
            .map_err(|e| decode_err("friendship status", &self.status, e))?;
        let blocked_by = self
            .blocked_by
            .map(|b| UserId::from_str(&b).map_err(|e| decode_err("user id", &b, e)))
            .transpose()?;

        Ok(Friendship {
            id,
            requester,
            recipient,
            status,
            blocked_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, requester_id, recipient_id, status, blocked_by, created_at, updated_at";

/// Repository for friendship operations.
pub struct FriendshipRepository {
    pool: PgPool,
}

impl FriendshipRepository {
    /// Creates a new friendship repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds the edge for an unordered pair, regardless of direction.
    pub async fn find_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<Friendship>, sqlx::Error> {
        let row: Option<FriendshipRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM friendships
            WHERE (requester_id = $1 AND recipient_id = $2)
               OR (requester_id = $2 AND recipient_id = $1)
            "#
        ))
        .bind(a.to_string())
        .bind(b.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_friendship()?)),
            None => Ok(None),
        }
    }

    /// Finds an edge by ID.
    pub async fn find_by_id(&self, id: FriendshipId) -> Result<Option<Friendship>, sqlx::Error> {
        let row: Option<FriendshipRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM friendships
            WHERE id = $1
            "#
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_friendship()?)),
            None => Ok(None),
        }
    }

    /// Inserts a new edge inside its own transaction.
    ///
    /// A concurrent insert for the same unordered pair fails here with a
    /// unique violation; the service maps that to Conflict.
    pub async fn create(&self, friendship: &Friendship) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO friendships (id, requester_id, recipient_id, status, blocked_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(friendship.id.to_string())
        .bind(friendship.requester.to_string())
        .bind(friendship.recipient.to_string())
        .bind(friendship.status.as_str())
        .bind(friendship.blocked_by.map(|b| b.to_string()))
        .bind(friendship.created_at)
        .bind(friendship.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Updates an edge's status fields.
    pub async fn update(&self, friendship: &Friendship) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE friendships
            SET status = $2, blocked_by = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(friendship.id.to_string())
        .bind(friendship.status.as_str())
        .bind(friendship.blocked_by.map(|b| b.to_string()))
        .bind(friendship.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes an edge (reject, remove friend, unblock).
    pub async fn delete(&self, id: FriendshipId) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists accepted edges where the user is either party.
    pub async fn list_accepted_for(&self, user_id: UserId) -> Result<Vec<Friendship>, sqlx::Error> {
        let rows: Vec<FriendshipRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM friendships
            WHERE status = 'accepted'
              AND (requester_id = $1 OR recipient_id = $1)
            ORDER BY updated_at DESC
            "#
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into_friendship()).collect()
    }

    /// Lists pending requests received by the user.
    pub async fn list_pending_received(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Friendship>, sqlx::Error> {
        let rows: Vec<FriendshipRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM friendships
            WHERE status = 'pending'
              AND recipient_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into_friendship()).collect()
    }
}
