//! Repository for trips and trip memberships.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use waypost_authority::{TripMembership, TripRole, Visibility};
use waypost_core::{TripId, TripMemberId, UserId};
use waypost_trips::Trip;

use crate::auth::db::decode_err;

/// Row type for trip queries.
#[derive(FromRow)]
struct TripRow {
    id: String,
    name: String,
    description: Option<String>,
    visibility: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TripRow {
    fn try_into_trip(self) -> Result<Trip, sqlx::Error> {
        let id = TripId::from_str(&self.id).map_err(|e| decode_err("trip id", &self.id, e))?;
        let visibility = Visibility::from_str(&self.visibility)
            .map_err(|e| decode_err("visibility", &self.visibility, e))?;

        Ok(Trip::with_all_fields(
            id,
            self.name,
            self.description,
            visibility,
            self.created_at,
            self.updated_at,
        ))
    }
}

/// Row type for membership queries.
#[derive(FromRow)]
struct MembershipRow {
    id: String,
    trip_id: String,
    user_id: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl MembershipRow {
    fn try_into_membership(self) -> Result<TripMembership, sqlx::Error> {
        let id = TripMemberId::from_str(&self.id)
            .map_err(|e| decode_err("trip member id", &self.id, e))?;
        let trip_id =
            TripId::from_str(&self.trip_id).map_err(|e| decode_err("trip id", &self.trip_id, e))?;
        let user_id =
            UserId::from_str(&self.user_id).map_err(|e| decode_err("user id", &self.user_id, e))?;
        let role =
            TripRole::from_str(&self.role).map_err(|e| decode_err("trip role", &self.role, e))?;

        Ok(TripMembership {
            id,
            trip_id,
            user_id,
            role,
            created_at: self.created_at,
        })
    }
}

/// Repository for trip and membership operations.
pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    /// Creates a new trip repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a trip and its creator membership in one transaction.
    ///
    /// A trip must never exist without exactly one Creator.
    pub async fn create_with_creator(
        &self,
        trip: &Trip,
        creator: &TripMembership,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO trips (id, name, description, visibility, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(trip.id().to_string())
        .bind(trip.name())
        .bind(trip.description())
        .bind(trip.visibility().as_str())
        .bind(trip.created_at())
        .bind(trip.updated_at())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO trip_members (id, trip_id, user_id, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(creator.id.to_string())
        .bind(creator.trip_id.to_string())
        .bind(creator.user_id.to_string())
        .bind(creator.role.as_str())
        .bind(creator.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Finds a trip by ID.
    pub async fn find_by_id(&self, id: TripId) -> Result<Option<Trip>, sqlx::Error> {
        let row: Option<TripRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, visibility, created_at, updated_at
            FROM trips
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_trip()?)),
            None => Ok(None),
        }
    }

    /// Updates a trip's fields.
    pub async fn update(&self, trip: &Trip) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE trips
            SET name = $2, description = $3, visibility = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(trip.id().to_string())
        .bind(trip.name())
        .bind(trip.description())
        .bind(trip.visibility().as_str())
        .bind(trip.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a trip. Memberships, steps, and comments cascade.
    pub async fn delete(&self, id: TripId) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM trips
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds a user's membership in a trip.
    pub async fn find_membership(
        &self,
        trip_id: TripId,
        user_id: UserId,
    ) -> Result<Option<TripMembership>, sqlx::Error> {
        let row: Option<MembershipRow> = sqlx::query_as(
            r#"
            SELECT id, trip_id, user_id, role, created_at
            FROM trip_members
            WHERE trip_id = $1 AND user_id = $2
            "#,
        )
        .bind(trip_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_membership()?)),
            None => Ok(None),
        }
    }

    /// Finds the trip's creator membership.
    pub async fn find_creator(
        &self,
        trip_id: TripId,
    ) -> Result<Option<TripMembership>, sqlx::Error> {
        let row: Option<MembershipRow> = sqlx::query_as(
            r#"
            SELECT id, trip_id, user_id, role, created_at
            FROM trip_members
            WHERE trip_id = $1 AND role = 'creator'
            "#,
        )
        .bind(trip_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_membership()?)),
            None => Ok(None),
        }
    }

    /// Lists all memberships of a trip.
    pub async fn list_members(&self, trip_id: TripId) -> Result<Vec<TripMembership>, sqlx::Error> {
        let rows: Vec<MembershipRow> = sqlx::query_as(
            r#"
            SELECT id, trip_id, user_id, role, created_at
            FROM trip_members
            WHERE trip_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(trip_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into_membership()).collect()
    }

    /// Adds a member to a trip.
    ///
    /// `(trip_id, user_id)` is unique; adding an existing member fails with
    /// a unique violation, which the service maps to Conflict.
    pub async fn add_member(&self, membership: &TripMembership) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO trip_members (id, trip_id, user_id, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(membership.id.to_string())
        .bind(membership.trip_id.to_string())
        .bind(membership.user_id.to_string())
        .bind(membership.role.as_str())
        .bind(membership.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a member's role.
    pub async fn update_member_role(
        &self,
        id: TripMemberId,
        role: TripRole,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE trip_members
            SET role = $2
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes a member from a trip.
    pub async fn delete_member(&self, id: TripMemberId) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM trip_members
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
