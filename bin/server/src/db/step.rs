//! Repository for itinerary steps.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use waypost_core::{StepId, TripId, TripMemberId};
use waypost_trips::Step;

use crate::auth::db::decode_err;

/// Row type for step queries.
#[derive(FromRow)]
struct StepRow {
    id: String,
    trip_id: String,
    author_id: String,
    title: String,
    description: Option<String>,
    location: Option<String>,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StepRow {
    fn try_into_step(self) -> Result<Step, sqlx::Error> {
        let id = StepId::from_str(&self.id).map_err(|e| decode_err("step id", &self.id, e))?;
        let trip_id =
            TripId::from_str(&self.trip_id).map_err(|e| decode_err("trip id", &self.trip_id, e))?;
        let author = TripMemberId::from_str(&self.author_id)
            .map_err(|e| decode_err("trip member id", &self.author_id, e))?;

        Ok(Step::with_all_fields(
            id,
            trip_id,
            author,
            self.title,
            self.description,
            self.location,
            self.starts_at,
            self.ends_at,
            self.created_at,
            self.updated_at,
        ))
    }
}

/// Repository for step operations.
pub struct StepRepository {
    pool: PgPool,
}

impl StepRepository {
    /// Creates a new step repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new step.
    pub async fn create(&self, step: &Step) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO steps (id, trip_id, author_id, title, description, location,
                               starts_at, ends_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(step.id().to_string())
        .bind(step.trip_id().to_string())
        .bind(step.author().to_string())
        .bind(step.title())
        .bind(step.description())
        .bind(step.location())
        .bind(step.starts_at())
        .bind(step.ends_at())
        .bind(step.created_at())
        .bind(step.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds a step by ID.
    pub async fn find_by_id(&self, id: StepId) -> Result<Option<Step>, sqlx::Error> {
        let row: Option<StepRow> = sqlx::query_as(
            r#"
            SELECT id, trip_id, author_id, title, description, location,
                   starts_at, ends_at, created_at, updated_at
            FROM steps
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_step()?)),
            None => Ok(None),
        }
    }

    /// Lists a trip's steps, scheduled ones first in time order.
    pub async fn list_for_trip(&self, trip_id: TripId) -> Result<Vec<Step>, sqlx::Error> {
        let rows: Vec<StepRow> = sqlx::query_as(
            r#"
            SELECT id, trip_id, author_id, title, description, location,
                   starts_at, ends_at, created_at, updated_at
            FROM steps
            WHERE trip_id = $1
            ORDER BY starts_at ASC NULLS LAST, created_at ASC
            "#,
        )
        .bind(trip_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into_step()).collect()
    }

    /// Updates a step's fields.
    pub async fn update(&self, step: &Step) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE steps
            SET title = $2, description = $3, location = $4,
                starts_at = $5, ends_at = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(step.id().to_string())
        .bind(step.title())
        .bind(step.description())
        .bind(step.location())
        .bind(step.starts_at())
        .bind(step.ends_at())
        .bind(step.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a step. Comments cascade.
    pub async fn delete(&self, id: StepId) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM steps
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
