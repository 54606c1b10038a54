//! Itinerary step operations.
//!
//! Any trip member may add steps. Editing or deleting a step is allowed for
//! the step's author and for anyone holding the trip's Update permission.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use waypost_authority::{Actor, AuthorityError, TripAction, decide};
use waypost_core::{StepId, TripId};
use waypost_trips::Step;

use crate::db::{StepRepository, TripRepository};
use crate::error::ApiError;
use crate::services::ensure_trip_viewable;

/// Fields a step update may change. `None` leaves a field untouched; the
/// schedule is replaced as a whole so the range check always sees both ends.
#[derive(Debug, Default)]
pub struct StepPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub schedule: Option<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)>,
}

/// Service for step operations.
pub struct StepService {
    pool: PgPool,
}

impl StepService {
    /// Creates a new step service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> StepRepository {
        StepRepository::new(self.pool.clone())
    }

    fn trips(&self) -> TripRepository {
        TripRepository::new(self.pool.clone())
    }

    async fn find_step(&self, step_id: StepId) -> Result<Step, ApiError> {
        self.repo()
            .find_by_id(step_id)
            .await?
            .ok_or(ApiError::NotFound { resource: "step" })
    }

    /// Lists a trip's steps, enforcing trip visibility.
    pub async fn list_steps(&self, actor: &Actor, trip_id: TripId) -> Result<Vec<Step>, ApiError> {
        let trip = self
            .trips()
            .find_by_id(trip_id)
            .await?
            .ok_or(ApiError::NotFound { resource: "trip" })?;
        ensure_trip_viewable(&self.pool, actor, &trip).await?;
        Ok(self.repo().list_for_trip(trip_id).await?)
    }

    /// Adds a step to a trip, authored by the actor's membership.
    pub async fn create_step(
        &self,
        actor: &Actor,
        trip_id: TripId,
        title: String,
        patch: StepPatch,
    ) -> Result<Step, ApiError> {
        self.trips()
            .find_by_id(trip_id)
            .await?
            .ok_or(ApiError::NotFound { resource: "trip" })?;

        if !actor.is_active {
            return Err(ApiError::Denied(AuthorityError::ActorInactive {
                user_id: actor.id,
            }));
        }

        // Steps are authored by a membership, so even a platform admin
        // needs one to create a step.
        let membership = self
            .trips()
            .find_membership(trip_id, actor.id)
            .await?
            .ok_or(ApiError::Denied(AuthorityError::NotTripMember { trip_id }))?;

        let mut step = Step::new(trip_id, membership.id, title)?;
        apply_patch(&mut step, patch)?;

        self.repo().create(&step).await?;
        Ok(step)
    }

    /// Applies a patch to a step.
    pub async fn update_step(
        &self,
        actor: &Actor,
        step_id: StepId,
        patch: StepPatch,
    ) -> Result<Step, ApiError> {
        let mut step = self.find_step(step_id).await?;
        self.ensure_can_edit(actor, &step).await?;

        apply_patch(&mut step, patch)?;

        self.repo().update(&step).await?;
        Ok(step)
    }

    /// Deletes a step and its comments.
    pub async fn delete_step(&self, actor: &Actor, step_id: StepId) -> Result<(), ApiError> {
        let step = self.find_step(step_id).await?;
        self.ensure_can_edit(actor, &step).await?;
        self.repo().delete(step_id).await?;
        Ok(())
    }

    async fn ensure_can_edit(&self, actor: &Actor, step: &Step) -> Result<(), ApiError> {
        if !actor.is_active {
            return Err(ApiError::Denied(AuthorityError::ActorInactive {
                user_id: actor.id,
            }));
        }

        let membership = self.trips().find_membership(step.trip_id(), actor.id).await?;

        // The author edits their own steps without needing the trip-wide
        // Update permission.
        if membership.as_ref().is_some_and(|m| m.id == step.author()) {
            return Ok(());
        }

        decide::trip_action(actor, step.trip_id(), membership.as_ref(), TripAction::Update)?;
        Ok(())
    }
}

fn apply_patch(step: &mut Step, patch: StepPatch) -> Result<(), ApiError> {
    if let Some(title) = patch.title {
        step.set_title(title)?;
    }
    if let Some(description) = patch.description {
        step.set_description(description);
    }
    if let Some(location) = patch.location {
        step.set_location(location);
    }
    if let Some((starts_at, ends_at)) = patch.schedule {
        step.set_schedule(starts_at, ends_at)?;
    }
    Ok(())
}
