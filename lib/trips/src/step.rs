//! Itinerary step domain type.

use crate::error::TripValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waypost_core::{StepId, TripId, TripMemberId};

/// One itinerary step within a trip.
///
/// Steps are authored by a trip membership, not directly by a user: when a
/// member leaves a trip their authored steps stay attached to the
/// membership record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Unique identifier.
    id: StepId,
    /// The trip this step belongs to.
    trip_id: TripId,
    /// The membership that authored the step.
    author: TripMemberId,
    /// Short title.
    title: String,
    /// Free-form description.
    description: Option<String>,
    /// Location name or address.
    location: Option<String>,
    /// When the step starts.
    starts_at: Option<DateTime<Utc>>,
    /// When the step ends. Never before `starts_at`.
    ends_at: Option<DateTime<Utc>>,
    /// When the step was created.
    created_at: DateTime<Utc>,
    /// When the step was last updated.
    updated_at: DateTime<Utc>,
}

impl Step {
    /// Creates a new step.
    ///
    /// # Errors
    ///
    /// Fails if the title is empty or whitespace.
    pub fn new(
        trip_id: TripId,
        author: TripMemberId,
        title: String,
    ) -> Result<Self, TripValidationError> {
        if title.trim().is_empty() {
            return Err(TripValidationError::EmptyStepTitle);
        }
        let now = Utc::now();
        Ok(Self {
            id: StepId::new(),
            trip_id,
            author,
            title,
            description: None,
            location: None,
            starts_at: None,
            ends_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a step with all fields specified.
    ///
    /// Use this when reconstituting a step from storage.
    #[must_use]
    #[expect(clippy::too_many_arguments)]
    pub fn with_all_fields(
        id: StepId,
        trip_id: TripId,
        author: TripMemberId,
        title: String,
        description: Option<String>,
        location: Option<String>,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            trip_id,
            author,
            title,
            description,
            location,
            starts_at,
            ends_at,
            created_at,
            updated_at,
        }
    }

    /// Returns the step's ID.
    #[must_use]
    pub fn id(&self) -> StepId {
        self.id
    }

    /// Returns the trip this step belongs to.
    #[must_use]
    pub fn trip_id(&self) -> TripId {
        self.trip_id
    }

    /// Returns the membership that authored the step.
    #[must_use]
    pub fn author(&self) -> TripMemberId {
        self.author
    }

    /// Returns the step's title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the step's description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the step's location, if set.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns when the step starts, if scheduled.
    #[must_use]
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.starts_at
    }

    /// Returns when the step ends, if scheduled.
    #[must_use]
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.ends_at
    }

    /// Returns when the step was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the step was last updated.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Retitles the step.
    ///
    /// # Errors
    ///
    /// Fails if the title is empty or whitespace.
    pub fn set_title(&mut self, title: String) -> Result<(), TripValidationError> {
        if title.trim().is_empty() {
            return Err(TripValidationError::EmptyStepTitle);
        }
        self.title = title;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Sets the step's description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    /// Sets the step's location.
    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location;
        self.updated_at = Utc::now();
    }

    /// Sets the step's schedule.
    ///
    /// # Errors
    ///
    /// Fails if both ends are set and the end is before the start.
    pub fn set_schedule(
        &mut self,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> Result<(), TripValidationError> {
        if let (Some(start), Some(end)) = (starts_at, ends_at)
            && end < start
        {
            return Err(TripValidationError::InvalidTimeRange);
        }
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_step() -> Step {
        Step::new(
            TripId::new(),
            TripMemberId::new(),
            "Check in at the ryokan".to_string(),
        )
        .expect("valid")
    }

    #[test]
    fn new_step_has_generated_id() {
        let step = test_step();
        assert!(step.id().to_string().starts_with("step_"));
        assert!(step.starts_at().is_none());
    }

    #[test]
    fn empty_title_is_rejected() {
        let result = Step::new(TripId::new(), TripMemberId::new(), " ".to_string());
        assert_eq!(result.unwrap_err(), TripValidationError::EmptyStepTitle);
    }

    #[test]
    fn schedule_rejects_inverted_range() {
        let mut step = test_step();
        let start = Utc::now();
        let end = start - Duration::hours(2);

        assert_eq!(
            step.set_schedule(Some(start), Some(end)).unwrap_err(),
            TripValidationError::InvalidTimeRange
        );
    }

    #[test]
    fn schedule_accepts_open_ended_range() {
        let mut step = test_step();
        step.set_schedule(Some(Utc::now()), None).expect("valid");
        assert!(step.starts_at().is_some());
        assert!(step.ends_at().is_none());
    }

    #[test]
    fn step_serialization_roundtrip() {
        let step = test_step();
        let json = serde_json::to_string(&step).expect("serialize");
        let parsed: Step = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(step, parsed);
    }
}
