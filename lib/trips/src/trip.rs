//! Trip domain type.

use crate::error::TripValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waypost_authority::Visibility;
use waypost_core::TripId;

/// A trip: a named collection of itinerary steps.
///
/// The creating user's membership (role `Creator`) is inserted atomically
/// with the trip row; the trip itself does not reference users directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Unique identifier.
    id: TripId,
    /// Display name.
    name: String,
    /// Free-form description.
    description: Option<String>,
    /// Who may read this trip.
    visibility: Visibility,
    /// When the trip was created.
    created_at: DateTime<Utc>,
    /// When the trip was last updated.
    updated_at: DateTime<Utc>,
}

impl Trip {
    /// Creates a new trip.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty or whitespace.
    pub fn new(name: String, visibility: Visibility) -> Result<Self, TripValidationError> {
        if name.trim().is_empty() {
            return Err(TripValidationError::EmptyTripName);
        }
        let now = Utc::now();
        Ok(Self {
            id: TripId::new(),
            name,
            description: None,
            visibility,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a trip with all fields specified.
    ///
    /// Use this when reconstituting a trip from storage.
    #[must_use]
    pub fn with_all_fields(
        id: TripId,
        name: String,
        description: Option<String>,
        visibility: Visibility,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            visibility,
            created_at,
            updated_at,
        }
    }

    /// Returns the trip's ID.
    #[must_use]
    pub fn id(&self) -> TripId {
        self.id
    }

    /// Returns the trip's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the trip's description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns who may read this trip.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Returns when the trip was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the trip was last updated.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the trip.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty or whitespace.
    pub fn set_name(&mut self, name: String) -> Result<(), TripValidationError> {
        if name.trim().is_empty() {
            return Err(TripValidationError::EmptyTripName);
        }
        self.name = name;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Sets the trip's description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    /// Sets who may read this trip.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trip_has_generated_id() {
        let trip = Trip::new("Summer in Kyoto".to_string(), Visibility::Public).expect("valid");
        assert!(trip.id().to_string().starts_with("trip_"));
        assert_eq!(trip.name(), "Summer in Kyoto");
        assert!(trip.description().is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            Trip::new("   ".to_string(), Visibility::Public).unwrap_err(),
            TripValidationError::EmptyTripName
        );
    }

    #[test]
    fn rename_validates_and_bumps_timestamp() {
        let mut trip = Trip::new("Draft".to_string(), Visibility::Private).expect("valid");
        let before = trip.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(1));
        trip.set_name("Alps 2026".to_string()).expect("valid name");

        assert_eq!(trip.name(), "Alps 2026");
        assert!(trip.updated_at() > before);
        assert!(trip.set_name(String::new()).is_err());
    }

    #[test]
    fn trip_serialization_roundtrip() {
        let trip = Trip::new("Roadtrip".to_string(), Visibility::FriendsOnly).expect("valid");
        let json = serde_json::to_string(&trip).expect("serialize");
        let parsed: Trip = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(trip, parsed);
    }
}
