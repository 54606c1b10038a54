//! Validation errors for trip domain types.

use std::fmt;

/// Errors from constructing or mutating trip domain types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripValidationError {
    /// Trip name is empty or whitespace.
    EmptyTripName,
    /// Step title is empty or whitespace.
    EmptyStepTitle,
    /// Comment body is empty or whitespace.
    EmptyCommentBody,
    /// Step end time is before its start time.
    InvalidTimeRange,
}

impl fmt::Display for TripValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTripName => write!(f, "trip name must not be empty"),
            Self::EmptyStepTitle => write!(f, "step title must not be empty"),
            Self::EmptyCommentBody => write!(f, "comment body must not be empty"),
            Self::InvalidTimeRange => write!(f, "step end time is before its start time"),
        }
    }
}

impl std::error::Error for TripValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert!(
            TripValidationError::EmptyTripName
                .to_string()
                .contains("trip name")
        );
        assert!(
            TripValidationError::InvalidTimeRange
                .to_string()
                .contains("end time")
        );
    }
}
