//! Trip, step, and comment domain types for waypost.
//!
//! A trip is a named collection of itinerary steps with a visibility
//! setting. Steps are authored by trip members (not directly by users);
//! comments attach to steps. Who may read or mutate any of these is decided
//! by the authority crate, not here.

pub mod comment;
pub mod error;
pub mod step;
pub mod trip;

pub use comment::Comment;
pub use error::TripValidationError;
pub use step::Step;
pub use trip::Trip;
