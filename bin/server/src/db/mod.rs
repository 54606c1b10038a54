//! Database repositories for the trip-planning domain.
//!
//! Each repository owns a pool handle and converts rows through `FromRow`
//! structs into domain types. Repositories do no authorization; the service
//! layer resolves rows here and passes them to the authority.

pub mod comment;
pub mod friendship;
pub mod step;
pub mod trip;

pub use comment::CommentRepository;
pub use friendship::FriendshipRepository;
pub use step::StepRepository;
pub use trip::TripRepository;
