//! Service layer: resolves rows, asks the authority, applies writes.
//!
//! Every mutation follows the same shape: load the rows the decision needs,
//! call the pure decision function, and only then touch storage. Services
//! never re-implement policy; a denial from the authority propagates as-is.

pub mod comment;
pub mod friendship;
pub mod step;
pub mod trip;
pub mod user;

pub use comment::CommentService;
pub use friendship::FriendshipService;
pub use step::StepService;
pub use trip::TripService;
pub use user::UserService;

use crate::db::{FriendshipRepository, TripRepository};
use crate::error::ApiError;
use sqlx::PgPool;
use waypost_authority::{Actor, visibility};
use waypost_trips::Trip;

/// Maps a unique-constraint violation to Conflict, everything else to a
/// storage fault. Used on inserts that race against the unordered-pair and
/// membership indexes.
pub(crate) fn map_insert_err(err: sqlx::Error, conflict: &str) -> ApiError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::Conflict {
            details: conflict.to_string(),
        },
        _ => ApiError::Database(err),
    }
}

/// Resolves the rows a trip read-access decision needs and asks the
/// authority. Shared by trip, step, and comment reads.
pub(crate) async fn ensure_trip_viewable(
    pool: &PgPool,
    actor: &Actor,
    trip: &Trip,
) -> Result<(), ApiError> {
    let trip_repo = TripRepository::new(pool.clone());
    let creator = trip_repo
        .find_creator(trip.id())
        .await?
        .ok_or(ApiError::NotFound { resource: "trip" })?;

    let membership = trip_repo.find_membership(trip.id(), actor.id).await?;
    let friendship = FriendshipRepository::new(pool.clone())
        .find_between(actor.id, creator.user_id)
        .await?;

    visibility::can_view_trip(
        actor,
        trip.id(),
        trip.visibility(),
        creator.user_id,
        membership.as_ref(),
        friendship.as_ref(),
    )?;

    Ok(())
}
