//! Error types for authority decisions.
//!
//! Every denial classifies into one of four terminal categories
//! ([`DenialKind`]) that the HTTP boundary maps onto response statuses:
//! - `NotFound`: the referenced row is absent
//! - `Forbidden`: the caller is authenticated but lacks rights
//! - `Conflict`: the state already satisfies or contradicts the request
//! - `InvalidState`: self-referential operations (self-friend, self-block,
//!   changing one's own trip role)

use crate::role::TripRole;
use crate::trip::TripAction;
use std::fmt;
use waypost_core::{FriendshipId, TripId, UserId};

/// Terminal denial categories for authority errors.
///
/// All denials are synchronous and non-retryable; the authority performs no
/// I/O, so there is no transient-failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    /// Referenced row absent.
    NotFound,
    /// Caller authenticated but lacking rights.
    Forbidden,
    /// State already matches or contradicts the requested transition.
    Conflict,
    /// Self-referential operation.
    InvalidState,
}

/// A denied authority decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    /// No friendship edge exists for the pair.
    FriendshipNotFound { user_id: UserId, other: UserId },
    /// No block by the acting user exists against the target.
    NoBlockToLift { target: UserId },
    /// The acting user is deactivated.
    ActorInactive { user_id: UserId },
    /// The acting user is not the recipient of the friend request.
    NotRequestRecipient { friendship_id: FriendshipId },
    /// The acting user is neither party of the friendship edge.
    NotFriendshipParty { friendship_id: FriendshipId },
    /// The acting user has no membership in the trip.
    NotTripMember { trip_id: TripId },
    /// The acting user's trip role does not allow the action.
    InsufficientTripRole {
        trip_id: TripId,
        action: TripAction,
        role: TripRole,
    },
    /// The target profile is not visible to the acting user.
    ProfileHidden { owner: UserId },
    /// The target trip is not visible to the acting user.
    TripHidden { trip_id: TripId },
    /// The acting user is not the author of the comment.
    NotCommentAuthor,
    /// The pair is already accepted friends.
    AlreadyFriends { other: UserId },
    /// A pending request already exists for the pair (either direction).
    RequestAlreadySent { other: UserId },
    /// The pair is blocked; no new relationship may be created.
    PairBlocked { other: UserId },
    /// The pair is already blocked.
    AlreadyBlocked { other: UserId },
    /// The request is not pending, so it cannot be accepted or rejected.
    RequestNotPending { friendship_id: FriendshipId },
    /// A user may not send a friend request to themselves.
    SelfFriendship,
    /// A user may not block themselves.
    SelfBlock,
    /// A member may not change their own trip role.
    SelfRoleChange { trip_id: TripId },
}

impl AuthorityError {
    /// Returns the terminal category this denial belongs to.
    #[must_use]
    pub fn kind(&self) -> DenialKind {
        match self {
            Self::FriendshipNotFound { .. } | Self::NoBlockToLift { .. } => DenialKind::NotFound,
            Self::ActorInactive { .. }
            | Self::NotRequestRecipient { .. }
            | Self::NotFriendshipParty { .. }
            | Self::NotTripMember { .. }
            | Self::InsufficientTripRole { .. }
            | Self::ProfileHidden { .. }
            | Self::TripHidden { .. }
            | Self::NotCommentAuthor => DenialKind::Forbidden,
            Self::AlreadyFriends { .. }
            | Self::RequestAlreadySent { .. }
            | Self::PairBlocked { .. }
            | Self::AlreadyBlocked { .. }
            | Self::RequestNotPending { .. } => DenialKind::Conflict,
            Self::SelfFriendship | Self::SelfBlock | Self::SelfRoleChange { .. } => {
                DenialKind::InvalidState
            }
        }
    }
}

impl fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FriendshipNotFound { user_id, other } => {
                write!(f, "no friendship between {user_id} and {other}")
            }
            Self::NoBlockToLift { target } => {
                write!(f, "no block against {target} by the acting user")
            }
            Self::ActorInactive { user_id } => {
                write!(f, "user {user_id} is deactivated")
            }
            Self::NotRequestRecipient { friendship_id } => {
                write!(
                    f,
                    "acting user is not the recipient of request {friendship_id}"
                )
            }
            Self::NotFriendshipParty { friendship_id } => {
                write!(f, "acting user is not a party of friendship {friendship_id}")
            }
            Self::NotTripMember { trip_id } => {
                write!(f, "not a member of trip {trip_id}")
            }
            Self::InsufficientTripRole {
                trip_id,
                action,
                role,
            } => {
                write!(
                    f,
                    "role {role} has no permission to {action} trip {trip_id}"
                )
            }
            Self::ProfileHidden { owner } => {
                write!(f, "profile of {owner} is not visible to the acting user")
            }
            Self::TripHidden { trip_id } => {
                write!(f, "trip {trip_id} is not visible to the acting user")
            }
            Self::NotCommentAuthor => {
                write!(f, "acting user is not the author of the comment")
            }
            Self::AlreadyFriends { other } => {
                write!(f, "already friends with {other}")
            }
            Self::RequestAlreadySent { other } => {
                write!(f, "friend request already sent to or from {other}")
            }
            Self::PairBlocked { other } => {
                write!(f, "relationship with {other} is blocked")
            }
            Self::AlreadyBlocked { other } => {
                write!(f, "user {other} is already blocked")
            }
            Self::RequestNotPending { friendship_id } => {
                write!(f, "friendship {friendship_id} is not a pending request")
            }
            Self::SelfFriendship => write!(f, "cannot send a friend request to yourself"),
            Self::SelfBlock => write!(f, "cannot block yourself"),
            Self::SelfRoleChange { trip_id } => {
                write!(f, "cannot change your own role in trip {trip_id}")
            }
        }
    }
}

impl std::error::Error for AuthorityError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_classify_as_not_found() {
        let a = UserId::new();
        let b = UserId::new();
        assert_eq!(
            AuthorityError::FriendshipNotFound { user_id: a, other: b }.kind(),
            DenialKind::NotFound
        );
        assert_eq!(
            AuthorityError::NoBlockToLift { target: b }.kind(),
            DenialKind::NotFound
        );
    }

    #[test]
    fn permission_variants_classify_as_forbidden() {
        let trip_id = TripId::new();
        assert_eq!(
            AuthorityError::NotTripMember { trip_id }.kind(),
            DenialKind::Forbidden
        );
        assert_eq!(
            AuthorityError::InsufficientTripRole {
                trip_id,
                action: TripAction::Delete,
                role: TripRole::Admin,
            }
            .kind(),
            DenialKind::Forbidden
        );
        assert_eq!(
            AuthorityError::NotRequestRecipient {
                friendship_id: FriendshipId::new()
            }
            .kind(),
            DenialKind::Forbidden
        );
    }

    #[test]
    fn duplicate_variants_classify_as_conflict() {
        let other = UserId::new();
        assert_eq!(
            AuthorityError::AlreadyFriends { other }.kind(),
            DenialKind::Conflict
        );
        assert_eq!(
            AuthorityError::RequestAlreadySent { other }.kind(),
            DenialKind::Conflict
        );
        assert_eq!(
            AuthorityError::AlreadyBlocked { other }.kind(),
            DenialKind::Conflict
        );
    }

    #[test]
    fn self_referential_variants_classify_as_invalid_state() {
        assert_eq!(
            AuthorityError::SelfFriendship.kind(),
            DenialKind::InvalidState
        );
        assert_eq!(AuthorityError::SelfBlock.kind(), DenialKind::InvalidState);
        assert_eq!(
            AuthorityError::SelfRoleChange {
                trip_id: TripId::new()
            }
            .kind(),
            DenialKind::InvalidState
        );
    }

    #[test]
    fn insufficient_role_display_names_the_action() {
        let err = AuthorityError::InsufficientTripRole {
            trip_id: TripId::new(),
            action: TripAction::Delete,
            role: TripRole::Admin,
        };
        assert!(err.to_string().contains("no permission to delete"));
    }

    #[test]
    fn not_a_member_display() {
        let trip_id = TripId::new();
        let err = AuthorityError::NotTripMember { trip_id };
        assert!(err.to_string().contains("not a member of trip"));
        assert!(err.to_string().contains(&trip_id.to_string()));
    }
}
