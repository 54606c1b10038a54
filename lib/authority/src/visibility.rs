//! Read-access rules for profiles and trips.
//!
//! `Public` targets are readable by anyone. `Private` and `FriendsOnly`
//! targets are readable by the owner, a platform admin, or a user with an
//! accepted friendship with the owner, resolved by the same unordered-pair
//! lookup the state machine uses. Denials are Forbidden, not NotFound: the
//! row exists, the caller lacks rights.

use crate::error::AuthorityError;
use crate::friendship::{Friendship, FriendshipStatus};
use crate::role::{Actor, Visibility};
use crate::trip::TripMembership;
use waypost_core::{TripId, UserId};

fn accepted_friends(a: UserId, b: UserId, friendship: Option<&Friendship>) -> bool {
    friendship.is_some_and(|f| f.status == FriendshipStatus::Accepted && f.is_between(a, b))
}

/// Decides whether `actor` may read the profile of `owner`.
///
/// `friendship` is the edge between actor and owner, if one exists.
pub fn can_view_profile(
    actor: &Actor,
    owner: UserId,
    visibility: Visibility,
    friendship: Option<&Friendship>,
) -> Result<(), AuthorityError> {
    if !actor.is_active {
        return Err(AuthorityError::ActorInactive { user_id: actor.id });
    }
    if actor.id == owner || actor.is_admin() {
        return Ok(());
    }
    match visibility {
        Visibility::Public => Ok(()),
        Visibility::Private | Visibility::FriendsOnly => {
            if accepted_friends(actor.id, owner, friendship) {
                Ok(())
            } else {
                Err(AuthorityError::ProfileHidden { owner })
            }
        }
    }
}

/// Decides whether `actor` may read the trip.
///
/// `creator` is the user holding the trip's creator membership;
/// `friendship` is the edge between actor and creator, if any; and
/// `membership` is the actor's own membership in the trip, if any. Any
/// member may read the trip regardless of visibility.
pub fn can_view_trip(
    actor: &Actor,
    trip_id: TripId,
    visibility: Visibility,
    creator: UserId,
    membership: Option<&TripMembership>,
    friendship: Option<&Friendship>,
) -> Result<(), AuthorityError> {
    if !actor.is_active {
        return Err(AuthorityError::ActorInactive { user_id: actor.id });
    }
    if actor.id == creator || actor.is_admin() || membership.is_some() {
        return Ok(());
    }
    match visibility {
        Visibility::Public => Ok(()),
        Visibility::Private | Visibility::FriendsOnly => {
            if accepted_friends(actor.id, creator, friendship) {
                Ok(())
            } else {
                Err(AuthorityError::TripHidden { trip_id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DenialKind;
    use crate::role::{GlobalRole, TripRole};

    fn user() -> Actor {
        Actor::new(UserId::new(), GlobalRole::User)
    }

    fn accepted_edge(a: UserId, b: UserId) -> Friendship {
        let mut edge = Friendship::new_request(a, b);
        edge.accept();
        edge
    }

    #[test]
    fn public_profile_readable_by_anyone() {
        let viewer = user();
        let owner = UserId::new();
        assert!(can_view_profile(&viewer, owner, Visibility::Public, None).is_ok());
    }

    #[test]
    fn private_profile_readable_by_owner() {
        let owner = user();
        assert!(can_view_profile(&owner, owner.id, Visibility::Private, None).is_ok());
    }

    #[test]
    fn private_profile_readable_by_platform_admin() {
        let root = Actor::new(UserId::new(), GlobalRole::Admin);
        let owner = UserId::new();
        assert!(can_view_profile(&root, owner, Visibility::Private, None).is_ok());
    }

    #[test]
    fn private_profile_readable_by_accepted_friend() {
        let viewer = user();
        let owner = UserId::new();
        let edge = accepted_edge(owner, viewer.id);

        assert!(can_view_profile(&viewer, owner, Visibility::Private, Some(&edge)).is_ok());
    }

    #[test]
    fn private_profile_hidden_from_stranger() {
        let viewer = user();
        let owner = UserId::new();

        let err = can_view_profile(&viewer, owner, Visibility::Private, None).unwrap_err();
        assert_eq!(err, AuthorityError::ProfileHidden { owner });
        assert_eq!(err.kind(), DenialKind::Forbidden);
    }

    #[test]
    fn pending_friendship_does_not_grant_profile_access() {
        let viewer = user();
        let owner = UserId::new();
        let pending = Friendship::new_request(viewer.id, owner);

        let err =
            can_view_profile(&viewer, owner, Visibility::FriendsOnly, Some(&pending)).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Forbidden);
    }

    #[test]
    fn friends_only_trip_readable_by_creators_friend() {
        let viewer = user();
        let creator = UserId::new();
        let trip_id = TripId::new();
        let edge = accepted_edge(viewer.id, creator);

        assert!(
            can_view_trip(
                &viewer,
                trip_id,
                Visibility::FriendsOnly,
                creator,
                None,
                Some(&edge)
            )
            .is_ok()
        );
    }

    #[test]
    fn friends_only_trip_hidden_from_stranger() {
        let viewer = user();
        let trip_id = TripId::new();

        let err = can_view_trip(
            &viewer,
            trip_id,
            Visibility::FriendsOnly,
            UserId::new(),
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err, AuthorityError::TripHidden { trip_id });
    }

    #[test]
    fn private_trip_readable_by_its_members() {
        let viewer = user();
        let creator = UserId::new();
        let trip_id = TripId::new();
        let membership = TripMembership::new(trip_id, viewer.id, TripRole::Member);

        assert!(
            can_view_trip(
                &viewer,
                trip_id,
                Visibility::Private,
                creator,
                Some(&membership),
                None
            )
            .is_ok()
        );
    }

    #[test]
    fn inactive_viewer_is_denied_everywhere() {
        let viewer = user().deactivated();
        let err = can_view_profile(&viewer, UserId::new(), Visibility::Public, None).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Forbidden);
    }
}
