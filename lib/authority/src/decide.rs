//! Pure decision functions for relationship and trip operations.
//!
//! Callers resolve the relevant rows first (the friendship edge for the
//! unordered pair, the actor's trip membership) and pass them in; no
//! function here searches a collection or touches storage. A returned
//! [`AuthorityError`] is terminal and classifies into not-found, forbidden,
//! conflict, or invalid-state via [`AuthorityError::kind`].

use crate::error::AuthorityError;
use crate::friendship::{BlockAction, Friendship, FriendshipStatus};
use crate::role::Actor;
use crate::trip::{TripAction, TripMembership};
use waypost_core::{FriendshipId, TripId, UserId};

fn require_active(actor: &Actor) -> Result<(), AuthorityError> {
    if actor.is_active {
        Ok(())
    } else {
        Err(AuthorityError::ActorInactive { user_id: actor.id })
    }
}

/// Decides whether `actor` may send a friend request to `target`.
///
/// `existing` is the edge for the unordered pair `(actor, target)`, in
/// either direction, if one exists. Any existing edge is a conflict; the
/// variant names which state blocked the request.
pub fn request_friend(
    actor: &Actor,
    target: UserId,
    existing: Option<&Friendship>,
) -> Result<(), AuthorityError> {
    require_active(actor)?;

    if actor.id == target {
        return Err(AuthorityError::SelfFriendship);
    }

    match existing.map(|f| f.status) {
        None => Ok(()),
        Some(FriendshipStatus::Accepted) => Err(AuthorityError::AlreadyFriends { other: target }),
        Some(FriendshipStatus::Pending) => {
            Err(AuthorityError::RequestAlreadySent { other: target })
        }
        Some(FriendshipStatus::Blocked) => Err(AuthorityError::PairBlocked { other: target }),
    }
}

/// Decides whether `actor` may accept the pending request `friendship`.
///
/// Only the recipient of the request may accept it, and only while it is
/// still pending.
pub fn accept_request(actor: &Actor, friendship: &Friendship) -> Result<(), AuthorityError> {
    require_active(actor)?;

    if friendship.status != FriendshipStatus::Pending {
        return Err(AuthorityError::RequestNotPending {
            friendship_id: friendship.id,
        });
    }
    if friendship.recipient != actor.id {
        return Err(AuthorityError::NotRequestRecipient {
            friendship_id: friendship.id,
        });
    }
    Ok(())
}

/// Decides whether `actor` may reject the pending request `friendship`.
///
/// Same rules as [`accept_request`]; on success the caller deletes the edge.
pub fn reject_request(actor: &Actor, friendship: &Friendship) -> Result<(), AuthorityError> {
    accept_request(actor, friendship)
}

/// Decides whether `actor` may remove the friendship edge `friendship`.
///
/// The actor must be one of the two parties. A blocked edge cannot be
/// removed this way; only the blocker may dissolve it, via
/// [`unblock_user`].
pub fn remove_friend(actor: &Actor, friendship: &Friendship) -> Result<(), AuthorityError> {
    require_active(actor)?;

    if !friendship.involves(actor.id) {
        return Err(AuthorityError::NotFriendshipParty {
            friendship_id: friendship.id,
        });
    }
    if friendship.status == FriendshipStatus::Blocked {
        let other = friendship
            .other_party(actor.id)
            .unwrap_or(friendship.recipient);
        return Err(AuthorityError::PairBlocked { other });
    }
    Ok(())
}

/// Decides how `actor` blocking `target` should be applied.
///
/// If an edge already exists for the pair it is flipped to blocked (unless
/// it already is, which is a conflict); otherwise a new edge is created
/// directly in the blocked state.
pub fn block_user(
    actor: &Actor,
    target: UserId,
    existing: Option<&Friendship>,
) -> Result<BlockAction, AuthorityError> {
    require_active(actor)?;

    if actor.id == target {
        return Err(AuthorityError::SelfBlock);
    }

    match existing {
        Some(f) if f.status == FriendshipStatus::Blocked => {
            Err(AuthorityError::AlreadyBlocked { other: target })
        }
        Some(f) => Ok(BlockAction::FlagExisting(f.id)),
        None => Ok(BlockAction::CreateBlocked),
    }
}

/// Decides whether `actor` may lift their block against `target`.
///
/// Succeeds only when a blocked edge exists for the pair and `actor` is the
/// one who blocked; anything else reads as not-found, so a blocked user
/// cannot probe for the edge's existence.
pub fn unblock_user(
    actor: &Actor,
    target: UserId,
    existing: Option<&Friendship>,
) -> Result<FriendshipId, AuthorityError> {
    require_active(actor)?;

    match existing {
        Some(f) if f.status == FriendshipStatus::Blocked && f.blocked_by == Some(actor.id) => {
            Ok(f.id)
        }
        _ => Err(AuthorityError::NoBlockToLift { target }),
    }
}

/// Decides whether `actor` may perform `action` on the trip.
///
/// A platform admin may always act. Otherwise the actor needs a membership
/// whose role is in the action's allow-list: no membership reads as "not a
/// member", a membership with an insufficient role as "no permission".
pub fn trip_action(
    actor: &Actor,
    trip_id: TripId,
    membership: Option<&TripMembership>,
    action: TripAction,
) -> Result<(), AuthorityError> {
    require_active(actor)?;

    if actor.is_admin() {
        return Ok(());
    }

    let membership = membership.ok_or(AuthorityError::NotTripMember { trip_id })?;
    debug_assert_eq!(membership.trip_id, trip_id);
    debug_assert_eq!(membership.user_id, actor.id);

    if action.allowed_roles().contains(&membership.role) {
        Ok(())
    } else {
        Err(AuthorityError::InsufficientTripRole {
            trip_id,
            action,
            role: membership.role,
        })
    }
}

/// Decides whether `actor` may change `target`'s role within the trip.
///
/// The self-escalation guard comes first: nobody changes their own trip
/// role through this operation, regardless of any role they hold. After
/// that, the ordinary manage-members rule applies.
pub fn change_member_role(
    actor: &Actor,
    actor_membership: Option<&TripMembership>,
    target: &TripMembership,
) -> Result<(), AuthorityError> {
    require_active(actor)?;

    if target.user_id == actor.id {
        return Err(AuthorityError::SelfRoleChange {
            trip_id: target.trip_id,
        });
    }

    trip_action(
        actor,
        target.trip_id,
        actor_membership,
        TripAction::ManageMembers,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DenialKind;
    use crate::role::{GlobalRole, TripRole};

    fn user() -> Actor {
        Actor::new(UserId::new(), GlobalRole::User)
    }

    fn platform_admin() -> Actor {
        Actor::new(UserId::new(), GlobalRole::Admin)
    }

    // --- request_friend ---

    #[test]
    fn first_request_between_pair_is_allowed() {
        let alice = user();
        let bob = UserId::new();
        assert!(request_friend(&alice, bob, None).is_ok());
    }

    #[test]
    fn duplicate_request_conflicts_in_both_directions() {
        let alice = user();
        let bob = user();
        let pending = Friendship::new_request(alice.id, bob.id);

        // Same direction again.
        let err = request_friend(&alice, bob.id, Some(&pending)).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Conflict);

        // Reverse direction sees the same edge.
        let err = request_friend(&bob, alice.id, Some(&pending)).unwrap_err();
        assert_eq!(err, AuthorityError::RequestAlreadySent { other: alice.id });
    }

    #[test]
    fn request_against_accepted_edge_reports_already_friends() {
        let alice = user();
        let bob = UserId::new();
        let mut edge = Friendship::new_request(alice.id, bob);
        edge.accept();

        let err = request_friend(&alice, bob, Some(&edge)).unwrap_err();
        assert_eq!(err, AuthorityError::AlreadyFriends { other: bob });
        assert_eq!(err.kind(), DenialKind::Conflict);
    }

    #[test]
    fn request_against_blocked_edge_reports_blocked() {
        let alice = user();
        let bob = UserId::new();
        let edge = Friendship::new_block(bob, alice.id);

        let err = request_friend(&alice, bob, Some(&edge)).unwrap_err();
        assert_eq!(err, AuthorityError::PairBlocked { other: bob });
    }

    #[test]
    fn self_request_is_invalid_state() {
        let alice = user();
        let err = request_friend(&alice, alice.id, None).unwrap_err();
        assert_eq!(err.kind(), DenialKind::InvalidState);
    }

    #[test]
    fn inactive_actor_cannot_request() {
        let alice = user().deactivated();
        let err = request_friend(&alice, UserId::new(), None).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Forbidden);
    }

    // --- accept / reject ---

    #[test]
    fn recipient_may_accept_pending_request() {
        let alice = user();
        let bob = user();
        let pending = Friendship::new_request(alice.id, bob.id);

        assert!(accept_request(&bob, &pending).is_ok());
    }

    #[test]
    fn requester_may_not_accept_their_own_request() {
        let alice = user();
        let bob = UserId::new();
        let pending = Friendship::new_request(alice.id, bob);

        let err = accept_request(&alice, &pending).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Forbidden);
    }

    #[test]
    fn third_party_may_not_accept() {
        let alice = user();
        let bob = UserId::new();
        let mallory = user();
        let pending = Friendship::new_request(alice.id, bob);

        let err = accept_request(&mallory, &pending).unwrap_err();
        assert_eq!(
            err,
            AuthorityError::NotRequestRecipient {
                friendship_id: pending.id
            }
        );
    }

    #[test]
    fn accepted_edge_cannot_be_accepted_again() {
        let alice = user();
        let bob = user();
        let mut edge = Friendship::new_request(alice.id, bob.id);
        edge.accept();

        let err = accept_request(&bob, &edge).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Conflict);
    }

    #[test]
    fn reject_mirrors_accept_rules() {
        let alice = user();
        let bob = user();
        let pending = Friendship::new_request(alice.id, bob.id);

        assert!(reject_request(&bob, &pending).is_ok());
        assert!(reject_request(&alice, &pending).is_err());
    }

    // --- remove_friend ---

    #[test]
    fn either_party_may_remove_an_accepted_friendship() {
        let alice = user();
        let bob = user();
        let mut edge = Friendship::new_request(alice.id, bob.id);
        edge.accept();

        assert!(remove_friend(&alice, &edge).is_ok());
        assert!(remove_friend(&bob, &edge).is_ok());
    }

    #[test]
    fn outsider_may_not_remove_regardless_of_direction() {
        let alice = user();
        let bob = UserId::new();
        let mallory = user();

        let mut forward = Friendship::new_request(alice.id, bob);
        forward.accept();
        let mut reverse = Friendship::new_request(bob, alice.id);
        reverse.accept();

        assert_eq!(
            remove_friend(&mallory, &forward).unwrap_err().kind(),
            DenialKind::Forbidden
        );
        assert_eq!(
            remove_friend(&mallory, &reverse).unwrap_err().kind(),
            DenialKind::Forbidden
        );
    }

    #[test]
    fn blocked_edge_cannot_be_removed_by_the_blocked_party() {
        let alice = user();
        let bob = user();
        let edge = Friendship::new_block(alice.id, bob.id);

        let err = remove_friend(&bob, &edge).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Conflict);
    }

    // --- block / unblock ---

    #[test]
    fn blocking_with_no_edge_creates_blocked_edge() {
        let alice = user();
        let bob = UserId::new();

        let action = block_user(&alice, bob, None).expect("block allowed");
        assert_eq!(action, BlockAction::CreateBlocked);
    }

    #[test]
    fn blocking_an_existing_edge_flags_it() {
        let alice = user();
        let bob = UserId::new();
        let mut edge = Friendship::new_request(alice.id, bob);
        edge.accept();

        let action = block_user(&alice, bob, Some(&edge)).expect("block allowed");
        assert_eq!(action, BlockAction::FlagExisting(edge.id));
    }

    #[test]
    fn double_block_conflicts() {
        let alice = user();
        let bob = UserId::new();
        let edge = Friendship::new_block(alice.id, bob);

        let err = block_user(&alice, bob, Some(&edge)).unwrap_err();
        assert_eq!(err, AuthorityError::AlreadyBlocked { other: bob });
        assert_eq!(err.kind(), DenialKind::Conflict);
    }

    #[test]
    fn self_block_is_invalid_state() {
        let alice = user();
        let err = block_user(&alice, alice.id, None).unwrap_err();
        assert_eq!(err.kind(), DenialKind::InvalidState);
    }

    #[test]
    fn only_the_blocker_may_unblock() {
        let alice = user();
        let bob = user();
        let edge = Friendship::new_block(alice.id, bob.id);

        // The blocked party cannot lift the block.
        let err = unblock_user(&bob, alice.id, Some(&edge)).unwrap_err();
        assert_eq!(err.kind(), DenialKind::NotFound);

        // The blocker can.
        let id = unblock_user(&alice, bob.id, Some(&edge)).expect("unblock allowed");
        assert_eq!(id, edge.id);
    }

    #[test]
    fn unblock_with_no_edge_is_not_found() {
        let alice = user();
        let err = unblock_user(&alice, UserId::new(), None).unwrap_err();
        assert_eq!(err.kind(), DenialKind::NotFound);
    }

    #[test]
    fn unblock_of_non_blocked_edge_is_not_found() {
        let alice = user();
        let bob = UserId::new();
        let edge = Friendship::new_request(alice.id, bob);

        let err = unblock_user(&alice, bob, Some(&edge)).unwrap_err();
        assert_eq!(err, AuthorityError::NoBlockToLift { target: bob });
    }

    // --- trip authorization ---

    fn membership(actor: &Actor, trip_id: TripId, role: TripRole) -> TripMembership {
        TripMembership::new(trip_id, actor.id, role)
    }

    #[test]
    fn trip_admin_may_update_but_not_delete() {
        let actor = user();
        let trip_id = TripId::new();
        let m = membership(&actor, trip_id, TripRole::Admin);

        assert!(trip_action(&actor, trip_id, Some(&m), TripAction::Update).is_ok());

        let err = trip_action(&actor, trip_id, Some(&m), TripAction::Delete).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Forbidden);
        assert_eq!(
            err,
            AuthorityError::InsufficientTripRole {
                trip_id,
                action: TripAction::Delete,
                role: TripRole::Admin,
            }
        );
    }

    #[test]
    fn creator_may_delete() {
        let actor = user();
        let trip_id = TripId::new();
        let m = membership(&actor, trip_id, TripRole::Creator);

        assert!(trip_action(&actor, trip_id, Some(&m), TripAction::Delete).is_ok());
    }

    #[test]
    fn global_admin_may_delete_without_membership() {
        let root = platform_admin();
        assert!(trip_action(&root, TripId::new(), None, TripAction::Delete).is_ok());
    }

    #[test]
    fn non_member_without_global_admin_is_rejected() {
        let actor = user();
        let trip_id = TripId::new();

        let err = trip_action(&actor, trip_id, None, TripAction::Update).unwrap_err();
        assert_eq!(err, AuthorityError::NotTripMember { trip_id });
    }

    #[test]
    fn ordinary_member_may_not_manage_members() {
        let actor = user();
        let trip_id = TripId::new();
        let m = membership(&actor, trip_id, TripRole::Member);

        let err = trip_action(&actor, trip_id, Some(&m), TripAction::ManageMembers).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Forbidden);
    }

    #[test]
    fn inactive_actor_fails_even_with_creator_role() {
        let actor = user().deactivated();
        let trip_id = TripId::new();
        let m = membership(&actor, trip_id, TripRole::Creator);

        let err = trip_action(&actor, trip_id, Some(&m), TripAction::Update).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Forbidden);
    }

    // --- change_member_role ---

    #[test]
    fn creator_cannot_change_their_own_role() {
        let actor = user();
        let trip_id = TripId::new();
        let own = membership(&actor, trip_id, TripRole::Creator);

        let err = change_member_role(&actor, Some(&own), &own).unwrap_err();
        assert_eq!(err, AuthorityError::SelfRoleChange { trip_id });
        assert_eq!(err.kind(), DenialKind::InvalidState);
    }

    #[test]
    fn global_admin_cannot_change_their_own_role_either() {
        let root = platform_admin();
        let trip_id = TripId::new();
        let own = membership(&root, trip_id, TripRole::Member);

        let err = change_member_role(&root, Some(&own), &own).unwrap_err();
        assert_eq!(err.kind(), DenialKind::InvalidState);
    }

    #[test]
    fn creator_may_change_another_members_role() {
        let actor = user();
        let trip_id = TripId::new();
        let own = membership(&actor, trip_id, TripRole::Creator);
        let target = TripMembership::new(trip_id, UserId::new(), TripRole::Member);

        assert!(change_member_role(&actor, Some(&own), &target).is_ok());
    }

    #[test]
    fn ordinary_member_may_not_change_roles() {
        let actor = user();
        let trip_id = TripId::new();
        let own = membership(&actor, trip_id, TripRole::Member);
        let target = TripMembership::new(trip_id, UserId::new(), TripRole::Admin);

        let err = change_member_role(&actor, Some(&own), &target).unwrap_err();
        assert_eq!(err.kind(), DenialKind::Forbidden);
    }
}
