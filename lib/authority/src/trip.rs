//! Trip membership records and the actions they gate.

use crate::role::TripRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use waypost_core::{TripId, TripMemberId, UserId};

/// A mutating action on a trip, each with its own role allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripAction {
    /// Edit the trip's fields or its steps.
    Update,
    /// Delete the trip.
    Delete,
    /// Add, remove, or re-role members.
    ManageMembers,
}

impl TripAction {
    /// Returns the trip roles allowed to perform this action.
    ///
    /// A platform admin bypasses the allow-list entirely; that override
    /// lives in [`decide::trip_action`](crate::decide::trip_action).
    #[must_use]
    pub fn allowed_roles(&self) -> &'static [TripRole] {
        match self {
            Self::Update => &[TripRole::Creator, TripRole::Admin],
            Self::Delete => &[TripRole::Creator],
            Self::ManageMembers => &[TripRole::Creator, TripRole::Admin],
        }
    }
}

impl fmt::Display for TripAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ManageMembers => "manage members of",
        };
        write!(f, "{name}")
    }
}

/// A user's membership in a trip, carrying their trip-scoped role.
///
/// `(user_id, trip_id)` is unique; exactly one membership per trip holds
/// [`TripRole::Creator`], inserted atomically with the trip itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripMembership {
    /// Unique identifier of the membership.
    pub id: TripMemberId,
    /// The trip.
    pub trip_id: TripId,
    /// The member.
    pub user_id: UserId,
    /// The member's role within this trip.
    pub role: TripRole,
    /// When the membership was created.
    pub created_at: DateTime<Utc>,
}

impl TripMembership {
    /// Creates a new membership.
    #[must_use]
    pub fn new(trip_id: TripId, user_id: UserId, role: TripRole) -> Self {
        Self {
            id: TripMemberId::new(),
            trip_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }

    /// Creates the creator membership inserted alongside a new trip.
    #[must_use]
    pub fn creator(trip_id: TripId, user_id: UserId) -> Self {
        Self::new(trip_id, user_id, TripRole::Creator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_allows_creator_and_admin() {
        let allowed = TripAction::Update.allowed_roles();
        assert!(allowed.contains(&TripRole::Creator));
        assert!(allowed.contains(&TripRole::Admin));
        assert!(!allowed.contains(&TripRole::Member));
    }

    #[test]
    fn delete_allows_creator_only() {
        assert_eq!(TripAction::Delete.allowed_roles(), &[TripRole::Creator]);
    }

    #[test]
    fn manage_members_allows_creator_and_admin() {
        let allowed = TripAction::ManageMembers.allowed_roles();
        assert!(allowed.contains(&TripRole::Creator));
        assert!(allowed.contains(&TripRole::Admin));
        assert!(!allowed.contains(&TripRole::Member));
    }

    #[test]
    fn creator_membership_has_creator_role() {
        let membership = TripMembership::creator(TripId::new(), UserId::new());
        assert_eq!(membership.role, TripRole::Creator);
    }

    #[test]
    fn membership_serialization_roundtrip() {
        let membership = TripMembership::new(TripId::new(), UserId::new(), TripRole::Member);
        let json = serde_json::to_string(&membership).expect("serialize");
        let parsed: TripMembership = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(membership, parsed);
    }
}
