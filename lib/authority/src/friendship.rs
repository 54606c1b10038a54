//! The friendship edge record and its status vocabulary.
//!
//! A friendship is a directed edge `requester -> recipient` with a status.
//! At most one edge exists per unordered pair at a time; lookups treat both
//! directions as the same relationship. Rejection deletes the edge rather
//! than recording a status, so no `Rejected` value exists here.

use crate::role::ParseEnumError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use waypost_core::{FriendshipId, UserId};

/// Status of a friendship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    /// Request sent, awaiting the recipient's decision.
    Pending,
    /// Both parties are friends.
    Accepted,
    /// One party blocked the other; recorded in `blocked_by`.
    Blocked,
}

impl FriendshipStatus {
    /// Returns the storage name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FriendshipStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "blocked" => Ok(Self::Blocked),
            other => Err(ParseEnumError {
                enum_type: "FriendshipStatus",
                value: other.to_string(),
            }),
        }
    }
}

/// A friendship edge between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friendship {
    /// Unique identifier of the edge.
    pub id: FriendshipId,
    /// The user who initiated the relationship (sent the request, or
    /// created the block when no prior edge existed).
    pub requester: UserId,
    /// The other party.
    pub recipient: UserId,
    /// Current status of the edge.
    pub status: FriendshipStatus,
    /// The user who blocked, when `status` is `Blocked`.
    pub blocked_by: Option<UserId>,
    /// When the edge was created.
    pub created_at: DateTime<Utc>,
    /// When the edge was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// Creates a new pending request from `requester` to `recipient`.
    #[must_use]
    pub fn new_request(requester: UserId, recipient: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: FriendshipId::new(),
            requester,
            recipient,
            status: FriendshipStatus::Pending,
            blocked_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an edge directly in the blocked state, for blocking a user
    /// with whom no relationship exists.
    #[must_use]
    pub fn new_block(blocker: UserId, target: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: FriendshipId::new(),
            requester: blocker,
            recipient: target,
            status: FriendshipStatus::Blocked,
            blocked_by: Some(blocker),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the user is one of the two parties.
    #[must_use]
    pub fn involves(&self, user_id: UserId) -> bool {
        self.requester == user_id || self.recipient == user_id
    }

    /// Returns the other party of the edge, if the user is a party at all.
    #[must_use]
    pub fn other_party(&self, user_id: UserId) -> Option<UserId> {
        if self.requester == user_id {
            Some(self.recipient)
        } else if self.recipient == user_id {
            Some(self.requester)
        } else {
            None
        }
    }

    /// Returns true if the edge connects the given unordered pair.
    #[must_use]
    pub fn is_between(&self, a: UserId, b: UserId) -> bool {
        (self.requester == a && self.recipient == b)
            || (self.requester == b && self.recipient == a)
    }

    /// Transitions a pending request to accepted.
    pub fn accept(&mut self) {
        self.status = FriendshipStatus::Accepted;
        self.updated_at = Utc::now();
    }

    /// Flips the edge to blocked, recording who blocked.
    pub fn block(&mut self, blocker: UserId) {
        self.status = FriendshipStatus::Blocked;
        self.blocked_by = Some(blocker);
        self.updated_at = Utc::now();
    }
}

/// How a block request should be applied, decided by
/// [`decide::block_user`](crate::decide::block_user).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    /// Flip the existing edge to blocked.
    FlagExisting(FriendshipId),
    /// No edge exists; create one directly in the blocked state.
    CreateBlocked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            FriendshipStatus::Pending,
            FriendshipStatus::Accepted,
            FriendshipStatus::Blocked,
        ] {
            let parsed: FriendshipStatus = status.as_str().parse().expect("should parse");
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn rejected_is_not_a_status() {
        let result: Result<FriendshipStatus, _> = "rejected".parse();
        assert!(result.is_err());
    }

    #[test]
    fn new_request_is_pending() {
        let a = UserId::new();
        let b = UserId::new();
        let edge = Friendship::new_request(a, b);

        assert_eq!(edge.status, FriendshipStatus::Pending);
        assert_eq!(edge.requester, a);
        assert_eq!(edge.recipient, b);
        assert!(edge.blocked_by.is_none());
    }

    #[test]
    fn new_block_records_blocker() {
        let blocker = UserId::new();
        let target = UserId::new();
        let edge = Friendship::new_block(blocker, target);

        assert_eq!(edge.status, FriendshipStatus::Blocked);
        assert_eq!(edge.blocked_by, Some(blocker));
    }

    #[test]
    fn involves_and_other_party() {
        let a = UserId::new();
        let b = UserId::new();
        let c = UserId::new();
        let edge = Friendship::new_request(a, b);

        assert!(edge.involves(a));
        assert!(edge.involves(b));
        assert!(!edge.involves(c));
        assert_eq!(edge.other_party(a), Some(b));
        assert_eq!(edge.other_party(b), Some(a));
        assert_eq!(edge.other_party(c), None);
    }

    #[test]
    fn is_between_ignores_direction() {
        let a = UserId::new();
        let b = UserId::new();
        let edge = Friendship::new_request(a, b);

        assert!(edge.is_between(a, b));
        assert!(edge.is_between(b, a));
        assert!(!edge.is_between(a, UserId::new()));
    }

    #[test]
    fn accept_updates_status_and_timestamp() {
        let mut edge = Friendship::new_request(UserId::new(), UserId::new());
        let before = edge.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(1));
        edge.accept();

        assert_eq!(edge.status, FriendshipStatus::Accepted);
        assert!(edge.updated_at > before);
    }

    #[test]
    fn block_records_blocker_on_existing_edge() {
        let a = UserId::new();
        let b = UserId::new();
        let mut edge = Friendship::new_request(a, b);

        edge.block(b);

        assert_eq!(edge.status, FriendshipStatus::Blocked);
        assert_eq!(edge.blocked_by, Some(b));
    }

    #[test]
    fn friendship_serialization_roundtrip() {
        let edge = Friendship::new_request(UserId::new(), UserId::new());
        let json = serde_json::to_string(&edge).expect("serialize");
        let parsed: Friendship = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(edge, parsed);
    }
}
