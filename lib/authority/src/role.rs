//! Role and visibility vocabulary for access decisions.
//!
//! "Role" means two deliberately distinct things on this platform:
//! - [`GlobalRole`]: a user's platform-wide role (admin or ordinary user)
//! - [`TripRole`]: a user's role within one trip (creator, admin, member)
//!
//! Keeping them as separate tagged types prevents a trip-scoped admin from
//! ever being mistaken for a platform admin, and vice versa.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use waypost_core::UserId;

/// Error returned when parsing a role or visibility from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    /// The type that failed to parse.
    pub enum_type: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.enum_type, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// Platform-wide role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalRole {
    /// Ordinary user.
    User,
    /// Platform administrator with a super-admin override on trip
    /// mutations and visibility checks.
    Admin,
}

impl GlobalRole {
    /// Returns true if this role has platform admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the storage name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GlobalRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ParseEnumError {
                enum_type: "GlobalRole",
                value: other.to_string(),
            }),
        }
    }
}

/// Role of a user within a single trip.
///
/// Exactly one member per trip holds `Creator`, assigned atomically when the
/// trip is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripRole {
    /// The member who created the trip.
    Creator,
    /// A member who may manage the trip and its membership.
    Admin,
    /// An ordinary member.
    Member,
}

impl TripRole {
    /// Returns the storage name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for TripRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TripRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creator" => Ok(Self::Creator),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            other => Err(ParseEnumError {
                enum_type: "TripRole",
                value: other.to_string(),
            }),
        }
    }
}

/// Who may read a profile or trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Readable by anyone.
    Public,
    /// Readable by the owner, a platform admin, or an accepted friend of
    /// the owner.
    Private,
    /// Readable by the owner, a platform admin, or an accepted friend of
    /// the owner.
    FriendsOnly,
}

impl Visibility {
    /// Returns the storage name of the visibility.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::FriendsOnly => "friends_only",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "friends_only" => Ok(Self::FriendsOnly),
            other => Err(ParseEnumError {
                enum_type: "Visibility",
                value: other.to_string(),
            }),
        }
    }
}

/// The authenticated caller, as seen by the authority.
///
/// Supplied by the identity layer and treated as trusted input. Decisions
/// fail Forbidden for a deactivated actor before any other rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The caller's user ID.
    pub id: UserId,
    /// The caller's platform-wide role.
    pub role: GlobalRole,
    /// Whether the caller's account is active. Deactivation is a soft
    /// delete; deactivated accounts keep their rows but lose all access.
    pub is_active: bool,
}

impl Actor {
    /// Creates an active actor with the given role.
    #[must_use]
    pub fn new(id: UserId, role: GlobalRole) -> Self {
        Self {
            id,
            role,
            is_active: true,
        }
    }

    /// Marks the actor as deactivated.
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Returns true if the actor is a platform admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_role_is_admin() {
        assert!(!GlobalRole::User.is_admin());
        assert!(GlobalRole::Admin.is_admin());
    }

    #[test]
    fn global_role_round_trips_through_str() {
        for role in [GlobalRole::User, GlobalRole::Admin] {
            let parsed: GlobalRole = role.as_str().parse().expect("should parse");
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn trip_role_round_trips_through_str() {
        for role in [TripRole::Creator, TripRole::Admin, TripRole::Member] {
            let parsed: TripRole = role.as_str().parse().expect("should parse");
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn visibility_round_trips_through_str() {
        for vis in [
            Visibility::Public,
            Visibility::Private,
            Visibility::FriendsOnly,
        ] {
            let parsed: Visibility = vis.as_str().parse().expect("should parse");
            assert_eq!(vis, parsed);
        }
    }

    #[test]
    fn parse_invalid_role_fails() {
        let result: Result<TripRole, _> = "owner".parse();
        let err = result.unwrap_err();
        assert_eq!(err.enum_type, "TripRole");
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn global_and_trip_admin_serialize_to_distinct_contexts() {
        // Same wire name, different types: the point is they never mix.
        let global = serde_json::to_string(&GlobalRole::Admin).expect("serialize");
        let trip = serde_json::to_string(&TripRole::Admin).expect("serialize");
        assert_eq!(global, "\"admin\"");
        assert_eq!(trip, "\"admin\"");
    }

    #[test]
    fn visibility_serializes_snake_case() {
        let json = serde_json::to_string(&Visibility::FriendsOnly).expect("serialize");
        assert_eq!(json, "\"friends_only\"");
    }

    #[test]
    fn actor_defaults_to_active() {
        let actor = Actor::new(UserId::new(), GlobalRole::User);
        assert!(actor.is_active);
        assert!(!actor.is_admin());

        let gone = actor.deactivated();
        assert!(!gone.is_active);
    }
}
