//! User domain type and related structures.
//!
//! The User represents an account on the platform. Users are identified by
//! their OIDC subject claim and have a corresponding internal UserId.
//! Deactivation is a soft delete: the row survives with `is_active` false.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waypost_authority::{Actor, GlobalRole, Visibility};
use waypost_core::UserId;

/// An account on the platform.
///
/// Created after the first successful OIDC authentication. The internal
/// `id` is used for all platform operations and authority decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal platform user ID.
    id: UserId,
    /// OIDC subject claim - unique identifier from the identity provider.
    subject: String,
    /// OIDC issuer URL - identifies which identity provider authenticated the user.
    issuer: String,
    /// User's email address (from OIDC email claim, if available).
    email: Option<String>,
    /// User's display name (from OIDC name or preferred_username claim).
    display_name: Option<String>,
    /// Platform-wide role, derived from OIDC group membership at login.
    global_role: GlobalRole,
    /// Who may read this user's profile.
    profile_visibility: Visibility,
    /// Whether the account is active. Deactivation flips this flag and
    /// never deletes the row.
    is_active: bool,
    /// When the user record was created.
    created_at: DateTime<Utc>,
    /// When the user record was last updated.
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user with the given OIDC claims and role.
    ///
    /// New profiles default to public visibility.
    #[must_use]
    pub fn new(subject: String, issuer: String, global_role: GlobalRole) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            subject,
            issuer,
            email: None,
            display_name: None,
            global_role,
            profile_visibility: Visibility::Public,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a user with all fields specified.
    ///
    /// Use this when reconstituting a user from storage.
    #[must_use]
    #[expect(clippy::too_many_arguments)]
    pub fn with_all_fields(
        id: UserId,
        subject: String,
        issuer: String,
        email: Option<String>,
        display_name: Option<String>,
        global_role: GlobalRole,
        profile_visibility: Visibility,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            subject,
            issuer,
            email,
            display_name,
            global_role,
            profile_visibility,
            is_active,
            created_at,
            updated_at,
        }
    }

    /// Returns the user's internal platform ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the OIDC subject claim.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the OIDC issuer URL.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the user's email address, if available.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the user's display name, if available.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the user's platform-wide role.
    #[must_use]
    pub fn global_role(&self) -> GlobalRole {
        self.global_role
    }

    /// Returns who may read this user's profile.
    #[must_use]
    pub fn profile_visibility(&self) -> Visibility {
        self.profile_visibility
    }

    /// Returns true if the account is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns when the user was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the user was last updated.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the identity the authority crate makes decisions for.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.global_role,
            is_active: self.is_active,
        }
    }

    /// Sets the user's email address.
    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Sets the user's display name.
    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }

    /// Sets the user's platform-wide role.
    ///
    /// Called at login when group membership has changed.
    pub fn set_global_role(&mut self, role: GlobalRole) {
        self.global_role = role;
        self.updated_at = Utc::now();
    }

    /// Sets who may read this user's profile.
    pub fn set_profile_visibility(&mut self, visibility: Visibility) {
        self.profile_visibility = visibility;
        self.updated_at = Utc::now();
    }

    /// Soft-deletes the account by flipping the active flag.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            "sub_123".to_string(),
            "https://auth.example.com".to_string(),
            GlobalRole::User,
        )
    }

    #[test]
    fn new_user_has_generated_id() {
        let user = test_user();
        let id_str = user.id().to_string();
        assert!(id_str.starts_with("usr_"));
    }

    #[test]
    fn new_user_defaults() {
        let user = test_user();

        assert!(user.email().is_none());
        assert!(user.display_name().is_none());
        assert!(user.is_active());
        assert_eq!(user.global_role(), GlobalRole::User);
        assert_eq!(user.profile_visibility(), Visibility::Public);
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn actor_reflects_role_and_active_flag() {
        let mut user = test_user();
        assert!(user.actor().is_active);
        assert!(!user.actor().is_admin());

        user.set_global_role(GlobalRole::Admin);
        user.deactivate();

        let actor = user.actor();
        assert!(actor.is_admin());
        assert!(!actor.is_active);
    }

    #[test]
    fn deactivate_is_a_flag_flip() {
        let mut user = test_user();
        let id = user.id();

        user.deactivate();

        // Identity survives; only the flag changed.
        assert_eq!(user.id(), id);
        assert!(!user.is_active());
    }

    #[test]
    fn set_email_updates_timestamp() {
        let mut user = test_user();
        let original_updated_at = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(1));

        user.set_email(Some("user@example.com".to_string()));

        assert_eq!(user.email(), Some("user@example.com"));
        assert!(user.updated_at() > original_updated_at);
    }

    #[test]
    fn set_profile_visibility_updates_timestamp() {
        let mut user = test_user();
        let original_updated_at = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(1));

        user.set_profile_visibility(Visibility::FriendsOnly);

        assert_eq!(user.profile_visibility(), Visibility::FriendsOnly);
        assert!(user.updated_at() > original_updated_at);
    }

    #[test]
    fn with_all_fields_preserves_values() {
        let id = UserId::new();
        let created = Utc::now() - chrono::Duration::days(30);
        let updated = Utc::now() - chrono::Duration::days(1);

        let user = User::with_all_fields(
            id,
            "sub_456".to_string(),
            "https://auth.example.com".to_string(),
            Some("alice@example.com".to_string()),
            Some("Alice".to_string()),
            GlobalRole::Admin,
            Visibility::Private,
            false,
            created,
            updated,
        );

        assert_eq!(user.id(), id);
        assert_eq!(user.global_role(), GlobalRole::Admin);
        assert_eq!(user.profile_visibility(), Visibility::Private);
        assert!(!user.is_active());
        assert_eq!(user.created_at(), created);
        assert_eq!(user.updated_at(), updated);
    }

    #[test]
    fn user_serialization_roundtrip() {
        let mut user = test_user();
        user.set_email(Some("test@example.com".to_string()));
        user.set_profile_visibility(Visibility::Private);

        let json = serde_json::to_string(&user).expect("serialize");
        let parsed: User = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(user, parsed);
    }
}
