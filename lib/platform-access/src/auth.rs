//! Authentication primitives shared between the OIDC flow and the web layer.

use crate::session::Session;
use crate::user::User;
use waypost_authority::{Actor, GlobalRole};
use waypost_core::UserId;

/// The authenticated caller's context, extracted from the request.
///
/// Available in handlers after successful authentication. The authority
/// actor is built from the user record, so role changes and deactivation
/// take effect as soon as the record is updated, not on next login.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The current session.
    session: Session,
    /// The user record.
    user: User,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user context.
    #[must_use]
    pub fn new(session: Session, user: User) -> Self {
        Self { session, user }
    }

    /// Returns the authenticated user's ID.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user.id()
    }

    /// Returns the current session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the user record.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Returns the identity for authority decisions.
    #[must_use]
    pub fn actor(&self) -> Actor {
        self.user.actor()
    }

    /// Returns true if the user is a platform admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.global_role().is_admin()
    }
}

/// Claims extracted from an OIDC ID token.
///
/// These are used to create/update user records and determine the global
/// role.
#[derive(Debug, Clone)]
pub struct OidcClaims {
    /// The subject claim (unique user identifier from the provider).
    pub subject: String,
    /// The issuer URL.
    pub issuer: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Display name (optional, from name or preferred_username).
    pub display_name: Option<String>,
    /// Group memberships (from the configured groups claim).
    pub groups: Vec<String>,
}

impl OidcClaims {
    /// Creates a new set of OIDC claims.
    #[must_use]
    pub fn new(subject: String, issuer: String) -> Self {
        Self {
            subject,
            issuer,
            email: None,
            display_name: None,
            groups: Vec::new(),
        }
    }

    /// Sets the email claim.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name;
        self
    }

    /// Sets the groups.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }
}

/// Derives the global role from a list of OIDC group names.
///
/// Membership in the configured admin group grants `Admin`; everyone else
/// is an ordinary `User`.
#[must_use]
pub fn global_role_from_groups(groups: &[String], admin_group: &str) -> GlobalRole {
    if groups.iter().any(|g| g == admin_group) {
        GlobalRole::Admin
    } else {
        GlobalRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;
    use chrono::Duration;

    #[test]
    fn authenticated_user_has_user_info() {
        let user = User::new(
            "sub_123".to_string(),
            "https://auth.example.com".to_string(),
            GlobalRole::User,
        );
        let session = Session::new(
            SessionId::new("sess_abc".to_string()),
            user.id(),
            GlobalRole::User,
            Duration::hours(1),
        );

        let auth_user = AuthenticatedUser::new(session, user.clone());

        assert_eq!(auth_user.user_id(), user.id());
        assert_eq!(auth_user.user().subject(), "sub_123");
        assert!(!auth_user.is_admin());
    }

    #[test]
    fn admin_flag_follows_the_user_record() {
        let user = User::new(
            "sub_admin".to_string(),
            "https://auth.example.com".to_string(),
            GlobalRole::Admin,
        );
        // Session captured an ordinary role, but the record says admin.
        let session = Session::new(
            SessionId::new("sess_admin".to_string()),
            user.id(),
            GlobalRole::User,
            Duration::hours(1),
        );

        let auth_user = AuthenticatedUser::new(session, user);

        assert!(auth_user.is_admin());
        assert!(auth_user.actor().is_admin());
    }

    #[test]
    fn oidc_claims_builder() {
        let claims = OidcClaims::new(
            "sub_123".to_string(),
            "https://auth.example.com".to_string(),
        )
        .with_email(Some("user@example.com".to_string()))
        .with_display_name(Some("Test User".to_string()))
        .with_groups(vec!["waypost-admins".to_string()]);

        assert_eq!(claims.subject, "sub_123");
        assert_eq!(claims.email, Some("user@example.com".to_string()));
        assert_eq!(claims.groups, vec!["waypost-admins"]);
    }

    #[test]
    fn role_from_groups() {
        let admin_groups = vec!["other".to_string(), "waypost-admins".to_string()];
        assert_eq!(
            global_role_from_groups(&admin_groups, "waypost-admins"),
            GlobalRole::Admin
        );

        let plain_groups = vec!["other".to_string()];
        assert_eq!(
            global_role_from_groups(&plain_groups, "waypost-admins"),
            GlobalRole::User
        );

        assert_eq!(
            global_role_from_groups(&[], "waypost-admins"),
            GlobalRole::User
        );
    }
}
