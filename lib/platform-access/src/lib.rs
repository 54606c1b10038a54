//! Platform access and authentication for waypost.
//!
//! This crate provides:
//! - User management (`User` with OIDC integration, a global role, and a
//!   soft-delete `is_active` flag)
//! - Session management (`Session`, `SessionId`)
//! - OIDC claims and provider configuration
//!
//! # Access Control Model
//!
//! Anyone who can authenticate with the OIDC provider may use the platform;
//! members of the configured admin group get the `Admin` global role, which
//! the authority crate treats as a super-admin override. Deactivated
//! accounts keep their rows (soft delete) but are denied at login and at
//! session extraction.
//!
//! # Example
//!
//! ```
//! use waypost_platform_access::{global_role_from_groups, Session, SessionId, User};
//! use waypost_authority::GlobalRole;
//! use chrono::Duration;
//!
//! let role = global_role_from_groups(&["waypost-admins".to_string()], "waypost-admins");
//! assert_eq!(role, GlobalRole::Admin);
//!
//! let user = User::new(
//!     "auth0|123456".to_string(),
//!     "https://example.auth0.com/".to_string(),
//!     role,
//! );
//! let session = Session::new(
//!     SessionId::new("sess_abc123".to_string()),
//!     user.id(),
//!     role,
//!     Duration::hours(8),
//! );
//!
//! assert!(session.is_valid());
//! assert!(user.actor().is_admin());
//! ```

pub mod auth;
pub mod oidc;
pub mod session;
pub mod user;

// Re-export main types at crate root
pub use auth::{AuthenticatedUser, OidcClaims, global_role_from_groups};
pub use oidc::OidcConfig;
pub use session::{Session, SessionId};
pub use user::User;
