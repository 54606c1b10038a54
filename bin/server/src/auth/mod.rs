//! Authentication module for the waypost server.
//!
//! This module provides:
//! - OIDC authentication with external identity providers
//! - Database-backed session management
//! - Authentication middleware/extractors for Axum routes
//!
//! # Authorization Model
//!
//! This module handles **platform access**: whether a request belongs to a
//! logged-in, still-active account, and whether that account is a global
//! admin. The admin flag comes from OIDC group membership and is re-derived
//! on every login.
//!
//! **Resource authorization** (may user X mutate trip Y, may they see
//! profile Z) is decided by the `waypost-authority` crate. The extractors
//! here only establish *who* is asking; the service layer resolves the
//! relevant rows and asks the authority *whether* they may.

pub mod db;
pub mod middleware;
pub mod oidc;
pub mod routes;

use crate::config::SessionConfig;
use sqlx::PgPool;

pub use middleware::RequireAuth;
pub use oidc::OidcClient;
pub use routes::{callback, login, logout};

/// Shared application state.
pub struct AppState {
    /// Database connection pool.
    pub db_pool: PgPool,
    /// OIDC client for authentication.
    pub oidc_client: OidcClient,
    /// Session configuration.
    pub session_config: SessionConfig,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(db_pool: PgPool, oidc_client: OidcClient, session_config: SessionConfig) -> Self {
        Self {
            db_pool,
            oidc_client,
            session_config,
        }
    }
}
