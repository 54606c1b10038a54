//! waypost HTTP API server.
//!
//! Wires the pure decision layer in `waypost-authority` to PostgreSQL
//! storage and exposes it as a JSON API over axum, with OIDC login and
//! database-backed cookie sessions.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
