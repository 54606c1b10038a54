//! Core domain types for the waypost platform.
//!
//! This crate provides the typed identifiers shared by every other crate in
//! the waypost trip-planning backend.

pub mod id;

pub use id::{CommentId, FriendshipId, StepId, TripId, TripMemberId, UserId};
