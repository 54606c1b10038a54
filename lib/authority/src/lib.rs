//! Relationship and access decision rules for the waypost platform.
//!
//! This crate is the single place where waypost decides who may do what:
//! - The friendship state machine (request, accept, reject, remove, block,
//!   unblock)
//! - Trip mutation rules based on per-trip membership roles, with a global
//!   admin override
//! - Visibility rules for profile and trip reads
//!
//! Every decision function is pure: the caller resolves the relevant rows
//! (a friendship edge, a trip membership) up front and passes them in. The
//! crate knows nothing about storage, HTTP, or sessions.
//!
//! # Example
//!
//! ```
//! use waypost_authority::{Actor, Friendship, GlobalRole, decide};
//! use waypost_core::UserId;
//!
//! let alice = Actor::new(UserId::new(), GlobalRole::User);
//! let bob = UserId::new();
//!
//! // No existing edge between the pair: the request is allowed.
//! decide::request_friend(&alice, bob, None).expect("first request allowed");
//!
//! // A second request against the pending edge is a conflict.
//! let pending = Friendship::new_request(alice.id, bob);
//! assert!(decide::request_friend(&alice, bob, Some(&pending)).is_err());
//! ```

pub mod decide;
pub mod error;
pub mod friendship;
pub mod role;
pub mod trip;
pub mod visibility;

pub use error::{AuthorityError, DenialKind};
pub use friendship::{BlockAction, Friendship, FriendshipStatus};
pub use role::{Actor, GlobalRole, ParseEnumError, TripRole, Visibility};
pub use trip::{TripAction, TripMembership};
