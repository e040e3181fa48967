//! Session-scoped conversation memory for Parley.
//!
//! The [`SessionStore`] is the only mutable shared resource in the request
//! pipeline. It owns every [`Session`] and its messages exclusively — no
//! other component may mutate them. Mutation granularity is a single
//! session: appends to different sessions never block each other.

mod store;

pub use store::{Session, SessionStore};
