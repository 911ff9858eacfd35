//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Hold authoritative in-memory account state.
//! - Keep the persisted snapshot in sync after every mutation.
//!
//! # Invariants
//! - Repository writes do not validate; validation is opt-in via `service`.
//! - Unknown ids are silent no-ops, not errors.

pub mod account_repo;
