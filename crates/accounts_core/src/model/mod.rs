//! Account domain model and pure helpers.
//!
//! # Responsibility
//! - Define the credential record and its creation/patch/draft shapes.
//! - Provide label string conversions and form validation.
//!
//! # Invariants
//! - Every helper here is pure; persistence lives in `repo` and `store`.

pub mod account;
pub mod labels;
pub mod validation;
