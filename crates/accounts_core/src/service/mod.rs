//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case APIs.
//! - Keep CLI and UI layers decoupled from storage details.

pub mod account_service;
