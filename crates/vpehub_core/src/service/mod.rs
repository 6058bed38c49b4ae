//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate collection reads/writes into rule-checked operations.
//! - Keep callers (CLI, future UI bindings) decoupled from storage details.

pub mod domain_store;
pub mod outcome;
