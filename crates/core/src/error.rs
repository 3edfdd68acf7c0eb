// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for coordination primitives

use thiserror::Error;

/// Violations of the acquire/release protocol
///
/// These are caller bugs, never transient conditions, and are not retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinationError {
    #[error("invalid release of section '{name}': not held by this guard")]
    UsageViolation { name: String },
    #[error("invalid release of section '{name}': section was never acquired")]
    MissingEntry { name: String },
}

impl CoordinationError {
    /// Name of the section the violation concerns
    pub fn section(&self) -> &str {
        match self {
            CoordinationError::UsageViolation { name }
            | CoordinationError::MissingEntry { name } => name,
        }
    }
}
