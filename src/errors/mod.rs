//! Domain-specific error types for the CRM core
//!
//! This module provides structured error types for the different failure
//! domains in the application, making error handling consistent and
//! debuggable.
//!
//! # Error Categories
//!
//! - **ValidationError**: local, pre-flight field validation; never sent over
//!   the wire
//! - **GatewayError**: remote CRUD call failed (network, non-2xx status, or
//!   malformed response body)
//! - **NotFoundError**: update/delete referencing an identifier the backend
//!   no longer has
//!
//! `CrmError` aggregates the three so controllers and gateways can propagate
//! a single type with `?`. Nothing in this crate is fatal to the process:
//! every failure is scoped to the operation that raised it.

mod gateway;
mod validation;

pub use gateway::GatewayError;
pub use validation::{NotFoundError, ValidationError};

use thiserror::Error;

/// Unified error type for gateway and controller operations.
#[derive(Error, Debug)]
pub enum CrmError {
    /// Local validation failed before any transport call was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The remote call itself failed
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The referenced entity has vanished from the backend
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

impl CrmError {
    /// True when the failure is a vanished identifier, which controllers
    /// recover from by refetching.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
