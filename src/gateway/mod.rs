//! CRUD gateway boundary
//!
//! One operation per verb. Every operation validates required fields locally
//! before touching any transport (fail fast with a `ValidationError`), never
//! retries automatically, and surfaces transport failures as `GatewayError`
//! with the status code where one exists. The gateway is stateless and knows
//! nothing of the store; reconciling after a successful call is the
//! controller's job.

mod http;
mod mock;

pub use http::HttpGateway;
pub use mock::{
    sample_activities, sample_clients, sample_contacts, sample_opportunities, MockGateway,
};

use async_trait::async_trait;

use crate::errors::CrmError;
use crate::model::Record;

/// Remote CRUD boundary for one entity type.
#[async_trait]
pub trait Gateway<R: Record>: Send + Sync {
    /// Fetch the full collection.
    async fn list(&self) -> Result<Vec<R>, CrmError>;

    /// Create a record (its id is ignored); returns the record with the
    /// server-assigned identifier.
    async fn create(&self, record: &R) -> Result<R, CrmError>;

    /// Replace the record with the matching id; `NotFoundError` when the id
    /// has vanished.
    async fn update(&self, record: &R) -> Result<R, CrmError>;

    /// Delete by id; `NotFoundError` when the id has vanished.
    async fn delete(&self, id: i64) -> Result<(), CrmError>;
}
