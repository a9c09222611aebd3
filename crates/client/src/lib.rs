//! Resource client for the control-plane REST API.
//!
//! Every resource exposes the same three operations: list a collection,
//! fetch one record, and invoke a command against one record. The dashboard
//! consumes these through the [`ResourceClient`] trait; [`RestClient`] talks
//! to a real control plane and [`MemoryClient`] backs demo mode and tests.

mod error;
mod memory;
mod rest;

pub use error::ClientError;
pub use memory::MemoryClient;
pub use rest::RestClient;

/// A uniform JSON record as returned by the control plane.
pub type Record = serde_json::Value;

/// Resource-scoped operations against the control plane. Implementations
/// are blocking; the dashboard calls them from a dedicated fetch worker
/// thread, never from the UI thread.
pub trait ResourceClient: Send + Sync {
    /// All records of `collection`.
    fn list(&self, collection: &str) -> Result<Vec<Record>, ClientError>;

    /// One record by id.
    fn get(&self, collection: &str, id: &str) -> Result<Record, ClientError>;

    /// Issue `command` against one record. The result is an acknowledgement
    /// only; callers observe the effect through a subsequent `list`.
    fn invoke(&self, collection: &str, id: &str, command: &str) -> Result<(), ClientError>;
}
