//! Persistence port for agent records

use crate::agent::{Agent, AgentId};
use crate::error::Result;
use async_trait::async_trait;

/// Storage backend for agent records.
///
/// Every operation is a single round trip to the backend with no caching or
/// retries. Implementations are shared across request handlers.
#[async_trait]
pub trait AgentStore: Send + Sync {
    /// All records; any query or decode failure discards partial results.
    async fn list_all(&self) -> Result<Vec<Agent>>;

    /// The record whose id matches the opaque `id` token.
    ///
    /// Fails with [`AgencyError::AgentNotFound`](crate::AgencyError::AgentNotFound)
    /// when nothing matches.
    async fn find_by_id(&self, id: &str) -> Result<Agent>;

    /// Persists every field except `id` and returns the assigned id.
    async fn insert(&self, agent: &Agent) -> Result<AgentId>;

    /// Cheap liveness probe against the backend.
    async fn ping(&self) -> Result<()>;
}
