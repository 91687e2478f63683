//! In-memory agent store
//!
//! Lock-free map keyed by id with an atomic id counter. Ids start at 1 and
//! are never reused within one store.

use agency_core::{parse_id, AgencyError, Agent, AgentId, AgentStore, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct MemoryAgentStore {
    agents: Arc<DashMap<AgentId, Agent>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for MemoryAgentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAgentStore")
            .field("agents_count", &self.agents.len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MemoryAgentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAgentStore {
    pub fn new() -> Self {
        Self {
            agents: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[async_trait]
impl AgentStore for MemoryAgentStore {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Agent>> {
        let mut agents: Vec<Agent> = self
            .agents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        agents.sort_by_key(|agent| agent.id);
        Ok(agents)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Agent> {
        parse_id(id)
            .and_then(|key| self.agents.get(&key).map(|entry| entry.value().clone()))
            .ok_or_else(|| AgencyError::not_found(id))
    }

    #[instrument(skip(self, agent), fields(name = %agent.name))]
    async fn insert(&self, agent: &Agent) -> Result<AgentId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.agents.insert(id, agent.clone().with_id(id));
        debug!("Stored agent {} in memory", id);
        Ok(id)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
