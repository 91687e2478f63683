pub use agency_core;

mod memory;
mod sql;

pub use memory::MemoryAgentStore;
pub use sql::{SqlAgentStore, StoreConfig, AGENTS_SCHEMA};

// Re-export core types for convenience
pub use agency_core::{AgencyError, Agent, AgentId, AgentStore, Result};
