//! # Agency Core
//!
//! Core types and traits for the Agency agent records service.
//!
//! - [`Agent`] is the single persisted entity
//! - [`factory`] builds new agents with generated attributes
//! - [`AgentStore`] is the persistence port the service is wired against

pub mod agent;
pub mod error;
pub mod factory;
pub mod store;

pub use agent::{parse_id, Agent, AgentId};
pub use error::{AgencyError, Result};
pub use factory::{new_agent, new_agent_at, AttributeSource, SeededSource, ThreadRngSource};
pub use store::AgentStore;

/// Current Agency version for compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Agency build information for telemetry and debugging
pub const BUILD_INFO: &str = concat!(
    "Agency ",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_NAME"),
    ")"
);

/// Standard API endpoints for Agency services
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const AGENTS: &str = "/agents";
    pub const AGENT_BY_ID: &str = "/agents/{id}";
    /// Lookup route with an empty id segment
    pub const AGENT_WITHOUT_ID: &str = "/agents/";
}
