use crate::handlers::{create_agent, get_agent, get_agent_without_id, health_check, list_agents};
use agency_core::{endpoints, AgentStore, AttributeSource};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Dependencies shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AgentStore>,
    pub attributes: Arc<dyn AttributeSource>,
}

impl AppState {
    pub fn new(store: Arc<dyn AgentStore>, attributes: Arc<dyn AttributeSource>) -> Self {
        Self { store, attributes }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(health_check))
        .route(endpoints::AGENTS, get(list_agents).post(create_agent))
        .route(endpoints::AGENT_WITHOUT_ID, get(get_agent_without_id))
        .route(endpoints::AGENT_BY_ID, get(get_agent))
        .with_state(Arc::new(state))
}
