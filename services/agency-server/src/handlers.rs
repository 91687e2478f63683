//! Request handlers for the agent endpoints
//!
//! Each handler validates its input, delegates to the store (and the factory
//! when creating), and shapes the response. Failures become `{"error": msg}`.

use crate::error::ApiError;
use crate::routes::AppState;
use agency_core::{new_agent, AgencyError, Agent, VERSION};
use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json, Response},
    Form,
};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Form fields accepted by [`create_agent`]
///
/// Read from either a urlencoded or a `multipart/form-data` body. An
/// unreadable body carries no fields, so extraction never fails.
#[derive(Debug, Default, Deserialize)]
pub struct CreateAgentForm {
    pub name: Option<String>,
    pub gender: Option<String>,
}

impl<S> FromRequest<S> for CreateAgentForm
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if multipart {
            return match Multipart::from_request(req, state).await {
                Ok(multipart) => Ok(Self::from_multipart(multipart).await),
                Err(rejection) => {
                    debug!("Treating unreadable multipart body as empty: {}", rejection);
                    Ok(Self::default())
                }
            };
        }

        match Form::<Self>::from_request(req, state).await {
            Ok(Form(form)) => Ok(form),
            Err(rejection) => {
                debug!("Treating unreadable form as empty: {}", rejection);
                Ok(Self::default())
            }
        }
    }
}

impl CreateAgentForm {
    async fn from_multipart(mut multipart: Multipart) -> Self {
        let mut form = Self::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(err) => {
                    debug!("Stopped reading multipart body: {}", err);
                    break;
                }
            };

            let slot = match field.name() {
                Some("name") => &mut form.name,
                Some("gender") => &mut form.gender,
                _ => continue,
            };

            // First occurrence wins.
            if slot.is_some() {
                continue;
            }
            match field.text().await {
                Ok(text) => *slot = Some(text),
                Err(err) => debug!("Skipping unreadable multipart field: {}", err),
            }
        }

        form
    }
}

#[instrument(skip(state))]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({
            "status": "healthy",
            "service": "agency-server",
            "version": VERSION
        }))
        .into_response(),
        Err(err) => {
            error!("Health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": "agency-server",
                    "error": err.to_string()
                })),
            )
                .into_response()
        }
    }
}

#[instrument(skip(state))]
pub async fn list_agents(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Agent>>, ApiError> {
    let agents = state.store.list_all().await.map_err(|err| {
        error!("Failed to list agents: {}", err);
        ApiError::from(err)
    })?;

    Ok(Json(agents))
}

#[instrument(skip(state))]
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Agent>, ApiError> {
    find_agent(&state, &id).await
}

/// `GET /agents/` carries an empty id segment
#[instrument(skip(state))]
pub async fn get_agent_without_id(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Agent>, ApiError> {
    find_agent(&state, "").await
}

async fn find_agent(state: &AppState, id: &str) -> Result<Json<Agent>, ApiError> {
    if id.is_empty() {
        return Err(AgencyError::required("id").into());
    }

    let agent = state.store.find_by_id(id).await.map_err(|err| {
        warn!("Lookup of agent {:?} failed: {}", id, err);
        ApiError::not_found(err)
    })?;

    Ok(Json(agent))
}

#[instrument(skip(state, form))]
pub async fn create_agent(
    State(state): State<Arc<AppState>>,
    form: CreateAgentForm,
) -> Result<(StatusCode, Json<Agent>), ApiError> {
    let name = required_field(form.name, "name")?;
    let gender = required_field(form.gender, "gender")?;

    let agent = new_agent(name, gender, state.attributes.as_ref());
    let id = state.store.insert(&agent).await.map_err(|err| {
        error!("Failed to store agent {:?}: {}", agent.name, err);
        ApiError::from(err)
    })?;
    let agent = agent.with_id(id);

    info!(agent_id = id, name = %agent.name, "Created agent");
    Ok((StatusCode::CREATED, Json(agent)))
}

fn required_field(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => {
            warn!("Rejected create request: {} is required", field);
            Err(AgencyError::required(field).into())
        }
    }
}
