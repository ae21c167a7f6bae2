use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ContractorId, ContractorStatus, StepData};
use super::notifications::NotificationSender;
use super::repository::{ContractorRepository, RepositoryError};
use super::service::{OnboardingService, OnboardingServiceError};

#[derive(Debug, Deserialize)]
pub struct ExecuteStepRequest {
    pub step_id: String,
    #[serde(default)]
    pub data: StepData,
}

#[derive(Debug, Deserialize)]
pub struct SelectRouteRequest {
    pub route: String,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: String,
}

/// Router builder exposing the onboarding workflow over HTTP.
pub fn onboarding_router<R, N>(service: Arc<OnboardingService<R, N>>) -> Router
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    Router::new()
        .route("/api/v1/onboarding/routes", get(routes_handler::<R, N>))
        .route(
            "/api/v1/onboarding/routes/:route/documents",
            get(documents_handler::<R, N>),
        )
        .route(
            "/api/v1/onboarding/contractors/:contractor_id/status",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/onboarding/contractors/:contractor_id/next-action",
            get(next_action_handler::<R, N>),
        )
        .route(
            "/api/v1/onboarding/contractors/:contractor_id/execute-step",
            post(execute_step_handler::<R, N>),
        )
        .route(
            "/api/v1/onboarding/contractors/:contractor_id/route",
            post(select_route_handler::<R, N>),
        )
        .route(
            "/api/v1/onboarding/contractors/:contractor_id/transition",
            post(transition_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn routes_handler<R, N>(
    State(service): State<Arc<OnboardingService<R, N>>>,
) -> Response
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    let routes = service.available_routes();
    (StatusCode::OK, axum::Json(json!({ "routes": routes }))).into_response()
}

pub(crate) async fn documents_handler<R, N>(
    State(service): State<Arc<OnboardingService<R, N>>>,
    Path(route): Path<String>,
) -> Response
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    match service.required_documents(&route) {
        Ok(documents) => (StatusCode::OK, axum::Json(documents)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<OnboardingService<R, N>>>,
    Path(contractor_id): Path<String>,
) -> Response
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    match service.workflow_status(&ContractorId(contractor_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn next_action_handler<R, N>(
    State(service): State<Arc<OnboardingService<R, N>>>,
    Path(contractor_id): Path<String>,
) -> Response
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    match service.next_action(&ContractorId(contractor_id)) {
        Ok(action) => (StatusCode::OK, axum::Json(action)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn execute_step_handler<R, N>(
    State(service): State<Arc<OnboardingService<R, N>>>,
    Path(contractor_id): Path<String>,
    axum::Json(request): axum::Json<ExecuteStepRequest>,
) -> Response
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    let id = ContractorId(contractor_id);
    match service.execute_step(&id, &request.step_id, request.data) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn select_route_handler<R, N>(
    State(service): State<Arc<OnboardingService<R, N>>>,
    Path(contractor_id): Path<String>,
    axum::Json(request): axum::Json<SelectRouteRequest>,
) -> Response
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    let id = ContractorId(contractor_id);
    match service.select_route(&id, &request.route) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(OnboardingServiceError::Registry(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn transition_handler<R, N>(
    State(service): State<Arc<OnboardingService<R, N>>>,
    Path(contractor_id): Path<String>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    let target = match request.status.parse::<ContractorStatus>() {
        Ok(status) => status,
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    let id = ContractorId(contractor_id);
    match service.transition_status(&id, target) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: OnboardingServiceError) -> Response {
    let status = match &error {
        OnboardingServiceError::ContractorNotFound(_)
        | OnboardingServiceError::Registry(_)
        | OnboardingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        OnboardingServiceError::RouteNotSelected(_)
        | OnboardingServiceError::RouteSelectionNotAllowed { .. }
        | OnboardingServiceError::Transition(_) => StatusCode::BAD_REQUEST,
        OnboardingServiceError::RouteAlreadySelected { .. }
        | OnboardingServiceError::Repository(RepositoryError::VersionConflict { .. }) => {
            StatusCode::CONFLICT
        }
        OnboardingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
