use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::domain::{
    ContractorId, ContractorStatus, ExternalAction, OnboardingResult, OnboardingRoute, StepData,
    WorkflowStep,
};
use super::notifications::{self, NotificationSender};
use super::registry::{RegistryError, RouteInfo, StrategyRegistry};
use super::repository::{
    ContractorRecord, ContractorRepository, RepositoryError, RouteAssignment, StatusUpdate,
};
use super::state_machine::{self, InvalidTransition, WorkflowProgress};

/// Stateless coordinator tying the registry, repository, and notification hooks together.
pub struct OnboardingService<R, N> {
    registry: Arc<StrategyRegistry>,
    repository: Arc<R>,
    notifications: Arc<N>,
    dispatch_enabled: bool,
}

impl<R, N> OnboardingService<R, N>
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    pub fn new(registry: Arc<StrategyRegistry>, repository: Arc<R>, notifications: Arc<N>) -> Self {
        Self {
            registry,
            repository,
            notifications,
            dispatch_enabled: true,
        }
    }

    /// Toggle outbound notifications; status transitions are persisted either way.
    pub fn with_dispatch(mut self, enabled: bool) -> Self {
        self.dispatch_enabled = enabled;
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Snapshot of where a contractor sits in their route's workflow.
    pub fn workflow_status(
        &self,
        contractor_id: &ContractorId,
    ) -> Result<WorkflowStatusView, OnboardingServiceError> {
        let record = self.load(contractor_id)?;

        let Some(route) = record.route else {
            return Ok(WorkflowStatusView {
                contractor_id: record.id,
                current_status: record.status,
                route: None,
                workflow_steps: Vec::new(),
                current_step: None,
                completed_steps: Vec::new(),
                pending_steps: Vec::new(),
                progress: None,
                message: Some("Onboarding route not yet selected".to_string()),
            });
        };

        let strategy = self.registry.get_route(route)?;
        let steps = strategy.workflow_steps();
        let current = strategy.current_step(record.status);

        let (completed_steps, pending_steps) = match current {
            Some(current) => (
                steps
                    .iter()
                    .filter(|step| step.order < current.order)
                    .map(|step| step.id)
                    .collect(),
                steps
                    .iter()
                    .filter(|step| step.order > current.order)
                    .map(|step| step.id)
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Ok(WorkflowStatusView {
            contractor_id: record.id,
            current_status: record.status,
            route: Some(route),
            workflow_steps: steps.to_vec(),
            current_step: current.map(|step| step.id),
            completed_steps,
            pending_steps,
            progress: Some(state_machine::workflow_progress(record.status, route)),
            message: None,
        })
    }

    /// Validate and execute one step, persisting the resulting status.
    pub fn execute_step(
        &self,
        contractor_id: &ContractorId,
        step_id: &str,
        data: StepData,
    ) -> Result<OnboardingResult, OnboardingServiceError> {
        let record = self.load(contractor_id)?;
        let route = record
            .route
            .ok_or_else(|| OnboardingServiceError::RouteNotSelected(contractor_id.clone()))?;
        let strategy = self.registry.get_route(route)?;

        let errors = strategy.validate_step_data(step_id, &data);
        if !errors.is_empty() {
            debug!(%contractor_id, step = step_id, ?errors, "step data rejected");
            return Ok(OnboardingResult::new(
                record.status,
                format!("Validation failed: {}", errors.join(", ")),
            ));
        }

        let result = strategy.execute_step(contractor_id, step_id, record.status, &data);

        if result.next_status != record.status {
            state_machine::transition(record.status, result.next_status)?;
            self.repository.update_status(
                contractor_id,
                StatusUpdate {
                    status: result.next_status,
                    expected_version: record.version,
                    updated_at: Utc::now(),
                },
            )?;
        }

        info!(
            %contractor_id,
            step = step_id,
            %route,
            from = %record.status,
            next_status = %result.next_status,
            requires_external_action = result.requires_external_action,
            "onboarding step executed"
        );

        if let Some(action) = result.external_action_type {
            self.dispatch(action, &record, &data, result.data.as_ref());
        }

        Ok(result)
    }

    /// Best-effort recommendation of who should act next and on what.
    pub fn next_action(
        &self,
        contractor_id: &ContractorId,
    ) -> Result<NextAction, OnboardingServiceError> {
        let record = self.load(contractor_id)?;

        if record.status == ContractorStatus::PendingDocuments {
            return Ok(NextAction {
                action: "upload_documents",
                description: "Contractor needs to upload required documents",
                actor: Some(Actor::Contractor),
            });
        }

        let Some(route) = record.route else {
            if record.status == ContractorStatus::DocumentsUploaded {
                return Ok(NextAction {
                    action: "select_route",
                    description: "Admin needs to select onboarding route",
                    actor: Some(Actor::Admin),
                });
            }
            return Ok(NextAction::none());
        };

        let strategy = self.registry.get_route(route)?;
        Ok(match strategy.current_step(record.status) {
            Some(step) => NextAction {
                action: step.id,
                description: step.description,
                actor: Some(Actor::for_step(step.id)),
            },
            None => NextAction::none(),
        })
    }

    pub fn available_routes(&self) -> Vec<RouteInfo> {
        self.registry.route_info()
    }

    pub fn required_documents(
        &self,
        route_id: &str,
    ) -> Result<RouteDocuments, OnboardingServiceError> {
        let strategy = self.registry.get(route_id)?;
        Ok(RouteDocuments {
            route: strategy.route(),
            required: strategy.required_documents(),
            optional: strategy.optional_documents(),
        })
    }

    /// Record the contractor's route once documents are in, moving them onto the route's first
    /// branch status in the same write. Repeating the same choice is accepted without a write.
    pub fn select_route(
        &self,
        contractor_id: &ContractorId,
        route_id: &str,
    ) -> Result<ContractorRecord, OnboardingServiceError> {
        let strategy = self.registry.get(route_id)?;
        let route = strategy.route();
        let record = self.load(contractor_id)?;

        match record.route {
            Some(existing) if existing == route => return Ok(record),
            Some(existing) => {
                return Err(OnboardingServiceError::RouteAlreadySelected {
                    contractor_id: contractor_id.clone(),
                    existing,
                    requested: route,
                })
            }
            None => {}
        }

        if record.status != ContractorStatus::DocumentsUploaded {
            return Err(OnboardingServiceError::RouteSelectionNotAllowed {
                contractor_id: contractor_id.clone(),
                status: record.status,
            });
        }

        let next = strategy
            .next_status(record.status)
            .unwrap_or(record.status);
        if next != record.status {
            state_machine::transition(record.status, next)?;
        }

        let stored = self.repository.assign_route(
            contractor_id,
            RouteAssignment {
                route,
                status: next,
                expected_version: record.version,
                updated_at: Utc::now(),
            },
        )?;
        info!(%contractor_id, %route, next_status = %next, "onboarding route selected");
        Ok(stored)
    }

    /// Administrative status change (approve, reject, cancel, suspend, offboard, ...).
    ///
    /// Opening the documents stage asks the contractor for their uploads.
    pub fn transition_status(
        &self,
        contractor_id: &ContractorId,
        target: ContractorStatus,
    ) -> Result<ContractorRecord, OnboardingServiceError> {
        let record = self.load(contractor_id)?;
        let next = state_machine::transition(record.status, target)?;

        let stored = self.repository.update_status(
            contractor_id,
            StatusUpdate {
                status: next,
                expected_version: record.version,
                updated_at: Utc::now(),
            },
        )?;

        info!(%contractor_id, from = %record.status, to = %next, "contractor status changed");

        if record.status == ContractorStatus::Draft && next == ContractorStatus::PendingDocuments {
            let request = self.document_request(&stored);
            self.dispatch(ExternalAction::DocumentUpload, &stored, &request, None);
        }

        Ok(stored)
    }

    fn document_request(&self, record: &ContractorRecord) -> StepData {
        let mut request = StepData::new();
        request.insert("contractor_id".to_string(), json!(record.id));
        let strategy = record.route.and_then(|route| self.registry.get_route(route).ok());
        if let Some(strategy) = strategy {
            let documents = strategy.required_documents().join(", ");
            request.insert("required_documents".to_string(), json!(documents));
        }
        request
    }

    fn load(&self, contractor_id: &ContractorId) -> Result<ContractorRecord, OnboardingServiceError> {
        self.repository
            .fetch(contractor_id)?
            .ok_or_else(|| OnboardingServiceError::ContractorNotFound(contractor_id.clone()))
    }

    fn dispatch(
        &self,
        action: ExternalAction,
        record: &ContractorRecord,
        step_data: &StepData,
        result_data: Option<&StepData>,
    ) {
        if !self.dispatch_enabled {
            debug!(contractor_id = %record.id, %action, "notification dispatch disabled");
            return;
        }

        let Some(envelope) = notifications::envelope_for(action, record, step_data, result_data)
        else {
            warn!(contractor_id = %record.id, %action, "no recipient for external action");
            return;
        };

        if let Err(error) = notifications::dispatch(self.notifications.as_ref(), envelope) {
            warn!(contractor_id = %record.id, %action, %error, "external action dispatch failed");
        }
    }
}

/// Party expected to act on a workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Contractor,
    Admin,
    Client,
    ThirdParty,
}

impl Actor {
    pub fn for_step(step_id: &str) -> Self {
        match step_id {
            "documents" | "contract" => Self::Contractor,
            "work_order" => Self::Client,
            "cohf" | "quote_sheet" | "third_party_contract" => Self::ThirdParty,
            _ => Self::Admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextAction {
    pub action: &'static str,
    pub description: &'static str,
    pub actor: Option<Actor>,
}

impl NextAction {
    fn none() -> Self {
        Self {
            action: "none",
            description: "No pending actions",
            actor: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStatusView {
    pub contractor_id: ContractorId,
    pub current_status: ContractorStatus,
    pub route: Option<OnboardingRoute>,
    pub workflow_steps: Vec<WorkflowStep>,
    pub current_step: Option<&'static str>,
    pub completed_steps: Vec<&'static str>,
    pub pending_steps: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<WorkflowProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDocuments {
    pub route: OnboardingRoute,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

#[derive(Debug, thiserror::Error)]
pub enum OnboardingServiceError {
    #[error("contractor '{0}' not found")]
    ContractorNotFound(ContractorId),
    #[error("cannot execute step: onboarding route not selected for contractor '{0}'")]
    RouteNotSelected(ContractorId),
    #[error("contractor '{contractor_id}' is already on route '{existing}', cannot switch to '{requested}'")]
    RouteAlreadySelected {
        contractor_id: ContractorId,
        existing: OnboardingRoute,
        requested: OnboardingRoute,
    },
    #[error("route can only be selected after documents are uploaded (contractor '{contractor_id}' is '{status}')")]
    RouteSelectionNotAllowed {
        contractor_id: ContractorId,
        status: ContractorStatus,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
