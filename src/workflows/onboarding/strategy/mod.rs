//! Route-specific onboarding behavior.
//!
//! Each route implements [`OnboardingStrategy`]; the shared defaults read the consolidated
//! tables in [`catalog`](super::catalog) so a strategy only overrides what genuinely differs on
//! its route.

mod freelancer;
mod offshore;
mod saudi;
mod uae;
mod wps;

pub use freelancer::FreelancerStrategy;
pub use offshore::OffshoreStrategy;
pub use saudi::SaudiStrategy;
pub use uae::UaeStrategy;
pub use wps::WpsStrategy;

use std::fmt;

use serde_json::{json, Value};

use super::catalog;
use super::domain::{
    ContractorId, ContractorStatus, ExternalAction, OnboardingResult, OnboardingRoute, StepData,
    WorkflowStep,
};

/// Capabilities every onboarding route provides.
///
/// Strategies are stateless: `execute_step` receives the contractor's current status from the
/// caller and never reads or writes persisted state itself.
pub trait OnboardingStrategy: fmt::Debug + Send + Sync {
    fn route(&self) -> OnboardingRoute;

    fn display_name(&self) -> &'static str;

    fn required_documents(&self) -> &'static [&'static str];

    fn workflow_steps(&self) -> &'static [WorkflowStep];

    fn route_name(&self) -> &'static str {
        self.route().as_str()
    }

    fn optional_documents(&self) -> &'static [&'static str] {
        &[]
    }

    fn next_status(&self, current: ContractorStatus) -> Option<ContractorStatus> {
        catalog::next_status(self.route(), current)
    }

    fn execute_step(
        &self,
        contractor_id: &ContractorId,
        step_id: &str,
        current_status: ContractorStatus,
        data: &StepData,
    ) -> OnboardingResult {
        let _ = data;
        standard_step(self, contractor_id, step_id, current_status)
    }

    /// Advisory checks run before `execute_step`; an empty list means the data is acceptable.
    fn validate_step_data(&self, step_id: &str, data: &StepData) -> Vec<String> {
        let _ = (step_id, data);
        Vec::new()
    }

    fn step_by_id(&self, step_id: &str) -> Option<&'static WorkflowStep> {
        self.workflow_steps().iter().find(|step| step.id == step_id)
    }

    fn current_step(&self, status: ContractorStatus) -> Option<&'static WorkflowStep> {
        catalog::step_for_status(self.route(), status).and_then(|id| self.step_by_id(id))
    }
}

/// Steps every route handles the same way. Step ids outside the route's catalog never move the
/// contractor; catalog steps advance along the route's next-status table.
pub(crate) fn standard_step<S>(
    strategy: &S,
    contractor_id: &ContractorId,
    step_id: &str,
    current_status: ContractorStatus,
) -> OnboardingResult
where
    S: OnboardingStrategy + ?Sized,
{
    match (step_id, current_status) {
        ("work_order", ContractorStatus::Approved) => OnboardingResult::new(
            ContractorStatus::PendingClientWoSignature,
            "Work order sent to client for signature.",
        )
        .with_external_action(ExternalAction::WorkOrder)
        .with_data(payload(json!({
            "action": "send_work_order",
            "contractor_id": contractor_id,
        }))),
        _ if strategy.step_by_id(step_id).is_none() => advance(None, step_id, current_status),
        _ => advance(strategy.next_status(current_status), step_id, current_status),
    }
}

fn advance(
    next: Option<ContractorStatus>,
    step_id: &str,
    current_status: ContractorStatus,
) -> OnboardingResult {
    match next {
        Some(next_status) => OnboardingResult::new(
            next_status,
            format!("Step '{step_id}' completed successfully"),
        ),
        None => OnboardingResult::new(
            current_status,
            format!("No automatic transition for step '{step_id}'"),
        ),
    }
}

/// Form values count as present unless null, false, zero, or empty. Whitespace is a value.
pub(crate) fn is_present(data: &StepData, field: &str) -> bool {
    match data.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Number(number)) => number.as_f64().map_or(true, |value| value != 0.0),
    }
}

pub(crate) fn missing_fields(data: &StepData, fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .filter(|field| !is_present(data, field))
        .map(|field| format!("Missing required field: {field}"))
        .collect()
}

pub(crate) fn field(data: &StepData, name: &str) -> Value {
    data.get(name).cloned().unwrap_or(Value::Null)
}

/// Build a result payload from a `json!` object literal.
pub(crate) fn payload(value: Value) -> StepData {
    match value {
        Value::Object(map) => map,
        _ => StepData::new(),
    }
}
