use serde_json::json;

use super::{payload, standard_step, OnboardingStrategy};
use crate::workflows::onboarding::catalog;
use crate::workflows::onboarding::domain::{
    ContractorId, ContractorStatus, ExternalAction, OnboardingResult, OnboardingRoute, StepData,
    WorkflowStep,
};

/// UAE-resident contractors paid through the Wage Protection System.
#[derive(Debug, Default, Clone, Copy)]
pub struct WpsStrategy;

impl OnboardingStrategy for WpsStrategy {
    fn route(&self) -> OnboardingRoute {
        OnboardingRoute::Wps
    }

    fn display_name(&self) -> &'static str {
        "WPS (Wage Protection System)"
    }

    fn required_documents(&self) -> &'static [&'static str] {
        catalog::WPS_DOCUMENTS
    }

    fn workflow_steps(&self) -> &'static [WorkflowStep] {
        &catalog::WPS_STEPS
    }

    fn execute_step(
        &self,
        contractor_id: &ContractorId,
        step_id: &str,
        current_status: ContractorStatus,
        _data: &StepData,
    ) -> OnboardingResult {
        if step_id == "contract" {
            // Contract terms must satisfy WPS payroll rules.
            return OnboardingResult::new(
                ContractorStatus::PendingSignature,
                "WPS-compliant employment contract generated and sent for signature",
            )
            .with_external_action(ExternalAction::ContractSignature)
            .with_data(payload(json!({ "wps_compliant": true })));
        }

        standard_step(self, contractor_id, step_id, current_status)
    }
}
