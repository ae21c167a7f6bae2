use serde_json::json;

use super::{is_present, payload, standard_step, OnboardingStrategy};
use crate::workflows::onboarding::catalog;
use crate::workflows::onboarding::domain::{
    ContractorId, ContractorStatus, ExternalAction, OnboardingResult, OnboardingRoute, StepData,
    WorkflowStep,
};

/// Independent contractors with minimal document requirements and a freelancer agreement.
#[derive(Debug, Default, Clone, Copy)]
pub struct FreelancerStrategy;

impl OnboardingStrategy for FreelancerStrategy {
    fn route(&self) -> OnboardingRoute {
        OnboardingRoute::Freelancer
    }

    fn display_name(&self) -> &'static str {
        "Freelancer"
    }

    fn required_documents(&self) -> &'static [&'static str] {
        catalog::FREELANCER_DOCUMENTS
    }

    fn optional_documents(&self) -> &'static [&'static str] {
        catalog::FREELANCER_OPTIONAL_DOCUMENTS
    }

    fn workflow_steps(&self) -> &'static [WorkflowStep] {
        &catalog::FREELANCER_STEPS
    }

    fn execute_step(
        &self,
        contractor_id: &ContractorId,
        step_id: &str,
        current_status: ContractorStatus,
        _data: &StepData,
    ) -> OnboardingResult {
        if step_id == "contract" {
            return OnboardingResult::new(
                ContractorStatus::PendingSignature,
                "Freelancer agreement generated and sent for signature",
            )
            .with_external_action(ExternalAction::ContractSignature)
            .with_data(payload(json!({ "contract_type": "freelancer_agreement" })));
        }

        standard_step(self, contractor_id, step_id, current_status)
    }

    fn validate_step_data(&self, step_id: &str, data: &StepData) -> Vec<String> {
        if step_id == "cds_costing" && !is_present(data, "payment_method") {
            return vec!["Payment method is required for freelancers".to_string()];
        }

        Vec::new()
    }
}
