use serde_json::json;

use super::{field, is_present, missing_fields, payload, standard_step, OnboardingStrategy};
use crate::workflows::onboarding::catalog;
use crate::workflows::onboarding::domain::{
    ContractorId, ContractorStatus, ExternalAction, OnboardingResult, OnboardingRoute, StepData,
    WorkflowStep,
};

/// Contractors placed through a UAE third party.
///
/// A Cost of Hire Form must be countersigned by the third party before CDS, and the third party
/// supplies the employment contract instead of the operator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UaeStrategy;

impl UaeStrategy {
    fn submit_cohf(&self, contractor_id: &ContractorId) -> OnboardingResult {
        OnboardingResult::new(
            ContractorStatus::AwaitingCohfSignature,
            "COHF form submitted. Awaiting 3rd party signature.",
        )
        .with_external_action(ExternalAction::CohfSignature)
        .with_data(payload(json!({
            "action": "send_cohf_to_third_party",
            "contractor_id": contractor_id,
            "counterparty": "third_party",
        })))
    }

    fn record_cohf_signature(&self, data: &StepData) -> OnboardingResult {
        OnboardingResult::new(
            ContractorStatus::CohfCompleted,
            "COHF signed by all parties. Proceeding to CDS.",
        )
        .with_data(payload(json!({
            "signed_cohf_url": field(data, "signed_document_url"),
        })))
    }

    fn request_third_party_contract(&self, contractor_id: &ContractorId) -> OnboardingResult {
        OnboardingResult::new(
            ContractorStatus::PendingThirdPartyContract,
            "Work order complete. Contract requested from 3rd party.",
        )
        .with_external_action(ExternalAction::ThirdPartyContract)
        .with_data(payload(json!({
            "action": "request_third_party_contract",
            "contractor_id": contractor_id,
        })))
    }

    fn accept_third_party_contract(&self, data: &StepData) -> OnboardingResult {
        OnboardingResult::new(
            ContractorStatus::ContractApproved,
            "3rd party contract uploaded and approved.",
        )
        .with_data(payload(json!({
            "contract_url": field(data, "contract_url"),
        })))
    }
}

impl OnboardingStrategy for UaeStrategy {
    fn route(&self) -> OnboardingRoute {
        OnboardingRoute::Uae
    }

    fn display_name(&self) -> &'static str {
        "3rd Party UAE"
    }

    fn required_documents(&self) -> &'static [&'static str] {
        catalog::UAE_DOCUMENTS
    }

    fn workflow_steps(&self) -> &'static [WorkflowStep] {
        &catalog::UAE_STEPS
    }

    fn execute_step(
        &self,
        contractor_id: &ContractorId,
        step_id: &str,
        current_status: ContractorStatus,
        data: &StepData,
    ) -> OnboardingResult {
        match step_id {
            "cohf" => self.submit_cohf(contractor_id),
            "cohf_signature" => self.record_cohf_signature(data),
            "third_party_contract_request" => self.request_third_party_contract(contractor_id),
            "third_party_contract" => self.accept_third_party_contract(data),
            _ => standard_step(self, contractor_id, step_id, current_status),
        }
    }

    fn validate_step_data(&self, step_id: &str, data: &StepData) -> Vec<String> {
        match step_id {
            "cohf" => missing_fields(data, &["employee_name", "remuneration", "third_party_id"]),
            "third_party_contract" if !is_present(data, "contract_url") => {
                vec!["Contract document URL is required".to_string()]
            }
            _ => Vec::new(),
        }
    }
}
