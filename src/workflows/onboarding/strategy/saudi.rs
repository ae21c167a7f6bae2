use serde_json::json;

use super::{field, is_present, payload, standard_step, OnboardingStrategy};
use crate::workflows::onboarding::catalog;
use crate::workflows::onboarding::domain::{
    ContractorId, ContractorStatus, ExternalAction, OnboardingResult, OnboardingRoute, StepData,
    WorkflowStep,
};

/// Contractors placed through a Saudi third party; a costing quote sheet precedes CDS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SaudiStrategy;

impl SaudiStrategy {
    fn request_quote_sheet(&self, contractor_id: &ContractorId, data: &StepData) -> OnboardingResult {
        OnboardingResult::new(
            ContractorStatus::PendingThirdPartyQuote,
            "Quote sheet request sent to 3rd party.",
        )
        .with_external_action(ExternalAction::QuoteSheetRequest)
        .with_data(payload(json!({
            "action": "send_quote_sheet_request",
            "contractor_id": contractor_id,
            "third_party_id": field(data, "third_party_id"),
        })))
    }

    fn receive_quote_sheet(&self, data: &StepData) -> OnboardingResult {
        OnboardingResult::new(
            ContractorStatus::PendingCdsCs,
            "Quote sheet received. Proceeding to CDS.",
        )
        .with_data(payload(json!({
            "quote_sheet_id": field(data, "quote_sheet_id"),
            "total_cost": field(data, "total_cost"),
        })))
    }
}

impl OnboardingStrategy for SaudiStrategy {
    fn route(&self) -> OnboardingRoute {
        OnboardingRoute::Saudi
    }

    fn display_name(&self) -> &'static str {
        "3rd Party Saudi Arabia"
    }

    fn required_documents(&self) -> &'static [&'static str] {
        catalog::SAUDI_DOCUMENTS
    }

    fn workflow_steps(&self) -> &'static [WorkflowStep] {
        &catalog::SAUDI_STEPS
    }

    fn execute_step(
        &self,
        contractor_id: &ContractorId,
        step_id: &str,
        current_status: ContractorStatus,
        data: &StepData,
    ) -> OnboardingResult {
        match step_id {
            "quote_sheet_request" => self.request_quote_sheet(contractor_id, data),
            "quote_sheet_received" => self.receive_quote_sheet(data),
            _ => standard_step(self, contractor_id, step_id, current_status),
        }
    }

    fn validate_step_data(&self, step_id: &str, data: &StepData) -> Vec<String> {
        let mut errors = Vec::new();

        match step_id {
            "quote_sheet_request" => {
                if !is_present(data, "third_party_id") {
                    errors.push("Third party ID is required".to_string());
                }
                if !is_present(data, "contractor_name") {
                    errors.push("Contractor name is required".to_string());
                }
            }
            "quote_sheet_received" => {
                if !is_present(data, "quote_sheet_id") {
                    errors.push("Quote sheet ID is required".to_string());
                }
            }
            _ => {}
        }

        errors
    }
}
