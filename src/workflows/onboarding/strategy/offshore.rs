use super::OnboardingStrategy;
use crate::workflows::onboarding::catalog;
use crate::workflows::onboarding::domain::{OnboardingRoute, WorkflowStep};

/// International contractors on the standard route with no third party involved.
#[derive(Debug, Default, Clone, Copy)]
pub struct OffshoreStrategy;

impl OnboardingStrategy for OffshoreStrategy {
    fn route(&self) -> OnboardingRoute {
        OnboardingRoute::Offshore
    }

    fn display_name(&self) -> &'static str {
        "Offshore/International"
    }

    fn required_documents(&self) -> &'static [&'static str] {
        catalog::OFFSHORE_DOCUMENTS
    }

    fn workflow_steps(&self) -> &'static [WorkflowStep] {
        &catalog::OFFSHORE_STEPS
    }
}
