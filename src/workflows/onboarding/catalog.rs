use super::domain::{ContractorStatus, OnboardingRoute, WorkflowStep};
use super::state_machine;

const fn step(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    order: u8,
) -> WorkflowStep {
    WorkflowStep {
        id,
        name,
        description,
        required: true,
        order,
    }
}

const ADMIN_REVIEW: &str = "Admin reviews and approves contractor details";
const WORK_ORDER: &str = "Generate and send work order to client for signature";
const CDS_COSTING: &str = "Complete contractor data sheet and costing information";
const ACTIVATION: &str = "Activate contractor account with login credentials";

pub const UAE_DOCUMENTS: &[&str] = &["passport", "photo", "emirates_id", "visa", "degree"];
pub const SAUDI_DOCUMENTS: &[&str] = &["passport", "photo", "degree", "iqama"];
pub const WPS_DOCUMENTS: &[&str] = &["passport", "photo", "emirates_id", "visa", "degree"];
pub const FREELANCER_DOCUMENTS: &[&str] = &["passport", "photo"];
pub const FREELANCER_OPTIONAL_DOCUMENTS: &[&str] = &["degree", "portfolio", "certifications"];
pub const OFFSHORE_DOCUMENTS: &[&str] = &["passport", "photo", "degree"];

pub const UAE_STEPS: [WorkflowStep; 8] = [
    step(
        "documents",
        "Document Upload",
        "Upload required documents (passport, photo, Emirates ID, visa)",
        1,
    ),
    step(
        "route_selection",
        "Route Selection",
        "Select onboarding route and third party",
        2,
    ),
    step(
        "cohf",
        "Cost of Hire Form",
        "Complete and submit COHF for 3rd party signature",
        3,
    ),
    step("cds_costing", "CDS & Costing Sheet", CDS_COSTING, 4),
    step("admin_review", "Admin Review", ADMIN_REVIEW, 5),
    step("work_order", "Work Order", WORK_ORDER, 6),
    step(
        "third_party_contract",
        "3rd Party Contract",
        "3rd party uploads their employment contract",
        7,
    ),
    step("activation", "Activation", ACTIVATION, 8),
];

pub const SAUDI_STEPS: [WorkflowStep; 8] = [
    step(
        "documents",
        "Document Upload",
        "Upload required documents (passport, photo, degree, iqama)",
        1,
    ),
    step(
        "route_selection",
        "Route Selection",
        "Select onboarding route and third party",
        2,
    ),
    step(
        "quote_sheet",
        "Quote Sheet",
        "Request and receive costing quote from 3rd party",
        3,
    ),
    step("cds_costing", "CDS & Costing Sheet", CDS_COSTING, 4),
    step("admin_review", "Admin Review", ADMIN_REVIEW, 5),
    step("work_order", "Work Order", WORK_ORDER, 6),
    step(
        "contract",
        "Employment Contract",
        "Generate and send employment contract",
        7,
    ),
    step("activation", "Activation", ACTIVATION, 8),
];

pub const WPS_STEPS: [WorkflowStep; 7] = [
    step(
        "documents",
        "Document Upload",
        "Upload required documents (passport, photo, Emirates ID, visa, degree)",
        1,
    ),
    step("route_selection", "Route Selection", "Select onboarding route", 2),
    step("cds_costing", "CDS & Costing Sheet", CDS_COSTING, 3),
    step("admin_review", "Admin Review", ADMIN_REVIEW, 4),
    step("work_order", "Work Order", WORK_ORDER, 5),
    step(
        "contract",
        "Employment Contract",
        "Generate and send WPS-compliant employment contract",
        6,
    ),
    step("activation", "Activation", ACTIVATION, 7),
];

pub const FREELANCER_STEPS: [WorkflowStep; 7] = [
    step(
        "documents",
        "Document Upload",
        "Upload required documents (passport, photo)",
        1,
    ),
    step("route_selection", "Route Selection", "Select onboarding route", 2),
    step("cds_costing", "CDS & Costing Sheet", CDS_COSTING, 3),
    step("admin_review", "Admin Review", ADMIN_REVIEW, 4),
    step("work_order", "Work Order", WORK_ORDER, 5),
    step(
        "contract",
        "Freelancer Agreement",
        "Generate and send freelancer agreement",
        6,
    ),
    step("activation", "Activation", ACTIVATION, 7),
];

pub const OFFSHORE_STEPS: [WorkflowStep; 7] = [
    step(
        "documents",
        "Document Upload",
        "Upload required documents (passport, photo, degree)",
        1,
    ),
    step("route_selection", "Route Selection", "Select onboarding route", 2),
    step("cds_costing", "CDS & Costing Sheet", CDS_COSTING, 3),
    step("admin_review", "Admin Review", ADMIN_REVIEW, 4),
    step("work_order", "Work Order", WORK_ORDER, 5),
    step(
        "contract",
        "Employment Contract",
        "Generate and send employment contract",
        6,
    ),
    step("activation", "Activation", ACTIVATION, 7),
];

/// Automatic successor for a status on a given route.
///
/// Branch points (documents uploaded, work order completed) defer to the transition graph;
/// the UAE COHF chain and the Saudi quote chain are the only route-specific rows. Statuses that
/// wait on a human decision (review, rejection) or sit outside onboarding have no entry.
pub fn next_status(route: OnboardingRoute, status: ContractorStatus) -> Option<ContractorStatus> {
    use ContractorStatus::*;

    match (route, status) {
        (_, DocumentsUploaded | WorkOrderCompleted) => {
            state_machine::next_status_for_route(status, route)
        }
        (OnboardingRoute::Uae, PendingCohf) => Some(AwaitingCohfSignature),
        (OnboardingRoute::Uae, AwaitingCohfSignature) => Some(CohfCompleted),
        (OnboardingRoute::Uae, CohfCompleted) => Some(PendingCdsCs),
        (OnboardingRoute::Uae, PendingThirdPartyContract) => Some(ContractApproved),
        (OnboardingRoute::Uae, ContractApproved) => Some(PendingSignature),
        (OnboardingRoute::Saudi, PendingThirdPartyQuote) => Some(PendingCdsCs),
        (_, PendingCdsCs) => Some(CdsCsCompleted),
        (_, CdsCsCompleted) => Some(PendingReview),
        (_, Approved) => Some(PendingClientWoSignature),
        (_, PendingClientWoSignature) => Some(WorkOrderCompleted),
        (_, PendingSignature) => Some(Signed),
        (_, Signed) => Some(Active),
        _ => None,
    }
}

/// Step id a contractor is working on while in `status`. Several statuses share a step.
pub fn step_for_status(route: OnboardingRoute, status: ContractorStatus) -> Option<&'static str> {
    use ContractorStatus::*;

    match (route, status) {
        (_, PendingDocuments) => Some("documents"),
        (_, DocumentsUploaded) => Some("route_selection"),
        (OnboardingRoute::Uae, PendingCohf | AwaitingCohfSignature) => Some("cohf"),
        (OnboardingRoute::Uae, CohfCompleted) => Some("cds_costing"),
        (OnboardingRoute::Saudi, PendingThirdPartyQuote) => Some("quote_sheet"),
        (_, PendingCdsCs) => Some("cds_costing"),
        (_, CdsCsCompleted | PendingReview) => Some("admin_review"),
        (_, Approved | PendingClientWoSignature) => Some("work_order"),
        (OnboardingRoute::Uae, WorkOrderCompleted | PendingThirdPartyContract) => {
            Some("third_party_contract")
        }
        (OnboardingRoute::Uae, ContractApproved | Signed) => Some("activation"),
        (OnboardingRoute::Uae, _) => None,
        (_, WorkOrderCompleted | PendingSignature) => Some("contract"),
        (_, Signed) => Some("activation"),
        _ => None,
    }
}
