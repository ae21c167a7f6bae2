//! Adjacency table of legal contractor status changes.
//!
//! Every status mutation in the engine is checked against [`successors`]. Most edges move
//! strictly forward; the few backward edges (rejected → draft, awaiting COHF signature →
//! pending COHF, review → CDS recall, work order → approved) exist so a record can be edited and
//! resubmitted without leaving the graph.

use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{ContractorStatus, OnboardingRoute};

/// A requested status change that is absent from the adjacency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot transition from '{from}' to '{to}'")]
pub struct InvalidTransition {
    pub from: ContractorStatus,
    pub to: ContractorStatus,
}

/// Legal successors of `status`. Terminal statuses return an empty slice.
pub const fn successors(status: ContractorStatus) -> &'static [ContractorStatus] {
    use ContractorStatus::*;

    match status {
        Draft => &[PendingDocuments, Cancelled],
        PendingDocuments => &[DocumentsUploaded, Cancelled],
        DocumentsUploaded => &[
            PendingCohf,
            PendingThirdPartyQuote,
            PendingCdsCs,
            Cancelled,
        ],
        PendingCohf => &[AwaitingCohfSignature, Cancelled],
        AwaitingCohfSignature => &[CohfCompleted, PendingCohf, Cancelled],
        CohfCompleted => &[PendingCdsCs, Cancelled],
        PendingThirdPartyQuote => &[PendingCdsCs, Cancelled],
        PendingCdsCs => &[CdsCsCompleted, Cancelled],
        CdsCsCompleted => &[PendingReview, Cancelled],
        PendingReview => &[Approved, Rejected, PendingCdsCs],
        Approved => &[PendingClientWoSignature, Cancelled],
        Rejected => &[Draft, Cancelled],
        PendingClientWoSignature => &[WorkOrderCompleted, Approved, Cancelled],
        WorkOrderCompleted => &[PendingThirdPartyContract, PendingSignature, Cancelled],
        PendingThirdPartyContract => &[ContractApproved, Cancelled],
        PendingContractUpload => &[ContractUploaded, ContractApproved, Cancelled],
        ContractUploaded => &[ContractApproved, PendingContractUpload, Cancelled],
        ContractApproved => &[PendingSignature, Cancelled],
        PendingSignature => &[Signed, PendingSuperadminSignature, Cancelled],
        PendingSuperadminSignature => &[Signed, Cancelled],
        Signed => &[Active],
        Active => &[
            Suspended,
            Terminated,
            ExtensionPending,
            NoticePeriod,
            Offboarding,
        ],
        Suspended => &[Active, Terminated, NoticePeriod, Offboarding],
        ExtensionPending => &[Active, NoticePeriod],
        NoticePeriod => &[Offboarding, Offboarded, Active],
        Offboarding => &[Offboarded, Active],
        Offboarded | Cancelled | Terminated => &[],
    }
}

pub fn can_transition(from: ContractorStatus, to: ContractorStatus) -> bool {
    successors(from).contains(&to)
}

/// Validate a status change, returning the target status when it is legal.
pub fn transition(
    from: ContractorStatus,
    to: ContractorStatus,
) -> Result<ContractorStatus, InvalidTransition> {
    if can_transition(from, to) {
        Ok(to)
    } else {
        Err(InvalidTransition { from, to })
    }
}

pub fn allowed_transitions(from: ContractorStatus) -> BTreeSet<ContractorStatus> {
    successors(from).iter().copied().collect()
}

pub fn is_terminal(status: ContractorStatus) -> bool {
    successors(status).is_empty()
}

/// Resolve the successor of a branch point whose target depends on the onboarding route.
pub fn next_status_for_route(
    status: ContractorStatus,
    route: OnboardingRoute,
) -> Option<ContractorStatus> {
    match (status, route) {
        (ContractorStatus::DocumentsUploaded, OnboardingRoute::Uae) => {
            Some(ContractorStatus::PendingCohf)
        }
        (ContractorStatus::DocumentsUploaded, OnboardingRoute::Saudi) => {
            Some(ContractorStatus::PendingThirdPartyQuote)
        }
        (ContractorStatus::DocumentsUploaded, _) => Some(ContractorStatus::PendingCdsCs),
        (ContractorStatus::WorkOrderCompleted, OnboardingRoute::Uae) => {
            Some(ContractorStatus::PendingThirdPartyContract)
        }
        (ContractorStatus::WorkOrderCompleted, _) => Some(ContractorStatus::PendingSignature),
        _ => None,
    }
}

/// Ordered milestones used for progress reporting on each route.
pub const fn milestones(route: OnboardingRoute) -> &'static [ContractorStatus] {
    use ContractorStatus::*;

    match route {
        OnboardingRoute::Uae => &[
            Draft,
            PendingDocuments,
            DocumentsUploaded,
            PendingCohf,
            CohfCompleted,
            PendingCdsCs,
            CdsCsCompleted,
            PendingReview,
            Approved,
            WorkOrderCompleted,
            PendingThirdPartyContract,
            ContractApproved,
            Signed,
            Active,
        ],
        OnboardingRoute::Saudi => &[
            Draft,
            PendingDocuments,
            DocumentsUploaded,
            PendingThirdPartyQuote,
            PendingCdsCs,
            CdsCsCompleted,
            PendingReview,
            Approved,
            WorkOrderCompleted,
            Signed,
            Active,
        ],
        OnboardingRoute::Offshore | OnboardingRoute::Wps | OnboardingRoute::Freelancer => &[
            Draft,
            PendingDocuments,
            DocumentsUploaded,
            PendingCdsCs,
            CdsCsCompleted,
            PendingReview,
            Approved,
            WorkOrderCompleted,
            Signed,
            Active,
        ],
    }
}

/// Position of a contractor on their route's milestone list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkflowProgress {
    pub current_step: usize,
    pub total_steps: usize,
    pub percentage: u8,
    pub status: ContractorStatus,
    pub is_complete: bool,
}

/// Statuses that are not milestones (e.g. awaiting signatures) report step 0.
pub fn workflow_progress(status: ContractorStatus, route: OnboardingRoute) -> WorkflowProgress {
    let steps = milestones(route);
    let total_steps = steps.len();
    let current_step = steps
        .iter()
        .position(|milestone| *milestone == status)
        .map_or(0, |index| index + 1);

    let percentage = if total_steps == 0 {
        0
    } else {
        ((current_step as f64 / total_steps as f64) * 100.0).round() as u8
    };

    WorkflowProgress {
        current_step,
        total_steps,
        percentage,
        status,
        is_complete: status == ContractorStatus::Active,
    }
}
