use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier wrapper for contractors owned by the hiring system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractorId(pub String);

impl ContractorId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Opaque step input collected from forms and document uploads.
pub type StepData = Map<String, Value>;

/// Every lifecycle state a contractor can occupy, from draft through offboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractorStatus {
    Draft,
    PendingDocuments,
    DocumentsUploaded,
    PendingCohf,
    AwaitingCohfSignature,
    CohfCompleted,
    PendingThirdPartyQuote,
    PendingCdsCs,
    CdsCsCompleted,
    PendingReview,
    Approved,
    Rejected,
    PendingClientWoSignature,
    WorkOrderCompleted,
    #[serde(rename = "pending_3rd_party_contract")]
    PendingThirdPartyContract,
    PendingContractUpload,
    ContractUploaded,
    ContractApproved,
    PendingSignature,
    PendingSuperadminSignature,
    Signed,
    Active,
    Suspended,
    ExtensionPending,
    NoticePeriod,
    Offboarding,
    Offboarded,
    Cancelled,
    Terminated,
}

impl ContractorStatus {
    pub const ALL: [Self; 29] = [
        Self::Draft,
        Self::PendingDocuments,
        Self::DocumentsUploaded,
        Self::PendingCohf,
        Self::AwaitingCohfSignature,
        Self::CohfCompleted,
        Self::PendingThirdPartyQuote,
        Self::PendingCdsCs,
        Self::CdsCsCompleted,
        Self::PendingReview,
        Self::Approved,
        Self::Rejected,
        Self::PendingClientWoSignature,
        Self::WorkOrderCompleted,
        Self::PendingThirdPartyContract,
        Self::PendingContractUpload,
        Self::ContractUploaded,
        Self::ContractApproved,
        Self::PendingSignature,
        Self::PendingSuperadminSignature,
        Self::Signed,
        Self::Active,
        Self::Suspended,
        Self::ExtensionPending,
        Self::NoticePeriod,
        Self::Offboarding,
        Self::Offboarded,
        Self::Cancelled,
        Self::Terminated,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingDocuments => "pending_documents",
            Self::DocumentsUploaded => "documents_uploaded",
            Self::PendingCohf => "pending_cohf",
            Self::AwaitingCohfSignature => "awaiting_cohf_signature",
            Self::CohfCompleted => "cohf_completed",
            Self::PendingThirdPartyQuote => "pending_third_party_quote",
            Self::PendingCdsCs => "pending_cds_cs",
            Self::CdsCsCompleted => "cds_cs_completed",
            Self::PendingReview => "pending_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::PendingClientWoSignature => "pending_client_wo_signature",
            Self::WorkOrderCompleted => "work_order_completed",
            Self::PendingThirdPartyContract => "pending_3rd_party_contract",
            Self::PendingContractUpload => "pending_contract_upload",
            Self::ContractUploaded => "contract_uploaded",
            Self::ContractApproved => "contract_approved",
            Self::PendingSignature => "pending_signature",
            Self::PendingSuperadminSignature => "pending_superadmin_signature",
            Self::Signed => "signed",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::ExtensionPending => "extension_pending",
            Self::NoticePeriod => "notice_period",
            Self::Offboarding => "offboarding",
            Self::Offboarded => "offboarded",
            Self::Cancelled => "cancelled",
            Self::Terminated => "terminated",
        }
    }

    /// Statuses at the beginning of onboarding.
    pub const fn initial() -> [Self; 3] {
        [Self::Draft, Self::PendingDocuments, Self::DocumentsUploaded]
    }

    /// Statuses of contractors currently on assignment.
    pub const fn active() -> [Self; 2] {
        [Self::Active, Self::ExtensionPending]
    }

    pub const fn terminal() -> [Self; 3] {
        [Self::Cancelled, Self::Terminated, Self::Offboarded]
    }

    pub const fn offboarding() -> [Self; 2] {
        [Self::NoticePeriod, Self::Offboarding]
    }

    /// Offboarded contractors may be hired again under a new record.
    pub const fn rehirable() -> [Self; 1] {
        [Self::Offboarded]
    }
}

impl fmt::Display for ContractorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ContractorStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown contractor status '{0}'")]
pub struct UnknownStatus(pub String);

/// Onboarding path chosen for a contractor based on location and engagement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingRoute {
    Uae,
    Saudi,
    Offshore,
    Wps,
    Freelancer,
}

impl OnboardingRoute {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Uae,
            Self::Saudi,
            Self::Offshore,
            Self::Wps,
            Self::Freelancer,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uae => "uae",
            Self::Saudi => "saudi",
            Self::Offshore => "offshore",
            Self::Wps => "wps",
            Self::Freelancer => "freelancer",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Uae => "3rd Party UAE",
            Self::Saudi => "3rd Party Saudi Arabia",
            Self::Offshore => "Offshore/International",
            Self::Wps => "WPS (Wage Protection System)",
            Self::Freelancer => "Freelancer",
        }
    }

    pub const fn requires_third_party(self) -> bool {
        matches!(self, Self::Uae | Self::Saudi)
    }

    pub const fn requires_cohf(self) -> bool {
        matches!(self, Self::Uae)
    }

    pub const fn requires_quote_sheet(self) -> bool {
        matches!(self, Self::Saudi)
    }
}

impl fmt::Display for OnboardingRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OnboardingRoute {
    type Err = UnknownRoute;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|route| route.as_str() == normalized)
            .ok_or_else(|| UnknownRoute(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown onboarding route '{0}'")]
pub struct UnknownRoute(pub String);

/// Smallest externally actionable unit of a route's workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkflowStep {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub order: u8,
}

/// Work the engine cannot perform itself and hands to the notification layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalAction {
    DocumentUpload,
    ContractSignature,
    CohfSignature,
    QuoteSheetRequest,
    ThirdPartyContract,
    WorkOrder,
}

impl ExternalAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DocumentUpload => "document_upload",
            Self::ContractSignature => "contract_signature",
            Self::CohfSignature => "cohf_signature",
            Self::QuoteSheetRequest => "quote_sheet_request",
            Self::ThirdPartyContract => "third_party_contract",
            Self::WorkOrder => "work_order",
        }
    }
}

impl fmt::Display for ExternalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Output of a single step execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnboardingResult {
    pub next_status: ContractorStatus,
    pub message: String,
    pub requires_external_action: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_action_type: Option<ExternalAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StepData>,
}

impl OnboardingResult {
    pub fn new(next_status: ContractorStatus, message: impl Into<String>) -> Self {
        Self {
            next_status,
            message: message.into(),
            requires_external_action: false,
            external_action_type: None,
            data: None,
        }
    }

    pub fn with_external_action(mut self, action: ExternalAction) -> Self {
        self.requires_external_action = true;
        self.external_action_type = Some(action);
        self
    }

    pub fn with_data(mut self, data: StepData) -> Self {
        self.data = Some(data);
        self
    }
}
