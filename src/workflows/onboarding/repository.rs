use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ContractorId, ContractorStatus, OnboardingRoute};

/// Contact details the notification layer needs for the contractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractorProfile {
    pub full_name: String,
    pub email: String,
}

/// Persisted onboarding state for one contractor.
///
/// `version` increments on every write and guards concurrent status updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorRecord {
    pub id: ContractorId,
    pub status: ContractorStatus,
    pub route: Option<OnboardingRoute>,
    pub version: u64,
    pub profile: ContractorProfile,
    pub updated_at: DateTime<Utc>,
}

impl ContractorRecord {
    pub fn draft(id: ContractorId, profile: ContractorProfile, now: DateTime<Utc>) -> Self {
        Self {
            id,
            status: ContractorStatus::Draft,
            route: None,
            version: 0,
            profile,
            updated_at: now,
        }
    }

    /// Apply a status write if the caller observed the current version.
    pub fn apply(&mut self, update: &StatusUpdate) -> Result<(), RepositoryError> {
        self.check_version(update.expected_version)?;
        self.status = update.status;
        self.updated_at = update.updated_at;
        self.version += 1;
        Ok(())
    }

    /// Record the route and the status it branches into as one write.
    pub fn assign(&mut self, assignment: &RouteAssignment) -> Result<(), RepositoryError> {
        self.check_version(assignment.expected_version)?;
        self.route = Some(assignment.route);
        self.status = assignment.status;
        self.updated_at = assignment.updated_at;
        self.version += 1;
        Ok(())
    }

    fn check_version(&self, expected: u64) -> Result<(), RepositoryError> {
        if self.version != expected {
            return Err(RepositoryError::VersionConflict {
                expected,
                actual: self.version,
            });
        }
        Ok(())
    }
}

/// Compare-and-swap status write.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: ContractorStatus,
    pub expected_version: u64,
    pub updated_at: DateTime<Utc>,
}

/// Compare-and-swap route selection carrying the status the route branches into.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAssignment {
    pub route: OnboardingRoute,
    pub status: ContractorStatus,
    pub expected_version: u64,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction so the service can be exercised without a database.
pub trait ContractorRepository: Send + Sync {
    fn fetch(&self, id: &ContractorId) -> Result<Option<ContractorRecord>, RepositoryError>;
    fn update_status(
        &self,
        id: &ContractorId,
        update: StatusUpdate,
    ) -> Result<ContractorRecord, RepositoryError>;
    fn assign_route(
        &self,
        id: &ContractorId,
        assignment: RouteAssignment,
    ) -> Result<ContractorRecord, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("contractor not found")]
    NotFound,
    #[error("contractor was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict { expected: u64, actual: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
