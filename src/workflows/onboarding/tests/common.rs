use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::onboarding::domain::{
    ContractorId, ContractorStatus, OnboardingRoute, StepData,
};
use crate::workflows::onboarding::notifications::{
    NotificationEnvelope, NotificationError, NotificationSender,
};
use crate::workflows::onboarding::registry::StrategyRegistry;
use crate::workflows::onboarding::repository::{
    ContractorProfile, ContractorRecord, ContractorRepository, RepositoryError, RouteAssignment,
    StatusUpdate,
};
use crate::workflows::onboarding::{onboarding_router, OnboardingService};

pub(super) fn contractor(
    id: &str,
    status: ContractorStatus,
    route: Option<OnboardingRoute>,
) -> ContractorRecord {
    let mut record = ContractorRecord::draft(
        ContractorId::new(id),
        ContractorProfile {
            full_name: "Layla Haddad".to_string(),
            email: "layla@example.com".to_string(),
        },
        Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    );
    record.status = status;
    record.route = route;
    record
}

pub(super) fn data(value: Value) -> StepData {
    match value {
        Value::Object(map) => map,
        other => panic!("step data must be an object, got {other}"),
    }
}

pub(super) fn build_service() -> (
    OnboardingService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = OnboardingService::new(
        Arc::new(StrategyRegistry::builtin()),
        repository.clone(),
        notifications.clone(),
    );
    (service, repository, notifications)
}

pub(super) fn service_with<R, N>(repository: R, notifications: N) -> OnboardingService<R, N>
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    OnboardingService::new(
        Arc::new(StrategyRegistry::builtin()),
        Arc::new(repository),
        Arc::new(notifications),
    )
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<ContractorId, ContractorRecord>>>,
}

impl MemoryRepository {
    pub(super) fn with(records: impl IntoIterator<Item = ContractorRecord>) -> Self {
        let repository = Self::default();
        for record in records {
            repository.insert(record);
        }
        repository
    }

    pub(super) fn insert(&self, record: ContractorRecord) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(record.id.clone(), record);
    }

    pub(super) fn stored(&self, id: &str) -> ContractorRecord {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(&ContractorId::new(id))
            .cloned()
            .expect("record present")
    }
}

impl ContractorRepository for MemoryRepository {
    fn fetch(&self, id: &ContractorId) -> Result<Option<ContractorRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_status(
        &self,
        id: &ContractorId,
        update: StatusUpdate,
    ) -> Result<ContractorRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.apply(&update)?;
        Ok(record.clone())
    }

    fn assign_route(
        &self,
        id: &ContractorId,
        assignment: RouteAssignment,
    ) -> Result<ContractorRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.assign(&assignment)?;
        Ok(record.clone())
    }
}

/// Simulates another writer committing between the service's read and its write.
#[derive(Default, Clone)]
pub(super) struct RacingRepository {
    pub(super) inner: MemoryRepository,
}

impl ContractorRepository for RacingRepository {
    fn fetch(&self, id: &ContractorId) -> Result<Option<ContractorRecord>, RepositoryError> {
        let snapshot = self.inner.fetch(id)?;
        if let Some(record) = &snapshot {
            let mut bumped = record.clone();
            bumped.version += 1;
            self.inner.insert(bumped);
        }
        Ok(snapshot)
    }

    fn update_status(
        &self,
        id: &ContractorId,
        update: StatusUpdate,
    ) -> Result<ContractorRecord, RepositoryError> {
        self.inner.update_status(id, update)
    }

    fn assign_route(
        &self,
        id: &ContractorId,
        assignment: RouteAssignment,
    ) -> Result<ContractorRecord, RepositoryError> {
        self.inner.assign_route(id, assignment)
    }
}

pub(super) struct UnavailableRepository;

impl ContractorRepository for UnavailableRepository {
    fn fetch(&self, _id: &ContractorId) -> Result<Option<ContractorRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &ContractorId,
        _update: StatusUpdate,
    ) -> Result<ContractorRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn assign_route(
        &self,
        _id: &ContractorId,
        _assignment: RouteAssignment,
    ) -> Result<ContractorRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<NotificationEnvelope>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<NotificationEnvelope> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }

    fn record(&self, envelope: NotificationEnvelope) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(envelope);
        Ok(())
    }
}

impl NotificationSender for MemoryNotifications {
    fn send_document_upload(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        self.record(envelope)
    }

    fn send_contract_signature(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        self.record(envelope)
    }

    fn send_cohf_signature_request(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        self.record(envelope)
    }

    fn send_quote_sheet_request(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        self.record(envelope)
    }

    fn send_third_party_contract_request(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        self.record(envelope)
    }

    fn send_work_order(&self, envelope: NotificationEnvelope) -> Result<(), NotificationError> {
        self.record(envelope)
    }
}

pub(super) struct FailingNotifications;

impl FailingNotifications {
    fn fail() -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay refused".to_string()))
    }
}

impl NotificationSender for FailingNotifications {
    fn send_document_upload(&self, _: NotificationEnvelope) -> Result<(), NotificationError> {
        Self::fail()
    }

    fn send_contract_signature(&self, _: NotificationEnvelope) -> Result<(), NotificationError> {
        Self::fail()
    }

    fn send_cohf_signature_request(
        &self,
        _: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        Self::fail()
    }

    fn send_quote_sheet_request(&self, _: NotificationEnvelope) -> Result<(), NotificationError> {
        Self::fail()
    }

    fn send_third_party_contract_request(
        &self,
        _: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        Self::fail()
    }

    fn send_work_order(&self, _: NotificationEnvelope) -> Result<(), NotificationError> {
        Self::fail()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with(repository: MemoryRepository) -> axum::Router {
    onboarding_router(Arc::new(service_with(
        repository,
        MemoryNotifications::default(),
    )))
}
