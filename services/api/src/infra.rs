use contractor_onboarding::workflows::onboarding::{
    ContractorId, ContractorRecord, ContractorRepository, NotificationEnvelope,
    NotificationError, NotificationSender, RepositoryError, RouteAssignment, StatusUpdate,
};
use contractor_onboarding::workflows::roster::{RosterImportError, RosterImporter};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryContractorRepository {
    records: Arc<Mutex<HashMap<ContractorId, ContractorRecord>>>,
}

impl InMemoryContractorRepository {
    /// Insert records, replacing any existing entry with the same id.
    pub(crate) fn seed(&self, records: impl IntoIterator<Item = ContractorRecord>) -> usize {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let mut count = 0;
        for record in records {
            guard.insert(record.id.clone(), record);
            count += 1;
        }
        count
    }

    pub(crate) fn seed_from_roster(&self, path: &Path) -> Result<usize, RosterImportError> {
        let records = RosterImporter::from_path(path)?;
        let count = self.seed(records);
        info!(path = %path.display(), contractors = count, "contractor roster loaded");
        Ok(count)
    }
}

impl ContractorRepository for InMemoryContractorRepository {
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

/// Stand-in delivery adapter: logs each envelope and keeps it for inspection.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotificationSender {
    outbox: Arc<Mutex<Vec<NotificationEnvelope>>>,
}

impl LoggingNotificationSender {
    pub(crate) fn sent(&self) -> Vec<NotificationEnvelope> {
        self.outbox.lock().expect("outbox mutex poisoned").clone()
    }

    fn record(&self, envelope: NotificationEnvelope) -> Result<(), NotificationError> {
        info!(
            template = %envelope.template,
            contractor_id = %envelope.contractor_id,
            recipient = %envelope.recipient.email,
            fields = envelope.fields.len(),
            "notification queued"
        );
        let mut guard = self.outbox.lock().expect("outbox mutex poisoned");
        guard.push(envelope);
        Ok(())
    }
}

impl NotificationSender for LoggingNotificationSender {
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
