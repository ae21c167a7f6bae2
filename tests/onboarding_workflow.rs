use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use contractor_onboarding::workflows::onboarding::{
    ContractorId, ContractorRecord, ContractorRepository, ContractorStatus, ExternalAction,
    NotificationEnvelope, NotificationError, NotificationSender, OnboardingRoute,
    OnboardingService, RepositoryError, RouteAssignment, StatusUpdate, StepData,
    StrategyRegistry,
};
use contractor_onboarding::workflows::roster::RosterImporter;
use serde_json::json;

const ROSTER: &str = "\
Contractor ID,Full Name,Email,Status,Route,Updated At
c-100,Layla Haddad,layla@example.com,,,
c-200,Omar Khalid,omar@example.com,documents_uploaded,saudi,2025-02-03T08:30:00Z
c-300,Priya Nair,priya@example.com,pending_review,wps,2025-02-04
";

#[derive(Default)]
struct Store {
    records: Mutex<HashMap<ContractorId, ContractorRecord>>,
}

impl ContractorRepository for Store {
    fn fetch(&self, id: &ContractorId) -> Result<Option<ContractorRecord>, RepositoryError> {
        Ok(self.records.lock().expect("store mutex").get(id).cloned())
    }

    fn update_status(
        &self,
        id: &ContractorId,
        update: StatusUpdate,
    ) -> Result<ContractorRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.apply(&update)?;
        Ok(record.clone())
    }

    fn assign_route(
        &self,
        id: &ContractorId,
        assignment: RouteAssignment,
    ) -> Result<ContractorRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.assign(&assignment)?;
        Ok(record.clone())
    }
}

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<NotificationEnvelope>>,
}

impl Outbox {
    fn push(&self, envelope: NotificationEnvelope) -> Result<(), NotificationError> {
        self.sent.lock().expect("outbox mutex").push(envelope);
        Ok(())
    }

    fn templates(&self) -> Vec<ExternalAction> {
        self.sent
            .lock()
            .expect("outbox mutex")
            .iter()
            .map(|envelope| envelope.template)
            .collect()
    }
}

impl NotificationSender for Outbox {
    fn send_document_upload(&self, envelope: NotificationEnvelope) -> Result<(), NotificationError> {
        self.push(envelope)
    }

    fn send_contract_signature(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        self.push(envelope)
    }

    fn send_cohf_signature_request(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        self.push(envelope)
    }

    fn send_quote_sheet_request(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        self.push(envelope)
    }

    fn send_third_party_contract_request(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError> {
        self.push(envelope)
    }

    fn send_work_order(&self, envelope: NotificationEnvelope) -> Result<(), NotificationError> {
        self.push(envelope)
    }
}

fn seeded() -> (OnboardingService<Store, Outbox>, Arc<Outbox>) {
    let records = RosterImporter::from_reader(Cursor::new(ROSTER)).expect("roster parses");
    let store = Store::default();
    {
        let mut guard = store.records.lock().expect("store mutex");
        for record in records {
            guard.insert(record.id.clone(), record);
        }
    }
    let outbox = Arc::new(Outbox::default());
    let service = OnboardingService::new(
        Arc::new(StrategyRegistry::builtin()),
        Arc::new(store),
        outbox.clone(),
    );
    (service, outbox)
}

fn step_data(value: serde_json::Value) -> StepData {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn roster_contractor_walks_the_uae_route_to_activation() {
    let (service, outbox) = seeded();
    let id = ContractorId::new("c-100");
    let third_party = json!({"name": "Gulf Staffing LLC", "email": "ops@gulfstaffing.example"});
    let run = |step_id: &str, payload: serde_json::Value| {
        service
            .execute_step(&id, step_id, step_data(payload))
            .expect("step executes")
            .next_status
    };

    assert!(service.select_route(&id, "uae").is_err());
    service
        .transition_status(&id, ContractorStatus::PendingDocuments)
        .expect("documents requested");
    service
        .transition_status(&id, ContractorStatus::DocumentsUploaded)
        .expect("documents received");
    let routed = service.select_route(&id, "uae").expect("route selected");
    assert_eq!(routed.status, ContractorStatus::PendingCohf);

    let rejected = service
        .execute_step(&id, "cohf", StepData::new())
        .expect("validation is not an error");
    assert_eq!(rejected.next_status, ContractorStatus::PendingCohf);
    assert!(rejected.message.starts_with("Validation failed"));

    assert_eq!(
        run(
            "cohf",
            json!({
                "employee_name": "Layla Haddad",
                "remuneration": 24000,
                "third_party_id": "tp-1",
                "third_party": third_party.clone(),
            })
        ),
        ContractorStatus::AwaitingCohfSignature
    );
    assert_eq!(
        run("cohf_signature", json!({"signed_cohf_url": "https://files.example/cohf.pdf"})),
        ContractorStatus::CohfCompleted
    );
    assert_eq!(run("cds_costing", json!({})), ContractorStatus::PendingCdsCs);
    assert_eq!(run("cds_costing", json!({})), ContractorStatus::CdsCsCompleted);
    assert_eq!(run("admin_review", json!({})), ContractorStatus::PendingReview);
    service
        .transition_status(&id, ContractorStatus::Approved)
        .expect("approved");
    assert_eq!(
        run(
            "work_order",
            json!({"client": {"name": "Acme Energy", "email": "hr@acme.example"}})
        ),
        ContractorStatus::PendingClientWoSignature
    );
    assert_eq!(run("work_order", json!({})), ContractorStatus::WorkOrderCompleted);
    assert_eq!(
        run("third_party_contract_request", json!({"third_party": third_party})),
        ContractorStatus::PendingThirdPartyContract
    );
    assert_eq!(
        run(
            "third_party_contract",
            json!({"contract_url": "https://files.example/contract.pdf"})
        ),
        ContractorStatus::ContractApproved
    );
    assert_eq!(run("activation", json!({})), ContractorStatus::PendingSignature);
    service
        .transition_status(&id, ContractorStatus::Signed)
        .expect("signed");
    assert_eq!(run("activation", json!({})), ContractorStatus::Active);

    let view = service.workflow_status(&id).expect("status view");
    let progress = view.progress.expect("progress for routed contractor");
    assert_eq!(progress.total_steps, 14);
    assert!(progress.is_complete);

    assert_eq!(
        outbox.templates(),
        vec![
            ExternalAction::DocumentUpload,
            ExternalAction::CohfSignature,
            ExternalAction::WorkOrder,
            ExternalAction::ThirdPartyContract,
        ]
    );
}

#[test]
fn imported_saudi_contractor_requests_a_quote_sheet() {
    let (service, outbox) = seeded();
    let id = ContractorId::new("c-200");

    let next = service.next_action(&id).expect("next action");
    assert_eq!(next.action, "route_selection");

    let result = service
        .execute_step(
            &id,
            "quote_sheet_request",
            step_data(json!({
                "third_party_id": "tp-riyadh",
                "contractor_name": "Omar Khalid",
                "third_party": {"name": "Riyadh Manpower", "email": "quotes@riyadh.example"},
            })),
        )
        .expect("step executes");
    assert_eq!(result.next_status, ContractorStatus::PendingThirdPartyQuote);

    let sent = outbox.sent.lock().expect("outbox mutex").clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient.email, "quotes@riyadh.example");
    assert_eq!(sent[0].contractor_name, "Omar Khalid");
    assert_eq!(
        sent[0].fields.get("third_party_id").map(String::as_str),
        Some("tp-riyadh")
    );
}

#[test]
fn review_decisions_follow_the_transition_graph() {
    let (service, _) = seeded();
    let id = ContractorId::new("c-300");

    assert!(service
        .transition_status(&id, ContractorStatus::Active)
        .is_err());
    let rejected = service
        .transition_status(&id, ContractorStatus::Rejected)
        .expect("review can reject");
    assert_eq!(rejected.status, ContractorStatus::Rejected);
    let reopened = service
        .transition_status(&id, ContractorStatus::Draft)
        .expect("rejected contractors can restart");
    assert_eq!(reopened.status, ContractorStatus::Draft);
    assert_eq!(reopened.route, Some(OnboardingRoute::Wps));
}
