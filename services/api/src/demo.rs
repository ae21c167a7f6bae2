use crate::infra::{InMemoryContractorRepository, LoggingNotificationSender};
use chrono::Utc;
use clap::Args;
use contractor_onboarding::error::AppError;
use contractor_onboarding::workflows::onboarding::{
    ContractorId, ContractorProfile, ContractorRecord, ContractorStatus, OnboardingRoute,
    OnboardingService, OnboardingServiceError, StepData, StrategyRegistry,
};
use contractor_onboarding::workflows::roster::RosterImporter;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Onboarding route to walk (uae, saudi, offshore, wps, freelancer)
    #[arg(long, default_value = "uae")]
    pub(crate) route: String,
    /// Contractor name used for the synthetic record
    #[arg(long, default_value = "Layla Haddad")]
    pub(crate) name: String,
    /// Contractor email used for document and contract notifications
    #[arg(long, default_value = "layla.haddad@example.com")]
    pub(crate) email: String,
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    /// Roster CSV export to summarize
    pub(crate) path: PathBuf,
}

/// One scripted move in a demo walk.
#[derive(Debug, Clone, Copy)]
enum DemoMove {
    /// Execute a workflow step with the shared sample payload.
    Step(&'static str),
    /// Execute a step that only sends an outbound request and leaves the status alone.
    Request(&'static str),
    /// Record an outcome that arrives from outside the engine (uploads, approvals, signatures).
    Record(ContractorStatus),
}

/// Moves after route selection, which already places the contractor on the route's branch.
fn walk_for(route: OnboardingRoute) -> Vec<DemoMove> {
    use ContractorStatus::*;
    use DemoMove::*;

    let mut moves = Vec::new();
    match route {
        OnboardingRoute::Uae => moves.extend([
            Step("cohf"),
            Step("cohf_signature"),
            Step("cds_costing"),
        ]),
        OnboardingRoute::Saudi => moves.extend([
            Request("quote_sheet_request"),
            Step("quote_sheet_received"),
        ]),
        OnboardingRoute::Offshore | OnboardingRoute::Wps | OnboardingRoute::Freelancer => {}
    }
    moves.extend([
        Step("cds_costing"),
        Step("admin_review"),
        Record(Approved),
        Step("work_order"),
        Step("work_order"),
    ]);
    if route == OnboardingRoute::Uae {
        moves.extend([
            Step("third_party_contract_request"),
            Step("third_party_contract"),
            Step("activation"),
        ]);
    } else {
        moves.push(Step("contract"));
    }
    moves.extend([Record(Signed), Step("activation")]);
    moves
}

fn sample_payload(name: &str) -> StepData {
    let value = json!({
        "employee_name": name,
        "contractor_name": name,
        "remuneration": 24000,
        "third_party_id": "tp-gulf-staffing",
        "third_party": {"name": "Gulf Staffing LLC", "email": "onboarding@gulfstaffing.example"},
        "client": {"name": "Acme Energy", "email": "hr@acme.example"},
        "quote_sheet_id": "qs-1042",
        "total_cost": 18250.5,
        "payment_method": "bank_transfer",
        "signed_cohf_url": "https://files.example/cohf-signed.pdf",
        "contract_url": "https://files.example/third-party-contract.pdf",
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => StepData::new(),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { route, name, email } = args;

    let repository = Arc::new(InMemoryContractorRepository::default());
    let notifications = Arc::new(LoggingNotificationSender::default());
    let service = OnboardingService::new(
        Arc::new(StrategyRegistry::builtin()),
        repository.clone(),
        notifications.clone(),
    );

    let id = ContractorId::new("demo-001");
    repository.seed([ContractorRecord::draft(
        id.clone(),
        ContractorProfile {
            full_name: name.clone(),
            email,
        },
        Utc::now(),
    )]);

    println!("Contractor onboarding demo");
    for status in [
        ContractorStatus::PendingDocuments,
        ContractorStatus::DocumentsUploaded,
    ] {
        let stored = service.transition_status(&id, status)?;
        println!("  record {:<30} -> {}", status, stored.status);
    }

    let record = service.select_route(&id, &route)?;
    let route = record
        .route
        .ok_or_else(|| OnboardingServiceError::RouteNotSelected(id.clone()))?;
    println!(
        "- {} ({}) on route {}, now {}",
        name,
        id,
        route.display_name(),
        record.status
    );

    let payload = sample_payload(&name);
    for next in walk_for(route) {
        match next {
            DemoMove::Step(step_id) | DemoMove::Request(step_id) => {
                let result = service.execute_step(&id, step_id, payload.clone())?;
                let action = result
                    .external_action_type
                    .map(|action| format!(" [{}]", action))
                    .unwrap_or_default();
                println!(
                    "  step {:<30} -> {:<28} {}{}",
                    step_id, result.next_status, result.message, action
                );
            }
            DemoMove::Record(status) => {
                let stored = service.transition_status(&id, status)?;
                println!("  record {:<30} -> {}", status, stored.status);
            }
        }
    }

    let view = service.workflow_status(&id)?;
    if let Some(progress) = view.progress {
        println!(
            "Progress: {}/{} milestones ({}%){}",
            progress.current_step,
            progress.total_steps,
            progress.percentage,
            if progress.is_complete { " complete" } else { "" }
        );
    }

    let sent = notifications.sent();
    if sent.is_empty() {
        println!("Notifications: none dispatched");
    } else {
        println!("Notifications:");
        for envelope in sent {
            println!(
                "  - {} -> {} <{}>",
                envelope.template, envelope.recipient.name, envelope.recipient.email
            );
        }
    }

    Ok(())
}

pub(crate) fn run_roster_summary(args: RosterArgs) -> Result<(), AppError> {
    let records = RosterImporter::from_path(&args.path)?;

    let repository = Arc::new(InMemoryContractorRepository::default());
    let ids: Vec<ContractorId> = records.iter().map(|record| record.id.clone()).collect();
    repository.seed(records);
    let service = OnboardingService::new(
        Arc::new(StrategyRegistry::builtin()),
        repository,
        Arc::new(LoggingNotificationSender::default()),
    );

    println!("Roster summary ({} contractors)", ids.len());
    let mut by_status: BTreeMap<ContractorStatus, usize> = BTreeMap::new();
    for id in &ids {
        let view = service.workflow_status(id)?;
        let next = service.next_action(id)?;
        *by_status.entry(view.current_status).or_default() += 1;

        let route = view
            .route
            .map(|route| route.as_str())
            .unwrap_or("unassigned");
        let progress = view
            .progress
            .map(|progress| format!("{}%", progress.percentage))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "- {:<12} {:<28} {:<11} {:>5}  next: {}",
            id, view.current_status, route, progress, next.action
        );
    }

    println!("Status counts:");
    for (status, count) in by_status {
        println!("  - {}: {}", status, count);
    }

    Ok(())
}

pub(crate) fn print_route_catalog() {
    let registry = StrategyRegistry::builtin();
    println!("Onboarding routes");
    for (route, strategy) in registry.all_strategies() {
        println!("- {} ({})", route.display_name(), route);
        println!("  required documents: {}", strategy.required_documents().join(", "));
        if !strategy.optional_documents().is_empty() {
            println!(
                "  optional documents: {}",
                strategy.optional_documents().join(", ")
            );
        }
        for step in strategy.workflow_steps() {
            println!("  {}. {} - {}", step.order, step.name, step.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractor_onboarding::workflows::onboarding::ExternalAction;

    #[test]
    fn every_route_walk_reaches_active() {
        for route in OnboardingRoute::ordered() {
            let repository = Arc::new(InMemoryContractorRepository::default());
            let notifications = Arc::new(LoggingNotificationSender::default());
            let service = OnboardingService::new(
                Arc::new(StrategyRegistry::builtin()),
                repository.clone(),
                notifications.clone(),
            );
            let id = ContractorId::new("demo-001");
            repository.seed([ContractorRecord::draft(
                id.clone(),
                ContractorProfile {
                    full_name: "Layla Haddad".to_string(),
                    email: "layla@example.com".to_string(),
                },
                Utc::now(),
            )]);
            service
                .transition_status(&id, ContractorStatus::PendingDocuments)
                .expect("documents requested");
            service
                .transition_status(&id, ContractorStatus::DocumentsUploaded)
                .expect("upload recorded");
            let routed = service
                .select_route(&id, route.as_str())
                .expect("route selected");
            assert_eq!(routed.route, Some(route));

            let payload = sample_payload("Layla Haddad");
            for next in walk_for(route) {
                let before = service.workflow_status(&id).expect("status").current_status;
                match next {
                    DemoMove::Step(step_id) => {
                        let result = service
                            .execute_step(&id, step_id, payload.clone())
                            .expect("step executes");
                        assert_ne!(result.next_status, before, "{route}: {step_id} stalled");
                    }
                    DemoMove::Request(step_id) => {
                        let sent = notifications.sent().len();
                        let result = service
                            .execute_step(&id, step_id, payload.clone())
                            .expect("step executes");
                        assert_eq!(result.next_status, before, "{route}: {step_id} moved");
                        assert_eq!(notifications.sent().len(), sent + 1, "{route}: {step_id}");
                    }
                    DemoMove::Record(status) => {
                        service
                            .transition_status(&id, status)
                            .expect("legal transition");
                    }
                }
            }

            let view = service.workflow_status(&id).expect("status");
            assert_eq!(view.current_status, ContractorStatus::Active, "{route}");
            assert_eq!(
                notifications.sent()[0].template,
                ExternalAction::DocumentUpload,
                "{route}"
            );
        }
    }

    #[test]
    fn demo_completes_for_each_route() {
        for route in OnboardingRoute::ordered() {
            let result = run_demo(DemoArgs {
                route: route.as_str().to_string(),
                name: "Layla Haddad".to_string(),
                email: "layla@example.com".to_string(),
            });
            assert!(result.is_ok(), "{route}: {result:?}");
        }
    }

    #[test]
    fn demo_rejects_unknown_route() {
        let result = run_demo(DemoArgs {
            route: "atlantis".to_string(),
            name: "Layla Haddad".to_string(),
            email: "layla@example.com".to_string(),
        });
        assert!(result.is_err());
    }
}
