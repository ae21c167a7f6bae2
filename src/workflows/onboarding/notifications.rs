use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{ContractorId, ExternalAction, StepData};
use super::repository::ContractorRecord;

/// Person an external action is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

/// Payload handed to the delivery adapter for a single external action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    pub template: ExternalAction,
    pub recipient: Recipient,
    pub contractor_id: ContractorId,
    pub contractor_name: String,
    pub fields: BTreeMap<String, String>,
}

/// Outbound delivery hooks (e-mail, e-signature or portal adapters).
pub trait NotificationSender: Send + Sync {
    fn send_document_upload(&self, envelope: NotificationEnvelope)
        -> Result<(), NotificationError>;
    fn send_contract_signature(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError>;
    fn send_cohf_signature_request(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError>;
    fn send_quote_sheet_request(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError>;
    fn send_third_party_contract_request(
        &self,
        envelope: NotificationEnvelope,
    ) -> Result<(), NotificationError>;
    fn send_work_order(&self, envelope: NotificationEnvelope) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Route an envelope to the sender hook matching its template.
pub fn dispatch<N>(sender: &N, envelope: NotificationEnvelope) -> Result<(), NotificationError>
where
    N: NotificationSender + ?Sized,
{
    match envelope.template {
        ExternalAction::DocumentUpload => sender.send_document_upload(envelope),
        ExternalAction::ContractSignature => sender.send_contract_signature(envelope),
        ExternalAction::CohfSignature => sender.send_cohf_signature_request(envelope),
        ExternalAction::QuoteSheetRequest => sender.send_quote_sheet_request(envelope),
        ExternalAction::ThirdPartyContract => sender.send_third_party_contract_request(envelope),
        ExternalAction::WorkOrder => sender.send_work_order(envelope),
    }
}

/// Assemble the envelope for an external action.
///
/// Returns `None` when the action's recipient cannot be resolved from the record or step data.
/// Scalar values from the step data and the step result become template fields, result values
/// taking precedence.
pub fn envelope_for(
    action: ExternalAction,
    record: &ContractorRecord,
    step_data: &StepData,
    result_data: Option<&StepData>,
) -> Option<NotificationEnvelope> {
    let recipient = resolve_recipient(action, record, step_data)?;

    let mut fields = scalar_fields(step_data);
    if let Some(extra) = result_data {
        fields.extend(scalar_fields(extra));
    }

    Some(NotificationEnvelope {
        template: action,
        recipient,
        contractor_id: record.id.clone(),
        contractor_name: record.profile.full_name.clone(),
        fields,
    })
}

fn resolve_recipient(
    action: ExternalAction,
    record: &ContractorRecord,
    step_data: &StepData,
) -> Option<Recipient> {
    match action {
        ExternalAction::DocumentUpload | ExternalAction::ContractSignature => {
            if record.profile.email.trim().is_empty() {
                return None;
            }
            Some(Recipient {
                name: record.profile.full_name.clone(),
                email: record.profile.email.clone(),
            })
        }
        ExternalAction::CohfSignature
        | ExternalAction::QuoteSheetRequest
        | ExternalAction::ThirdPartyContract => party(step_data, "third_party"),
        ExternalAction::WorkOrder => party(step_data, "client"),
    }
}

fn party(step_data: &StepData, key: &str) -> Option<Recipient> {
    let object = step_data.get(key)?.as_object()?;
    let email = object.get("email")?.as_str()?.trim();
    if email.is_empty() {
        return None;
    }
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Some(Recipient {
        name: name.to_string(),
        email: email.to_string(),
    })
}

fn scalar_fields(data: &StepData) -> BTreeMap<String, String> {
    data.iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                _ => return None,
            };
            Some((key.clone(), rendered))
        })
        .collect()
}
