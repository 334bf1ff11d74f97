//! Core data models for SWIFT message processing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use std::sync::Arc;
use std::fmt;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageType {
    #[serde(rename = "MT103")]
    Mt103,
    #[serde(rename = "MT202")]
    Mt202,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    #[default]
    Pending,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum FraudStatus {
    #[default]
    Pending,
    Cleared,
    Flagged,
}

//
// ================= Message =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwiftMessage {
    pub message_id: String,
    pub message_type: MessageType,
    pub reference: String,
    // Amounts stay textual; parsing is a validation concern
    pub amount: String,
    pub currency: String,
    pub sender_bic: String,
    pub receiver_bic: String,
    pub value_date: String,
    #[serde(default)]
    pub ordering_customer: Option<String>,
    #[serde(default)]
    pub beneficiary: Option<String>,
    #[serde(default)]
    pub remittance_info: Option<String>,
    #[serde(default)]
    pub validation_status: ValidationStatus,
    #[serde(default)]
    pub validation_errors: Vec<String>,
    #[serde(default)]
    pub fraud_score: Option<f64>,
    #[serde(default)]
    pub fraud_status: FraudStatus,
}

impl SwiftMessage {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        message_id: impl Into<String>,
        message_type: MessageType,
        reference: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
        sender_bic: impl Into<String>,
        receiver_bic: impl Into<String>,
        value_date: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            message_type,
            reference: reference.into(),
            amount: amount.into(),
            currency: currency.into(),
            sender_bic: sender_bic.into(),
            receiver_bic: receiver_bic.into(),
            value_date: value_date.into(),
            ordering_customer: None,
            beneficiary: None,
            remittance_info: None,
            validation_status: ValidationStatus::Pending,
            validation_errors: Vec::new(),
            fraud_score: None,
            fraud_status: FraudStatus::Pending,
        }
    }

    /// By-name lookup for the textual content fields the rule engine
    /// iterates over. Absent optional fields yield `None`.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "reference" => Some(self.reference.as_str()),
            "amount" => Some(self.amount.as_str()),
            "currency" => Some(self.currency.as_str()),
            "sender_bic" => Some(self.sender_bic.as_str()),
            "receiver_bic" => Some(self.receiver_bic.as_str()),
            "value_date" => Some(self.value_date.as_str()),
            "ordering_customer" => self.ordering_customer.as_deref(),
            "beneficiary" => self.beneficiary.as_deref(),
            "remittance_info" => self.remittance_info.as_deref(),
            _ => None,
        }
    }

    /// Take the correctable content fields from `candidate`, leaving
    /// identity, status bookkeeping, and fraud state untouched.
    pub fn apply_candidate(&mut self, candidate: SwiftMessage) {
        self.message_type = candidate.message_type;
        self.reference = candidate.reference;
        self.amount = candidate.amount;
        self.currency = candidate.currency;
        self.sender_bic = candidate.sender_bic;
        self.receiver_bic = candidate.receiver_bic;
        self.value_date = candidate.value_date;
        self.ordering_customer = candidate.ordering_customer;
        self.beneficiary = candidate.beneficiary;
        self.remittance_info = candidate.remittance_info;
    }

    /// Names of content fields on which `other` differs from `self`.
    pub fn changed_fields(&self, other: &SwiftMessage) -> Vec<String> {
        let mut changed = Vec::new();
        if self.message_type != other.message_type {
            changed.push("message_type".to_string());
        }
        for field in [
            "reference",
            "amount",
            "currency",
            "sender_bic",
            "receiver_bic",
            "value_date",
            "ordering_customer",
            "beneficiary",
            "remittance_info",
        ] {
            if self.text_field(field) != other.text_field(field) {
                changed.push(field.to_string());
            }
        }
        changed
    }
}

//
// ================= Validation =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a hard failure; the result can never become valid again.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Record an advisory finding; validity is unaffected.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

//
// ================= Evaluation =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionOutcome {
    /// A candidate was applied; the listed fields were replaced
    Applied { changed_fields: Vec<String> },
    /// The corrector proposed a candidate identical to the working copy
    NoChange,
    /// The corrector failed; the working copy was kept as-is
    Failed,
    /// No correction was attempted this round
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub correction: CorrectionOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub run_id: Uuid,
    pub message_id: String,
    pub final_status: ValidationStatus,
    pub iterations: usize,
    pub unresolved_errors: Vec<String>,
    pub warnings: Vec<String>,
    pub records: Vec<IterationRecord>,
}

//
// ================= Evaluation Record =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub audit_id: Uuid,
    pub message_id: String,
    pub final_status: ValidationStatus,
    pub iterations: usize,

    pub message: Arc<SwiftMessage>,
    pub records: Arc<Vec<IterationRecord>>,
    pub message_hash: String,

    pub created_at: DateTime<Utc>,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageType::Mt103 => "MT103",
            MessageType::Mt202 => "MT202",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationStatus::Pending => "PENDING",
            ValidationStatus::Valid => "VALID",
            ValidationStatus::Invalid => "INVALID",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for FraudStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FraudStatus::Pending => "PENDING",
            FraudStatus::Cleared => "CLEARED",
            FraudStatus::Flagged => "FLAGGED",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> SwiftMessage {
        SwiftMessage::new(
            "MSG-2024-001",
            MessageType::Mt103,
            "INVPAY240915",
            "2500.50",
            "USD",
            "CHASUS33",
            "DEUTDEFF",
            "240917",
        )
    }

    #[test]
    fn test_message_serializes_with_wire_names() {
        let message = sample_message();
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["message_type"], "MT103");
        assert_eq!(json["validation_status"], "PENDING");
        assert_eq!(json["fraud_status"], "PENDING");
    }

    #[test]
    fn test_status_fields_default_when_absent() {
        let json = r#"{
            "message_id": "MSG-2024-002",
            "message_type": "MT202",
            "reference": "COVER1",
            "amount": "100.00",
            "currency": "EUR",
            "sender_bic": "DEUTDEFF",
            "receiver_bic": "CHASUS33",
            "value_date": "240917"
        }"#;
        let message: SwiftMessage = serde_json::from_str(json).unwrap();

        assert_eq!(message.message_type, MessageType::Mt202);
        assert_eq!(message.validation_status, ValidationStatus::Pending);
        assert_eq!(message.fraud_status, FraudStatus::Pending);
        assert!(message.validation_errors.is_empty());
        assert!(message.ordering_customer.is_none());
    }

    #[test]
    fn test_apply_candidate_preserves_identity_and_fraud_state() {
        let mut message = sample_message();
        message.fraud_score = Some(0.42);
        message.fraud_status = FraudStatus::Flagged;
        message.validation_errors.push("earlier finding".to_string());

        let mut candidate = message.clone();
        candidate.message_id = "FORGED".to_string();
        candidate.fraud_score = Some(0.0);
        candidate.fraud_status = FraudStatus::Cleared;
        candidate.validation_status = ValidationStatus::Valid;
        candidate.validation_errors.clear();
        candidate.reference = "NEWREF".to_string();

        message.apply_candidate(candidate);

        assert_eq!(message.reference, "NEWREF");
        assert_eq!(message.message_id, "MSG-2024-001");
        assert_eq!(message.fraud_score, Some(0.42));
        assert_eq!(message.fraud_status, FraudStatus::Flagged);
        assert_eq!(message.validation_status, ValidationStatus::Pending);
        assert_eq!(message.validation_errors, vec!["earlier finding".to_string()]);
    }

    #[test]
    fn test_changed_fields_ignores_bookkeeping() {
        let message = sample_message();

        let mut candidate = message.clone();
        candidate.validation_status = ValidationStatus::Invalid;
        candidate.fraud_score = Some(0.9);
        assert!(message.changed_fields(&candidate).is_empty());

        candidate.sender_bic = "BOFAUS3N".to_string();
        candidate.remittance_info = Some("INVOICE 42".to_string());
        assert_eq!(
            message.changed_fields(&candidate),
            vec!["sender_bic".to_string(), "remittance_info".to_string()]
        );
    }
}
