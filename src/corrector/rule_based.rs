//! Deterministic rule-based corrector
//!
//! Mechanical repairs only: truncation, case normalization, character
//! stripping, decimal reformatting. It never invents business facts, so
//! counterparties, amounts, and dates are left alone and genuinely broken
//! messages still exhaust the loop and surface as INVALID.

use crate::config::ValidationConfig;
use crate::models::SwiftMessage;
use crate::Result;
use async_trait::async_trait;
use tracing::debug;

use super::Corrector;

pub struct RuleBasedCorrector {
    config: ValidationConfig,
}

impl RuleBasedCorrector {
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    fn apply_fix(&self, candidate: &mut SwiftMessage, error: &str) {
        if error.contains("Required field 'reference'") {
            candidate.reference =
                derive_reference(&candidate.message_id, self.config.max_reference_length);
        } else if error.contains("Reference exceeds maximum length") {
            candidate.reference =
                truncate_chars(&candidate.reference, self.config.max_reference_length);
        } else if error.contains("Invalid sender BIC format") {
            candidate.sender_bic = normalize_bic(&candidate.sender_bic);
        } else if error.contains("Invalid receiver BIC format") {
            candidate.receiver_bic = normalize_bic(&candidate.receiver_bic);
        } else if error.contains("Currency code must be") {
            candidate.currency = candidate.currency.trim().to_uppercase();
        } else if error.contains("more than 2 decimal places") {
            if let Ok(amount) = candidate.amount.trim().parse::<f64>() {
                candidate.amount = format!("{:.2}", amount);
            }
        } else if error.contains("contains invalid SWIFT characters") {
            strip_invalid_characters(candidate, error);
        }
        // Anything else (identical BICs, amount bounds, dates, rejected
        // message types) needs business knowledge this corrector lacks.
    }
}

impl Default for RuleBasedCorrector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Corrector for RuleBasedCorrector {
    async fn correct(&self, message: &SwiftMessage, errors: &[String]) -> Result<SwiftMessage> {
        let mut candidate = message.clone();

        for error in errors {
            self.apply_fix(&mut candidate, error);
        }

        debug!(
            message_id = %message.message_id,
            changed = ?message.changed_fields(&candidate),
            "Rule-based correction proposed"
        );

        Ok(candidate)
    }
}

fn strip_invalid_characters(candidate: &mut SwiftMessage, error: &str) {
    if error.starts_with("Reference") {
        candidate.reference = sanitize(&candidate.reference);
    } else if error.starts_with("Ordering customer") {
        if let Some(value) = &candidate.ordering_customer {
            candidate.ordering_customer = Some(sanitize(value));
        }
    } else if error.starts_with("Beneficiary") {
        if let Some(value) = &candidate.beneficiary {
            candidate.beneficiary = Some(sanitize(value));
        }
    } else if error.starts_with("Remittance info") {
        if let Some(value) = &candidate.remittance_info {
            candidate.remittance_info = Some(sanitize(value));
        }
    }
}

/// Drop every character outside the SWIFT character set.
fn sanitize(value: &str) -> String {
    value.chars().filter(|c| is_swift_char(*c)).collect()
}

fn is_swift_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '/' | '-' | '?' | ':' | '(' | ')' | '.' | ',' | '\'' | '+')
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// Replacement reference derived from the immutable message id.
fn derive_reference(message_id: &str, max_chars: usize) -> String {
    let base: String = format!("REF{}", message_id)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    truncate_chars(&base, max_chars)
}

fn normalize_bic(bic: &str) -> String {
    bic.trim()
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

//
// ================= Tests =================
//
