//! Rule engine for SWIFT message validation
//!
//! Field-level checks against structural, business, and risk rules.
//! Deterministic enforcement: no mutation, no I/O, and malformed input
//! becomes an error entry, never a panic.

use crate::config::ValidationConfig;
use crate::models::{MessageType, SwiftMessage, ValidationResult};
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// Mandatory text fields checked for presence. The message type is a closed
/// enum and cannot be absent, so it is not listed here.
const REQUIRED_TEXT_FIELDS: &[&str] = &["reference", "amount", "sender_bic", "receiver_bic"];

/// Free-text fields constrained to the SWIFT character set, as
/// (display label, field name) pairs.
const FREE_TEXT_FIELDS: &[(&str, &str)] = &[
    ("Reference", "reference"),
    ("Ordering customer", "ordering_customer"),
    ("Beneficiary", "beneficiary"),
    ("Remittance info", "remittance_info"),
];

/// Valid ISO currency codes (major ones)
const VALID_CURRENCIES: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD", "NZD",
    "SEK", "NOK", "DKK", "PLN", "CZK", "HUF", "SGD", "HKD",
    "KRW", "CNY", "INR", "BRL", "MXN", "ZAR", "RUB", "TRY",
    "THB", "MYR", "IDR", "PHP", "VND", "EGP", "SAR", "AED",
    "QAR", "KWD", "BHD", "OMR", "JOD", "LBP", "ILS", "CLP",
    "COP", "PEN", "UYU", "ARS", "BOB", "PYG", "CRC", "GTQ",
    "HNL", "NIO", "PAB", "DOP", "JMD", "TTD", "BBD", "XCD",
];

/// High-risk country codes screened from the BIC country segment
const HIGH_RISK_COUNTRIES: &[&str] = &[
    "AF", "BY", "CF", "CG", "CU", "CD", "ER", "GN", "GW",
    "HT", "IR", "IQ", "LB", "LR", "LY", "ML", "MM", "NI",
    "KP", "RU", "SO", "SS", "SD", "SY", "VE", "YE", "ZW",
];

/// Round amounts at or above this level look like structuring
const STRUCTURING_THRESHOLD: f64 = 10_000.0;
/// Amounts at or above this level raise a large-transaction advisory
const LARGE_AMOUNT_THRESHOLD: f64 = 1_000_000.0;
/// Value dates further from today than this raise a timing advisory
const VALUE_DATE_WINDOW_DAYS: i64 = 30;

lazy_static! {
    static ref BIC_PATTERN: Regex =
        Regex::new(r"^[A-Z]{4}[A-Z]{2}[A-Z0-9]{2}([A-Z0-9]{3})?$").expect("valid BIC pattern");
    static ref SWIFT_CHARSET: Regex =
        Regex::new(r"^[A-Za-z0-9/\-?:().,'+\s]*$").expect("valid charset pattern");
    /// Suspicious reference/BIC patterns, as (display text, anchored
    /// case-insensitive matcher) pairs
    static ref RISK_PATTERNS: Vec<(&'static str, Regex)> = [
        ".*999.*",
        ".*000000.*",
        "TEST.*",
        "FAKE.*",
        "DEMO.*",
    ]
    .iter()
    .map(|pattern| {
        let anchored = format!("(?i)^{}", pattern);
        (*pattern, Regex::new(&anchored).expect("valid risk pattern"))
    })
    .collect();
}

/// Deterministic SWIFT message validator
pub struct SwiftValidator {
    config: ValidationConfig,
}

impl SwiftValidator {
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Run every rule category against the message, with timing advisories
    /// computed relative to the current UTC date.
    pub fn validate(&self, message: &SwiftMessage) -> ValidationResult {
        self.validate_as_of(message, Utc::now().date_naive())
    }

    /// Run every rule category with an explicit reference date. Only the
    /// value-date advisories depend on `today`; everything else is a pure
    /// function of the message fields.
    pub fn validate_as_of(&self, message: &SwiftMessage, today: NaiveDate) -> ValidationResult {
        let mut result = ValidationResult::new();

        self.check_required_fields(message, &mut result);
        self.check_reference_length(message, &mut result);
        self.check_bic_codes(message, &mut result);
        self.check_amount(message, &mut result);
        self.check_currency(message, &mut result);
        self.check_value_date(message, today, &mut result);
        self.check_message_type(message, &mut result);
        self.check_character_set(message, &mut result);
        self.check_risk_patterns(message, &mut result);

        debug!(
            message_id = %message.message_id,
            is_valid = result.is_valid,
            error_count = result.errors.len(),
            warning_count = result.warnings.len(),
            "Validation completed"
        );

        result
    }

    fn check_required_fields(&self, message: &SwiftMessage, result: &mut ValidationResult) {
        for field in REQUIRED_TEXT_FIELDS {
            let missing = message
                .text_field(field)
                .map_or(true, |value| value.trim().is_empty());

            if missing {
                result.add_error(format!("Required field '{}' is missing or empty", field));
            }
        }
    }

    fn check_reference_length(&self, message: &SwiftMessage, result: &mut ValidationResult) {
        if message.reference.chars().count() > self.config.max_reference_length {
            result.add_error(format!(
                "Reference exceeds maximum length of {} characters: {}",
                self.config.max_reference_length, message.reference
            ));
        }
    }

    fn check_bic_codes(&self, message: &SwiftMessage, result: &mut ValidationResult) {
        if !is_valid_bic(&message.sender_bic) {
            result.add_error(format!("Invalid sender BIC format: {}", message.sender_bic));
        }

        if !is_valid_bic(&message.receiver_bic) {
            result.add_error(format!(
                "Invalid receiver BIC format: {}",
                message.receiver_bic
            ));
        }

        if message.sender_bic == message.receiver_bic {
            result.add_error("Sender and receiver BIC codes cannot be identical");
        }

        // Country screening applies even when the overall format is off
        if let Some(country) = bic_country(&message.sender_bic) {
            if HIGH_RISK_COUNTRIES.contains(&country) {
                result.add_warning(format!("Sender BIC from high-risk country: {}", country));
            }
        }

        if let Some(country) = bic_country(&message.receiver_bic) {
            if HIGH_RISK_COUNTRIES.contains(&country) {
                result.add_warning(format!("Receiver BIC from high-risk country: {}", country));
            }
        }
    }

    fn check_amount(&self, message: &SwiftMessage, result: &mut ValidationResult) {
        let raw = message.amount.trim();

        let amount = match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                result.add_error(format!("Invalid amount format: {}", message.amount));
                return;
            }
        };

        if amount <= 0.0 {
            result.add_error("Amount must be positive");
        }

        if amount < self.config.min_amount {
            result.add_error(format!(
                "Amount {} below minimum {}",
                amount, self.config.min_amount
            ));
        }

        if amount > self.config.max_amount {
            result.add_error(format!(
                "Amount {} exceeds maximum {}",
                amount, self.config.max_amount
            ));
        }

        if let Some((_, decimals)) = raw.split_once('.') {
            if decimals.len() > 2 {
                result.add_error("Amount cannot have more than 2 decimal places");
            }
        }

        if amount >= STRUCTURING_THRESHOLD && amount % 1_000.0 == 0.0 {
            result.add_warning(format!("Round amount may indicate structuring: {}", amount));
        }

        if amount >= LARGE_AMOUNT_THRESHOLD {
            result.add_warning(format!("Very large transaction amount: {}", amount));
        }
    }

    fn check_currency(&self, message: &SwiftMessage, result: &mut ValidationResult) {
        let currency = message.currency.as_str();

        if currency.is_empty() {
            result.add_error("Currency code is required");
            return;
        }

        if currency.chars().count() != 3 {
            result.add_error(format!("Currency code must be 3 characters: {}", currency));
        }

        if !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            result.add_error(format!("Currency code must be alphabetic: {}", currency));
        }

        if currency != currency.to_uppercase() {
            result.add_error(format!("Currency code must be uppercase: {}", currency));
        }

        if !VALID_CURRENCIES.contains(&currency) {
            result.add_warning(format!("Uncommon or invalid currency code: {}", currency));
        }
    }

    fn check_value_date(
        &self,
        message: &SwiftMessage,
        today: NaiveDate,
        result: &mut ValidationResult,
    ) {
        let Some(value_date) = parse_value_date(&message.value_date) else {
            result.add_error(format!(
                "Invalid value date format (YYMMDD required): {}",
                message.value_date
            ));
            return;
        };

        let days_diff = value_date.signed_duration_since(today).num_days();

        if days_diff < -VALUE_DATE_WINDOW_DAYS {
            result.add_warning(format!(
                "Value date is more than {} days in the past: {}",
                VALUE_DATE_WINDOW_DAYS, message.value_date
            ));
        }

        if days_diff > VALUE_DATE_WINDOW_DAYS {
            result.add_warning(format!(
                "Value date is more than {} days in the future: {}",
                VALUE_DATE_WINDOW_DAYS, message.value_date
            ));
        }

        if matches!(value_date.weekday(), Weekday::Sat | Weekday::Sun) {
            result.add_warning("Value date falls on weekend");
        }
    }

    fn check_message_type(&self, message: &SwiftMessage, result: &mut ValidationResult) {
        if !self
            .config
            .allowed_message_types
            .contains(&message.message_type)
        {
            result.add_error(format!("Invalid message type: {}", message.message_type));
            return;
        }

        match message.message_type {
            MessageType::Mt103 => {
                if field_absent(&message.ordering_customer) {
                    result.add_warning("MT103 should include ordering customer information");
                }
                if field_absent(&message.beneficiary) {
                    result.add_warning("MT103 should include beneficiary information");
                }
                if field_absent(&message.remittance_info) {
                    result.add_warning("MT103 should include remittance information");
                }
            }
            // Bank-to-bank transfers carry no extra field requirements
            MessageType::Mt202 => {}
        }
    }

    fn check_character_set(&self, message: &SwiftMessage, result: &mut ValidationResult) {
        for (label, field) in FREE_TEXT_FIELDS {
            let Some(value) = message.text_field(field) else {
                continue;
            };

            if !value.is_empty() && !SWIFT_CHARSET.is_match(value) {
                result.add_error(format!("{} contains invalid SWIFT characters", label));
            }
        }
    }

    fn check_risk_patterns(&self, message: &SwiftMessage, result: &mut ValidationResult) {
        let subjects = [
            ("Reference", message.reference.as_str()),
            ("Sender BIC", message.sender_bic.as_str()),
            ("Receiver BIC", message.receiver_bic.as_str()),
        ];

        for (pattern_text, pattern) in RISK_PATTERNS.iter() {
            for (label, value) in &subjects {
                if pattern.is_match(value) {
                    result.add_warning(format!("{} matches risk pattern: {}", label, pattern_text));
                }
            }
        }
    }
}

impl Default for SwiftValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_bic(bic: &str) -> bool {
    !bic.is_empty() && BIC_PATTERN.is_match(bic)
}

/// Country segment of a BIC (characters 5-6), when long enough.
fn bic_country(bic: &str) -> Option<&str> {
    if bic.len() >= 6 {
        bic.get(4..6)
    } else {
        None
    }
}

/// Parse a YYMMDD value date; two-digit years map to 2000-2099. Returns
/// `None` unless the string is six digits forming a real calendar date.
fn parse_value_date(value_date: &str) -> Option<NaiveDate> {
    if value_date.len() != 6 || !value_date.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let year: i32 = value_date.get(0..2)?.parse().ok()?;
    let month: u32 = value_date.get(2..4)?.parse().ok()?;
    let day: u32 = value_date.get(4..6)?.parse().ok()?;

    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

fn field_absent(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

//
// ================= Tests =================
//
