//! Validation standards for SWIFT message processing
//!
//! Deployment-tunable limits consumed by the rule engine. Defaults mirror
//! the interbank conventions for MT-series traffic.

use crate::models::MessageType;
use serde::{Deserialize, Serialize};

/// Limits and allow-lists applied by the validator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationConfig {
    /// Maximum transaction reference length in characters
    pub max_reference_length: usize,
    /// Smallest accepted transaction amount (inclusive)
    pub min_amount: f64,
    /// Largest accepted transaction amount (inclusive)
    pub max_amount: f64,
    /// Message types this deployment accepts
    pub allowed_message_types: Vec<MessageType>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_reference_length: 16,
            min_amount: 0.01,
            max_amount: 999_999_999.99,
            allowed_message_types: vec![MessageType::Mt103, MessageType::Mt202],
        }
    }
}
