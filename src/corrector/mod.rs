//! Corrector trait and implementations
//!
//! The corrector proposes a repaired candidate for a message that failed
//! validation. Candidates are advisory: the evaluation loop decides what
//! to take from them and treats the capability as fallible.

use crate::models::SwiftMessage;
use crate::Result;
use async_trait::async_trait;

pub mod rule_based;
pub use rule_based::RuleBasedCorrector;

/// Trait for correction proposal (may be backed by a remote service)
#[async_trait]
pub trait Corrector: Send + Sync {
    /// Propose a corrected candidate for `message`, given the errors from
    /// the latest evaluation round. Failures are acceptable; the loop
    /// treats them as "no correction applied".
    async fn correct(&self, message: &SwiftMessage, errors: &[String]) -> Result<SwiftMessage>;
}

/// Pass-through corrector for development & testing
/// Keeps the processing pipeline functional without any repair capability:
/// unresolvable messages drain through the loop and exit INVALID.
pub struct NoopCorrector;

#[async_trait]
impl Corrector for NoopCorrector {
    async fn correct(&self, message: &SwiftMessage, _errors: &[String]) -> Result<SwiftMessage> {
        Ok(message.clone())
    }
}
