//! SWIFT Message Processor
//!
//! Deterministic validation and bounded self-correction for SWIFT-style
//! payment messages:
//! - Field-level rule engine over MT103/MT202 records (structural,
//!   business, and risk rules; errors block, warnings advise)
//! - Evaluator-optimizer loop that requests repairs from an injected
//!   corrector and always terminates with a definitive status
//! - Auditable outcomes with per-round records and integrity hashes
//!
//! CORRECTION CYCLE:
//! EVALUATE → (VALID | OPTIMIZE) → EVALUATE → ... → VALID | INVALID

pub mod audit;
pub mod config;
pub mod corrector;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod validator;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use audit::AuditLog;
pub use config::ValidationConfig;
pub use corrector::{Corrector, NoopCorrector, RuleBasedCorrector};
pub use evaluator::{EvaluatorOptimizer, DEFAULT_MAX_ITERATIONS};
pub use validator::SwiftValidator;
