//! Evaluator-optimizer loop - implements the bounded correction cycle
//!
//! EVALUATE → (VALID | OPTIMIZE) → EVALUATE → ... → VALID | INVALID
//!
//! Rounds alternate a pure validation pass with a correction request to an
//! injected [`Corrector`]. The caller's message is committed exactly once,
//! at the terminal transition.

use crate::audit::{compute_message_hash, AuditLog};
use crate::config::ValidationConfig;
use crate::corrector::Corrector;
use crate::models::{
    CorrectionOutcome, EvaluationRecord, EvaluationReport, IterationRecord, SwiftMessage,
    ValidationStatus,
};
use crate::validator::SwiftValidator;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Evaluation rounds allowed before a message is declared unresolvable
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Bounded evaluate/optimize controller over a single message
pub struct EvaluatorOptimizer {
    validator: SwiftValidator,
    corrector: Box<dyn Corrector>,
    max_iterations: usize,
    audit_log: Option<AuditLog>,
}

impl EvaluatorOptimizer {
    pub fn new(corrector: Box<dyn Corrector>) -> Self {
        Self::with_config(corrector, ValidationConfig::default())
    }

    pub fn with_config(corrector: Box<dyn Corrector>, config: ValidationConfig) -> Self {
        Self {
            validator: SwiftValidator::with_config(config),
            corrector,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            audit_log: None,
        }
    }

    /// Override the round bound. Clamped to at least one round so every
    /// message still gets a definitive status.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Record terminal outcomes to an audit log.
    pub fn with_audit_log(mut self, audit_log: AuditLog) -> Self {
        self.audit_log = Some(audit_log);
        self
    }

    /// Run the correction cycle until the message validates or the round
    /// bound is exhausted. Intermediate rounds mutate a private working
    /// copy only; `message` is written back once, at the terminal
    /// transition, with a definitive status.
    pub async fn process(&self, message: &mut SwiftMessage) -> EvaluationReport {
        let run_id = Uuid::new_v4();
        let mut working = message.clone();
        let mut records = Vec::with_capacity(self.max_iterations);
        let mut iteration = 1;

        info!(
            run_id = %run_id,
            message_id = %message.message_id,
            max_iterations = self.max_iterations,
            "Evaluator: starting correction cycle"
        );

        loop {
            // === EVALUATE ===
            let evaluation = self.validator.validate(&working);

            debug!(
                run_id = %run_id,
                iteration,
                error_count = evaluation.errors.len(),
                warning_count = evaluation.warnings.len(),
                "Evaluation round complete"
            );

            if evaluation.is_valid {
                // === COMMIT VALID ===
                working.validation_status = ValidationStatus::Valid;
                working.validation_errors.clear();

                records.push(IterationRecord {
                    iteration,
                    errors: Vec::new(),
                    warnings: evaluation.warnings.clone(),
                    correction: CorrectionOutcome::Skipped,
                });

                info!(run_id = %run_id, iteration, "Message validated");

                let report = EvaluationReport {
                    run_id,
                    message_id: working.message_id.clone(),
                    final_status: ValidationStatus::Valid,
                    iterations: iteration,
                    unresolved_errors: Vec::new(),
                    warnings: evaluation.warnings,
                    records,
                };
                self.commit(message, working, &report).await;
                return report;
            }

            if iteration >= self.max_iterations {
                // === COMMIT INVALID ===
                working.validation_status = ValidationStatus::Invalid;
                working
                    .validation_errors
                    .extend(evaluation.errors.iter().cloned());

                records.push(IterationRecord {
                    iteration,
                    errors: evaluation.errors.clone(),
                    warnings: evaluation.warnings.clone(),
                    correction: CorrectionOutcome::Skipped,
                });

                warn!(
                    run_id = %run_id,
                    iteration,
                    unresolved = evaluation.errors.len(),
                    "Round bound reached with unresolved errors"
                );

                let report = EvaluationReport {
                    run_id,
                    message_id: working.message_id.clone(),
                    final_status: ValidationStatus::Invalid,
                    iterations: iteration,
                    unresolved_errors: evaluation.errors,
                    warnings: evaluation.warnings,
                    records,
                };
                self.commit(message, working, &report).await;
                return report;
            }

            // === OPTIMIZE ===
            let correction = match self.corrector.correct(&working, &evaluation.errors).await {
                Ok(candidate) => {
                    let changed_fields = working.changed_fields(&candidate);
                    if changed_fields.is_empty() {
                        debug!(run_id = %run_id, iteration, "Corrector proposed no changes");
                        CorrectionOutcome::NoChange
                    } else {
                        debug!(
                            run_id = %run_id,
                            iteration,
                            changed = ?changed_fields,
                            "Applying corrected candidate"
                        );
                        working.apply_candidate(candidate);
                        CorrectionOutcome::Applied { changed_fields }
                    }
                }
                Err(e) => {
                    // Swallowed and retried within the bound, never fatal
                    warn!(
                        run_id = %run_id,
                        iteration,
                        error = %e,
                        "Corrector failed; continuing with unchanged message"
                    );
                    CorrectionOutcome::Failed
                }
            };

            records.push(IterationRecord {
                iteration,
                errors: evaluation.errors,
                warnings: evaluation.warnings,
                correction,
            });

            iteration += 1;
        }
    }

    /// Terminal transition: write the working copy back to the caller's
    /// message, then record the run if an audit log is attached.
    async fn commit(
        &self,
        message: &mut SwiftMessage,
        working: SwiftMessage,
        report: &EvaluationReport,
    ) {
        *message = working;

        let Some(audit_log) = &self.audit_log else {
            return;
        };

        let record = EvaluationRecord {
            audit_id: Uuid::new_v4(),
            message_id: message.message_id.clone(),
            final_status: report.final_status,
            iterations: report.iterations,
            message: Arc::new(message.clone()),
            records: Arc::new(report.records.clone()),
            message_hash: compute_message_hash(message),
            created_at: Utc::now(),
        };

        // Audit failures must not disturb an already-final outcome
        if let Err(e) = audit_log.record(record).await {
            warn!(run_id = %report.run_id, error = %e, "Failed to record audit entry");
        }
    }
}

//
// ================= Tests =================
//
