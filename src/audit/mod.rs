//! Audit logging for completed correction runs
//!
//! Every terminal outcome is auditable and tamper-evident.

use crate::models::{EvaluationRecord, SwiftMessage};
use crate::Result;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Audit trail storage; clones share the same underlying records
#[derive(Clone)]
pub struct AuditLog {
    records: Arc<RwLock<HashMap<Uuid, EvaluationRecord>>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store an evaluation record
    pub async fn record(&self, record: EvaluationRecord) -> Result<Uuid> {
        let audit_id = record.audit_id;
        let mut records = self.records.write().await;
        records.insert(audit_id, record);
        Ok(audit_id)
    }

    /// Retrieve a record by audit ID
    pub async fn get(&self, audit_id: Uuid) -> Result<Option<EvaluationRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&audit_id).cloned())
    }

    /// List all audit IDs for a message (sorted by created_at)
    pub async fn list_for_message(&self, message_id: &str) -> Result<Vec<Uuid>> {
        let records = self.records.read().await;

        let mut items: Vec<_> = records
            .iter()
            .filter(|(_, record)| record.message_id == message_id)
            .map(|(id, record)| (*id, record.created_at))
            .collect();

        // Sort by timestamp ascending
        items.sort_by_key(|(_, created_at)| *created_at);

        Ok(items.into_iter().map(|(id, _)| id).collect())
    }

    /// Verify a record's integrity via hash
    pub async fn verify_integrity(&self, audit_id: Uuid) -> Result<bool> {
        let records = self.records.read().await;

        if let Some(record) = records.get(&audit_id) {
            let current_hash = compute_message_hash(&record.message);
            Ok(current_hash == record.message_hash)
        } else {
            Ok(false)
        }
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute SHA256 hash of a message for integrity verification
/// Uses zero-copy streaming serialization into hasher
pub fn compute_message_hash(message: &SwiftMessage) -> String {
    let mut hasher = Sha256::new();

    // Stream JSON directly into hasher (no intermediate String)
    if serde_json::to_writer(&mut HashWriter(&mut hasher), message).is_err() {
        return String::new();
    }

    hex::encode(hasher.finalize())
}

/// Adapter to allow writing into Sha256 via std::io::Write
struct HashWriter<'a, H: Digest>(&'a mut H);

impl<'a, H: Digest> Write for HashWriter<'a, H> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

//
// ================= Tests =================
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageType, ValidationStatus};
    use chrono::{DateTime, TimeZone, Utc};

    fn sample_message(message_id: &str) -> SwiftMessage {
        SwiftMessage::new(
            message_id,
            MessageType::Mt202,
            "SETTLE0001",
            "750000.00",
            "EUR",
            "DEUTDEFF",
            "CHASUS33",
            "240917",
        )
    }

    fn sample_record(message_id: &str, created_at: DateTime<Utc>) -> EvaluationRecord {
        let message = sample_message(message_id);
        EvaluationRecord {
            audit_id: Uuid::new_v4(),
            message_id: message_id.to_string(),
            final_status: ValidationStatus::Valid,
            iterations: 1,
            message_hash: compute_message_hash(&message),
            message: Arc::new(message),
            records: Arc::new(Vec::new()),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_record_and_retrieve() {
        let audit_log = AuditLog::new();
        let record = sample_record("MSG-A", Utc::now());

        let audit_id = audit_log.record(record).await.unwrap();

        let loaded = audit_log.get(audit_id).await.unwrap().unwrap();
        assert_eq!(loaded.message_id, "MSG-A");
        assert_eq!(loaded.final_status, ValidationStatus::Valid);

        assert!(audit_log.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_message_sorted_by_time() {
        let audit_log = AuditLog::new();

        let later = sample_record("MSG-A", Utc.with_ymd_and_hms(2024, 9, 16, 12, 0, 0).unwrap());
        let earlier = sample_record("MSG-A", Utc.with_ymd_and_hms(2024, 9, 16, 9, 0, 0).unwrap());
        let other = sample_record("MSG-B", Utc.with_ymd_and_hms(2024, 9, 16, 10, 0, 0).unwrap());

        let later_id = later.audit_id;
        let earlier_id = earlier.audit_id;

        audit_log.record(later).await.unwrap();
        audit_log.record(earlier).await.unwrap();
        audit_log.record(other).await.unwrap();

        let ids = audit_log.list_for_message("MSG-A").await.unwrap();
        assert_eq!(ids, vec![earlier_id, later_id]);

        assert!(audit_log.list_for_message("MSG-C").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_integrity_verification_detects_tampering() {
        let audit_log = AuditLog::new();

        let genuine = sample_record("MSG-A", Utc::now());
        let genuine_id = audit_log.record(genuine).await.unwrap();
        assert!(audit_log.verify_integrity(genuine_id).await.unwrap());

        let mut doctored = sample_record("MSG-B", Utc::now());
        doctored.message_hash = "0000".to_string();
        let doctored_id = audit_log.record(doctored).await.unwrap();
        assert!(!audit_log.verify_integrity(doctored_id).await.unwrap());

        assert!(!audit_log.verify_integrity(Uuid::new_v4()).await.unwrap());
    }

    #[test]
    fn test_message_hash_tracks_content() {
        let message = sample_message("MSG-A");
        assert_eq!(
            compute_message_hash(&message),
            compute_message_hash(&message.clone())
        );

        let mut altered = message.clone();
        altered.amount = "750000.01".to_string();
        assert_ne!(compute_message_hash(&message), compute_message_hash(&altered));
    }
}
