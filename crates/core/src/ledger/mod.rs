use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::advice::AdviceRecord;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub sequence: u64,
    pub record: AdviceRecord,
    pub content_hash: String,
    pub prev_hash: Option<String>,
    pub entry_hash: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub valid: bool,
    pub verified_entries: usize,
    pub latest_hash: Option<String>,
    pub failure_reason: Option<String>,
}

/// Append-only history of generated advice, oldest first.
#[derive(Clone, Debug, Default)]
pub struct AdviceLedger {
    entries: Vec<LedgerEntry>,
}

impl AdviceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: AdviceRecord) -> &LedgerEntry {
        let sequence = u64::try_from(self.entries.len()).unwrap_or(u64::MAX).saturating_add(1);
        let prev_hash = self.entries.last().map(|entry| entry.entry_hash.clone());
        let content_hash = sha256_hex(record.content.as_bytes());
        let entry_hash = hash_entry_material(sequence, &record, &content_hash, prev_hash.as_deref());

        self.entries.push(LedgerEntry { sequence, record, content_hash, prev_hash, entry_hash });
        let index = self.entries.len() - 1;
        &self.entries[index]
    }

    /// Up to `limit` records, newest first. With `excluding_latest` the most
    /// recently appended record is removed from the candidates before the
    /// limit applies.
    pub fn recent(&self, excluding_latest: bool, limit: usize) -> Vec<&AdviceRecord> {
        let candidates: &[LedgerEntry] = match (excluding_latest, self.entries.split_last()) {
            (true, Some((_, older))) => older,
            (true, None) => &[],
            (false, _) => self.entries.as_slice(),
        };

        candidates.iter().rev().take(limit).map(|entry| &entry.record).collect()
    }

    pub fn latest(&self) -> Option<&AdviceRecord> {
        self.entries.last().map(|entry| &entry.record)
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn verify_chain(&self) -> VerificationResult {
        let mut previous_hash: Option<String> = None;

        for (index, entry) in self.entries.iter().enumerate() {
            let expected_sequence = u64::try_from(index).unwrap_or(u64::MAX).saturating_add(1);
            let failure = if entry.sequence != expected_sequence {
                Some(format!(
                    "sequence mismatch at entry {}: expected {}, found {}",
                    entry.record.record_id, expected_sequence, entry.sequence
                ))
            } else if entry.prev_hash != previous_hash {
                Some(format!("previous hash mismatch at entry {}", entry.record.record_id))
            } else if sha256_hex(entry.record.content.as_bytes()) != entry.content_hash {
                Some(format!("content hash mismatch at entry {}", entry.record.record_id))
            } else if hash_entry_material(
                entry.sequence,
                &entry.record,
                &entry.content_hash,
                entry.prev_hash.as_deref(),
            ) != entry.entry_hash
            {
                Some(format!("entry hash mismatch at entry {}", entry.record.record_id))
            } else {
                None
            };

            if let Some(reason) = failure {
                return VerificationResult {
                    valid: false,
                    verified_entries: index,
                    latest_hash: previous_hash,
                    failure_reason: Some(reason),
                };
            }

            previous_hash = Some(entry.entry_hash.clone());
        }

        VerificationResult {
            valid: true,
            verified_entries: self.entries.len(),
            latest_hash: previous_hash,
            failure_reason: None,
        }
    }
}

fn hash_entry_material(
    sequence: u64,
    record: &AdviceRecord,
    content_hash: &str,
    prev_hash: Option<&str>,
) -> String {
    let material = format!(
        "{}|{}|{}|{}|{}|{}|{}",
        sequence,
        record.record_id,
        record.advice_type.label(),
        record.profile_id,
        record.generated_at.to_rfc3339(),
        content_hash,
        prev_hash.unwrap_or(""),
    );
    sha256_hex(material.as_bytes())
}

fn sha256_hex(payload: &[u8]) -> String {
    let digest = Sha256::digest(payload);
    let mut output = String::with_capacity(digest.len() * 2);
    for byte in digest.as_slice() {
        output.push_str(&format!("{byte:02x}"));
    }
    output
}
