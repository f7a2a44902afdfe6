use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::RegistryError;
use crate::traits::EventSink;
use crate::types::{Hash32, Identity, RegistryEvent, SignatureRecord};

/// Append-only collection of per-identity signatures over a shared document,
/// with a submission deadline, a quorum threshold, and a one-shot owner-only
/// finalization that anchors a combined hash.
///
/// Configuration (`owner`, `deadline`, `required_count`) is fixed at
/// construction. Records are only ever inserted, never updated or removed;
/// the `finalized` flag and `final_hash` transition exactly once. Each
/// mutating call is all-or-nothing: on any error the registry is unchanged.
pub struct Registry {
    owner: Identity,
    deadline: i64,
    required_count: usize,
    records: HashMap<Identity, SignatureRecord>,
    order: Vec<Identity>,
    final_hash: Option<Hash32>,
    finalized: bool,
    events: Arc<dyn EventSink>,
}

impl Registry {
    /// Create an empty registry. `deadline` is a Unix timestamp; submissions
    /// at or after it are rejected. `required_count` is the minimum number of
    /// distinct signatures before `finalize` can succeed.
    pub fn new(owner: Identity, deadline: i64, required_count: usize, events: Arc<dyn EventSink>) -> Self {
        Self {
            owner,
            deadline,
            required_count,
            records: HashMap::new(),
            order: Vec::new(),
            final_hash: None,
            finalized: false,
            events,
        }
    }

    /// Record one signature for `caller`. `now` is supplied by the hosting
    /// process; the registry holds no clock of its own.
    ///
    /// Fails with `DeadlinePassed` at or after the deadline and with
    /// `DuplicateSubmission` if `caller` already signed. One signature per
    /// identity, ever; there is no un-sign. Submissions stay open after
    /// finalization: late signatures are recorded but cannot affect the
    /// anchored hash.
    pub fn submit_signature(
        &mut self,
        caller: &str,
        external_fingerprint: &str,
        document_hash: Hash32,
        now: i64,
    ) -> Result<(), RegistryError> {
        if now >= self.deadline {
            return Err(RegistryError::DeadlinePassed { deadline: self.deadline, now });
        }
        if self.records.contains_key(caller) {
            return Err(RegistryError::DuplicateSubmission(caller.to_string()));
        }

        let record = SignatureRecord {
            external_fingerprint: external_fingerprint.to_string(),
            submitter: caller.to_string(),
            document_hash,
            submitted_at: now,
            verified: true,
        };
        self.records.insert(caller.to_string(), record);
        self.order.push(caller.to_string());

        self.events.emit(&RegistryEvent::SignatureSubmitted {
            submitter: caller.to_string(),
            document_hash,
        });
        Ok(())
    }

    /// Anchor `combined_hash` and close the covenant. Owner-only, once ever,
    /// and only after `required_count` distinct signatures have arrived.
    ///
    /// The combined hash is trusted as supplied: the registry never
    /// recomputes it from the collected records. Combining and ordering are
    /// the caller's concern.
    pub fn finalize(&mut self, caller: &str, combined_hash: Hash32) -> Result<(), RegistryError> {
        if caller != self.owner {
            return Err(RegistryError::Unauthorized(caller.to_string()));
        }
        if self.finalized {
            return Err(RegistryError::AlreadyFinalized);
        }
        if self.order.len() < self.required_count {
            return Err(RegistryError::QuorumNotMet {
                collected: self.order.len(),
                required: self.required_count,
            });
        }

        self.final_hash = Some(combined_hash);
        self.finalized = true;

        self.events.emit(&RegistryEvent::CovenantFinalized {
            total_signatures: self.order.len(),
            final_hash: combined_hash,
        });
        Ok(())
    }

    /// Number of distinct signatures collected so far.
    pub fn count(&self) -> usize {
        self.order.len()
    }

    /// Whether `identity` has a record.
    pub fn has_signed(&self, identity: &str) -> bool {
        self.records.contains_key(identity)
    }

    /// All records in submission order, for audit export.
    pub fn records(&self) -> impl Iterator<Item = &SignatureRecord> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn deadline(&self) -> i64 {
        self.deadline
    }

    pub fn required_count(&self) -> usize {
        self.required_count
    }

    pub fn final_hash(&self) -> Option<&Hash32> {
        self.final_hash.as_ref()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}
