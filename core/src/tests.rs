use std::sync::{Arc, Mutex};

use crate::errors::RegistryError;
use crate::registry::Registry;
use crate::traits::{EventSink, NopSink};
use crate::types::{Hash32, RegistryEvent};

/// Sink that records every event, for asserting on the notification stream.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<RegistryEvent>>,
}

impl RecordingSink {
    fn snapshot(&self) -> Vec<RegistryEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &RegistryEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn doc_hash(tag: u8) -> Hash32 {
    Hash32::from_bytes([tag; 32])
}

fn registry(deadline: i64, required: usize) -> Registry {
    Registry::new("seedbringer".into(), deadline, required, Arc::new(NopSink))
}

#[test]
fn distinct_submissions_counted_and_enumerable() {
    let mut reg = registry(100, 3);

    for (i, id) in ["alpha", "beta", "gamma"].iter().enumerate() {
        reg.submit_signature(id, &format!("FPR-{id}"), doc_hash(1), 10 + i as i64).unwrap();
    }

    assert_eq!(reg.count(), 3);
    assert!(reg.has_signed("alpha"));
    assert!(reg.has_signed("beta"));
    assert!(reg.has_signed("gamma"));
    assert!(!reg.has_signed("delta"));

    // enumeration follows submission order
    let submitters: Vec<&str> = reg.records().map(|r| r.submitter.as_str()).collect();
    assert_eq!(submitters, vec!["alpha", "beta", "gamma"]);
    for r in reg.records() {
        assert!(r.verified);
        assert!(r.submitted_at < reg.deadline());
        assert_eq!(r.document_hash, doc_hash(1));
    }
}

#[test]
fn duplicate_submission_rejected_without_state_change() {
    let mut reg = registry(100, 1);
    reg.submit_signature("alpha", "FPR-1", doc_hash(1), 10).unwrap();

    let err = reg.submit_signature("alpha", "FPR-other", doc_hash(2), 20).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateSubmission("alpha".into()));

    assert_eq!(reg.count(), 1);
    let rec = reg.records().next().unwrap();
    assert_eq!(rec.external_fingerprint, "FPR-1");
    assert_eq!(rec.document_hash, doc_hash(1));
    assert_eq!(rec.submitted_at, 10);
}

#[test]
fn rejects_submission_at_and_after_deadline() {
    let mut reg = registry(100, 0);

    let at = reg.submit_signature("alpha", "FPR-1", doc_hash(1), 100).unwrap_err();
    assert_eq!(at, RegistryError::DeadlinePassed { deadline: 100, now: 100 });

    let after = reg.submit_signature("alpha", "FPR-1", doc_hash(1), 101).unwrap_err();
    assert_eq!(after, RegistryError::DeadlinePassed { deadline: 100, now: 101 });

    assert_eq!(reg.count(), 0);
    assert!(!reg.has_signed("alpha"));
}

#[test]
fn finalize_requires_owner() {
    let mut reg = registry(100, 0);

    let err = reg.finalize("impostor", doc_hash(9)).unwrap_err();
    assert_eq!(err, RegistryError::Unauthorized("impostor".into()));
    assert!(!reg.is_finalized());
    assert!(reg.final_hash().is_none());
}

#[test]
fn finalize_requires_quorum_then_succeeds_once() {
    let mut reg = registry(100, 2);
    reg.submit_signature("alpha", "FPR-1", doc_hash(1), 10).unwrap();

    let err = reg.finalize("seedbringer", doc_hash(9)).unwrap_err();
    assert_eq!(err, RegistryError::QuorumNotMet { collected: 1, required: 2 });
    assert!(!reg.is_finalized());

    reg.submit_signature("beta", "FPR-2", doc_hash(1), 20).unwrap();
    reg.finalize("seedbringer", doc_hash(9)).unwrap();
    assert!(reg.is_finalized());
    assert_eq!(reg.final_hash(), Some(&doc_hash(9)));

    // second finalize fails and the anchored hash stays put
    let err = reg.finalize("seedbringer", doc_hash(8)).unwrap_err();
    assert_eq!(err, RegistryError::AlreadyFinalized);
    assert_eq!(reg.final_hash(), Some(&doc_hash(9)));
}

#[test]
fn combined_hash_is_trusted_as_supplied() {
    // The registry never recomputes the combined hash from the records it
    // holds: any well-formed value from the owner is anchored verbatim.
    // Combining and ordering happen outside this crate.
    let mut reg = registry(100, 1);
    reg.submit_signature("alpha", "FPR-1", doc_hash(1), 10).unwrap();

    let unrelated = Hash32::digest(b"not derived from any record");
    reg.finalize("seedbringer", unrelated).unwrap();
    assert_eq!(reg.final_hash(), Some(&unrelated));
}

#[test]
fn full_covenant_scenario() {
    // required=2, deadline=T100: quorum gate, one-shot finalize, and
    // submissions staying open after the anchor is set.
    let sink = Arc::new(RecordingSink::default());
    let mut reg = Registry::new("seedbringer".into(), 100, 2, sink.clone());

    reg.submit_signature("alpha", "FPR-A", doc_hash(1), 10).unwrap();
    assert_eq!(reg.count(), 1);

    assert_eq!(
        reg.finalize("seedbringer", doc_hash(7)).unwrap_err(),
        RegistryError::QuorumNotMet { collected: 1, required: 2 }
    );

    reg.submit_signature("beta", "FPR-B", doc_hash(1), 30).unwrap();
    assert_eq!(reg.count(), 2);

    reg.finalize("seedbringer", doc_hash(7)).unwrap();
    assert!(reg.is_finalized());
    assert_eq!(reg.final_hash(), Some(&doc_hash(7)));

    // late signature is still accepted but cannot move the anchored hash
    reg.submit_signature("gamma", "FPR-C", doc_hash(1), 50).unwrap();
    assert_eq!(reg.count(), 3);
    assert_eq!(reg.final_hash(), Some(&doc_hash(7)));

    assert_eq!(reg.finalize("seedbringer", doc_hash(8)).unwrap_err(), RegistryError::AlreadyFinalized);

    // only successful mutations produced events, in order
    let events = sink.snapshot();
    assert_eq!(
        events,
        vec![
            RegistryEvent::SignatureSubmitted { submitter: "alpha".into(), document_hash: doc_hash(1) },
            RegistryEvent::SignatureSubmitted { submitter: "beta".into(), document_hash: doc_hash(1) },
            RegistryEvent::CovenantFinalized { total_signatures: 2, final_hash: doc_hash(7) },
            RegistryEvent::SignatureSubmitted { submitter: "gamma".into(), document_hash: doc_hash(1) },
        ]
    );
}

#[test]
fn zero_required_count_allows_immediate_finalize() {
    let mut reg = registry(100, 0);
    reg.finalize("seedbringer", doc_hash(5)).unwrap();
    assert!(reg.is_finalized());
    assert_eq!(reg.count(), 0);
}

#[test]
fn hash32_hex_round_trip_and_rejects_malformed() {
    let h = Hash32::digest(b"covenant");
    let parsed = Hash32::from_hex(&h.to_hex()).unwrap();
    assert_eq!(h, parsed);

    assert!(Hash32::from_hex("zz").is_err());
    assert!(Hash32::from_hex("abcd").is_err());
    // 63 chars, odd length
    assert!(Hash32::from_hex(&"a".repeat(63)).is_err());
}

#[test]
fn record_serde_uses_hex_hashes() {
    let h = Hash32::from_bytes([0xab; 32]);
    let rec = crate::types::SignatureRecord {
        external_fingerprint: "FPR-1".into(),
        submitter: "alpha".into(),
        document_hash: h,
        submitted_at: 42,
        verified: true,
    };
    let json = serde_json::to_string(&rec).unwrap();
    assert!(json.contains(&"ab".repeat(32)));
    let back: crate::types::SignatureRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rec);
}
