use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Opaque caller identity. Transport authentication is assumed to have
/// happened upstream; the registry only compares identities for equality.
pub type Identity = String;

/// Raised when a hex string does not decode to exactly 32 bytes.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed hash: {0}")]
pub struct MalformedHash(pub String);

/// Fixed 32-byte hash value, hex-encoded on the wire.
///
/// Used both for the per-record document hash and for the combined hash
/// anchored at finalization.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash32([u8; 32]);

impl Hash32 {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character lowercase or uppercase hex string.
    pub fn from_hex(s: &str) -> Result<Self, MalformedHash> {
        let raw = hex::decode(s).map_err(|e| MalformedHash(e.to_string()))?;
        let bytes: [u8; 32] =
            raw.try_into().map_err(|_| MalformedHash(format!("expected 32 bytes, got {} hex chars", s.len())))?;
        Ok(Self(bytes))
    }

    /// SHA-256 of arbitrary bytes. Convenience for callers producing a
    /// document hash; the registry itself never hashes anything.
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", self.to_hex())
    }
}

impl Serialize for Hash32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash32::from_hex(&s).map_err(D::Error::custom)
    }
}

/// One accepted signature, keyed by submitter identity in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureRecord {
    /// Off-chain credential token (e.g. a GPG key fingerprint). Opaque here;
    /// verification happens before submission reaches the registry.
    pub external_fingerprint: String,
    /// Identity that submitted. Always equals the record's key in the registry.
    pub submitter: Identity,
    /// Hash of the document being attested.
    pub document_hash: Hash32,
    /// Submission time (Unix seconds). Always strictly below the deadline.
    pub submitted_at: i64,
    /// Off-chain verification outcome. Always true at creation; retained for
    /// audit export.
    pub verified: bool,
}

/// Notifications emitted on the success path of each mutating call.
/// Subscribers observe but cannot influence registry behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    SignatureSubmitted { submitter: Identity, document_hash: Hash32 },
    CovenantFinalized { total_signatures: usize, final_hash: Hash32 },
}
