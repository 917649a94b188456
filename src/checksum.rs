//! Checksums stamped into generated headers
//!
//! A generated file records the SHA-256 of the definitions it was built
//! from, so a stale checked-in model can be spotted without regenerating.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 checksum, lower-case hex
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum over the compact JSON encoding of any serializable input.
    ///
    /// With `preserve_order` the encoding follows document order, so the
    /// same schema file always yields the same checksum.
    pub fn of_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        let canonical = serde_json::to_vec(value)?;
        Ok(Self::from_bytes(&canonical))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters of the digest, for log lines
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checksum_consistency() {
        let defs = json!({"SessionId": {"type": "string"}});
        let first = Checksum::of_json(&defs).unwrap();
        let second = Checksum::of_json(&defs).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 64);
        assert_eq!(first.short().len(), 12);
    }

    #[test]
    fn test_checksum_different_content() {
        let a = Checksum::of_json(&json!({"SessionId": {"type": "string"}})).unwrap();
        let b = Checksum::of_json(&json!({"SessionId": {"type": "integer"}})).unwrap();
        assert_ne!(a, b);
    }
}
