use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an order document.
///
/// Generated ids are 96 bits rendered as 24 lowercase hex characters:
/// a 4-byte big-endian unix timestamp, 5 random bytes fixed per process and
/// a 3-byte counter. Ids read back from storage or from a request path are
/// treated as opaque strings and are not validated against that layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

struct Generator {
    process: [u8; 5],
    counter: AtomicU32,
}

fn generator() -> &'static Generator {
    static GENERATOR: OnceLock<Generator> = OnceLock::new();
    GENERATOR.get_or_init(|| {
        let seed = Uuid::new_v4();
        let bytes = seed.as_bytes();
        let mut process = [0u8; 5];
        process.copy_from_slice(&bytes[..5]);
        let start = u32::from_be_bytes([0, bytes[5], bytes[6], bytes[7]]);
        Generator {
            process,
            counter: AtomicU32::new(start),
        }
    })
}

impl OrderId {
    /// Generates a fresh, collision-free order id.
    pub fn generate() -> Self {
        let seconds = chrono::Utc::now().timestamp() as u32;
        let generator = generator();
        let count = generator.counter.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut raw = [0u8; 12];
        raw[..4].copy_from_slice(&seconds.to_be_bytes());
        raw[4..9].copy_from_slice(&generator.process);
        raw[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        let hex: String = raw.iter().map(|b| format!("{b:02x}")).collect();
        Self(hex)
    }

    /// Wraps an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Inventory item key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the key is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_order_ids_are_24_hex_chars() {
        let id = OrderId::generate();
        assert_eq!(id.as_str().len(), 24);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id.as_str(), id.as_str().to_lowercase());
    }

    #[test]
    fn generated_order_ids_are_unique() {
        let ids: HashSet<OrderId> = (0..10_000).map(|_| OrderId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn order_id_leads_with_timestamp() {
        let before = chrono::Utc::now().timestamp() as u32;
        let id = OrderId::generate();
        let seconds = u32::from_str_radix(&id.as_str()[..8], 16).unwrap();
        assert!(seconds >= before);
    }

    #[test]
    fn order_id_serializes_as_plain_string() {
        let id = OrderId::new("65f0c0ffee0000000000abcd");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"65f0c0ffee0000000000abcd\"");
    }

    #[test]
    fn blank_item_id() {
        assert!(ItemId::new("  ").is_blank());
        assert!(!ItemId::new("A1").is_blank());
    }
}
