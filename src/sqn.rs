use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::types::AppError;

pub const SQN_HEX_LEN: usize = 12;
pub const SQN_MASK: u64 = 0xFFFF_FFFF_FFFF;
pub const MAX_REQUESTED_VECTORS: u8 = 32;

/// Owns the read-advance-write lifecycle of subscriber sequence numbers.
/// Holding the guard returned by `lock` serializes the whole
/// read / derive / persist window for one subscriber; requests for
/// different subscribers proceed independently.
pub struct SequenceNumberManager {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SequenceNumberManager {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn lock(&self, supi: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().expect("SQN lock registry poisoned");
            Arc::clone(
                locks
                    .entry(supi.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        entry.lock_owned().await
    }
}

impl Default for SequenceNumberManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses the stored 12-hex-digit counter. A record that fails here holds
/// corrupted provisioning data, which is a fatal condition rather than a
/// caller error.
pub fn parse(sqn_hex: &str) -> Result<u64, AppError> {
    if sqn_hex.len() != SQN_HEX_LEN {
        return Err(AppError::MissingCredentials(format!(
            "Stored SQN must be {} hex digits, got {}",
            SQN_HEX_LEN,
            sqn_hex.len()
        )));
    }
    u64::from_str_radix(sqn_hex, 16)
        .map_err(|_| AppError::MissingCredentials(format!("Stored SQN is not hex: {}", sqn_hex)))
}

/// Re-encodes a counter value as 12 zero-padded uppercase hex digits.
pub fn encode(value: u64) -> String {
    format!("{:012X}", value & SQN_MASK)
}

/// `(old + by) mod 2^48`.
pub fn advance(old: u64, by: u8) -> u64 {
    (old + by as u64) & SQN_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_encode_roundtrip() {
        assert_eq!(parse("000000000021").unwrap(), 0x21);
        assert_eq!(encode(0x21), "000000000021");
        assert_eq!(encode(parse("FF9BB4D0B607").unwrap()), "FF9BB4D0B607");
    }

    #[test]
    fn parse_accepts_lowercase_storage() {
        assert_eq!(parse("ff9bb4d0b607").unwrap(), 0xFF9BB4D0B607);
    }

    #[test]
    fn parse_rejects_bad_widths_and_non_hex() {
        assert!(parse("").is_err());
        assert!(parse("0021").is_err());
        assert!(parse("00000000002g").is_err());
        assert!(parse("0000000000211").is_err());
    }

    #[test]
    fn encode_is_upper_zero_padded() {
        assert_eq!(encode(0xabc), "000000000ABC");
    }

    #[test]
    fn advance_wraps_at_48_bits() {
        assert_eq!(advance(0xFFFF_FFFF_FFFF, 1), 0);
        assert_eq!(advance(0xFFFF_FFFF_FFFE, 32), 0x1E);
        assert_eq!(advance(0x21, 32), 0x41);
    }

    #[tokio::test]
    async fn locks_serialize_per_subscriber() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let manager = Arc::new(SequenceNumberManager::new());
        let counter = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = Arc::clone(&manager);
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                let _guard = manager.lock("imsi-001010000000001").await;
                // Non-atomic read-modify-write; only safe under the lock.
                let seen = counter.load(Ordering::SeqCst);
                tokio::task::yield_now().await;
                counter.store(seen + 1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn locks_are_independent_across_subscribers() {
        let manager = SequenceNumberManager::new();
        let _a = manager.lock("imsi-001010000000001").await;
        // A second subscriber must not block behind the first.
        let _b = manager.lock("imsi-001010000000002").await;
    }
}
