use rand::rngs::OsRng;
use rand::RngCore;

pub const RAND_LEN: usize = 16;

/// Draws a fresh 128-bit challenge from the operating system CSPRNG.
/// Every call is independent; there is no shared or seeded state.
pub fn fresh_rand() -> [u8; RAND_LEN] {
    let mut rand = [0u8; RAND_LEN];
    OsRng.fill_bytes(&mut rand);
    rand
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn successive_challenges_are_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..16 {
            assert!(seen.insert(fresh_rand()));
        }
    }
}
