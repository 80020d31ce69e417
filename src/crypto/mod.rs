pub mod kdf;
pub mod milenage;
pub mod rand;
pub mod snn;
pub mod vectors;

pub use snn::{plmn_id_bytes, validate_snn};
pub use vectors::KeyMaterial;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Malformed hex in {field}")]
    MalformedHex { field: &'static str },
    #[error("AUTS verification failed")]
    MacMismatch,
}
