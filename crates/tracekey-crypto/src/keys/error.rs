//! Error types for key derivation

use thiserror::Error;

/// Errors reported by the HKDF expansion behind daily key derivation.
///
/// Neither variant occurs for the fixed 32-byte tracing keys and 16-byte
/// outputs used by this crate. They are surfaced rather than swallowed so a
/// misparameterized build fails loudly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// Pseudorandom key is shorter than the SHA-256 output
    #[error("invalid HKDF pseudorandom key length: {length} bytes")]
    InvalidPrkLength {
        /// Length of the rejected key
        length: usize,
    },

    /// Requested output exceeds what HKDF-SHA256 can expand to
    #[error("HKDF-SHA256 cannot expand to {length} bytes")]
    InvalidOutputLength {
        /// Requested output length
        length: usize,
    },
}
