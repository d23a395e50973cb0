use al_crypto::CryptoError;

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum SecretError {
    #[error("crypto error: {0}")]
    CryptoError(#[from] CryptoError),
    #[error("invalid secret length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
