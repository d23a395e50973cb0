use al_crypto::{CryptoError, NonceError};
use al_vault::SecretError;

/// Names the key a handshake operation needed but did not have
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum KeySlot {
    LocalStatic,
    LocalEphemeral,
    RemoteStatic,
    RemoteEphemeral,
}

impl std::fmt::Display for KeySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            KeySlot::LocalStatic => "local static keypair",
            KeySlot::LocalEphemeral => "local ephemeral keypair",
            KeySlot::RemoteStatic => "remote static key",
            KeySlot::RemoteEphemeral => "remote ephemeral key",
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum NoiseError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unsupported handshake pattern `{0}`")]
    UnsupportedPattern(String),
    #[error("unsupported pattern modifier `{0}`")]
    UnsupportedModifier(String),
    #[error("missing {0}")]
    MissingKeyMaterial(KeySlot),
    #[error("protocol sequencing: {0}")]
    ProtocolSequencing(&'static str),
    #[error("truncated message: needed {needed} bytes, got {available}")]
    TruncatedMessage { needed: usize, available: usize },
    #[error("buffer too small: needed {needed} bytes, got {available}")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("authentication failed")]
    Authentication,
    #[error(transparent)]
    Crypto(CryptoError),
    #[error(transparent)]
    Secret(SecretError),
    #[error(transparent)]
    Nonce(#[from] NonceError),
}

impl From<CryptoError> for NoiseError {
    fn from(value: CryptoError) -> Self {
        match value {
            CryptoError::DecryptionError(_) => NoiseError::Authentication,
            other => NoiseError::Crypto(other),
        }
    }
}

impl From<SecretError> for NoiseError {
    fn from(value: SecretError) -> Self {
        match value {
            SecretError::CryptoError(e) => e.into(),
            other => NoiseError::Secret(other),
        }
    }
}
