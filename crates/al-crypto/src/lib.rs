// Primitive collaborators for the Noise handshake: 25519 / ChaChaPoly / BLAKE2s

mod dh;
mod hash;
mod hkdf;
mod keys;
mod nonce;

pub use dh::{Dh, X25519};
pub use hash::{hash, Blake2s, HmacBlake2s, BLOCKLEN, HASHLEN};
pub use hkdf::{Hkdf, HkdfBlake2s};
pub use keys::{decrypt, encrypt, fill_random, from_hex, to_hex, ChaChaPoly, KEY_SIZE, TAG_SIZE};
pub use nonce::{Nonce, NonceError, NONCE_SIZE};

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid hex encoding")]
    HexError,
    #[error("invalid key length")]
    InvalidKeyLength,
    #[error("invalid nonce length")]
    InvalidNonceLength,
    #[error("ciphertext shorter than the authentication tag")]
    CiphertextTooShort,
    #[error("operating system randomness unavailable")]
    OsRngError,
    #[error("destination buffer too small")]
    DestTooSmall,
    #[error("hkdf output too long")]
    HkdfExpandTooLong,
    #[error("encryption failed")]
    EncryptionError(chacha20poly1305::Error),
    #[error("decryption failed")]
    DecryptionError(chacha20poly1305::Error),
    #[error("diffie-hellman produced a non-contributory shared secret")]
    NonContributory,
}
