use crate::{CryptoError, Nonce, NONCE_SIZE};
use chacha20poly1305::{aead::AeadMutInPlace, ChaCha20Poly1305, KeyInit};
use rand::{rngs::OsRng, TryRngCore};
use zeroize::Zeroize;

pub const TAG_SIZE: usize = 16;
pub const KEY_SIZE: usize = 32;

impl From<blake2::digest::InvalidLength> for CryptoError {
    fn from(_: blake2::digest::InvalidLength) -> Self {
        CryptoError::InvalidKeyLength
    }
}

impl From<rand::rand_core::OsError> for CryptoError {
    fn from(_: rand::rand_core::OsError) -> Self {
        CryptoError::OsRngError
    }
}

impl From<hex::FromHexError> for CryptoError {
    fn from(_: hex::FromHexError) -> Self {
        CryptoError::HexError
    }
}

pub fn to_hex(bytes: &[u8], str: &mut [u8]) -> Result<(), CryptoError> {
    Ok(hex::encode_to_slice(bytes, str)?)
}

pub fn from_hex(str: &[u8], bytes: &mut [u8]) -> Result<(), CryptoError> {
    Ok(hex::decode_to_slice(str, bytes)?)
}

pub fn fill_random(dest: &mut [u8]) -> Result<(), CryptoError> {
    Ok(OsRng.try_fill_bytes(dest)?)
}

/// Seals `plaintext` into `dest` as `ciphertext || tag`, returns the number of bytes written.
pub fn encrypt(
    dest: &mut [u8],
    plaintext: &[u8],
    key: &[u8],
    nonce: &[u8],
    associated_data: &[u8],
) -> Result<usize, CryptoError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::InvalidNonceLength);
    }
    let p_len = plaintext.len();
    if dest.len() < p_len + TAG_SIZE {
        return Err(CryptoError::DestTooSmall);
    }
    let mut cipher = ChaCha20Poly1305::new_from_slice(key)?;
    dest[..p_len].copy_from_slice(plaintext);
    let tag = cipher
        .encrypt_in_place_detached(
            chacha20poly1305::Nonce::from_slice(nonce),
            associated_data,
            &mut dest[..p_len],
        )
        .map_err(|e| {
            dest[..p_len].zeroize();
            CryptoError::EncryptionError(e)
        })?;
    dest[p_len..p_len + TAG_SIZE].copy_from_slice(&tag);
    Ok(p_len + TAG_SIZE)
}

/// Opens `ciphertext || tag` into `dest`, returns the plaintext length.
/// `dest` is zeroized if the tag does not verify.
pub fn decrypt(
    dest: &mut [u8],
    ciphertext: &[u8],
    key: &[u8],
    nonce: &[u8],
    associated_data: &[u8],
) -> Result<usize, CryptoError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::InvalidNonceLength);
    }
    let Some(p_len) = ciphertext.len().checked_sub(TAG_SIZE) else {
        return Err(CryptoError::CiphertextTooShort);
    };
    if dest.len() < p_len {
        return Err(CryptoError::DestTooSmall);
    }
    let mut cipher = ChaCha20Poly1305::new_from_slice(key)?;

    let (data, tag) = ciphertext.split_at(p_len);
    dest[..p_len].copy_from_slice(data);

    cipher
        .decrypt_in_place_detached(
            chacha20poly1305::Nonce::from_slice(nonce),
            associated_data,
            &mut dest[..p_len],
            chacha20poly1305::Tag::from_slice(tag),
        )
        .map_err(|e| {
            dest[..p_len].zeroize();
            CryptoError::DecryptionError(e)
        })?;
    Ok(p_len)
}

/// The Noise `ChaChaPoly` cipher functions.
pub struct ChaChaPoly;

impl ChaChaPoly {
    pub const ALG: &'static str = "ChaChaPoly";
    pub const KEYLEN: usize = KEY_SIZE;
    pub const TAGLEN: usize = TAG_SIZE;

    /// ENCRYPT(k, n, ad, plaintext)
    pub fn encrypt(
        key: &[u8; KEY_SIZE],
        nonce: &Nonce,
        associated_data: &[u8],
        plaintext: &[u8],
        dest: &mut [u8],
    ) -> Result<usize, CryptoError> {
        encrypt(dest, plaintext, key, nonce.as_bytes(), associated_data)
    }

    /// DECRYPT(k, n, ad, ciphertext)
    pub fn decrypt(
        key: &[u8; KEY_SIZE],
        nonce: &Nonce,
        associated_data: &[u8],
        ciphertext: &[u8],
        dest: &mut [u8],
    ) -> Result<usize, CryptoError> {
        decrypt(dest, ciphertext, key, nonce.as_bytes(), associated_data)
    }
}
