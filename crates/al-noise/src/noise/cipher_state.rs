use crate::{NoiseError, KEY_SIZE, TAG_SIZE};
use al_crypto::{ChaChaPoly, Nonce};
use al_vault::{FixedSecret, SecureAccess, SecureRef};

/// A Noise cipher state: an optional key `k` and the nonce counter `n`
#[derive(Debug, Default)]
pub struct CipherState {
    k: Option<FixedSecret<KEY_SIZE>>,
    n: Nonce,
}

impl CipherState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will take the `key` array into the container, zeroing the source. Resets `n` to 0.
    pub fn initialize_key(&mut self, key: &mut [u8; KEY_SIZE]) {
        self.k = Some(FixedSecret::take(key, "noise.cipher_state.k"));
        self.n = Nonce::new(0);
    }

    pub fn has_key(&self) -> bool {
        self.k.is_some()
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        self.n.set_counter(nonce);
    }

    pub fn nonce(&self) -> u64 {
        self.n.counter_num()
    }

    /// ENCRYPT(k, n++, ad, plaintext) into `out`, or a plain copy when no key is set.
    /// Returns the number of bytes written.
    pub fn encrypt_with_ad(
        &mut self,
        associated_data: &[u8],
        plaintext: &[u8],
        out: &mut [u8],
    ) -> Result<usize, NoiseError> {
        let Some(key) = &self.k else {
            return copy_into(out, plaintext);
        };

        self.n.check_usable()?;
        let needed = plaintext.len() + TAG_SIZE;
        if out.len() < needed {
            Err(NoiseError::BufferTooSmall {
                needed,
                available: out.len(),
            })?
        }
        let n = &self.n;
        let len = key.with(|k| ChaChaPoly::encrypt(k, n, associated_data, plaintext, out))?;
        self.n.to_next()?;
        Ok(len)
    }

    /// DECRYPT(k, n++, ad, ciphertext) into `out`, or a plain copy when no key is set.
    /// The nonce only advances when the tag verifies.
    pub fn decrypt_with_ad(
        &mut self,
        associated_data: &[u8],
        ciphertext: &[u8],
        out: &mut [u8],
    ) -> Result<usize, NoiseError> {
        let Some(key) = &self.k else {
            return copy_into(out, ciphertext);
        };

        self.n.check_usable()?;
        let Some(needed) = ciphertext.len().checked_sub(TAG_SIZE) else {
            return Err(NoiseError::TruncatedMessage {
                needed: TAG_SIZE,
                available: ciphertext.len(),
            });
        };
        if out.len() < needed {
            Err(NoiseError::BufferTooSmall {
                needed,
                available: out.len(),
            })?
        }
        let n = &self.n;
        let len = key.with(|k| ChaChaPoly::decrypt(k, n, associated_data, ciphertext, out))?;
        self.n.to_next()?;
        Ok(len)
    }

    /// REKEY(k): `k = ENCRYPT(k, maxnonce, zerolen, zeros)` truncated to 32 bytes, `n` is kept.
    pub fn rekey(&mut self) -> Result<(), NoiseError> {
        let Some(key) = &mut self.k else {
            return Ok(());
        };

        let mut new_key = SecureRef::new([0u8; KEY_SIZE + TAG_SIZE]);
        key.with(|k| {
            ChaChaPoly::encrypt(k, &Nonce::max(), &[], &[0u8; KEY_SIZE], new_key.get_mut())
        })?;
        key.with_mut(|k| k.copy_from_slice(&new_key[..KEY_SIZE]));
        Ok(())
    }

    /// Drops the key (zeroizing it) and resets the nonce
    pub fn clear(&mut self) {
        if let Some(mut key) = self.k.take() {
            key.wipe();
        }
        self.n = Nonce::new(0);
    }
}

fn copy_into(out: &mut [u8], bytes: &[u8]) -> Result<usize, NoiseError> {
    if out.len() < bytes.len() {
        Err(NoiseError::BufferTooSmall {
            needed: bytes.len(),
            available: out.len(),
        })?
    }
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(bytes.len())
}
