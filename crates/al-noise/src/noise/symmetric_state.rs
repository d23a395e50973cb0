use crate::{CipherState, NoiseError, HASHLEN, KEY_SIZE};
use al_crypto::{hash, HkdfBlake2s};
use al_vault::{FixedSecret, SecureAccess, SecureRef};

// HASHLEN and the cipher key length coincide for BLAKE2s/ChaChaPoly, so HKDF outputs need no truncation
const _: () = assert!(HASHLEN == KEY_SIZE);

/// The two transport cipher states of a finished handshake
#[derive(Debug)]
pub struct SplitResult {
    /// Encrypts messages this party sends
    pub tx: CipherState,
    /// Decrypts messages this party receives
    pub rx: CipherState,
    /// Final `h`, usable for channel binding
    pub handshake_hash: [u8; HASHLEN],
}

#[derive(Debug)]
pub struct SymmetricState {
    cipher_state: CipherState,
    ck: FixedSecret<HASHLEN>,
    h: FixedSecret<HASHLEN>,
}

impl SymmetricState {
    /// The protocol name is used directly when it fits in HASHLEN bytes, otherwise it is hashed
    pub fn initialize_symmetric(protocol_name: &str) -> Self {
        let name = protocol_name.as_bytes();
        let mut h = [0u8; HASHLEN];
        if name.len() <= HASHLEN {
            h[..name.len()].copy_from_slice(name);
        } else {
            h = hash(&[name]);
        }
        Self {
            cipher_state: CipherState::new(),
            ck: FixedSecret::new(h, "noise.symmetric_state.ck"),
            h: FixedSecret::new(h, "noise.symmetric_state.h"),
        }
    }

    pub fn has_key(&self) -> bool {
        self.cipher_state.has_key()
    }

    /// `ck, temp_k = HKDF(ck, input_key_material, 2)`, then InitializeKey(temp_k)
    pub fn mix_key(&mut self, input_key_material: &[u8]) -> Result<(), NoiseError> {
        let mut keys = SecureRef::new([[0u8; HASHLEN]; 2]);
        self.ck
            .with(|ck| HkdfBlake2s::derive_keys(keys.get_mut(), ck, input_key_material, &[]))?;
        self.ck.with_mut(|ck| ck.copy_from_slice(&keys[0]));
        self.cipher_state.initialize_key(&mut keys[1]);
        Ok(())
    }

    /// `h = HASH(h || data)`
    pub fn mix_hash(&mut self, data: &[u8]) {
        self.h.with_mut(|h| *h = hash(&[&h[..], data]));
    }

    /// `ck, temp_h, temp_k = HKDF(ck, input_key_material, 3)`, MixHash(temp_h), InitializeKey(temp_k)
    pub fn mix_key_and_hash(&mut self, input_key_material: &[u8]) -> Result<(), NoiseError> {
        let mut keys = SecureRef::new([[0u8; HASHLEN]; 3]);
        self.ck
            .with(|ck| HkdfBlake2s::derive_keys(keys.get_mut(), ck, input_key_material, &[]))?;
        self.ck.with_mut(|ck| ck.copy_from_slice(&keys[0]));
        self.mix_hash(&keys[1]);
        self.cipher_state.initialize_key(&mut keys[2]);
        Ok(())
    }

    pub fn handshake_hash(&self) -> [u8; HASHLEN] {
        self.h.with(|h| *h)
    }

    /// Writes `EncryptWithAd(h, plaintext)` into `out` and mixes the ciphertext into `h`.
    /// Returns the number of bytes written.
    pub fn encrypt_and_hash(
        &mut self,
        plaintext: &[u8],
        out: &mut [u8],
    ) -> Result<usize, NoiseError> {
        let cipher_state = &mut self.cipher_state;
        let len = self
            .h
            .with(|h| cipher_state.encrypt_with_ad(h, plaintext, out))?;
        self.mix_hash(&out[..len]);
        Ok(len)
    }

    /// Writes `DecryptWithAd(h, ciphertext)` into `out` and mixes the ciphertext into `h`.
    /// Returns the plaintext length, `h` is untouched when authentication fails.
    pub fn decrypt_and_hash(
        &mut self,
        ciphertext: &[u8],
        out: &mut [u8],
    ) -> Result<usize, NoiseError> {
        let cipher_state = &mut self.cipher_state;
        let len = self
            .h
            .with(|h| cipher_state.decrypt_with_ad(h, ciphertext, out))?;
        self.mix_hash(ciphertext);
        Ok(len)
    }

    /// `temp_k1, temp_k2 = HKDF(ck, zerolen, 2)` as two fresh cipher states `(c1, c2)`.
    /// The chaining key and handshake cipher key are erased afterwards.
    pub fn split(&mut self) -> Result<(CipherState, CipherState), NoiseError> {
        let mut keys = SecureRef::new([[0u8; HASHLEN]; 2]);
        self.ck
            .with(|ck| HkdfBlake2s::derive_keys(keys.get_mut(), ck, &[], &[]))?;

        let mut c1 = CipherState::new();
        let mut c2 = CipherState::new();
        c1.initialize_key(&mut keys[0]);
        c2.initialize_key(&mut keys[1]);

        self.ck.wipe();
        self.cipher_state.clear();
        Ok((c1, c2))
    }

    /// Wipes `ck`, `h` and the cipher key
    pub fn destroy(&mut self) {
        self.ck.wipe();
        self.h.wipe();
        self.cipher_state.clear();
    }
}
