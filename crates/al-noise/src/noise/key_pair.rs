use crate::NoiseError;
use al_crypto::Dh;
use al_vault::{DynamicSecret, SecureAccess, SecureContainer};
use zeroize::Zeroize;

/// A DH public key. Not secret, but still wiped when dropped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for PublicKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for PublicKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Clone, Debug)]
pub struct KeyPair {
    public: PublicKey,
    secret: DynamicSecret,
}

impl KeyPair {
    /// GENERATE_KEYPAIR() of the DH functions
    pub fn generate<D: Dh>() -> Result<Self, NoiseError> {
        let mut public = vec![0u8; D::PKLEN];
        let mut secret = DynamicSecret::zeroed("noise.keypair.secret", D::SKLEN);
        secret.with_mut(|secret| D::generate_keypair(&mut public, secret))?;
        Ok(Self {
            public: PublicKey(public),
            secret,
        })
    }

    /// Derives the public key for an existing secret key
    pub fn from_secret<D: Dh>(secret: &[u8]) -> Result<Self, NoiseError> {
        if secret.len() != D::SKLEN {
            Err(NoiseError::Validation(format!(
                "secret key must be {} bytes, got {}",
                D::SKLEN,
                secret.len()
            )))?
        }
        let mut public = vec![0u8; D::PKLEN];
        D::public_from_secret(&mut public, secret)?;
        Ok(Self {
            public: PublicKey(public),
            secret: DynamicSecret::new(secret.to_vec(), "noise.keypair.secret"),
        })
    }

    /// Deterministic keypair, the same seed always yields the same keys
    pub fn from_seed<D: Dh>(seed: &[u8]) -> Result<Self, NoiseError> {
        if seed.len() != D::SEEDLEN {
            Err(NoiseError::Validation(format!(
                "seed must be {} bytes, got {}",
                D::SEEDLEN,
                seed.len()
            )))?
        }
        let mut public = vec![0u8; D::PKLEN];
        let mut secret = DynamicSecret::zeroed("noise.keypair.secret", D::SKLEN);
        secret.with_mut(|secret| D::generate_seed_keypair(&mut public, secret, seed))?;
        Ok(Self {
            public: PublicKey(public),
            secret,
        })
    }

    /// Takes both halves as given, lengths are checked when the pair enters a handshake
    pub fn from_parts(public: Vec<u8>, secret: Vec<u8>) -> Self {
        Self {
            public: PublicKey(public),
            secret: DynamicSecret::new(secret, "noise.keypair.secret"),
        }
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    pub fn secret(&self) -> &DynamicSecret {
        &self.secret
    }

    /// Returns `Err(Validation)` unless both halves have the lengths `D` expects
    pub fn validate<D: Dh>(&self, name: &str) -> Result<(), NoiseError> {
        if self.public.len() != D::PKLEN {
            Err(NoiseError::Validation(format!(
                "{name} public key must be {} bytes, got {}",
                D::PKLEN,
                self.public.len()
            )))?
        }
        if self.secret.len() != D::SKLEN {
            Err(NoiseError::Validation(format!(
                "{name} secret key must be {} bytes, got {}",
                D::SKLEN,
                self.secret.len()
            )))?
        }
        Ok(())
    }

    pub fn wipe(&mut self) {
        self.secret.wipe();
        self.public.0.zeroize();
    }
}
