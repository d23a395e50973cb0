use crate::{fill_random, CryptoError};
use blake2::{digest::consts::U32, Blake2b};
use digest::Digest;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

/// Diffie-Hellman functions consumed by the handshake.
/// Keys are passed as byte slices so callers can validate lengths against the fixed sizes.
pub trait Dh {
    /// Name used in the Noise protocol name
    const ALG: &'static str;
    const PKLEN: usize;
    const SKLEN: usize;
    const DHLEN: usize;
    const SEEDLEN: usize;

    /// GENERATE_KEYPAIR(), writing into `public` (PKLEN) and `secret` (SKLEN)
    fn generate_keypair(public: &mut [u8], secret: &mut [u8]) -> Result<(), CryptoError>;

    /// Deterministic keypair from a SEEDLEN-byte seed
    fn generate_seed_keypair(
        public: &mut [u8],
        secret: &mut [u8],
        seed: &[u8],
    ) -> Result<(), CryptoError>;

    /// Derives the public key matching `secret`
    fn public_from_secret(public: &mut [u8], secret: &[u8]) -> Result<(), CryptoError>;

    /// DH(secret, public) -> DHLEN bytes written into `out`
    fn dh(out: &mut [u8], secret: &[u8], public: &[u8]) -> Result<(), CryptoError>;
}

/// Curve25519 as used by the Noise `25519` DH functions.
pub struct X25519;

impl X25519 {
    fn secret_from_slice(secret: &[u8]) -> Result<StaticSecret, CryptoError> {
        let mut bytes: [u8; 32] = secret
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        let secret = StaticSecret::from(bytes);
        bytes.zeroize();
        Ok(secret)
    }

    fn public_from_slice(public: &[u8]) -> Result<PublicKey, CryptoError> {
        let bytes: [u8; 32] = public
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        Ok(PublicKey::from(bytes))
    }
}

impl Dh for X25519 {
    const ALG: &'static str = "25519";
    const PKLEN: usize = 32;
    const SKLEN: usize = 32;
    const DHLEN: usize = 32;
    const SEEDLEN: usize = 32;

    fn generate_keypair(public: &mut [u8], secret: &mut [u8]) -> Result<(), CryptoError> {
        if secret.len() != Self::SKLEN {
            Err(CryptoError::InvalidKeyLength)?
        }
        fill_random(secret)?;
        Self::public_from_secret(public, secret)
    }

    /// `secret = BLAKE2b-256(seed)`, matching libsodium's `crypto_kx_seed_keypair`
    fn generate_seed_keypair(
        public: &mut [u8],
        secret: &mut [u8],
        seed: &[u8],
    ) -> Result<(), CryptoError> {
        if seed.len() != Self::SEEDLEN || secret.len() != Self::SKLEN {
            Err(CryptoError::InvalidKeyLength)?
        }
        let mut hasher = Blake2b::<U32>::new();
        hasher.update(seed);
        let mut digest = hasher.finalize();
        secret.copy_from_slice(&digest);
        digest[..].zeroize();
        Self::public_from_secret(public, secret)
    }

    fn public_from_secret(public: &mut [u8], secret: &[u8]) -> Result<(), CryptoError> {
        if public.len() != Self::PKLEN {
            Err(CryptoError::InvalidKeyLength)?
        }
        let secret = Self::secret_from_slice(secret)?;
        public.copy_from_slice(PublicKey::from(&secret).as_bytes());
        Ok(())
    }

    fn dh(out: &mut [u8], secret: &[u8], public: &[u8]) -> Result<(), CryptoError> {
        if out.len() < Self::DHLEN {
            Err(CryptoError::DestTooSmall)?
        }
        let secret = Self::secret_from_slice(secret)?;
        let public = Self::public_from_slice(public)?;
        let shared = secret.diffie_hellman(&public);
        // RFC 7748 section 6.1: reject the all-zero output of low-order points
        if !shared.was_contributory() {
            Err(CryptoError::NonContributory)?
        }
        out[..Self::DHLEN].copy_from_slice(shared.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{from_hex, CryptoError, Dh, X25519};

    fn unhex(str: &str) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        from_hex(str.as_bytes(), &mut bytes).unwrap();
        bytes
    }

    // RFC 7748 section 6.1
    const ALICE_SECRET: &str = "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a";
    const ALICE_PUBLIC: &str = "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";
    const BOB_SECRET: &str = "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb";
    const BOB_PUBLIC: &str = "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f";
    const SHARED: &str = "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742";

    #[test]
    fn rfc7748_vectors() {
        let mut public = [0u8; 32];
        X25519::public_from_secret(&mut public, &unhex(ALICE_SECRET)).unwrap();
        assert_eq!(public, unhex(ALICE_PUBLIC));
        X25519::public_from_secret(&mut public, &unhex(BOB_SECRET)).unwrap();
        assert_eq!(public, unhex(BOB_PUBLIC));

        let mut shared = [0u8; 32];
        X25519::dh(&mut shared, &unhex(ALICE_SECRET), &unhex(BOB_PUBLIC)).unwrap();
        assert_eq!(shared, unhex(SHARED));
        X25519::dh(&mut shared, &unhex(BOB_SECRET), &unhex(ALICE_PUBLIC)).unwrap();
        assert_eq!(shared, unhex(SHARED));
    }

    #[test]
    fn random_keypairs_agree() {
        let (mut a_pub, mut a_sec) = ([0u8; 32], [0u8; 32]);
        let (mut b_pub, mut b_sec) = ([0u8; 32], [0u8; 32]);
        X25519::generate_keypair(&mut a_pub, &mut a_sec).unwrap();
        X25519::generate_keypair(&mut b_pub, &mut b_sec).unwrap();
        assert_ne!(a_pub, b_pub);

        let (mut ab, mut ba) = ([0u8; 32], [0u8; 32]);
        X25519::dh(&mut ab, &a_sec, &b_pub).unwrap();
        X25519::dh(&mut ba, &b_sec, &a_pub).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn seed_keypair_is_deterministic() {
        let (mut first_pub, mut first_sec) = ([0u8; 32], [0u8; 32]);
        let (mut second_pub, mut second_sec) = ([0u8; 32], [0u8; 32]);
        X25519::generate_seed_keypair(&mut first_pub, &mut first_sec, &[5u8; 32]).unwrap();
        X25519::generate_seed_keypair(&mut second_pub, &mut second_sec, &[5u8; 32]).unwrap();
        assert_eq!(first_pub, second_pub);
        assert_eq!(first_sec, second_sec);

        X25519::generate_seed_keypair(&mut second_pub, &mut second_sec, &[6u8; 32]).unwrap();
        assert_ne!(first_pub, second_pub);

        let mut derived = [0u8; 32];
        X25519::public_from_secret(&mut derived, &first_sec).unwrap();
        assert_eq!(derived, first_pub);
    }

    #[test]
    fn rejects_bad_lengths() {
        assert_eq!(
            X25519::generate_seed_keypair(&mut [0u8; 32], &mut [0u8; 32], &[0u8; 31]),
            Err(CryptoError::InvalidKeyLength)
        );
        assert_eq!(
            X25519::public_from_secret(&mut [0u8; 32], &[0u8; 33]),
            Err(CryptoError::InvalidKeyLength)
        );
        assert_eq!(
            X25519::dh(&mut [0u8; 32], &[1u8; 32], &[9u8; 31]),
            Err(CryptoError::InvalidKeyLength)
        );
        assert_eq!(
            X25519::dh(&mut [0u8; 16], &[1u8; 32], &[9u8; 32]),
            Err(CryptoError::DestTooSmall)
        );
    }

    #[test]
    fn rejects_low_order_point() {
        assert_eq!(
            X25519::dh(&mut [0u8; 32], &[0x42u8; 32], &[0u8; 32]),
            Err(CryptoError::NonContributory)
        );
    }
}
