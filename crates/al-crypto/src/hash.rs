use blake2::Blake2s256;
use digest::Digest;
use hmac::SimpleHmac;

pub const HASHLEN: usize = 32; // Noise has HASHLEN 32 for BLAKE2s
pub const BLOCKLEN: usize = 64; // Noise has BLOCKLEN 64 for BLAKE2s

pub type HmacBlake2s = SimpleHmac<Blake2s256>;

/// HASH(parts[0] || parts[1] || ..)
pub fn hash(parts: &[&[u8]]) -> [u8; HASHLEN] {
    let mut hasher = Blake2s256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; HASHLEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// The Noise `BLAKE2s` hash functions.
pub struct Blake2s;

impl Blake2s {
    pub const ALG: &'static str = "BLAKE2s";
    pub const HASHLEN: usize = HASHLEN;
    pub const BLOCKLEN: usize = BLOCKLEN;

    pub fn hash(parts: &[&[u8]]) -> [u8; HASHLEN] {
        hash(parts)
    }
}
