use crate::{CryptoError, HmacBlake2s, HASHLEN};
use digest::KeyInit;
use hmac::Mac;
use std::marker::PhantomData;
use zeroize::Zeroize;

/// Generic HKDF following RFC 5869.
/// H: Keyed MAC (eg. `SimpleHmac<Blake2s256>`).
/// N: MAC output size (eg. 32 for BLAKE2s).
pub struct Hkdf<H: Mac + KeyInit, const N: usize>(PhantomData<H>);

/// The Noise `HKDF(chaining_key, input_key_material, num_outputs)` over HMAC-BLAKE2s
pub type HkdfBlake2s = Hkdf<HmacBlake2s, HASHLEN>;

impl<H: Mac + KeyInit, const N: usize> Hkdf<H, N> {
    /// HKDF-Extract (salt, IKM) -> Pseudorandom Key
    pub fn extract(
        dest: &mut [u8; N],
        salt: &[u8],
        initial_key_material: &[u8],
    ) -> Result<(), CryptoError> {
        let mut mac = <H as KeyInit>::new_from_slice(salt)?;
        mac.update(initial_key_material);
        let mut result = mac.finalize().into_bytes();
        if result.len() < N {
            result[..].zeroize();
            Err(CryptoError::DestTooSmall)?
        }
        dest.copy_from_slice(&result[..N]);
        result[..].zeroize();
        Ok(())
    }

    /// HKDF-Expand (PRK, context, L) -> Output Keying Material, `L = dest.len()`
    pub fn expand(dest: &mut [u8], prk: &[u8; N], context: &[u8]) -> Result<(), CryptoError> {
        let n = dest.len().div_ceil(N);
        if n > 255 {
            Err(CryptoError::HkdfExpandTooLong)?
        }

        let mut head = 0;
        let mut t = [0u8; N];
        let mut t_len = 0;

        for i in 1..=n {
            let mut mac = <H as KeyInit>::new_from_slice(prk)?;
            mac.update(&t[..t_len]); // T(i-1)
            mac.update(context);
            mac.update(&[i as u8]); // Counter

            let mut block = mac.finalize().into_bytes();
            t.copy_from_slice(&block[..N]);
            block[..].zeroize();
            t_len = N;

            // take min of hash_len (N) or remaining (L - head)
            let taking = N.min(dest.len() - head);
            dest[head..head + taking].copy_from_slice(&t[..taking]);
            head += taking;
        }

        t.zeroize();
        Ok(())
    }

    /// Multiple HKDF outputs of `N` bytes each, K is the number of keys.
    /// With an empty `context` this is exactly the Noise `HKDF()` function.
    pub fn derive_keys<const K: usize>(
        dest: &mut [[u8; N]; K],
        salt: &[u8],
        initial_key_material: &[u8],
        context: &[u8],
    ) -> Result<(), CryptoError> {
        let Some(total_len) = N.checked_mul(K) else {
            return Err(CryptoError::HkdfExpandTooLong);
        };

        let mut prk = [0u8; N];
        Self::extract(&mut prk, salt, initial_key_material)?;
        let mut okm = vec![0u8; total_len];
        let result = Self::expand(&mut okm, &prk, context);
        prk.zeroize();
        if result.is_ok() {
            for (i, key) in dest.iter_mut().enumerate() {
                key.copy_from_slice(&okm[i * N..(i + 1) * N]);
            }
        }
        okm.zeroize();
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::{HkdfBlake2s, HmacBlake2s, HASHLEN};
    use hmac::Mac;

    fn hmac(key: &[u8], parts: &[&[u8]]) -> [u8; HASHLEN] {
        let mut mac = <HmacBlake2s as Mac>::new_from_slice(key).unwrap();
        for part in parts {
            mac.update(part);
        }
        let mut out = [0u8; HASHLEN];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }

    #[test]
    fn matches_noise_definition() {
        let chaining_key = [3u8; HASHLEN];
        let input_key_material: &[u8] = b"input key material";

        // temp_key = HMAC(ck, ikm), output1 = HMAC(temp_key, 0x01), output2 = HMAC(temp_key, output1 || 0x02)
        let temp_key = hmac(&chaining_key, &[input_key_material]);
        let output1 = hmac(&temp_key, &[&[1u8][..]]);
        let output2 = hmac(&temp_key, &[&output1[..], &[2u8][..]]);
        let output3 = hmac(&temp_key, &[&output2[..], &[3u8][..]]);

        let mut two = [[0u8; HASHLEN]; 2];
        HkdfBlake2s::derive_keys(&mut two, &chaining_key, input_key_material, &[]).unwrap();
        assert_eq!(two, [output1, output2]);

        let mut three = [[0u8; HASHLEN]; 3];
        HkdfBlake2s::derive_keys(&mut three, &chaining_key, input_key_material, &[]).unwrap();
        assert_eq!(three, [output1, output2, output3]);
    }

    #[test]
    fn empty_input_key_material() {
        let mut keys = [[0u8; HASHLEN]; 2];
        HkdfBlake2s::derive_keys(&mut keys, &[9u8; HASHLEN], &[], &[]).unwrap();
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[0], [0u8; HASHLEN]);
    }

    #[test]
    fn expand_too_long() {
        let mut dest = vec![0u8; HASHLEN * 256];
        assert!(HkdfBlake2s::expand(&mut dest, &[0u8; HASHLEN], &[]).is_err());
    }
}
