pub const NONCE_SIZE: usize = 12;

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum NonceError {
    #[error("nonce counter expired")]
    CounterExpired,
}

/// Zeros(4 bytes) || Counter(8 bytes, little-endian) - the Noise `ChaChaPoly` nonce.
/// `u64::MAX` is reserved for rekeying and is never reached through `to_next`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Nonce {
    bytes: [u8; NONCE_SIZE],
}

impl Nonce {
    pub fn new(counter: u64) -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        bytes[4..12].copy_from_slice(&counter.to_le_bytes());
        Self { bytes }
    }

    /// Returns the reserved `2^64 - 1` nonce used by REKEY
    pub fn max() -> Self {
        Self::new(u64::MAX)
    }

    /// Returns the counter portion of the bytes
    pub fn counter(&self) -> &[u8] {
        &self.bytes[4..12]
    }

    /// Returns the counter portion of the bytes as a u64
    pub fn counter_num(&self) -> u64 {
        let mut counter = [0u8; 8];
        counter.copy_from_slice(self.counter());
        u64::from_le_bytes(counter)
    }

    pub fn set_counter(&mut self, counter: u64) {
        self.bytes[4..12].copy_from_slice(&counter.to_le_bytes());
    }

    /// Returns `Err(CounterExpired)` if the nonce is the reserved `2^64 - 1`
    pub fn check_usable(&self) -> Result<(), NonceError> {
        if self.counter_num() == u64::MAX {
            Err(NonceError::CounterExpired)?
        }
        Ok(())
    }

    /// Cycles the bytes to the next `Nonce`
    pub fn to_next(&mut self) -> Result<(), NonceError> {
        self.check_usable()?;
        self.set_counter(self.counter_num() + 1);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use crate::{to_hex, Nonce, NonceError, NONCE_SIZE};

    #[test]
    fn layout() {
        let mut nonce = Nonce::new(0);
        let mut hex = [0u8; NONCE_SIZE * 2];

        to_hex(nonce.as_bytes(), &mut hex).unwrap();
        assert_eq!("000000000000000000000000", std::str::from_utf8(&hex).unwrap());
        assert_eq!(nonce.counter_num(), 0);

        nonce.to_next().unwrap();

        to_hex(nonce.as_bytes(), &mut hex).unwrap();
        assert_eq!("000000000100000000000000", std::str::from_utf8(&hex).unwrap());
        assert_eq!(nonce.counter_num(), 1);

        nonce.set_counter(0x0102);
        to_hex(nonce.as_bytes(), &mut hex).unwrap();
        assert_eq!("000000000201000000000000", std::str::from_utf8(&hex).unwrap());
    }

    #[test]
    fn rotation_checks() {
        let mut nonce = Nonce::new(u64::MAX - 1);
        assert_eq!(nonce.check_usable(), Ok(()));

        // the reserved value can be reached but not used past
        nonce.to_next().unwrap();
        assert_eq!(nonce, Nonce::max());
        assert_eq!(nonce.check_usable(), Err(NonceError::CounterExpired));
        assert_eq!(nonce.to_next(), Err(NonceError::CounterExpired));
    }
}
