use crate::{SecretError, SecureAccess, SecureContainer};
use secrets::SecretBox;
use std::sync::atomic::{AtomicU64, Ordering};
use zeroize::Zeroize;

/// For raw, fixed-size byte arrays.
/// This is the most efficient for keys, chaining keys, hashes etc. when the size is known at compile time.
/// It uses `secrets::SecretBox<T>` directly, so the bytes sit in locked, guarded memory that is zeroed when freed.
pub struct FixedSecret<const N: usize> {
    inner: SecretBox<[u8; N]>,
    tag: String,
    access_count: AtomicU64,
}

impl<const N: usize> FixedSecret<N> {
    fn from_box(inner: SecretBox<[u8; N]>, tag: impl Into<String>) -> Self {
        Self {
            inner,
            tag: tag.into(),
            access_count: AtomicU64::new(0),
        }
    }

    pub fn zeroed(tag: impl Into<String>) -> Self {
        Self::from_box(SecretBox::new(|s: &mut [u8; N]| s.fill(0)), tag)
    }

    /// Will consume the data in `inner`, zeroing it before dropping
    pub fn new(mut inner: [u8; N], tag: impl Into<String>) -> Self {
        Self::take(&mut inner, tag)
    }

    /// Will zero out the data in `inner` after taking it
    pub fn take(inner: &mut [u8; N], tag: impl Into<String>) -> Self {
        // `SecretBox::from` zeroes `inner` once it is copied in
        Self::from_box(SecretBox::from(inner), tag)
    }

    /// Copies `bytes` in, the caller keeps ownership of the source
    pub fn from_slice(bytes: &[u8], tag: impl Into<String>) -> Result<Self, SecretError> {
        if bytes.len() != N {
            Err(SecretError::InvalidLength {
                expected: N,
                actual: bytes.len(),
            })?
        }
        Ok(Self::from_box(
            SecretBox::new(|s: &mut [u8; N]| s.copy_from_slice(bytes)),
            tag,
        ))
    }

    fn next_access(&self) -> u64 {
        self.access_count
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1)
    }
}

impl<const N: usize> std::fmt::Debug for FixedSecret<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedSecret")
            .field("tag", &self.tag)
            .field("len", &N)
            .finish_non_exhaustive()
    }
}

impl<const N: usize> SecureContainer for FixedSecret<N> {
    type InnerType = [u8; N];

    fn tag(&self) -> &str {
        &self.tag
    }

    fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::SeqCst)
    }

    fn len(&self) -> usize {
        N
    }
}

impl<const N: usize> SecureAccess for FixedSecret<N> {
    fn copy(&self) -> Self {
        self.audit_access(self.next_access(), "copy");
        let source = self.inner.borrow();
        Self::from_box(
            SecretBox::new(|s: &mut [u8; N]| s.copy_from_slice(&*source)),
            self.tag.clone(),
        )
    }

    fn with<R>(&self, f: impl FnOnce(&Self::InnerType) -> R) -> R {
        self.audit_access(self.next_access(), "access");
        f(&*self.inner.borrow())
    }

    fn with_mut<R>(&mut self, f: impl FnOnce(&mut Self::InnerType) -> R) -> R {
        self.audit_access(self.next_access(), "mutable access");
        f(&mut *self.inner.borrow_mut())
    }

    fn wipe(&mut self) {
        self.audit_access(self.next_access(), "wipe");
        self.inner.borrow_mut().zeroize();
    }
}

#[cfg(test)]
mod tests {
    use crate::{FixedSecret, SecretError, SecureAccess, SecureContainer};

    #[test]
    fn take_zeroizes_source() {
        let mut source = [9u8; 32];
        let secret = FixedSecret::take(&mut source, "key");
        assert_eq!(source, [0u8; 32]);
        assert_eq!(secret.with(|inner| *inner), [9u8; 32]);
        assert_eq!(secret.tag(), "key");
        assert_eq!(secret.access_count(), 1);
    }

    #[test]
    fn mutate_copy_and_wipe() {
        let mut secret = FixedSecret::<4>::zeroed("scratch");
        secret.with_mut(|inner| inner[0] = 1);
        let copy = secret.copy();
        secret.wipe();
        assert_eq!(secret.with(|inner| *inner), [0u8; 4]);
        assert_eq!(copy.with(|inner| *inner), [1, 0, 0, 0]);
        assert_eq!(copy.access_count(), 1);
    }

    #[test]
    fn from_slice_checks_length() {
        assert_eq!(
            FixedSecret::<32>::from_slice(&[0u8; 31], "psk").unwrap_err(),
            SecretError::InvalidLength {
                expected: 32,
                actual: 31
            }
        );
        assert!(FixedSecret::<32>::from_slice(&[0u8; 32], "psk").is_ok());
    }

    #[test]
    fn debug_hides_contents() {
        let secret = FixedSecret::new([0xabu8; 2], "hidden");
        assert!(!format!("{secret:?}").contains("171"));
    }
}
