use crate::{SecureAccess, SecureContainer};
use secrets::SecretVec;
use std::sync::atomic::{AtomicU64, Ordering};
use zeroize::Zeroize;

/// For byte secrets whose length is only known at runtime (eg. DH secret keys of a generic curve).
/// Backed by `secrets::SecretVec<u8>`, which keeps the bytes in locked memory and zeroes them when freed.
pub struct DynamicSecret {
    inner: SecretVec<u8>,
    tag: String,
    access_count: AtomicU64,
}

impl DynamicSecret {
    fn from_vec(inner: SecretVec<u8>, tag: impl Into<String>) -> Self {
        Self {
            inner,
            tag: tag.into(),
            access_count: AtomicU64::new(0),
        }
    }

    pub fn zeroed(tag: impl Into<String>, len: usize) -> Self {
        Self::from_vec(SecretVec::new(len, |s| s.fill(0)), tag)
    }

    /// Will consume `inner`, zeroing it once the bytes are copied into locked memory
    pub fn new(mut inner: Vec<u8>, tag: impl Into<String>) -> Self {
        Self::from_vec(SecretVec::from(inner.as_mut_slice()), tag)
    }

    fn next_access(&self) -> u64 {
        self.access_count
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1)
    }
}

impl std::fmt::Debug for DynamicSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicSecret")
            .field("tag", &self.tag)
            .field("len", &self.inner.len())
            .finish_non_exhaustive()
    }
}

impl Clone for DynamicSecret {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl SecureContainer for DynamicSecret {
    type InnerType = [u8];

    fn tag(&self) -> &str {
        &self.tag
    }

    fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::SeqCst)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl SecureAccess for DynamicSecret {
    fn copy(&self) -> Self {
        self.audit_access(self.next_access(), "copy");
        let source = self.inner.borrow();
        Self::from_vec(
            SecretVec::new(source.len(), |s| s.copy_from_slice(&source)),
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
    use crate::{DynamicSecret, SecureAccess, SecureContainer};

    #[test]
    fn new_and_clone() {
        let secret = DynamicSecret::new(vec![3u8; 5], "static");
        let clone = secret.clone();
        assert_eq!(clone.with(|inner| inner.to_vec()), vec![3u8; 5]);
        assert_eq!(clone.len(), 5);
        assert_eq!(clone.tag(), "static");
        assert_eq!(secret.access_count(), 1);
    }

    #[test]
    fn wipe_keeps_length() {
        let mut secret = DynamicSecret::zeroed("ephemeral", 32);
        secret.with_mut(|inner| inner.fill(0x5a));
        secret.wipe();
        assert_eq!(secret.with(|inner| inner.to_vec()), vec![0u8; 32]);
        assert!(!secret.is_empty());
        assert_eq!(secret.access_count(), 3);
    }

    #[test]
    fn debug_hides_contents() {
        let secret = DynamicSecret::new(vec![0xabu8; 3], "hidden");
        let debug = format!("{secret:?}");
        assert!(debug.contains("hidden"));
        assert!(!debug.contains("171"));
    }
}
