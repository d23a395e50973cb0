use std::ops::{Deref, DerefMut};
use zeroize::Zeroize;

/// Scratch value that is zeroized when it goes out of scope.
pub struct SecureRef<T: Zeroize>(T);

impl<T: Zeroize> Drop for SecureRef<T> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<T: Zeroize> SecureRef<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: Zeroize> Deref for SecureRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Zeroize> DerefMut for SecureRef<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use crate::SecureRef;

    #[test]
    fn scratch_access() {
        let mut scratch = SecureRef::new(vec![0u8; 4]);
        scratch.get_mut()[0] = 7;
        scratch[1] = 8;
        assert_eq!(scratch.get(), &vec![7, 8, 0, 0]);
        assert_eq!(scratch.len(), 4);
    }
}
