pub trait SecureContainer {
    type InnerType: ?Sized;

    fn tag(&self) -> &str;
    fn access_count(&self) -> u64;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait SecureAccess: SecureContainer {
    /// Duplicates the secret into a fresh container with its own access counter
    fn copy(&self) -> Self
    where
        Self: Sized;

    fn with<R>(&self, f: impl FnOnce(&Self::InnerType) -> R) -> R;
    fn with_mut<R>(&mut self, f: impl FnOnce(&mut Self::InnerType) -> R) -> R;

    /// Overwrites the contents with zeros, the container stays usable
    fn wipe(&mut self);

    /// Emits an audit event, the secret's contents are never logged
    fn audit_access(&self, access_count: u64, operation: &str) {
        tracing::trace!(
            target: "al_vault::audit",
            tag = self.tag(),
            access_count,
            operation,
            "secret accessed"
        );
    }
}
