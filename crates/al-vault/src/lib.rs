mod container;
mod secrets;

pub use self::container::secure_container::{SecureAccess, SecureContainer};
pub use self::secrets::{
    dynamic_secret::DynamicSecret, fixed_secret::FixedSecret, secret_error::SecretError,
    secure_ref::SecureRef,
};
