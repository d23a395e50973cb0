pub mod dynamic_secret;
pub mod fixed_secret;
pub mod secret_error;
pub mod secure_ref;
