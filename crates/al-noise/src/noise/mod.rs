pub mod builder;
pub mod cipher_state;
pub mod handshake_pattern;
pub mod handshake_state;
pub mod key_pair;
pub mod noise_error;
pub mod pattern_modifier;
pub mod symmetric_state;
