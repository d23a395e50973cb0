// Following the Noise protocol specification: noiseprotocol.org/noise.html

const KEY_SIZE: usize = al_crypto::KEY_SIZE;
const HASHLEN: usize = al_crypto::HASHLEN; // Noise has HASHLEN 32 for BLAKE2s
const TAG_SIZE: usize = al_crypto::TAG_SIZE;

/// Largest message Noise allows on the wire
pub const MAX_MESSAGE_LEN: usize = 65535;
/// Pre-shared keys are always 32 bytes
pub const PSK_LEN: usize = 32;

mod noise;

pub use al_crypto::{Dh, X25519};
pub use noise::{
    builder::{HandshakeBuilder, HandshakeParams},
    cipher_state::CipherState,
    handshake_pattern::{HandshakePattern, MessagePattern, PatternLine, Role, Token},
    handshake_state::{HandshakeAction, HandshakeState, HandshakeStatus, MessageResult},
    key_pair::{KeyPair, PublicKey},
    noise_error::{KeySlot, NoiseError},
    pattern_modifier::{parse_pattern, PatternModifier},
    symmetric_state::{SplitResult, SymmetricState},
};

/// `Noise_*_25519_ChaChaPoly_BLAKE2s` handshakes
pub type Handshake = HandshakeState<X25519>;
