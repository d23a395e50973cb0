use crate::{Dh, HandshakeState, KeyPair, NoiseError, PublicKey};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// The serializable part of a handshake's setup, keys are always supplied separately
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandshakeParams {
    /// Pattern name with modifiers, eg. `XXpsk3`
    pub pattern: String,
    pub initiator: bool,
    #[serde(default)]
    pub prologue: Vec<u8>,
}

impl HandshakeParams {
    pub fn new(pattern: impl Into<String>, initiator: bool) -> Self {
        Self {
            pattern: pattern.into(),
            initiator,
            prologue: Vec::new(),
        }
    }
}

pub struct HandshakeBuilder {
    params: HandshakeParams,
    s: Option<KeyPair>,
    e: Option<KeyPair>,
    rs: Option<PublicKey>,
    re: Option<PublicKey>,
    psks: Vec<Zeroizing<Vec<u8>>>,
}

impl HandshakeBuilder {
    pub fn new(params: HandshakeParams) -> Self {
        Self {
            params,
            s: None,
            e: None,
            rs: None,
            re: None,
            psks: Vec::new(),
        }
    }

    pub fn initiator(pattern: impl Into<String>) -> Self {
        Self::new(HandshakeParams::new(pattern, true))
    }

    pub fn responder(pattern: impl Into<String>) -> Self {
        Self::new(HandshakeParams::new(pattern, false))
    }

    pub fn prologue(mut self, prologue: &[u8]) -> Self {
        self.params.prologue = prologue.to_vec();
        self
    }

    pub fn local_static(mut self, pair: KeyPair) -> Self {
        self.s = Some(pair);
        self
    }

    /// Only for pre-message `e` tokens, handshake ephemerals are generated while writing
    pub fn local_ephemeral(mut self, pair: KeyPair) -> Self {
        self.e = Some(pair);
        self
    }

    pub fn remote_static(mut self, public: impl Into<PublicKey>) -> Self {
        self.rs = Some(public.into());
        self
    }

    pub fn remote_ephemeral(mut self, public: impl Into<PublicKey>) -> Self {
        self.re = Some(public.into());
        self
    }

    /// Queues the next psk, in the order the pattern's modifiers consume them
    pub fn psk(mut self, psk: &[u8]) -> Self {
        self.psks.push(Zeroizing::new(psk.to_vec()));
        self
    }

    pub fn build<D: Dh>(self) -> Result<HandshakeState<D>, NoiseError> {
        let HandshakeBuilder {
            params,
            s,
            e,
            rs,
            re,
            psks,
        } = self;
        let mut state = HandshakeState::initialize(
            &params.pattern,
            params.initiator,
            &params.prologue,
            s,
            e,
            rs,
            re,
        )?;
        if !psks.is_empty() || state.psk_count() > 0 {
            let psks: Vec<&[u8]> = psks.iter().map(|psk| psk.as_slice()).collect();
            state.set_psks(&psks)?;
        }
        Ok(state)
    }
}

impl From<HandshakeParams> for HandshakeBuilder {
    fn from(params: HandshakeParams) -> Self {
        Self::new(params)
    }
}
