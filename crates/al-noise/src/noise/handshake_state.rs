use crate::{
    parse_pattern, HandshakePattern, KeyPair, KeySlot, MessagePattern, NoiseError, PublicKey,
    Role, SplitResult, SymmetricState, Token, HASHLEN, MAX_MESSAGE_LEN, PSK_LEN, TAG_SIZE,
};
use al_crypto::{Blake2s, ChaChaPoly, Dh};
use al_vault::{FixedSecret, SecureAccess, SecureRef};
use std::{collections::VecDeque, marker::PhantomData};
use tracing::{debug, trace, warn};
use zeroize::Zeroize;

const LOG_TARGET: &str = "al_noise::handshake";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HandshakeStatus {
    Active,
    Complete,
    Failed,
    Destroyed,
}

/// What the caller has to do next with a handshake
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HandshakeAction {
    WriteMessage,
    ReadMessage,
    Complete,
    Failed,
}

/// Outcome of one `write_message` / `read_message` call
#[derive(Debug)]
pub struct MessageResult {
    /// Bytes written to the message buffer (write) or to the payload buffer (read)
    pub bytes: usize,
    /// Set on the call that consumed the last message pattern
    pub split: Option<SplitResult>,
}

impl MessageResult {
    pub fn is_complete(&self) -> bool {
        self.split.is_some()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Direction {
    Write,
    Read,
}

/// Layout of the next message, worked out before anything is mutated
struct MessagePlan {
    token_bytes: usize,
    payload_keyed: bool,
}

pub struct HandshakeState<D: Dh> {
    symmetric_state: SymmetricState,
    role: Role,
    s: Option<KeyPair>,
    e: Option<KeyPair>,
    rs: Option<PublicKey>,
    re: Option<PublicKey>,
    psks: VecDeque<FixedSecret<PSK_LEN>>,
    message_patterns: VecDeque<MessagePattern>,
    /// Messages consumed so far, psks are frozen once this leaves zero
    messages_processed: usize,
    psk_count: usize,
    protocol_name: String,
    status: HandshakeStatus,
    _dh: PhantomData<D>,
}

impl<D: Dh> HandshakeState<D> {
    /// Builds the state for `pattern` (eg. `XX`, `NNpsk0`, `IKpsk2`) and hashes the prologue and pre-messages.
    /// Every supplied key is length checked before any cryptographic work happens.
    pub fn initialize(
        pattern: &str,
        initiator: bool,
        prologue: &[u8],
        s: Option<KeyPair>,
        e: Option<KeyPair>,
        rs: Option<PublicKey>,
        re: Option<PublicKey>,
    ) -> Result<Self, NoiseError> {
        let (handshake_pattern, modifier) = parse_pattern(pattern)?;
        let role = Role::from_initiator(initiator);

        if let Some(s) = &s {
            s.validate::<D>("local static")?
        }
        if let Some(e) = &e {
            e.validate::<D>("local ephemeral")?
        }
        Self::validate_public(rs.as_ref(), "remote static")?;
        Self::validate_public(re.as_ref(), "remote ephemeral")?;

        let mut message_patterns = handshake_pattern.to_message_patterns();
        modifier.apply(&mut message_patterns)?;

        let sends_static = message_patterns
            .iter()
            .any(|message| message.role == role && message.tokens.contains(&Token::S));
        if sends_static && s.is_none() {
            Err(NoiseError::MissingKeyMaterial(KeySlot::LocalStatic))?
        }

        let protocol_name = format!(
            "Noise_{pattern}_{}_{}_{}",
            D::ALG,
            ChaChaPoly::ALG,
            Blake2s::ALG
        );
        let mut symmetric_state = SymmetricState::initialize_symmetric(&protocol_name);
        symmetric_state.mix_hash(prologue);

        let mut state = Self {
            symmetric_state,
            role,
            s,
            e,
            rs,
            re,
            psks: VecDeque::new(),
            message_patterns,
            messages_processed: 0,
            psk_count: modifier.psk_count(),
            protocol_name,
            status: HandshakeStatus::Active,
            _dh: PhantomData,
        };
        state.mix_premessages(handshake_pattern)?;

        debug!(
            target: LOG_TARGET,
            protocol = %state.protocol_name,
            role = ?state.role,
            psk_count = state.psk_count,
            "handshake initialized"
        );
        Ok(state)
    }

    fn validate_public(key: Option<&PublicKey>, name: &str) -> Result<(), NoiseError> {
        match key {
            Some(key) if key.len() != D::PKLEN => Err(NoiseError::Validation(format!(
                "{name} key must be {} bytes, got {}",
                D::PKLEN,
                key.len()
            ))),
            _ => Ok(()),
        }
    }

    /// Mixes the known public keys of the pattern's pre-messages into `h`, in declared order
    fn mix_premessages(&mut self, pattern: HandshakePattern) -> Result<(), NoiseError> {
        for line in pattern.premessages() {
            let local = line.role == self.role;
            for &token in line.tokens {
                let key = match (token, local) {
                    (Token::E, true) => self.e.as_ref().map(KeyPair::public),
                    (Token::S, true) => self.s.as_ref().map(KeyPair::public),
                    (Token::E, false) => self.re.as_ref(),
                    (Token::S, false) => self.rs.as_ref(),
                    _ => {
                        return Err(NoiseError::Validation(format!(
                            "{token:?} cannot appear in a pre-message"
                        )))
                    }
                };
                let Some(key) = key else {
                    return Err(NoiseError::MissingKeyMaterial(match (token, local) {
                        (Token::E, true) => KeySlot::LocalEphemeral,
                        (Token::E, false) => KeySlot::RemoteEphemeral,
                        (_, true) => KeySlot::LocalStatic,
                        (_, false) => KeySlot::RemoteStatic,
                    }));
                };
                self.symmetric_state.mix_hash(key.as_bytes());
                if token == Token::E && self.psk_count > 0 {
                    self.symmetric_state.mix_key(key.as_bytes())?;
                }
            }
        }
        Ok(())
    }

    /// Sets the pre-shared keys consumed by `PSK` tokens, front to back.
    /// Exactly one 32 byte key per psk modifier is required, and only before the first message.
    pub fn set_psks<P: AsRef<[u8]>>(&mut self, psks: &[P]) -> Result<(), NoiseError> {
        self.ensure_active()?;
        if self.messages_processed > 0 {
            Err(NoiseError::ProtocolSequencing(
                "psks must be set before the first message",
            ))?
        }
        if psks.len() != self.psk_count {
            Err(NoiseError::Validation(format!(
                "expected {} psks, got {}",
                self.psk_count,
                psks.len()
            )))?
        }

        let mut queue = VecDeque::with_capacity(psks.len());
        for (i, psk) in psks.iter().enumerate() {
            let psk = psk.as_ref();
            if psk.len() != PSK_LEN {
                Err(NoiseError::Validation(format!(
                    "psk {i} must be {PSK_LEN} bytes, got {}",
                    psk.len()
                )))?
            }
            queue.push_back(FixedSecret::from_slice(psk, "noise.handshake.psk")?);
        }
        self.psks = queue;
        Ok(())
    }

    pub fn keygen() -> Result<KeyPair, NoiseError> {
        KeyPair::generate::<D>()
    }

    pub fn keygen_from_secret(secret: &[u8]) -> Result<KeyPair, NoiseError> {
        KeyPair::from_secret::<D>(secret)
    }

    pub fn seed_keygen(seed: &[u8]) -> Result<KeyPair, NoiseError> {
        KeyPair::from_seed::<D>(seed)
    }

    fn ensure_active(&self) -> Result<(), NoiseError> {
        match self.status {
            HandshakeStatus::Active => Ok(()),
            HandshakeStatus::Complete => Err(NoiseError::ProtocolSequencing(
                "handshake is already complete",
            )),
            HandshakeStatus::Failed => Err(NoiseError::ProtocolSequencing("handshake has failed")),
            HandshakeStatus::Destroyed => {
                Err(NoiseError::ProtocolSequencing("handshake was destroyed"))
            }
        }
    }

    fn next_pattern(&self, direction: Direction) -> Result<&MessagePattern, NoiseError> {
        self.ensure_active()?;
        let pattern = self
            .message_patterns
            .front()
            .ok_or(NoiseError::ProtocolSequencing("no message patterns remain"))?;
        match direction {
            Direction::Write if pattern.role != self.role => Err(NoiseError::ProtocolSequencing(
                "next message must be read, not written",
            )),
            Direction::Read if pattern.role == self.role => Err(NoiseError::ProtocolSequencing(
                "next message must be written, not read",
            )),
            _ => Ok(pattern),
        }
    }

    /// Walks the tokens without touching any state, so misuse is reported before the message is consumed
    fn plan(&self, pattern: &MessagePattern, direction: Direction) -> Result<MessagePlan, NoiseError> {
        let mut keyed = self.symmetric_state.has_key();
        let (mut e, mut re, mut rs) = (self.e.is_some(), self.re.is_some(), self.rs.is_some());
        let mut psks = self.psks.len();
        let mut token_bytes = 0;

        for &token in &pattern.tokens {
            match (token, direction) {
                (Token::E, Direction::Write) => {
                    if e {
                        Err(NoiseError::ProtocolSequencing("local ephemeral is already set"))?
                    }
                    e = true;
                    token_bytes += D::PKLEN;
                    keyed |= self.psk_count > 0;
                }
                (Token::E, Direction::Read) => {
                    if re {
                        Err(NoiseError::ProtocolSequencing("remote ephemeral is already set"))?
                    }
                    re = true;
                    token_bytes += D::PKLEN;
                    keyed |= self.psk_count > 0;
                }
                (Token::S, Direction::Write) => {
                    if self.s.is_none() {
                        Err(NoiseError::MissingKeyMaterial(KeySlot::LocalStatic))?
                    }
                    token_bytes += D::PKLEN + if keyed { TAG_SIZE } else { 0 };
                }
                (Token::S, Direction::Read) => {
                    if rs {
                        Err(NoiseError::ProtocolSequencing("remote static is already set"))?
                    }
                    rs = true;
                    token_bytes += D::PKLEN + if keyed { TAG_SIZE } else { 0 };
                }
                (Token::PSK, _) => {
                    if psks == 0 {
                        Err(NoiseError::Validation(
                            "psks must be set before a PSK token is processed".into(),
                        ))?
                    }
                    psks -= 1;
                    keyed = true;
                }
                (Token::EE | Token::ES | Token::SE | Token::SS, _) => {
                    if let Some((local, remote)) = dh_slots(self.role, token) {
                        let present = |slot: KeySlot| match slot {
                            KeySlot::LocalStatic => self.s.is_some(),
                            KeySlot::LocalEphemeral => e,
                            KeySlot::RemoteStatic => rs,
                            KeySlot::RemoteEphemeral => re,
                        };
                        for slot in [local, remote] {
                            if !present(slot) {
                                Err(NoiseError::MissingKeyMaterial(slot))?
                            }
                        }
                    }
                    keyed = true;
                }
            }
        }

        Ok(MessagePlan {
            token_bytes,
            payload_keyed: keyed,
        })
    }

    /// Message buffer can be `[0u8; 65535]` to prevent reallocation as that is the max Noise message size.
    /// Returns the bytes written, plus the split cipher states once the last message is written.
    pub fn write_message(
        &mut self,
        payload: &[u8],
        message_buffer: &mut [u8],
    ) -> Result<MessageResult, NoiseError> {
        let plan = self.plan(self.next_pattern(Direction::Write)?, Direction::Write)?;
        let needed = plan.token_bytes + payload.len() + if plan.payload_keyed { TAG_SIZE } else { 0 };
        if needed > MAX_MESSAGE_LEN {
            Err(NoiseError::Validation(format!(
                "message of {needed} bytes exceeds {MAX_MESSAGE_LEN} bytes"
            )))?
        }
        if message_buffer.len() < needed {
            Err(NoiseError::BufferTooSmall {
                needed,
                available: message_buffer.len(),
            })?
        }

        let Some(pattern) = self.message_patterns.pop_front() else {
            return Err(NoiseError::ProtocolSequencing("no message patterns remain"));
        };
        self.messages_processed += 1;
        let result = self.write_tokens(&pattern, payload, message_buffer);
        self.finish(result, Direction::Write)
    }

    fn write_tokens(
        &mut self,
        pattern: &MessagePattern,
        payload: &[u8],
        message_buffer: &mut [u8],
    ) -> Result<usize, NoiseError> {
        let mut head = 0;
        for &token in &pattern.tokens {
            trace!(target: LOG_TARGET, ?token, role = ?self.role, "write token");
            head += self.process_write(token, message_buffer, head)?
        }

        // Appends EncryptAndHash(payload) to the buffer.
        head += self
            .symmetric_state
            .encrypt_and_hash(payload, &mut message_buffer[head..])?;
        Ok(head)
    }

    /// Performs actions and writes bytes according to the token, returns the number of bytes written
    fn process_write(
        &mut self,
        token: Token,
        message_buffer: &mut [u8],
        head: usize,
    ) -> Result<usize, NoiseError> {
        match token {
            Token::E => {
                // Sets e (which must be empty) to GENERATE_KEYPAIR().
                if self.e.is_some() {
                    Err(NoiseError::ProtocolSequencing("local ephemeral is already set"))?
                }
                let pair = KeyPair::generate::<D>()?;

                // Appends e.public_key to the buffer.
                let public = pair.public().as_bytes();
                message_buffer[head..head + D::PKLEN].copy_from_slice(public);

                // Calls MixHash(e.public_key), and MixKey(e.public_key) in psk handshakes.
                self.symmetric_state.mix_hash(public);
                if self.psk_count > 0 {
                    self.symmetric_state.mix_key(public)?;
                }
                self.e = Some(pair);
                Ok(D::PKLEN)
            }
            Token::S => {
                // Appends EncryptAndHash(s.public_key) to the buffer.
                let Some(s) = &self.s else {
                    return Err(NoiseError::MissingKeyMaterial(KeySlot::LocalStatic));
                };
                self.symmetric_state
                    .encrypt_and_hash(s.public().as_bytes(), &mut message_buffer[head..])
            }
            Token::EE | Token::ES | Token::SE | Token::SS => {
                self.try_mix_key(token)?;
                Ok(0)
            }
            Token::PSK => {
                self.mix_psk()?;
                Ok(0)
            }
        }
    }

    /// Payload buffer can be `[0u8; 65535]` as that is the max Noise message size.
    /// Returns the plaintext payload length, plus the split cipher states once the last message is read.
    /// The payload buffer is zeroized if reading fails.
    pub fn read_message(
        &mut self,
        message: &[u8],
        payload_buffer: &mut [u8],
    ) -> Result<MessageResult, NoiseError> {
        let plan = self.plan(self.next_pattern(Direction::Read)?, Direction::Read)?;
        if message.len() > MAX_MESSAGE_LEN {
            Err(NoiseError::Validation(format!(
                "message of {} bytes exceeds {MAX_MESSAGE_LEN} bytes",
                message.len()
            )))?
        }
        let needed = plan.token_bytes + if plan.payload_keyed { TAG_SIZE } else { 0 };
        if message.len() < needed {
            Err(NoiseError::TruncatedMessage {
                needed,
                available: message.len(),
            })?
        }
        let payload_len = message.len() - needed;
        if payload_buffer.len() < payload_len {
            Err(NoiseError::BufferTooSmall {
                needed: payload_len,
                available: payload_buffer.len(),
            })?
        }

        let Some(pattern) = self.message_patterns.pop_front() else {
            return Err(NoiseError::ProtocolSequencing("no message patterns remain"));
        };
        self.messages_processed += 1;
        let result = self.read_tokens(&pattern, message, payload_buffer);
        if result.is_err() {
            payload_buffer.zeroize();
        }
        self.finish(result, Direction::Read)
    }

    fn read_tokens(
        &mut self,
        pattern: &MessagePattern,
        message: &[u8],
        payload_buffer: &mut [u8],
    ) -> Result<usize, NoiseError> {
        let mut head = 0;
        for &token in &pattern.tokens {
            trace!(target: LOG_TARGET, ?token, role = ?self.role, "read token");
            head += self.process_read(token, message, head)?
        }

        // Calls DecryptAndHash() on the remaining bytes of the message and stores the output into payload_buffer.
        self.symmetric_state
            .decrypt_and_hash(&message[head..], payload_buffer)
    }

    /// Reads bytes and performs actions according to the token, returns the number of bytes read
    fn process_read(&mut self, token: Token, message: &[u8], head: usize) -> Result<usize, NoiseError> {
        match token {
            Token::E => {
                // Sets re (which must be empty) to the next DHLEN bytes from the message.
                if self.re.is_some() {
                    Err(NoiseError::ProtocolSequencing("remote ephemeral is already set"))?
                }
                let public = take(message, head, D::PKLEN)?;

                // Calls MixHash(re.public_key), and MixKey(re.public_key) in psk handshakes.
                self.symmetric_state.mix_hash(public);
                if self.psk_count > 0 {
                    self.symmetric_state.mix_key(public)?;
                }
                self.re = Some(PublicKey::from_bytes(public));
                Ok(D::PKLEN)
            }
            Token::S => {
                if self.rs.is_some() {
                    Err(NoiseError::ProtocolSequencing("remote static is already set"))?
                }

                // Sets temp to the next DHLEN + 16 bytes of the message if HasKey() == True, or to the next DHLEN bytes otherwise.
                let len = D::PKLEN + if self.symmetric_state.has_key() { TAG_SIZE } else { 0 };
                let temp = take(message, head, len)?;

                // Sets rs (which must be empty) to DecryptAndHash(temp).
                let mut rs = vec![0u8; D::PKLEN];
                self.symmetric_state.decrypt_and_hash(temp, &mut rs)?;
                self.rs = Some(PublicKey::from(rs));
                Ok(len)
            }
            Token::EE | Token::ES | Token::SE | Token::SS => {
                self.try_mix_key(token)?;
                Ok(0)
            }
            Token::PSK => {
                self.mix_psk()?;
                Ok(0)
            }
        }
    }

    /// Calls MixKey(DH(local, remote)) for the pair the token designates for this role.
    /// The DH output only lives in a scratch buffer that is zeroized when it drops.
    fn try_mix_key(&mut self, token: Token) -> Result<(), NoiseError> {
        let Some((local, remote)) = dh_slots(self.role, token) else {
            return Err(NoiseError::Validation(format!("{token:?} is not a DH token")));
        };

        let mut dh = SecureRef::new(vec![0u8; D::DHLEN]);
        let pair = self.local_pair(local)?;
        let public = self.remote_key(remote)?;
        pair.secret()
            .with(|secret| D::dh(dh.get_mut(), secret, public.as_bytes()))?;
        self.symmetric_state.mix_key(dh.get())
    }

    /// Calls MixKeyAndHash(psk) with the next queued psk
    fn mix_psk(&mut self) -> Result<(), NoiseError> {
        let psk = self.psks.pop_front().ok_or_else(|| {
            NoiseError::Validation("psks must be set before a PSK token is processed".into())
        })?;
        psk.with(|psk| self.symmetric_state.mix_key_and_hash(psk))
    }

    fn local_pair(&self, slot: KeySlot) -> Result<&KeyPair, NoiseError> {
        match slot {
            KeySlot::LocalStatic => self.s.as_ref(),
            KeySlot::LocalEphemeral => self.e.as_ref(),
            KeySlot::RemoteStatic | KeySlot::RemoteEphemeral => None,
        }
        .ok_or(NoiseError::MissingKeyMaterial(slot))
    }

    fn remote_key(&self, slot: KeySlot) -> Result<&PublicKey, NoiseError> {
        match slot {
            KeySlot::RemoteStatic => self.rs.as_ref(),
            KeySlot::RemoteEphemeral => self.re.as_ref(),
            KeySlot::LocalStatic | KeySlot::LocalEphemeral => None,
        }
        .ok_or(NoiseError::MissingKeyMaterial(slot))
    }

    fn finish(
        &mut self,
        result: Result<usize, NoiseError>,
        direction: Direction,
    ) -> Result<MessageResult, NoiseError> {
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(error) => return Err(self.fail(error, direction)),
        };
        debug!(
            target: LOG_TARGET,
            ?direction,
            bytes,
            remaining = self.message_patterns.len(),
            "handshake message processed"
        );

        if !self.message_patterns.is_empty() {
            return Ok(MessageResult { bytes, split: None });
        }
        match self.split() {
            Ok(split) => {
                self.status = HandshakeStatus::Complete;
                Ok(MessageResult {
                    bytes,
                    split: Some(split),
                })
            }
            Err(error) => Err(self.fail(error, direction)),
        }
    }

    fn fail(&mut self, error: NoiseError, direction: Direction) -> NoiseError {
        self.status = HandshakeStatus::Failed;
        match &error {
            NoiseError::Authentication => {
                warn!(target: LOG_TARGET, ?direction, role = ?self.role, "handshake authentication failed")
            }
            _ => debug!(target: LOG_TARGET, ?direction, %error, "handshake failed"),
        }
        error
    }

    /// Splits the final chaining key. The first key carries initiator to responder traffic.
    fn split(&mut self) -> Result<SplitResult, NoiseError> {
        let handshake_hash = self.symmetric_state.handshake_hash();
        let (c1, c2) = self.symmetric_state.split()?;
        let (tx, rx) = match self.role {
            Role::Initiator => (c1, c2),
            Role::Responder => (c2, c1),
        };
        debug!(target: LOG_TARGET, role = ?self.role, "handshake complete");
        Ok(SplitResult {
            tx,
            rx,
            handshake_hash,
        })
    }

    /// Wipes every key, psk and the symmetric state, then clears the queues.
    /// Safe to call more than once, the state is unusable afterwards.
    pub fn destroy(&mut self) {
        if self.status == HandshakeStatus::Destroyed {
            return;
        }
        self.symmetric_state.destroy();
        for mut pair in [self.s.take(), self.e.take()].into_iter().flatten() {
            pair.wipe();
        }
        self.rs = None;
        self.re = None;
        self.psks.clear();
        self.message_patterns.clear();
        self.status = HandshakeStatus::Destroyed;
        trace!(target: LOG_TARGET, role = ?self.role, "handshake destroyed");
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_initiator(&self) -> bool {
        self.role.is_initiator()
    }

    pub fn status(&self) -> HandshakeStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == HandshakeStatus::Complete
    }

    pub fn next_action(&self) -> HandshakeAction {
        match self.status {
            HandshakeStatus::Complete => HandshakeAction::Complete,
            HandshakeStatus::Failed | HandshakeStatus::Destroyed => HandshakeAction::Failed,
            HandshakeStatus::Active => match self.message_patterns.front() {
                Some(pattern) if pattern.role == self.role => HandshakeAction::WriteMessage,
                Some(_) => HandshakeAction::ReadMessage,
                None => HandshakeAction::Complete,
            },
        }
    }

    pub fn messages_remaining(&self) -> usize {
        self.message_patterns.len()
    }

    pub fn psk_count(&self) -> usize {
        self.psk_count
    }

    pub fn protocol_name(&self) -> &str {
        &self.protocol_name
    }

    /// Current `h`, after completion this is the channel binding value
    pub fn handshake_hash(&self) -> [u8; HASHLEN] {
        self.symmetric_state.handshake_hash()
    }

    pub fn remote_static(&self) -> Option<&PublicKey> {
        self.rs.as_ref()
    }

    pub fn remote_ephemeral(&self) -> Option<&PublicKey> {
        self.re.as_ref()
    }

    pub fn local_static_public(&self) -> Option<&PublicKey> {
        self.s.as_ref().map(KeyPair::public)
    }

    pub fn local_ephemeral_public(&self) -> Option<&PublicKey> {
        self.e.as_ref().map(KeyPair::public)
    }
}

impl<D: Dh> Drop for HandshakeState<D> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<D: Dh> std::fmt::Debug for HandshakeState<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandshakeState")
            .field("protocol_name", &self.protocol_name)
            .field("role", &self.role)
            .field("status", &self.status)
            .field("messages_remaining", &self.message_patterns.len())
            .field("psk_count", &self.psk_count)
            .finish_non_exhaustive()
    }
}

/// The (local, remote) keys a DH token combines for `role`
fn dh_slots(role: Role, token: Token) -> Option<(KeySlot, KeySlot)> {
    match (token, role) {
        (Token::EE, _) => Some((KeySlot::LocalEphemeral, KeySlot::RemoteEphemeral)),
        // DH(e, rs) for the initiator, DH(s, re) for the responder
        (Token::ES, Role::Initiator) => Some((KeySlot::LocalEphemeral, KeySlot::RemoteStatic)),
        (Token::ES, Role::Responder) => Some((KeySlot::LocalStatic, KeySlot::RemoteEphemeral)),
        // DH(s, re) for the initiator, DH(e, rs) for the responder
        (Token::SE, Role::Initiator) => Some((KeySlot::LocalStatic, KeySlot::RemoteEphemeral)),
        (Token::SE, Role::Responder) => Some((KeySlot::LocalEphemeral, KeySlot::RemoteStatic)),
        (Token::SS, _) => Some((KeySlot::LocalStatic, KeySlot::RemoteStatic)),
        (Token::E | Token::S | Token::PSK, _) => None,
    }
}

fn take(message: &[u8], head: usize, len: usize) -> Result<&[u8], NoiseError> {
    message
        .get(head..head + len)
        .ok_or(NoiseError::TruncatedMessage {
            needed: head + len,
            available: message.len(),
        })
}
