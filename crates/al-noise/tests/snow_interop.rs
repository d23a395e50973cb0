//! Drives handshakes against the `snow` crate in both roles, for every pattern and a
//! spread of psk placements, then exchanges transport messages over the split keys.

use al_noise::{
    Handshake, HandshakeBuilder, HandshakePattern, KeyPair, Role, SplitResult, Token,
    MAX_MESSAGE_LEN, X25519,
};

const INITIATOR_SECRET: [u8; 32] = [0x11; 32];
const RESPONDER_SECRET: [u8; 32] = [0x22; 32];

fn psk(index: usize) -> [u8; 32] {
    [0xa0 + index as u8; 32]
}

fn needs_static(pattern: HandshakePattern, role: Role) -> bool {
    pattern
        .premessages()
        .iter()
        .chain(pattern.message_patterns())
        .any(|line| line.role == role && line.tokens.contains(&Token::S))
}

fn knows_peer_static(pattern: HandshakePattern, role: Role) -> bool {
    pattern
        .premessages()
        .iter()
        .any(|line| line.role == role.peer() && line.tokens.contains(&Token::S))
}

fn secrets(role: Role) -> ([u8; 32], [u8; 32]) {
    match role {
        Role::Initiator => (INITIATOR_SECRET, RESPONDER_SECRET),
        Role::Responder => (RESPONDER_SECRET, INITIATOR_SECRET),
    }
}

/// psk indices in the order they appear in the modifier suffix
fn psk_indices(name: &str) -> Vec<usize> {
    let (_, modifier) = al_noise::parse_pattern(name).unwrap();
    modifier.psk_indices().to_vec()
}

fn build_ours(name: &str, role: Role) -> Handshake {
    let (pattern, _) = al_noise::parse_pattern(name).unwrap();
    let (own, peer) = secrets(role);
    let mut builder = match role {
        Role::Initiator => HandshakeBuilder::initiator(name),
        Role::Responder => HandshakeBuilder::responder(name),
    };
    if needs_static(pattern, role) {
        builder = builder.local_static(Handshake::keygen_from_secret(&own).unwrap());
    }
    if knows_peer_static(pattern, role) {
        let peer = KeyPair::from_secret::<X25519>(&peer).unwrap();
        builder = builder.remote_static(peer.public().clone());
    }
    for index in psk_indices(name) {
        builder = builder.psk(&psk(index));
    }
    builder.build::<X25519>().unwrap()
}

fn build_snow(name: &str, role: Role) -> snow::HandshakeState {
    let (pattern, _) = al_noise::parse_pattern(name).unwrap();
    let (own, peer) = secrets(role);
    let params = format!("Noise_{name}_25519_ChaChaPoly_BLAKE2s");
    let peer_public = KeyPair::from_secret::<X25519>(&peer).unwrap().public().to_vec();
    let psks: Vec<(u8, [u8; 32])> = psk_indices(name)
        .into_iter()
        .map(|index| (index as u8, psk(index)))
        .collect();

    let mut builder = snow::Builder::new(params.parse().unwrap());
    if needs_static(pattern, role) {
        builder = builder.local_private_key(&own).unwrap();
    }
    if knows_peer_static(pattern, role) {
        builder = builder.remote_public_key(&peer_public).unwrap();
    }
    for (location, key) in &psks {
        builder = builder.psk(*location, key).unwrap();
    }
    match role {
        Role::Initiator => builder.build_initiator().unwrap(),
        Role::Responder => builder.build_responder().unwrap(),
    }
}

/// Runs the handshake with `ours` playing `role`, then checks both transport directions
fn interop(name: &str, role: Role) {
    let mut ours = build_ours(name, role);
    let mut theirs = build_snow(name, role.peer());
    let mut message = vec![0u8; MAX_MESSAGE_LEN];
    let mut payload = vec![0u8; MAX_MESSAGE_LEN];
    let mut split: Option<SplitResult> = None;

    for round in 0..ours.messages_remaining() {
        let body = format!("{name} round {round}");
        let result = if ours.next_action() == al_noise::HandshakeAction::WriteMessage {
            let written = ours.write_message(body.as_bytes(), &mut message).unwrap();
            let len = theirs
                .read_message(&message[..written.bytes], &mut payload)
                .unwrap();
            assert_eq!(&payload[..len], body.as_bytes(), "{name}");
            written
        } else {
            let len = theirs.write_message(body.as_bytes(), &mut message).unwrap();
            let read = ours.read_message(&message[..len], &mut payload).unwrap();
            assert_eq!(&payload[..read.bytes], body.as_bytes(), "{name}");
            read
        };
        split = result.split;
    }

    let mut split = split.unwrap_or_else(|| panic!("{name} did not split"));
    assert!(theirs.is_handshake_finished(), "{name}");
    assert_eq!(
        hex::encode(split.handshake_hash),
        hex::encode(theirs.get_handshake_hash()),
        "{name}"
    );
    if let Some(remote) = ours.remote_static() {
        let (_, peer) = secrets(role);
        let expected = KeyPair::from_secret::<X25519>(&peer).unwrap();
        assert_eq!(remote, expected.public(), "{name}");
    }

    let mut theirs = theirs.into_transport_mode().unwrap();
    let mut ciphertext = [0u8; 128];
    let mut plaintext = [0u8; 128];

    // one-way patterns only ever send from initiator to responder
    let one_way = al_noise::parse_pattern(name).unwrap().0.is_one_way();
    if role == Role::Initiator || !one_way {
        let len = split
            .tx
            .encrypt_with_ad(b"", b"from al-noise", &mut ciphertext)
            .unwrap();
        let len = theirs
            .read_message(&ciphertext[..len], &mut plaintext)
            .unwrap();
        assert_eq!(&plaintext[..len], b"from al-noise", "{name}");
    }
    if role == Role::Responder || !one_way {
        let len = theirs.write_message(b"from snow", &mut ciphertext).unwrap();
        let len = split
            .rx
            .decrypt_with_ad(b"", &ciphertext[..len], &mut plaintext)
            .unwrap();
        assert_eq!(&plaintext[..len], b"from snow", "{name}");
    }
}

fn names() -> Vec<String> {
    let mut names = Vec::new();
    for pattern in HandshakePattern::ALL {
        let messages = pattern.message_patterns().len();
        names.push(pattern.name().to_string());
        for index in 0..=messages {
            names.push(format!("{}psk{index}", pattern.name()));
        }
        if messages >= 2 {
            names.push(format!("{}psk0+psk{messages}", pattern.name()));
        }
    }
    names
}

#[test]
fn al_noise_initiator_snow_responder() {
    for name in names() {
        interop(&name, Role::Initiator);
    }
}

#[test]
fn snow_initiator_al_noise_responder() {
    for name in names() {
        interop(&name, Role::Responder);
    }
}

#[test]
fn transport_counters_stay_in_step() {
    let mut ours = build_ours("XXpsk3", Role::Initiator);
    let mut theirs = build_snow("XXpsk3", Role::Responder);
    let mut message = [0u8; 512];
    let mut payload = [0u8; 512];

    let len = ours.write_message(b"", &mut message).unwrap().bytes;
    theirs.read_message(&message[..len], &mut payload).unwrap();
    let len = theirs.write_message(b"", &mut message).unwrap();
    ours.read_message(&message[..len], &mut payload).unwrap();
    let written = ours.write_message(b"", &mut message).unwrap();
    theirs
        .read_message(&message[..written.bytes], &mut payload)
        .unwrap();

    let mut split = written.split.unwrap();
    let mut theirs = theirs.into_transport_mode().unwrap();
    for i in 0..32u8 {
        let body = [i; 24];
        let len = split.tx.encrypt_with_ad(b"", &body, &mut message).unwrap();
        let read = theirs.read_message(&message[..len], &mut payload).unwrap();
        assert_eq!(&payload[..read], &body);

        let len = theirs.write_message(&body, &mut message).unwrap();
        let read = split
            .rx
            .decrypt_with_ad(b"", &message[..len], &mut payload)
            .unwrap();
        assert_eq!(&payload[..read], &body);
    }
    assert_eq!(split.tx.nonce(), 32);
    assert_eq!(split.rx.nonce(), 32);
}
