use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Token {
    /// Ephemeral key
    E,
    /// Static key
    S,
    /// Ephemeral-ephemeral DH
    EE,
    /// Ephemeral-static DH (initiator's ephemeral with responder's static)
    ES,
    /// Static-ephemeral DH (initiator's static with responder's ephemeral)
    SE,
    /// Static-static DH
    SS,
    /// Pre-shared key
    PSK,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Role {
    Initiator,
    Responder,
}

impl Role {
    pub fn from_initiator(initiator: bool) -> Self {
        match initiator {
            true => Role::Initiator,
            false => Role::Responder,
        }
    }

    pub fn is_initiator(&self) -> bool {
        matches!(self, Role::Initiator)
    }

    pub fn peer(&self) -> Self {
        match self {
            Role::Initiator => Role::Responder,
            Role::Responder => Role::Initiator,
        }
    }
}

/// One line of a static pattern table: the role sending it and its tokens
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PatternLine {
    pub role: Role,
    pub tokens: &'static [Token],
}

const fn initiator(tokens: &'static [Token]) -> PatternLine {
    PatternLine {
        role: Role::Initiator,
        tokens,
    }
}

const fn responder(tokens: &'static [Token]) -> PatternLine {
    PatternLine {
        role: Role::Responder,
        tokens,
    }
}

/// Owned, per-session copy of a message line, modifiers may add `PSK` tokens to it
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MessagePattern {
    pub role: Role,
    pub tokens: Vec<Token>,
}

impl From<&PatternLine> for MessagePattern {
    fn from(line: &PatternLine) -> Self {
        Self {
            role: line.role,
            tokens: line.tokens.to_vec(),
        }
    }
}

/// Token tables from sections 7.4 and 7.5 of the Noise specification
mod tables {
    use super::{initiator, responder, PatternLine, Token::*};

    pub const RESPONDER_STATIC: &[PatternLine] = &[responder(&[S])];
    pub const INITIATOR_STATIC: &[PatternLine] = &[initiator(&[S])];
    pub const BOTH_STATIC: &[PatternLine] = &[initiator(&[S]), responder(&[S])];

    pub const N: &[PatternLine] = &[initiator(&[E, ES])];
    pub const K: &[PatternLine] = &[initiator(&[E, ES, SS])];
    pub const X: &[PatternLine] = &[initiator(&[E, ES, S, SS])];

    pub const NN: &[PatternLine] = &[initiator(&[E]), responder(&[E, EE])];
    pub const KN: &[PatternLine] = &[initiator(&[E]), responder(&[E, EE, SE])];
    pub const NK: &[PatternLine] = &[initiator(&[E, ES]), responder(&[E, EE])];
    pub const KK: &[PatternLine] = &[initiator(&[E, ES, SS]), responder(&[E, EE, SE])];
    pub const NX: &[PatternLine] = &[initiator(&[E]), responder(&[E, EE, S, ES])];
    pub const KX: &[PatternLine] = &[initiator(&[E]), responder(&[E, EE, SE, S, ES])];
    pub const XN: &[PatternLine] = &[
        initiator(&[E]),
        responder(&[E, EE]),
        initiator(&[S, SE]),
    ];
    pub const IN: &[PatternLine] = &[initiator(&[E, S]), responder(&[E, EE, SE])];
    pub const XK: &[PatternLine] = &[
        initiator(&[E, ES]),
        responder(&[E, EE]),
        initiator(&[S, SE]),
    ];
    pub const IK: &[PatternLine] = &[initiator(&[E, ES, S, SS]), responder(&[E, EE, SE])];
    pub const XX: &[PatternLine] = &[
        initiator(&[E]),
        responder(&[E, EE, S, ES]),
        initiator(&[S, SE]),
    ];
    pub const IX: &[PatternLine] = &[initiator(&[E, S]), responder(&[E, EE, SE, S, ES])];
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HandshakePattern {
    /// One-way, sender anonymous, recipient static known
    N,
    /// One-way, both statics known
    K,
    /// One-way, sender static transmitted, recipient static known
    X,
    /// No authentication, no static keys (anonymous)
    NN,
    /// Responder knows initiator static, only initiator authenticated
    KN,
    /// Initiator knows responder static, only responder authenticated
    NK,
    /// Mutual static key authentication
    KK,
    /// Initiator anonymous, responder transmits static
    NX,
    /// Responder knows initiator static, responder transmits static
    KX,
    /// Initiator transmits static late, responder anonymous
    XN,
    /// Initiator transmits static immediately, responder anonymous
    IN,
    /// Initiator knows responder static, initiator transmits static late
    XK,
    /// Initiator knows responder static, initiator transmits static immediately
    IK,
    /// Mutual authentication with statics transmitted during the handshake
    XX,
    /// Initiator transmits static immediately, responder transmits static
    IX,
}

impl HandshakePattern {
    pub const ALL: [HandshakePattern; 15] = [
        HandshakePattern::N,
        HandshakePattern::K,
        HandshakePattern::X,
        HandshakePattern::NN,
        HandshakePattern::KN,
        HandshakePattern::NK,
        HandshakePattern::KK,
        HandshakePattern::NX,
        HandshakePattern::KX,
        HandshakePattern::XN,
        HandshakePattern::IN,
        HandshakePattern::XK,
        HandshakePattern::IK,
        HandshakePattern::XX,
        HandshakePattern::IX,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HandshakePattern::N => "N",
            HandshakePattern::K => "K",
            HandshakePattern::X => "X",
            HandshakePattern::NN => "NN",
            HandshakePattern::KN => "KN",
            HandshakePattern::NK => "NK",
            HandshakePattern::KK => "KK",
            HandshakePattern::NX => "NX",
            HandshakePattern::KX => "KX",
            HandshakePattern::XN => "XN",
            HandshakePattern::IN => "IN",
            HandshakePattern::XK => "XK",
            HandshakePattern::IK => "IK",
            HandshakePattern::XX => "XX",
            HandshakePattern::IX => "IX",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pattern| pattern.name() == name)
    }

    /// One-way patterns carry a single message from initiator to responder
    pub fn is_one_way(&self) -> bool {
        self.message_patterns().len() == 1
    }

    /// Keys known before the first message, in the order they are hashed.
    /// If both parties have pre-messages, the initiator's is hashed first.
    pub fn premessages(&self) -> &'static [PatternLine] {
        match self {
            HandshakePattern::NN
            | HandshakePattern::NX
            | HandshakePattern::XN
            | HandshakePattern::IN
            | HandshakePattern::XX
            | HandshakePattern::IX => &[],
            // _K: initiator knows responder static
            HandshakePattern::N
            | HandshakePattern::X
            | HandshakePattern::NK
            | HandshakePattern::XK
            | HandshakePattern::IK => tables::RESPONDER_STATIC,
            // K_: responder knows initiator static
            HandshakePattern::KN | HandshakePattern::KX => tables::INITIATOR_STATIC,
            HandshakePattern::K | HandshakePattern::KK => tables::BOTH_STATIC,
        }
    }

    pub fn message_patterns(&self) -> &'static [PatternLine] {
        match self {
            HandshakePattern::N => tables::N,
            HandshakePattern::K => tables::K,
            HandshakePattern::X => tables::X,
            HandshakePattern::NN => tables::NN,
            HandshakePattern::KN => tables::KN,
            HandshakePattern::NK => tables::NK,
            HandshakePattern::KK => tables::KK,
            HandshakePattern::NX => tables::NX,
            HandshakePattern::KX => tables::KX,
            HandshakePattern::XN => tables::XN,
            HandshakePattern::IN => tables::IN,
            HandshakePattern::XK => tables::XK,
            HandshakePattern::IK => tables::IK,
            HandshakePattern::XX => tables::XX,
            HandshakePattern::IX => tables::IX,
        }
    }

    /// Deep copy of the message lines, the static table is never handed out mutably
    pub fn to_message_patterns(&self) -> VecDeque<MessagePattern> {
        self.message_patterns()
            .iter()
            .map(MessagePattern::from)
            .collect()
    }
}

impl std::fmt::Display for HandshakePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
