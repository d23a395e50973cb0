use crate::{HandshakePattern, MessagePattern, NoiseError, Token};
use std::collections::VecDeque;

/// The `psk<N>` modifiers of a pattern name, in the order they were written
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PatternModifier {
    psks: Vec<usize>,
}

impl PatternModifier {
    /// Parses the `+` separated modifier suffix, eg. `psk0+psk2`
    pub fn parse(suffix: &str) -> Result<Self, NoiseError> {
        let mut psks = Vec::new();
        if suffix.is_empty() {
            return Ok(Self { psks });
        }

        for modifier in suffix.split('+') {
            let index = modifier
                .strip_prefix("psk")
                .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|digits| digits.parse::<usize>().ok())
                .ok_or_else(|| NoiseError::UnsupportedModifier(modifier.to_string()))?;

            if psks.contains(&index) {
                Err(NoiseError::Validation(format!(
                    "duplicate modifier `{modifier}`"
                )))?
            }
            psks.push(index);
        }
        Ok(Self { psks })
    }

    pub fn psk_indices(&self) -> &[usize] {
        &self.psks
    }

    pub fn psk_count(&self) -> usize {
        self.psks.len()
    }

    /// Inserts the PSK tokens into the session's own copy of the message patterns.
    /// `psk0` goes in front of the first message's tokens, `psk<k>` is appended to message `k`.
    pub fn apply(&self, messages: &mut VecDeque<MessagePattern>) -> Result<(), NoiseError> {
        if let Some(&index) = self.psks.iter().find(|&&index| index > messages.len()) {
            Err(NoiseError::Validation(format!(
                "psk{index} is out of range for a {} message pattern",
                messages.len()
            )))?
        }

        for &index in &self.psks {
            match index {
                0 => {
                    if let Some(first) = messages.front_mut() {
                        first.tokens.insert(0, Token::PSK);
                    }
                }
                k => {
                    if let Some(message) = messages.get_mut(k - 1) {
                        message.tokens.push(Token::PSK);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Splits a pattern name like `XXpsk0+psk3` into the registry pattern and its modifiers
pub fn parse_pattern(name: &str) -> Result<(HandshakePattern, PatternModifier), NoiseError> {
    let split = name
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(name.len());
    let (base, suffix) = name.split_at(split);

    let pattern = HandshakePattern::from_name(base)
        .ok_or_else(|| NoiseError::UnsupportedPattern(name.to_string()))?;
    Ok((pattern, PatternModifier::parse(suffix)?))
}

#[cfg(test)]
mod tests {
    use crate::{parse_pattern, HandshakePattern, NoiseError, PatternModifier, Role, Token};

    #[test]
    fn base_patterns() {
        let (pattern, modifier) = parse_pattern("XX").unwrap();
        assert_eq!(pattern, HandshakePattern::XX);
        assert_eq!(modifier.psk_count(), 0);

        let (pattern, modifier) = parse_pattern("IKpsk2").unwrap();
        assert_eq!(pattern, HandshakePattern::IK);
        assert_eq!(modifier.psk_indices(), &[2]);

        let (_, modifier) = parse_pattern("NNpsk0+psk2").unwrap();
        assert_eq!(modifier.psk_indices(), &[0, 2]);
    }

    #[test]
    fn unsupported_names() {
        assert_eq!(
            parse_pattern("XY").unwrap_err(),
            NoiseError::UnsupportedPattern("XY".into())
        );
        assert_eq!(
            parse_pattern("").unwrap_err(),
            NoiseError::UnsupportedPattern("".into())
        );
        assert_eq!(
            parse_pattern("XXfallback").unwrap_err(),
            NoiseError::UnsupportedModifier("fallback".into())
        );
        assert_eq!(
            parse_pattern("XXpsk").unwrap_err(),
            NoiseError::UnsupportedModifier("psk".into())
        );
        assert_eq!(
            parse_pattern("XXpsk1+").unwrap_err(),
            NoiseError::UnsupportedModifier("".into())
        );
        assert_eq!(
            parse_pattern("XXpsk-1").unwrap_err(),
            NoiseError::UnsupportedModifier("psk-1".into())
        );
        assert!(matches!(
            parse_pattern("XXpsk1+psk1"),
            Err(NoiseError::Validation(_))
        ));
    }

    #[test]
    fn psk0_goes_first() {
        let mut messages = HandshakePattern::XX.to_message_patterns();
        PatternModifier::parse("psk0")
            .unwrap()
            .apply(&mut messages)
            .unwrap();
        assert_eq!(messages[0].role, Role::Initiator);
        assert_eq!(messages[0].tokens, [Token::PSK, Token::E]);
        assert_eq!(messages[1].tokens, [Token::E, Token::EE, Token::S, Token::ES]);
    }

    #[test]
    fn psk_k_appends() {
        let mut messages = HandshakePattern::XX.to_message_patterns();
        PatternModifier::parse("psk2+psk3")
            .unwrap()
            .apply(&mut messages)
            .unwrap();
        assert_eq!(messages[0].tokens, [Token::E]);
        assert_eq!(
            messages[1].tokens,
            [Token::E, Token::EE, Token::S, Token::ES, Token::PSK]
        );
        assert_eq!(messages[2].tokens, [Token::S, Token::SE, Token::PSK]);
    }

    #[test]
    fn out_of_range_index() {
        let mut messages = HandshakePattern::NN.to_message_patterns();
        let result = PatternModifier::parse("psk3").unwrap().apply(&mut messages);
        assert!(matches!(result, Err(NoiseError::Validation(_))));
        // nothing was applied
        assert_eq!(messages, HandshakePattern::NN.to_message_patterns());
    }
}
