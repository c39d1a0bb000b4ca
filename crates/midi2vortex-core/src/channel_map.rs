//! Channel-mapping grammar parser.
//!
//! `map := ay ("," ay)*`
//! `ay := voice ("-" voice)*`
//! `voice := digits kind? mods? ("[" sample ornament? "]")? "+"?`
//!
//! `kind` is one of `d m me p e` (`me` is the two-letter spelling of envelope
//! kind `e`, overriding an initial `m`). `mods` is drawn from `{u, w}`.
//! `sample`/`ornament` are each one character of the 32-symbol parameter
//! alphabet. Channel digits are 1-based in the input, stored 0-based.

use crate::config::{ChannelSettings, InstrumentKind, MixOption, Modifiers};
use crate::constants::parse_param_char;
use crate::error::ConvertError;

/// Parse a full channel-map string into per-AY-channel voice lists.
pub fn parse(map: &str) -> Result<Vec<Vec<ChannelSettings>>, ConvertError> {
    map.split(',')
        .map(|ay| ay.split('-').map(parse_voice).collect())
        .collect()
}

fn parse_voice(raw: &str) -> Result<ChannelSettings, ConvertError> {
    let token = raw.trim().replace(char::is_whitespace, "");
    let bad = |reason: &str| ConvertError::BadChannelMap {
        token: token.clone(),
        reason: reason.to_string(),
    };

    let mut chars = token.chars().peekable();

    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if digits.is_empty() {
        return Err(bad("missing channel digits"));
    }
    let track = digits
        .parse::<usize>()
        .map_err(|_| bad("channel digits out of range"))?
        .checked_sub(1)
        .ok_or_else(|| bad("channel digits must be >= 1"))?;

    let mut kind = InstrumentKind::Mono;
    match chars.peek() {
        Some('d') => {
            kind = InstrumentKind::Drum;
            chars.next();
        }
        Some('m') => {
            kind = InstrumentKind::Mono;
            chars.next();
            if chars.peek() == Some(&'e') {
                kind = InstrumentKind::Envelope;
                chars.next();
            }
        }
        Some('p') => {
            kind = InstrumentKind::Poly;
            chars.next();
        }
        Some('e') => {
            kind = InstrumentKind::Envelope;
            chars.next();
        }
        Some(c) if c.is_ascii_alphabetic() => return Err(bad("unrecognised instrument kind")),
        _ => {}
    }

    let mut modifiers = Modifiers::default();
    while let Some(&c) = chars.peek() {
        match c {
            'u' => {
                modifiers.mute_echo = true;
                chars.next();
            }
            'w' => {
                modifiers.double_echo = true;
                chars.next();
            }
            _ => break,
        }
    }

    let mut sample = 2u32;
    let mut ornament = 0u32;
    if chars.peek() == Some(&'[') {
        chars.next();
        match chars.next() {
            Some(']') => return Err(bad("empty sample/ornament brackets")),
            Some(c) => {
                sample = parse_param_char(c).ok_or_else(|| bad("invalid sample character"))?;
            }
            None => return Err(bad("unterminated sample/ornament brackets")),
        }
        match chars.peek().copied() {
            Some(']') => {
                chars.next();
            }
            Some(c) => {
                ornament = parse_param_char(c).ok_or_else(|| bad("invalid ornament character"))?;
                chars.next();
                match chars.next() {
                    Some(']') => {}
                    _ => return Err(bad("unterminated sample/ornament brackets")),
                }
            }
            None => return Err(bad("unterminated sample/ornament brackets")),
        }
    }

    let mut mix = MixOption::Minus;
    if chars.peek() == Some(&'+') {
        mix = MixOption::Plus;
        chars.next();
    }

    if chars.next().is_some() {
        return Err(bad("trailing characters after voice"));
    }

    Ok(ChannelSettings {
        track,
        kind,
        modifiers,
        sample,
        ornament,
        mix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_config_map() {
        let parsed = parse("1d-2me-3p,4m[uf]-5m[2]+,5m[6]-6me[2]+-3p[3]+-2mew+").unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].len(), 3);
        assert_eq!(parsed[0][0].track, 0);
        assert_eq!(parsed[0][0].kind, InstrumentKind::Drum);
        assert_eq!(parsed[0][1].track, 1);
        assert_eq!(parsed[0][1].kind, InstrumentKind::Envelope);
        assert_eq!(parsed[0][2].kind, InstrumentKind::Poly);

        assert_eq!(parsed[1][0].track, 3);
        assert_eq!(parsed[1][0].sample, 30); // 'u' -> 'U'
        assert_eq!(parsed[1][0].ornament, 15); // 'f' -> 'F'
        assert_eq!(parsed[1][1].track, 4);
        assert_eq!(parsed[1][1].ornament, 2);
        assert_eq!(parsed[1][1].mix, MixOption::Plus);

        assert_eq!(parsed[2][3].track, 1);
        assert!(parsed[2][3].modifiers.double_echo);
        assert_eq!(parsed[2][3].mix, MixOption::Plus);
    }

    #[test]
    fn missing_digits_is_an_error() {
        assert!(parse("d").is_err());
    }

    #[test]
    fn unrecognised_kind_is_an_error() {
        assert!(parse("1x").is_err());
    }

    #[test]
    fn unterminated_bracket_is_an_error() {
        assert!(parse("1m[2").is_err());
    }

    #[test]
    fn whitespace_inside_a_voice_is_ignored() {
        let a = parse("1 m").unwrap();
        let b = parse("1m").unwrap();
        assert_eq!(a, b);
    }
}
