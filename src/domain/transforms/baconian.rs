//! Bacon's biliteral cipher
//!
//! Each letter becomes five symbols drawn from `a`/`b`. The case of the
//! letter carries over to its code, and anything that is not an ASCII letter
//! is copied through untouched in both directions.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::application::errors::TransformError;

const CODE_LEN: usize = 5;

/// Which code table to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaconVariant {
    /// 26 distinct codes, one per letter
    Modern,
    /// Bacon's 24-letter table where I/J and U/V share a code
    Classic,
}

static MODERN_TABLE: [&str; 26] = [
    "aaaaa", "aaaab", "aaaba", "aaabb", "aabaa", "aabab", "aabba", "aabbb", // a-h
    "abaaa", "abaab", "ababa", "ababb", "abbaa", "abbab", "abbba", "abbbb", // i-p
    "baaaa", "baaab", "baaba", "baabb", "babaa", "babab", "babba", "babbb", // q-x
    "bbaaa", "bbaab", // y-z
];

static CLASSIC_TABLE: [&str; 26] = [
    "aaaaa", "aaaab", "aaaba", "aaabb", "aabaa", "aabab", "aabba", "aabbb", // a-h
    "abaaa", "abaaa", "abaab", "ababa", "ababb", "abbaa", "abbab", "abbba", // i-p
    "abbbb", "baaaa", "baaab", "baaba", "baabb", "baabb", "babaa", "babab", // q-x
    "babba", "babbb", // y-z
];

static MODERN_DECODE: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| inverse(&MODERN_TABLE));
static CLASSIC_DECODE: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| inverse(&CLASSIC_TABLE));

/// Shared codes resolve to the earlier letter, so the classic table decodes
/// to `i` and `u`.
fn inverse(table: &'static [&'static str; 26]) -> HashMap<&'static str, u8> {
    let mut map = HashMap::with_capacity(26);
    for (i, code) in table.iter().enumerate() {
        map.entry(*code).or_insert(b'a' + i as u8);
    }
    map
}

impl BaconVariant {
    fn table(&self) -> &'static [&'static str; 26] {
        match self {
            BaconVariant::Modern => &MODERN_TABLE,
            BaconVariant::Classic => &CLASSIC_TABLE,
        }
    }

    fn decode_table(&self) -> &'static HashMap<&'static str, u8> {
        match self {
            BaconVariant::Modern => &MODERN_DECODE,
            BaconVariant::Classic => &CLASSIC_DECODE,
        }
    }
}

pub fn encode(text: &str, variant: BaconVariant) -> String {
    let table = variant.table();
    let mut out = String::with_capacity(text.len() * CODE_LEN);
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            let code = table[(c.to_ascii_lowercase() as u8 - b'a') as usize];
            if c.is_ascii_uppercase() {
                out.push_str(&code.to_ascii_uppercase());
            } else {
                out.push_str(code);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Inverse of [`encode`]. Fails on any letter other than `a`/`b`, on a code
/// cut short by a non-letter or the end of input, and on a code with no
/// letter assigned.
pub fn decode(text: &str, variant: BaconVariant) -> Result<String, TransformError> {
    let lookup = variant.decode_table();
    let mut out = String::with_capacity(text.len() / CODE_LEN + 1);
    let mut block = String::with_capacity(CODE_LEN);
    let mut upper = false;

    for c in text.chars() {
        match c.to_ascii_lowercase() {
            symbol @ ('a' | 'b') => {
                if block.is_empty() {
                    upper = c.is_ascii_uppercase();
                }
                block.push(symbol);
                if block.len() == CODE_LEN {
                    let letter = lookup.get(block.as_str()).copied().ok_or_else(|| {
                        TransformError::InvalidCiphertext(format!("'{}' is not a Baconian code", block))
                    })?;
                    let letter = if upper { letter.to_ascii_uppercase() } else { letter };
                    out.push(letter as char);
                    block.clear();
                }
            }
            _ if c.is_alphabetic() => {
                return Err(TransformError::InvalidCiphertext(format!(
                    "unexpected letter '{}', Baconian codes use only A and B",
                    c
                )));
            }
            _ => {
                if !block.is_empty() {
                    return Err(truncated(&block));
                }
                out.push(c);
            }
        }
    }

    if !block.is_empty() {
        return Err(truncated(&block));
    }
    Ok(out)
}

fn truncated(block: &str) -> TransformError {
    TransformError::InvalidCiphertext(format!(
        "incomplete code '{}', every code has {} symbols",
        block, CODE_LEN
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_case_and_passthrough() {
        assert_eq!(encode("ab", BaconVariant::Modern), "aaaaaaaaab");
        assert_eq!(encode("Hi!", BaconVariant::Modern), "AABBBabaaa!");
        assert_eq!(encode("z 9", BaconVariant::Modern), "bbaab 9");
    }

    #[test]
    fn modern_round_trip() {
        let text = "Meet me at The Old Bridge, 10pm.";
        let encoded = encode(text, BaconVariant::Modern);
        assert_eq!(decode(&encoded, BaconVariant::Modern).unwrap(), text);
    }

    #[test]
    fn classic_merges_shared_letters() {
        assert_eq!(encode("j", BaconVariant::Classic), encode("i", BaconVariant::Classic));
        assert_eq!(encode("v", BaconVariant::Classic), "baabb");
        assert_eq!(encode("z", BaconVariant::Classic), "babbb");
        assert_eq!(
            decode(&encode("Java Vault", BaconVariant::Classic), BaconVariant::Classic).unwrap(),
            "Iaua Uault"
        );
    }

    #[test]
    fn decode_rejects_unassigned_codes() {
        assert!(matches!(
            decode("bbbbb", BaconVariant::Modern),
            Err(TransformError::InvalidCiphertext(_))
        ));
        // 'bbaab' is z in the modern table but unused in the classic one
        assert!(matches!(
            decode("bbaab", BaconVariant::Classic),
            Err(TransformError::InvalidCiphertext(_))
        ));
    }

    #[test]
    fn decode_rejects_malformed_tokens() {
        for bad in ["aaaa", "aaa aa", "aaaac", "aabab aab"] {
            assert!(
                matches!(decode(bad, BaconVariant::Modern), Err(TransformError::InvalidCiphertext(_))),
                "{:?} should fail",
                bad
            );
        }
    }

    #[test]
    fn decode_preserves_separators() {
        assert_eq!(decode("aabbb\tabaaa\n", BaconVariant::Modern).unwrap(), "h\ti\n");
    }
}
