//! Cipher selection and dispatch
//!
//! [`CipherKind`] names a cipher as the user types it; [`Cipher`] is a built
//! instance holding its key material, with one encrypt/decrypt pair per
//! variant.

use std::fmt;
use std::str::FromStr;

use crate::application::errors::{TransformError, UnknownAlgorithm};
use crate::domain::entities::{CipherParameters, Operation};

use super::baconian::{self, BaconVariant};
use super::substitution::SubstitutionAlphabet;
use super::transposition::{Columnar, RailFence, Scytale};

/// Shift used by the Caesar cipher when none is configured
pub const DEFAULT_CAESAR_SHIFT: i64 = 3;

/// The key material a cipher expects from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Integer shift, any sign
    Shift,
    /// 26-letter permutation
    Alphabet,
    /// Alphabetic keyword
    Keyword,
    /// Positive count of rails or turns
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherKind {
    Atbash,
    Caesar,
    Rot13,
    Shift,
    SimpleSubstitution,
    MixedAlphabet,
    Baconian,
    BaconianClassic,
    RailFence,
    Columnar,
    Scytale,
}

impl CipherKind {
    pub const ALL: [CipherKind; 11] = [
        CipherKind::Atbash,
        CipherKind::Caesar,
        CipherKind::Rot13,
        CipherKind::Shift,
        CipherKind::SimpleSubstitution,
        CipherKind::MixedAlphabet,
        CipherKind::Baconian,
        CipherKind::BaconianClassic,
        CipherKind::RailFence,
        CipherKind::Columnar,
        CipherKind::Scytale,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CipherKind::Atbash => "atbash",
            CipherKind::Caesar => "caesar",
            CipherKind::Rot13 => "rot13",
            CipherKind::Shift => "shift",
            CipherKind::SimpleSubstitution => "simple_substitution",
            CipherKind::MixedAlphabet => "mixed_alphabet",
            CipherKind::Baconian => "baconian",
            CipherKind::BaconianClassic => "baconian_classic",
            CipherKind::RailFence => "rail_fence",
            CipherKind::Columnar => "columnar",
            CipherKind::Scytale => "scytale",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CipherKind::Atbash => "reversed alphabet, a becomes z",
            CipherKind::Caesar => "classic Caesar shift",
            CipherKind::Rot13 => "rotate by 13, self-inverse",
            CipherKind::Shift => "rotate by a chosen shift",
            CipherKind::SimpleSubstitution => "substitution with a 26-letter key",
            CipherKind::MixedAlphabet => "substitution alphabet built from a keyword",
            CipherKind::Baconian => "Bacon's cipher, 5-symbol A/B codes",
            CipherKind::BaconianClassic => "Bacon's original 24-letter table",
            CipherKind::RailFence => "zig-zag transposition over N rails",
            CipherKind::Columnar => "columnar transposition keyed by a word",
            CipherKind::Scytale => "Spartan rod transposition with N turns",
        }
    }

    pub fn parameter(&self) -> Option<ParameterKind> {
        match self {
            CipherKind::Shift => Some(ParameterKind::Shift),
            CipherKind::SimpleSubstitution => Some(ParameterKind::Alphabet),
            CipherKind::MixedAlphabet | CipherKind::Columnar => Some(ParameterKind::Keyword),
            CipherKind::RailFence | CipherKind::Scytale => Some(ParameterKind::Count),
            _ => None,
        }
    }

    /// Placeholder shown in usage strings, e.g. `<keyword>`
    pub fn parameter_label(&self) -> Option<&'static str> {
        match self {
            CipherKind::Shift => Some("shift"),
            CipherKind::SimpleSubstitution => Some("key"),
            CipherKind::MixedAlphabet | CipherKind::Columnar => Some("keyword"),
            CipherKind::RailFence => Some("rails"),
            CipherKind::Scytale => Some("turns"),
            _ => None,
        }
    }

    pub fn names() -> String {
        Self::ALL.iter().map(|k| k.name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherKind {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// A cipher ready to use, with its key material validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cipher {
    Substitution(SubstitutionAlphabet),
    Baconian(BaconVariant),
    RailFence(RailFence),
    Columnar(Columnar),
    Scytale(Scytale),
}

fn missing(kind: CipherKind) -> TransformError {
    TransformError::InvalidKey(format!(
        "{} requires a {}",
        kind,
        kind.parameter_label().unwrap_or("parameter")
    ))
}

impl Cipher {
    pub fn build(kind: CipherKind, params: &CipherParameters) -> Result<Self, TransformError> {
        let cipher = match kind {
            CipherKind::Atbash => Cipher::Substitution(SubstitutionAlphabet::reversed()),
            CipherKind::Caesar => Cipher::Substitution(SubstitutionAlphabet::shifted(
                params.shift.unwrap_or(DEFAULT_CAESAR_SHIFT),
            )),
            CipherKind::Rot13 => Cipher::Substitution(SubstitutionAlphabet::shifted(13)),
            CipherKind::Shift => {
                let shift = params.shift.ok_or_else(|| missing(kind))?;
                Cipher::Substitution(SubstitutionAlphabet::shifted(shift))
            }
            CipherKind::SimpleSubstitution => {
                let key = params.alphabet.as_deref().ok_or_else(|| missing(kind))?;
                Cipher::Substitution(SubstitutionAlphabet::from_permutation(key)?)
            }
            CipherKind::MixedAlphabet => {
                let keyword = params.keyword.as_deref().ok_or_else(|| missing(kind))?;
                Cipher::Substitution(SubstitutionAlphabet::from_keyword(keyword)?)
            }
            CipherKind::Baconian => Cipher::Baconian(BaconVariant::Modern),
            CipherKind::BaconianClassic => Cipher::Baconian(BaconVariant::Classic),
            CipherKind::RailFence => {
                let rails = params.count.ok_or_else(|| missing(kind))?;
                Cipher::RailFence(RailFence::new(rails)?)
            }
            CipherKind::Columnar => {
                let keyword = params.keyword.as_deref().ok_or_else(|| missing(kind))?;
                Cipher::Columnar(Columnar::from_keyword(keyword)?)
            }
            CipherKind::Scytale => {
                let turns = params.count.ok_or_else(|| missing(kind))?;
                Cipher::Scytale(Scytale::new(turns)?)
            }
        };
        Ok(cipher)
    }

    pub fn encrypt(&self, text: &str) -> Result<String, TransformError> {
        match self {
            Cipher::Substitution(alphabet) => Ok(alphabet.encrypt(text)),
            Cipher::Baconian(variant) => Ok(baconian::encode(text, *variant)),
            Cipher::RailFence(cipher) => Ok(cipher.encrypt(text)),
            Cipher::Columnar(cipher) => Ok(cipher.encrypt(text)),
            Cipher::Scytale(cipher) => cipher.encrypt(text),
        }
    }

    pub fn decrypt(&self, text: &str) -> Result<String, TransformError> {
        match self {
            Cipher::Substitution(alphabet) => Ok(alphabet.decrypt(text)),
            Cipher::Baconian(variant) => baconian::decode(text, *variant),
            Cipher::RailFence(cipher) => Ok(cipher.decrypt(text)),
            Cipher::Columnar(cipher) => Ok(cipher.decrypt(text)),
            Cipher::Scytale(cipher) => Ok(cipher.decrypt(text)),
        }
    }

    pub fn apply(&self, operation: Operation, text: &str) -> Result<String, TransformError> {
        match operation {
            Operation::Encrypt => self.encrypt(text),
            Operation::Decrypt => self.decrypt(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Hello, World! 2024 edition.";

    fn build(kind: CipherKind, params: CipherParameters) -> Cipher {
        Cipher::build(kind, &params).unwrap()
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in CipherKind::ALL {
            assert_eq!(kind.name().parse::<CipherKind>(), Ok(kind));
        }
        assert_eq!("Mixed-Alphabet".parse::<CipherKind>(), Ok(CipherKind::MixedAlphabet));
        assert!("enigma".parse::<CipherKind>().is_err());
    }

    #[test]
    fn caesar_defaults_to_three() {
        let caesar = build(CipherKind::Caesar, CipherParameters::none());
        assert_eq!(caesar.encrypt("abc").unwrap(), "def");
        let custom = build(CipherKind::Caesar, CipherParameters::none().with_shift(1));
        assert_eq!(custom.encrypt("abc").unwrap(), "bcd");
    }

    #[test]
    fn involutions() {
        for kind in [CipherKind::Atbash, CipherKind::Rot13] {
            let cipher = build(kind, CipherParameters::none());
            let once = cipher.encrypt(SAMPLE).unwrap();
            assert_eq!(cipher.encrypt(&once).unwrap(), SAMPLE, "{}", kind);
            assert_eq!(cipher.decrypt(SAMPLE).unwrap(), once, "{}", kind);
        }
    }

    #[test]
    fn every_cipher_round_trips_and_keeps_non_letters() {
        let cases = [
            (CipherKind::Atbash, CipherParameters::none()),
            (CipherKind::Caesar, CipherParameters::none()),
            (CipherKind::Rot13, CipherParameters::none()),
            (CipherKind::Shift, CipherParameters::none().with_shift(-40)),
            (
                CipherKind::SimpleSubstitution,
                CipherParameters::none().with_alphabet("phqgiumeaylnofdxjkrcvstzwb"),
            ),
            (CipherKind::MixedAlphabet, CipherParameters::none().with_keyword("kryptos")),
            (CipherKind::Baconian, CipherParameters::none()),
            (CipherKind::RailFence, CipherParameters::none().with_count(3)),
            (CipherKind::Columnar, CipherParameters::none().with_keyword("zebras")),
            (CipherKind::Scytale, CipherParameters::none().with_count(3)),
        ];

        for (kind, params) in cases {
            let cipher = build(kind, params);
            let encrypted = cipher.apply(Operation::Encrypt, SAMPLE).unwrap();
            assert_eq!(cipher.apply(Operation::Decrypt, &encrypted).unwrap(), SAMPLE, "{}", kind);

            let kept: String = SAMPLE.chars().filter(|c| !c.is_ascii_alphabetic()).collect();
            let kept_after: String = encrypted.chars().filter(|c| !c.is_ascii_alphabetic()).collect();
            assert_eq!(kept, kept_after, "{} altered non-letters", kind);
        }
    }

    #[test]
    fn missing_parameters_are_key_errors() {
        for kind in [
            CipherKind::Shift,
            CipherKind::SimpleSubstitution,
            CipherKind::MixedAlphabet,
            CipherKind::RailFence,
            CipherKind::Columnar,
            CipherKind::Scytale,
        ] {
            assert!(
                matches!(Cipher::build(kind, &CipherParameters::none()), Err(TransformError::InvalidKey(_))),
                "{}",
                kind
            );
        }
    }

    #[test]
    fn invalid_keys_are_rejected() {
        let repeated = CipherParameters::none().with_alphabet("aacdefghijklmnopqrstuvwxyz");
        assert!(matches!(
            Cipher::build(CipherKind::SimpleSubstitution, &repeated),
            Err(TransformError::InvalidKey(_))
        ));
        let empty = CipherParameters::none().with_keyword("");
        assert!(matches!(
            Cipher::build(CipherKind::MixedAlphabet, &empty),
            Err(TransformError::InvalidKey(_))
        ));
    }

    #[test]
    fn baconian_decrypt_surfaces_ciphertext_errors() {
        let cipher = build(CipherKind::Baconian, CipherParameters::none());
        assert!(matches!(
            cipher.decrypt("hello"),
            Err(TransformError::InvalidCiphertext(_))
        ));
    }
}
