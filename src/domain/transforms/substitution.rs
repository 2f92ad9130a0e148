//! Monoalphabetic substitution over the 26-letter Latin alphabet
//!
//! Atbash, Caesar, ROT13, shift, simple substitution and mixed-alphabet
//! ciphers are all a single bijective table applied letter by letter. Case is
//! preserved and every character outside `a..=z`/`A..=Z` passes through.

use crate::application::errors::TransformError;

pub const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// A bijective mapping from plaintext letters to ciphertext letters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionAlphabet {
    forward: [u8; 26],
    inverse: [u8; 26],
}

impl SubstitutionAlphabet {
    fn from_table(forward: [u8; 26]) -> Self {
        let mut inverse = [0u8; 26];
        for (plain, &cipher) in forward.iter().enumerate() {
            inverse[(cipher - b'a') as usize] = ALPHABET[plain];
        }
        Self { forward, inverse }
    }

    /// Alphabet written backwards (Atbash)
    pub fn reversed() -> Self {
        let mut table = *ALPHABET;
        table.reverse();
        Self::from_table(table)
    }

    /// Alphabet rotated by `shift` places. Any integer is accepted and
    /// reduced into `0..26`.
    pub fn shifted(shift: i64) -> Self {
        let k = shift.rem_euclid(26) as usize;
        let mut table = [0u8; 26];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = ALPHABET[(i + k) % 26];
        }
        Self::from_table(table)
    }

    /// Cipher alphabet given as a 26-letter permutation, case-insensitive
    pub fn from_permutation(key: &str) -> Result<Self, TransformError> {
        let letters = key.chars().count();
        if letters != 26 {
            return Err(TransformError::InvalidKey(format!(
                "substitution key must be 26 letters, got {}",
                letters
            )));
        }

        let mut table = [0u8; 26];
        let mut seen = [false; 26];
        for (slot, c) in table.iter_mut().zip(key.chars()) {
            if !c.is_ascii_alphabetic() {
                return Err(TransformError::InvalidKey(format!(
                    "substitution key may only contain letters, found '{}'",
                    c
                )));
            }
            let lower = c.to_ascii_lowercase() as u8;
            let idx = (lower - b'a') as usize;
            if seen[idx] {
                return Err(TransformError::InvalidKey(format!(
                    "letter '{}' appears more than once in the substitution key",
                    lower as char
                )));
            }
            seen[idx] = true;
            *slot = lower;
        }

        Ok(Self::from_table(table))
    }

    /// Keyword-derived alphabet: the keyword's distinct letters in order of
    /// first appearance, then the rest of the alphabet.
    pub fn from_keyword(keyword: &str) -> Result<Self, TransformError> {
        if keyword.is_empty() {
            return Err(TransformError::InvalidKey("keyword must not be empty".to_string()));
        }

        let mut table = Vec::with_capacity(26);
        let mut seen = [false; 26];
        for c in keyword.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(TransformError::InvalidKey(format!(
                    "keyword may only contain letters, found '{}'",
                    c
                )));
            }
            let lower = c.to_ascii_lowercase() as u8;
            let idx = (lower - b'a') as usize;
            if !seen[idx] {
                seen[idx] = true;
                table.push(lower);
            }
        }
        table.extend(ALPHABET.iter().filter(|&&c| !seen[(c - b'a') as usize]));

        let mut forward = [0u8; 26];
        forward.copy_from_slice(&table);
        Ok(Self::from_table(forward))
    }

    /// The ciphertext alphabet, lowercase
    pub fn cipher_alphabet(&self) -> String {
        self.forward.iter().map(|&b| b as char).collect()
    }

    pub fn encrypt(&self, text: &str) -> String {
        apply(&self.forward, text)
    }

    pub fn decrypt(&self, text: &str) -> String {
        apply(&self.inverse, text)
    }
}

fn apply(table: &[u8; 26], text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_lowercase() {
                table[(c as u8 - b'a') as usize] as char
            } else if c.is_ascii_uppercase() {
                table[(c as u8 - b'A') as usize].to_ascii_uppercase() as char
            } else {
                c
            }
        })
        .collect()
}
