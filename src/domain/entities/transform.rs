//! Request-scoped values passed between the router and the transform library

use std::fmt;

use crate::domain::transforms::hash::Digest;

/// Direction of a cipher transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Encrypt,
    Decrypt,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key material for one cipher invocation. Which field a cipher reads
/// depends on its kind; unused fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CipherParameters {
    pub shift: Option<i64>,
    pub keyword: Option<String>,
    /// 26-letter permutation for simple substitution
    pub alphabet: Option<String>,
    /// Rail or turn count for transposition ciphers
    pub count: Option<usize>,
}

impl CipherParameters {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_shift(mut self, shift: i64) -> Self {
        self.shift = Some(shift);
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.alphabet = Some(alphabet.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// Output of a transform, handed back to the router for formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformResult {
    Text(String),
    Digests(Vec<Digest>),
}

impl fmt::Display for TransformResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformResult::Text(text) => f.write_str(text),
            TransformResult::Digests(digests) => {
                for (i, digest) in digests.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}: {}", digest.algorithm, digest)?;
                }
                Ok(())
            }
        }
    }
}
