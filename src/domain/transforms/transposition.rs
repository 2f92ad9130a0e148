//! Transposition ciphers: rail fence, columnar and scytale
//!
//! Only letters are reordered. Every other character stays at its original
//! position, so spacing and punctuation survive both directions.

use crate::application::errors::TransformError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Reorder the letters of `text`. `order(n)` returns, for a message of `n`
/// letters, the plaintext index of each ciphertext letter.
fn transpose<F>(text: &str, order: F, direction: Direction) -> String
where
    F: FnOnce(usize) -> Vec<usize>,
{
    let mut chars: Vec<char> = text.chars().collect();
    let slots: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| i)
        .collect();
    let letters: Vec<char> = slots.iter().map(|&i| chars[i]).collect();
    let order = order(letters.len());

    let mut moved = letters.clone();
    match direction {
        Direction::Forward => {
            for (k, &src) in order.iter().enumerate() {
                moved[k] = letters[src];
            }
        }
        Direction::Backward => {
            for (k, &dst) in order.iter().enumerate() {
                moved[dst] = letters[k];
            }
        }
    }

    for (&slot, c) in slots.iter().zip(moved) {
        chars[slot] = c;
    }
    chars.into_iter().collect()
}

fn count_letters(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

/// Read a row-major grid of `n` cells, `width` cells wide, column by column,
/// visiting columns in `columns` order. `width` must be at least 1.
fn column_order<I>(n: usize, width: usize, columns: I) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut order = Vec::with_capacity(n);
    for col in columns {
        order.extend((col..n).step_by(width));
    }
    order
}

/// Zig-zag across `rails` rows, then read row by row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RailFence {
    rails: usize,
}

impl RailFence {
    pub fn new(rails: usize) -> Result<Self, TransformError> {
        if rails < 2 {
            return Err(TransformError::InvalidKey("rail fence needs at least 2 rails".to_string()));
        }
        Ok(Self { rails })
    }

    fn order(&self, n: usize) -> Vec<usize> {
        // Rails past the letter count stay empty
        let rails = self.rails.min(n.max(2));
        let cycle = 2 * (rails - 1);
        let row = |i: usize| {
            let p = i % cycle;
            if p < rails { p } else { cycle - p }
        };
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| row(i));
        order
    }

    pub fn encrypt(&self, text: &str) -> String {
        transpose(text, |n| self.order(n), Direction::Forward)
    }

    pub fn decrypt(&self, text: &str) -> String {
        transpose(text, |n| self.order(n), Direction::Backward)
    }
}

/// Keyed columnar transposition. Columns are read in alphabetical order of
/// the keyword letters; repeated letters keep their left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columnar {
    columns: Vec<usize>,
}

impl Columnar {
    pub fn from_keyword(keyword: &str) -> Result<Self, TransformError> {
        if keyword.is_empty() {
            return Err(TransformError::InvalidKey("keyword must not be empty".to_string()));
        }
        if let Some(bad) = keyword.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(TransformError::InvalidKey(format!(
                "keyword may only contain letters, found '{}'",
                bad
            )));
        }
        let key: Vec<char> = keyword.chars().map(|c| c.to_ascii_lowercase()).collect();
        let mut columns: Vec<usize> = (0..key.len()).collect();
        columns.sort_by_key(|&i| key[i]);
        Ok(Self { columns })
    }

    fn order(&self, n: usize) -> Vec<usize> {
        column_order(n, self.columns.len(), self.columns.iter().copied())
    }

    pub fn encrypt(&self, text: &str) -> String {
        transpose(text, |n| self.order(n), Direction::Forward)
    }

    pub fn decrypt(&self, text: &str) -> String {
        transpose(text, |n| self.order(n), Direction::Backward)
    }
}

/// Strip wound around a rod: rows of `turns` letters read down the columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scytale {
    turns: usize,
}

impl Scytale {
    pub fn new(turns: usize) -> Result<Self, TransformError> {
        if turns < 2 {
            return Err(TransformError::InvalidKey("scytale needs at least 2 turns".to_string()));
        }
        Ok(Self { turns })
    }

    fn order(&self, n: usize) -> Vec<usize> {
        // Columns at or past `n` hold no letters
        let width = self.turns.min(n).max(1);
        column_order(n, width, 0..width)
    }

    /// The message must be longer than twice the turn count, otherwise the
    /// letters barely move.
    pub fn encrypt(&self, text: &str) -> Result<String, TransformError> {
        let letters = count_letters(text);
        if self.turns >= letters / 2 {
            return Err(TransformError::InvalidKey(format!(
                "{} turns is too many for {} letters, use fewer than {}",
                self.turns,
                letters,
                letters / 2
            )));
        }
        Ok(transpose(text, |n| self.order(n), Direction::Forward))
    }

    pub fn decrypt(&self, text: &str) -> String {
        transpose(text, |n| self.order(n), Direction::Backward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "WEAREDISCOVEREDFLEEATONCE";

    #[test]
    fn rail_fence_matches_textbook_example() {
        let cipher = RailFence::new(3).unwrap();
        assert_eq!(cipher.encrypt(PLAIN), "WECRLTEERDSOEEFEAOCAIVDEN");
        assert_eq!(cipher.decrypt("WECRLTEERDSOEEFEAOCAIVDEN"), PLAIN);
    }

    #[test]
    fn rail_fence_rejects_single_rail() {
        assert!(matches!(RailFence::new(1), Err(TransformError::InvalidKey(_))));
        assert!(matches!(RailFence::new(0), Err(TransformError::InvalidKey(_))));
    }

    #[test]
    fn rail_fence_keeps_non_letters_in_place() {
        let cipher = RailFence::new(4).unwrap();
        let text = "We are discovered, flee at once!";
        let encrypted = cipher.encrypt(text);
        for (a, b) in text.chars().zip(encrypted.chars()) {
            if !a.is_alphabetic() {
                assert_eq!(a, b);
            }
        }
        assert_eq!(cipher.decrypt(&encrypted), text);
    }

    #[test]
    fn rail_fence_handles_more_rails_than_letters() {
        let cipher = RailFence::new(10).unwrap();
        assert_eq!(cipher.decrypt(&cipher.encrypt("abc")), "abc");
        assert_eq!(cipher.encrypt(""), "");
    }

    #[test]
    fn rail_fence_survives_huge_rail_counts() {
        for rails in [usize::MAX, (1 << 63) + 1] {
            let cipher = RailFence::new(rails).unwrap();
            assert_eq!(cipher.encrypt("hello"), "hello");
            assert_eq!(cipher.decrypt("hello"), "hello");
        }
    }

    #[test]
    fn columnar_matches_textbook_example() {
        let cipher = Columnar::from_keyword("ZEBRAS").unwrap();
        assert_eq!(cipher.encrypt(PLAIN), "EVLNACDTESEAROFODEECWIREE");
        assert_eq!(cipher.decrypt("EVLNACDTESEAROFODEECWIREE"), PLAIN);
    }

    #[test]
    fn columnar_repeated_key_letters_are_stable() {
        let cipher = Columnar::from_keyword("Hello").unwrap();
        let text = "Transposition ciphers keep punctuation: ok?";
        assert_eq!(cipher.decrypt(&cipher.encrypt(text)), text);
    }

    #[test]
    fn columnar_rejects_bad_keywords() {
        assert!(matches!(Columnar::from_keyword(""), Err(TransformError::InvalidKey(_))));
        assert!(matches!(Columnar::from_keyword("k3y"), Err(TransformError::InvalidKey(_))));
    }

    #[test]
    fn scytale_reads_down_the_rod() {
        let cipher = Scytale::new(4).unwrap();
        assert_eq!(cipher.encrypt("hello world").unwrap(), "holew dlolr");
        assert_eq!(cipher.decrypt("holew dlolr"), "hello world");
    }

    #[test]
    fn scytale_decrypt_survives_huge_turn_counts() {
        for turns in [usize::MAX, 10_000_000_000] {
            let cipher = Scytale::new(turns).unwrap();
            assert_eq!(cipher.decrypt("hi there"), "hi there");
            assert!(matches!(cipher.encrypt("hi there"), Err(TransformError::InvalidKey(_))));
        }
        assert_eq!(Scytale::new(3).unwrap().decrypt(""), "");
    }

    #[test]
    fn scytale_rejects_too_many_turns() {
        let cipher = Scytale::new(5).unwrap();
        assert!(matches!(cipher.encrypt("hello world"), Err(TransformError::InvalidKey(_))));
        assert!(matches!(Scytale::new(1), Err(TransformError::InvalidKey(_))));
    }
}
