//! Transform library - pure, stateless hash and cipher functions
//!
//! Every transform maps an input string (plus optional key material) to an
//! output string or a digest. Nothing here keeps state between calls, so the
//! functions are safe to run from any number of tasks at once.

pub mod hash;
pub mod substitution;
pub mod baconian;
pub mod transposition;
pub mod cipher;

pub use cipher::{Cipher, CipherKind};
pub use hash::{Digest, HashAlgorithm};
