//! Hash transforms backed by the RustCrypto digest implementations

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use digest::DynDigest;

use crate::application::errors::UnknownAlgorithm;

/// Read size used when hashing streams
pub const CHUNK_SIZE: usize = 8192;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b,
    Blake2s,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 12] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha3_224,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_384,
        HashAlgorithm::Sha3_512,
        HashAlgorithm::Blake2b,
        HashAlgorithm::Blake2s,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha3_224 => "sha3_224",
            HashAlgorithm::Sha3_256 => "sha3_256",
            HashAlgorithm::Sha3_384 => "sha3_384",
            HashAlgorithm::Sha3_512 => "sha3_512",
            HashAlgorithm::Blake2b => "blake2b",
            HashAlgorithm::Blake2s => "blake2s",
        }
    }

    /// Digest size in bytes. BLAKE2 variants use their full-width output.
    pub fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 | HashAlgorithm::Sha3_224 => 28,
            HashAlgorithm::Sha256 | HashAlgorithm::Sha3_256 | HashAlgorithm::Blake2s => 32,
            HashAlgorithm::Sha384 | HashAlgorithm::Sha3_384 => 48,
            HashAlgorithm::Sha512 | HashAlgorithm::Sha3_512 | HashAlgorithm::Blake2b => 64,
        }
    }

    fn hasher(&self) -> Box<dyn DynDigest + Send> {
        match self {
            HashAlgorithm::Md5 => Box::new(md5::Md5::default()),
            HashAlgorithm::Sha1 => Box::new(sha1::Sha1::default()),
            HashAlgorithm::Sha224 => Box::new(sha2::Sha224::default()),
            HashAlgorithm::Sha256 => Box::new(sha2::Sha256::default()),
            HashAlgorithm::Sha384 => Box::new(sha2::Sha384::default()),
            HashAlgorithm::Sha512 => Box::new(sha2::Sha512::default()),
            HashAlgorithm::Sha3_224 => Box::new(sha3::Sha3_224::default()),
            HashAlgorithm::Sha3_256 => Box::new(sha3::Sha3_256::default()),
            HashAlgorithm::Sha3_384 => Box::new(sha3::Sha3_384::default()),
            HashAlgorithm::Sha3_512 => Box::new(sha3::Sha3_512::default()),
            HashAlgorithm::Blake2b => Box::new(blake2::Blake2b512::default()),
            HashAlgorithm::Blake2s => Box::new(blake2::Blake2s256::default()),
        }
    }

    pub fn digest(&self, data: &[u8]) -> Digest {
        let mut hasher = self.hasher();
        hasher.update(data);
        Digest {
            algorithm: *self,
            bytes: hasher.finalize().into_vec(),
        }
    }

    /// Comma separated list of every selector name
    pub fn names() -> String {
        Self::ALL.iter().map(|a| a.name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    /// Accepts the canonical names plus dashed spellings such as `sha3-256`
    /// and `sha-256`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let normalized = match normalized.strip_prefix("sha_") {
            Some(rest) => format!("sha{}", rest),
            None => normalized,
        };
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == normalized)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// A finished digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub algorithm: HashAlgorithm,
    pub bytes: Vec<u8>,
}

impl Digest {
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Every supported digest of `data`, in `HashAlgorithm::ALL` order
pub fn hash_all(data: &[u8]) -> Vec<Digest> {
    HashAlgorithm::ALL.iter().map(|a| a.digest(data)).collect()
}

/// Stream `reader` through each of `algorithms` in one pass
pub fn hash_reader<R: Read>(mut reader: R, algorithms: &[HashAlgorithm]) -> std::io::Result<Vec<Digest>> {
    let mut hashers: Vec<(HashAlgorithm, Box<dyn DynDigest + Send>)> =
        algorithms.iter().map(|a| (*a, a.hasher())).collect();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let read = match reader.read(&mut buf) {
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if read == 0 {
            break;
        }
        for (_, hasher) in hashers.iter_mut() {
            hasher.update(&buf[..read]);
        }
    }

    Ok(hashers
        .into_iter()
        .map(|(algorithm, hasher)| Digest {
            algorithm,
            bytes: hasher.finalize().into_vec(),
        })
        .collect())
}
