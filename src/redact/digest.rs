//! Digest algorithms used for hash redaction

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown hash algorithm '{0}' (expected sha224, sha256, sha384 or sha512)")]
pub struct UnknownAlgorithm(pub String);

/// SHA-2 family digests, rendered as lowercase hex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Hex digest of `text`
    pub fn hex_digest(&self, text: &str) -> String {
        match self {
            HashAlgorithm::Sha224 => format!("{:x}", Sha224::digest(text.as_bytes())),
            HashAlgorithm::Sha256 => format!("{:x}", Sha256::digest(text.as_bytes())),
            HashAlgorithm::Sha384 => format!("{:x}", Sha384::digest(text.as_bytes())),
            HashAlgorithm::Sha512 => format!("{:x}", Sha512::digest(text.as_bytes())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha224" => Ok(HashAlgorithm::Sha224),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}
