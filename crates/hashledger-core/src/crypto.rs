//! Cryptographic primitives for hashledger.
//!
//! Digest algorithms for block hashing, a BLAKE3 keyed MAC, and Ed25519
//! signing. Each is a pure function over bytes and is usable without a chain.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;

use crate::error::CoreError;
use crate::types::Digest;

/// Context string for deriving MAC keys from arbitrary key material.
const MAC_KEY_CONTEXT: &str = "hashledger 2024 keyed mac v1";

/// Anything that can turn bytes into a 256-bit [`Digest`].
pub trait DigestProvider {
    /// Hash `data`. Must be deterministic and pure.
    fn digest(&self, data: &[u8]) -> Digest;
}

/// The 256-bit hash used for block digests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl DigestAlgorithm {
    /// Identifier written into the canonical block encoding.
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Blake3 => 1,
            Self::Sha256 => 2,
        }
    }

    /// Try to parse from the canonical identifier.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Blake3),
            2 => Some(Self::Sha256),
            _ => None,
        }
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Blake3 => "blake3",
            Self::Sha256 => "sha256",
        }
    }
}

impl DigestProvider for DigestAlgorithm {
    fn digest(&self, data: &[u8]) -> Digest {
        match self {
            Self::Blake3 => Digest(*blake3::hash(data).as_bytes()),
            Self::Sha256 => {
                use sha2::Digest as _;
                Digest(Sha256::digest(data).into())
            }
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DigestAlgorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(Self::Blake3),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(CoreError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Compute a keyed MAC over `message`.
///
/// `key` may be any length; it is stretched into a BLAKE3 key with
/// `derive_key`, so short passphrases and raw 32-byte keys both work.
pub fn mac(key: &[u8], message: &[u8]) -> Digest {
    let derived = blake3::derive_key(MAC_KEY_CONTEXT, key);
    Digest(*blake3::keyed_hash(&derived, message).as_bytes())
}

/// Check a MAC tag. Comparison is constant-time.
pub fn verify_mac(key: &[u8], message: &[u8], tag: &Digest) -> bool {
    let derived = blake3::derive_key(MAC_KEY_CONTEXT, key);
    blake3::keyed_hash(&derived, message) == blake3::Hash::from(tag.0)
}

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CoreError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;

        let sig = Signature::from_bytes(&signature.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &self.to_hex()[..16])
    }
}

/// A keypair for signing chain checkpoints.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        let sig = self.signing_key.sign(message);
        Ed25519Signature(sig.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_sign_verify() {
        let keypair = Keypair::generate();
        let message = b"hello world";
        let signature = keypair.sign(message);

        keypair
            .public_key()
            .verify(message, &signature)
            .expect("valid signature should verify");

        assert!(keypair.public_key().verify(b"hello worlD", &signature).is_err());
    }

    #[test]
    fn test_keypair_deterministic_from_seed() {
        let seed = [0x42u8; 32];
        let kp1 = Keypair::from_seed(&seed);
        let kp2 = Keypair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());
    }

    #[test]
    fn test_sha256_known_answer() {
        let d = DigestAlgorithm::Sha256.digest(b"abc");
        assert_eq!(
            d.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_blake3_known_answer() {
        let d = DigestAlgorithm::Blake3.digest(b"");
        assert_eq!(
            d.to_hex(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn test_small_change_flips_digest() {
        for algo in [DigestAlgorithm::Blake3, DigestAlgorithm::Sha256] {
            assert_ne!(algo.digest(b"Hola mundo"), algo.digest(b"Hola mundo!"));
        }
    }

    #[test]
    fn test_algorithm_id_roundtrip() {
        for algo in [DigestAlgorithm::Blake3, DigestAlgorithm::Sha256] {
            assert_eq!(DigestAlgorithm::from_u8(algo.to_u8()), Some(algo));
        }
        assert_eq!(DigestAlgorithm::from_u8(0), None);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("SHA-256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
        assert_eq!("blake3".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Blake3);
        assert!("md5".parse::<DigestAlgorithm>().is_err());
    }

    #[test]
    fn test_mac_verify() {
        let tag = mac(b"secret key", b"important message");
        assert!(verify_mac(b"secret key", b"important message", &tag));
        assert!(!verify_mac(b"other key", b"important message", &tag));
        assert!(!verify_mac(b"secret key", b"important message!", &tag));
    }

    #[test]
    fn test_mac_differs_from_plain_digest() {
        let tag = mac(b"k", b"m");
        assert_ne!(tag, DigestAlgorithm::Blake3.digest(b"m"));
    }
}
