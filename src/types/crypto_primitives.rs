/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Cryptographic primitives.
//!
//! The definitions and re-exports in this module provide two categories of cryptographic primitives:
//! 1. **Cryptographic Hashes**: provided by the [`sha2`] crate. Used to compute content-addressed
//!    [`Reference`]s.
//! 2. **Digital Signatures**: provided by the [`ed25519_dalek`] crate. Used to sign posts and to
//!    prove ownership of a board's root pointer.

use rand_core::OsRng;

use super::data_types::{PublicKeyBytes, Reference};

// re-exports below.
pub use sha2::Digest;
pub use sha2::Sha256 as CryptoHasher;

pub use ed25519_dalek::{Signature, SignatureError, Signer, SigningKey, Verifier, VerifyingKey};

/// Compute the SHA256 hash of `bytes` as a [`Reference`].
pub fn hash(bytes: &[u8]) -> Reference {
    let mut hasher = CryptoHasher::new();
    hasher.update(bytes);
    Reference::new(hasher.finalize().into())
}

/// A facade around [`SigningKey`] with getters for the [`public`](Self::public) key associated with
/// the signing key.
///
/// Boards and users are both identified by keypairs. Possessing a board's `Keypair` is the only
/// thing that authorizes mutating the board.
#[derive(Clone)]
pub struct Keypair(SigningKey);

impl Keypair {
    /// Generate a fresh `Keypair` from the operating system's random number generator.
    pub fn generate() -> Keypair {
        Keypair(SigningKey::generate(&mut OsRng))
    }

    /// Deterministically derive a `Keypair` from an arbitrary `seed`.
    ///
    /// The secret key is the SHA256 hash of `seed`, so the same seed always yields the same board or
    /// user identity.
    pub fn from_seed(seed: &[u8]) -> Keypair {
        Keypair(SigningKey::from_bytes(&hash(seed).bytes()))
    }

    /// Get the `VerifyingKey` of this `Keypair`.
    pub fn public(&self) -> VerifyingKey {
        self.0.verifying_key()
    }

    /// Get the serialized public key of this `Keypair`.
    pub fn public_bytes(&self) -> PublicKeyBytes {
        PublicKeyBytes::from(self.0.verifying_key())
    }

    /// Get the `SigningKey` of this `Keypair`.
    pub fn signing_key(&self) -> &SigningKey {
        &self.0
    }
}
