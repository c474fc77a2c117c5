/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Types that exist only to store bytes, and do not have any major "active" behavior.

use std::{
    fmt::{self, Debug, Display, Formatter},
    time::SystemTime,
};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use borsh::{BorshDeserialize, BorshSerialize};
use ed25519_dalek::{SignatureError, VerifyingKey};

/// 32-byte content-addressed reference to a stored object.
///
/// A `Reference` is the SHA256 hash of an object's [canonical encoding](super::objects::Object::encode).
/// It is only valid if it resolves to content whose hash equals the reference; the
/// [content store](crate::content_store::pluggables::ContentStore::resolve) checks this on every read.
#[derive(Clone, Copy, PartialEq, Eq, Hash, BorshDeserialize, BorshSerialize)]
pub struct Reference([u8; 32]);

impl Reference {
    /// Create a new `Reference` wrapping `bytes`.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the inner `[u8; 32]` value of this `Reference`.
    pub const fn bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl Debug for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Reference({})", self)
    }
}

/// Serialized Ed25519 public key.
///
/// Boards are identified by the public key that owns their root pointer, and posts carry the public
/// key of their author. Ed25519 [`VerifyingKey`]s are not borsh-serializable, so objects store
/// this wrapper instead and convert with [`to_verifying_key`](Self::to_verifying_key) when needed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, BorshDeserialize, BorshSerialize)]
pub struct PublicKeyBytes([u8; 32]);

impl PublicKeyBytes {
    /// Create a new `PublicKeyBytes` wrapping `bytes`.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the inner `[u8; 32]` value of this `PublicKeyBytes`.
    pub const fn bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Decompress into a [`VerifyingKey`]. Fails if the bytes are not a valid curve point.
    pub fn to_verifying_key(&self) -> Result<VerifyingKey, SignatureError> {
        VerifyingKey::from_bytes(&self.0)
    }
}

impl From<&VerifyingKey> for PublicKeyBytes {
    fn from(key: &VerifyingKey) -> Self {
        PublicKeyBytes(key.to_bytes())
    }
}

impl From<VerifyingKey> for PublicKeyBytes {
    fn from(key: VerifyingKey) -> Self {
        PublicKeyBytes(key.to_bytes())
    }
}

impl Display for PublicKeyBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl Debug for PublicKeyBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKeyBytes({})", self)
    }
}

/// Ed25519 digital signature.
#[derive(Clone, Copy, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub struct SignatureBytes([u8; 64]);

impl SignatureBytes {
    /// Create a new `SignatureBytes` wrapping `bytes`.
    pub const fn new(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// A signature of all zeroes. Never verifies against any key.
    pub const fn empty() -> Self {
        Self([0u8; 64])
    }

    /// Get the inner `[u8; 64]` value of this `SignatureBytes`.
    pub const fn bytes(&self) -> [u8; 64] {
        self.0
    }
}

impl Debug for SignatureBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureBytes({})", URL_SAFE_NO_PAD.encode(self.0))
    }
}

/// Wall-clock time in nanoseconds since the Unix Epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, BorshDeserialize, BorshSerialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The current wall-clock time. Clocks set before the Unix Epoch read as 0.
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    /// Get the inner `i64` value of this `Timestamp`.
    pub const fn int(&self) -> i64 {
        self.0
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let nanos = time
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|duration| duration.as_nanos())
            .unwrap_or(0);
        Timestamp(i64::try_from(nanos).unwrap_or(i64::MAX))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
