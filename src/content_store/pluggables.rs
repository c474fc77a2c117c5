/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Traits for pluggable content store persistence.

use std::{
    fmt::{self, Display, Formatter},
    io,
};

use crate::types::{
    crypto_primitives::{hash, SigningKey},
    data_types::{PublicKeyBytes, Reference},
    objects::{DecodeError, Object},
};

pub trait ContentStore: Clone + Send + 'static {
    /// Get the raw content stored at `reference`, if any.
    fn get(&self, reference: &Reference) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `content` at `reference`. Callers guarantee that `reference` is the hash of `content`.
    fn put(&mut self, reference: Reference, content: Vec<u8>) -> Result<(), StoreError>;

    /// Get the current root of the board owned by `owner`, if one has been published.
    fn root(&self, owner: &PublicKeyBytes) -> Result<Option<Reference>, StoreError>;

    /// Atomically replace the root of the board owned by `owner` with `reference`.
    ///
    /// Implementations must return [`StoreError::Unauthorized`] if `secret_key` is not the secret key
    /// of `owner`.
    fn publish_root(
        &mut self,
        owner: &PublicKeyBytes,
        secret_key: &SigningKey,
        reference: Reference,
    ) -> Result<(), StoreError>;

    /* ↓↓↓ Typed access ↓↓↓ */

    /// Get the object of type `O` stored at `reference`.
    ///
    /// Returns `Ok(None)` if nothing is stored at `reference`, and an error if something is stored
    /// there but it does not hash to `reference` or is not an `O`.
    fn resolve<O: Object>(&self, reference: &Reference) -> Result<Option<O>, StoreError> {
        let content = match self.get(reference)? {
            Some(content) => content,
            None => return Ok(None),
        };

        let actual = hash(&content);
        if actual != *reference {
            return Err(StoreError::HashMismatch {
                expected: *reference,
                actual,
            });
        }

        O::decode(&content)
            .map(Some)
            .map_err(|source| StoreError::DecodeError {
                reference: *reference,
                source,
            })
    }

    /// Store `object` and return its content-addressed reference.
    ///
    /// Saving an object that is already stored is a no-op that returns the same reference.
    fn save<O: Object>(&mut self, object: &O) -> Result<Reference, StoreError> {
        let content = object.encode()?;
        let reference = hash(&content);
        self.put(reference, content)?;
        Ok(reference)
    }
}

/// Errors that may be encountered when reading from or writing to a [`ContentStore`].
#[derive(Debug)]
pub enum StoreError {
    /// The underlying storage failed to read or write.
    Io(io::Error),

    /// An attempt was made to publish a root without the owner's secret key.
    Unauthorized { owner: PublicKeyBytes },

    /// The content stored at `expected` hashes to `actual`.
    HashMismatch {
        expected: Reference,
        actual: Reference,
    },

    /// The content stored at `reference` is not an encoding of the requested object type.
    DecodeError {
        reference: Reference,
        source: DecodeError,
    },
}

impl From<io::Error> for StoreError {
    fn from(value: io::Error) -> Self {
        StoreError::Io(value)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "content store I/O error: {}", err),
            StoreError::Unauthorized { owner } => {
                write!(f, "secret key does not belong to root owner {}", owner)
            }
            StoreError::HashMismatch { expected, actual } => write!(
                f,
                "content stored at {} hashes to {}",
                expected, actual
            ),
            StoreError::DecodeError { reference, source } => {
                write!(f, "content stored at {} is invalid: {}", reference, source)
            }
        }
    }
}
