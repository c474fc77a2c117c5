/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Checks that signed content was signed by the author it declares.
//!
//! The write path calls [`verify`] on every new post before anything is persisted, and the read path
//! calls it on every thread and post it resolves, so that unsigned or mis-signed content is never
//! stored by, or returned from, the pipeline. Verification has no side effects.

use std::fmt::{self, Display, Formatter};

use crate::types::{data_types::PublicKeyBytes, signed_messages::SignedMessage};

/// Verify that `message` carries a signature produced by the key it declares as its signer, over its
/// canonical fields.
pub fn verify<M: SignedMessage>(message: &M) -> Result<(), SignatureError> {
    let author = message.signer();
    let verifying_key = author
        .to_verifying_key()
        .map_err(|_| SignatureError::MalformedAuthorKey { author })?;

    if message.is_correct(&verifying_key) {
        Ok(())
    } else {
        Err(SignatureError::Invalid { author })
    }
}

/// Ways in which [`verify`] can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The declared author key is not a valid Ed25519 public key.
    MalformedAuthorKey { author: PublicKeyBytes },

    /// The signature was not produced by the declared author over the message's canonical fields.
    Invalid { author: PublicKeyBytes },
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::MalformedAuthorKey { author } => {
                write!(f, "author key {} is not a valid public key", author)
            }
            SignatureError::Invalid { author } => {
                write!(f, "signature does not verify against author key {}", author)
            }
        }
    }
}
