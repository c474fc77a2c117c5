/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Objects that carry a signature over part of their own content.

use super::{
    crypto_primitives::{Signature, Verifier, VerifyingKey},
    data_types::{PublicKeyBytes, SignatureBytes},
    objects::{Post, Thread},
};

/// Data types that contain: 1. A message, 2. The public key of whoever claims to have signed it, and
/// 3. A digital signature over said message whose correctness can be verified against that key.
pub trait SignedMessage {
    /// Get the bytes that are passed as input into the signing function to form the signature.
    fn message_bytes(&self) -> Vec<u8>;

    /// Get the signature of the `SignedMessage`.
    fn signature_bytes(&self) -> SignatureBytes;

    /// Get the public key that the `SignedMessage` claims it was signed by.
    fn signer(&self) -> PublicKeyBytes;

    /// Verify that `signature_bytes` is a signature created by `verifying_key` over `message_bytes`.
    fn is_correct(&self, verifying_key: &VerifyingKey) -> bool {
        let signature = Signature::from_bytes(&self.signature_bytes().bytes());
        verifying_key
            .verify(&self.message_bytes(), &signature)
            .is_ok()
    }
}

impl SignedMessage for Post {
    fn message_bytes(&self) -> Vec<u8> {
        self.canonical_bytes()
    }

    fn signature_bytes(&self) -> SignatureBytes {
        self.signature
    }

    fn signer(&self) -> PublicKeyBytes {
        self.author
    }
}

impl SignedMessage for Thread {
    fn message_bytes(&self) -> Vec<u8> {
        self.post.message_bytes()
    }

    fn signature_bytes(&self) -> SignatureBytes {
        self.post.signature_bytes()
    }

    fn signer(&self) -> PublicKeyBytes {
        self.post.signer()
    }
}
