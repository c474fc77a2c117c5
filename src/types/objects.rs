/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions of the objects stored in the content store, and of their canonical encoding.
//!
//! # Object graph
//!
//! |Object|Represents|Children (by reference)|
//! |---|---|---|
//! |[`Board`]|A board's durable metadata.|—|
//! |[`BoardPage`]|Versioned envelope exposing a board's current state.|[`Board`] (1), [`ThreadPage`] (0..n)|
//! |[`Thread`]|A thread's content: the fields of its opening post plus a provenance link to its board.|—|
//! |[`ThreadPage`]|Versioned envelope exposing a thread's current state.|[`Thread`] (1), [`Post`] (0..n)|
//! |[`Post`]|A signed leaf content unit.|—|
//!
//! Pages exclusively own their children. [`Thread::master_board`] is different: it records which
//! board the thread was created in, and is never followed to decide who may mutate the thread.
//!
//! # Canonical encoding
//!
//! Every object is encoded as a one-byte [`ObjectKind`] tag followed by the Borsh serialization of the
//! object. Borsh has exactly one encoding per value, so the same logical content always yields the
//! same bytes, and hence the same [`Reference`]. The tag keeps objects of different kinds that happen
//! to serialize identically from aliasing.

use std::{
    fmt::{self, Display, Formatter},
    io,
};

use borsh::{BorshDeserialize, BorshSerialize};

use super::{
    crypto_primitives::{hash, Signer, SigningKey},
    data_types::{PublicKeyBytes, Reference, SignatureBytes, Timestamp},
};

/// Domain separator prepended to the bytes a post's signature covers.
pub const POST_SIGNING_DOMAIN: &[u8] = b"bbs_content/post/v1";

/// Discriminates the five object types in the first byte of their canonical encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectKind {
    Board = 0,
    BoardPage = 1,
    Thread = 2,
    ThreadPage = 3,
    Post = 4,
}

impl ObjectKind {
    /// Get the `ObjectKind` identified by `tag`, if any.
    pub fn from_tag(tag: u8) -> Option<ObjectKind> {
        match tag {
            0 => Some(ObjectKind::Board),
            1 => Some(ObjectKind::BoardPage),
            2 => Some(ObjectKind::Thread),
            3 => Some(ObjectKind::ThreadPage),
            4 => Some(ObjectKind::Post),
            _ => None,
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Board => "Board",
            ObjectKind::BoardPage => "BoardPage",
            ObjectKind::Thread => "Thread",
            ObjectKind::ThreadPage => "ThreadPage",
            ObjectKind::Post => "Post",
        };
        f.write_str(name)
    }
}

/// Types that can be stored in, and resolved from, the content store.
pub trait Object: BorshSerialize + BorshDeserialize {
    /// The tag written in front of this type's encoding.
    const KIND: ObjectKind;

    /// Get the canonical encoding of this object.
    fn encode(&self) -> Result<Vec<u8>, io::Error> {
        let mut bytes = vec![Self::KIND as u8];
        self.serialize(&mut bytes)?;
        Ok(bytes)
    }

    /// Decode an object from its canonical encoding, checking that it is of the expected kind.
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (tag, body) = bytes.split_first().ok_or(DecodeError::Empty)?;
        if *tag != Self::KIND as u8 {
            return Err(DecodeError::KindMismatch {
                expected: Self::KIND,
                actual: *tag,
            });
        }
        Self::try_from_slice(body).map_err(DecodeError::Borsh)
    }

    /// Compute the content-addressed reference of this object.
    fn reference(&self) -> Result<Reference, io::Error> {
        Ok(hash(&self.encode()?))
    }
}

/// Ways in which [`Object::decode`] can fail.
#[derive(Debug)]
pub enum DecodeError {
    /// The content is zero bytes long and therefore has no kind tag.
    Empty,

    /// The content's kind tag is not the one the caller expected.
    KindMismatch { expected: ObjectKind, actual: u8 },

    /// The content has the right tag but is not a valid Borsh encoding of the expected type.
    Borsh(io::Error),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "content is empty"),
            DecodeError::KindMismatch { expected, actual } => match ObjectKind::from_tag(*actual) {
                Some(actual) => write!(f, "expected a {}, found a {}", expected, actual),
                None => write!(f, "expected a {}, found unknown tag {}", expected, actual),
            },
            DecodeError::Borsh(err) => write!(f, "malformed content: {}", err),
        }
    }
}

/// A board's durable metadata.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Board {
    pub name: String,
    pub description: String,
    pub created: Timestamp,
    /// Addresses that accept submissions on behalf of this board.
    pub submission_addresses: Vec<String>,
    /// Boards on other nodes that this board mirrors.
    pub external_roots: Vec<ExternalRoot>,
    /// Opaque, application-defined bytes.
    pub meta: Vec<u8>,
}

impl Object for Board {
    const KIND: ObjectKind = ObjectKind::Board;
}

/// A federated board mirror, identified by the public key that owns its root pointer.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ExternalRoot {
    pub id: String,
    pub public_key: PublicKeyBytes,
}

/// Versioned envelope that exposes a board's current state.
///
/// At the moment it is published as the board's root, a `BoardPage` is the sole authoritative view of
/// the board.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BoardPage {
    pub board: Reference,
    /// Live threads, in insertion order.
    pub thread_pages: Vec<Reference>,
    /// The most recently removed [`ThreadPage`]. Only one deletion is remembered; an earlier
    /// tombstone is overwritten by the next deletion.
    pub deleted: Option<Reference>,
}

impl BoardPage {
    /// Create a `BoardPage` for `board` with no threads.
    pub fn new(board: Reference) -> BoardPage {
        BoardPage {
            board,
            thread_pages: Vec::new(),
            deleted: None,
        }
    }
}

impl Object for BoardPage {
    const KIND: ObjectKind = ObjectKind::BoardPage;
}

/// A thread's content.
///
/// A thread carries the fields of its opening post directly, so its title, body, and author
/// signature are verified exactly like a [`Post`]'s.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Thread {
    pub post: Post,
    /// The board this thread was created in. Provenance only.
    pub master_board: Reference,
}

impl Object for Thread {
    const KIND: ObjectKind = ObjectKind::Thread;
}

/// Versioned envelope that exposes a thread's current state.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ThreadPage {
    pub thread: Reference,
    /// Live posts, in insertion order.
    pub posts: Vec<Reference>,
    /// The most recently removed [`Post`]. Single slot, like [`BoardPage::deleted`].
    pub deleted: Option<Reference>,
}

impl ThreadPage {
    /// Create a `ThreadPage` for `thread` with no posts.
    pub fn new(thread: Reference) -> ThreadPage {
        ThreadPage {
            thread,
            posts: Vec::new(),
            deleted: None,
        }
    }
}

impl Object for ThreadPage {
    const KIND: ObjectKind = ObjectKind::ThreadPage;
}

/// A signed leaf content unit.
///
/// The signature covers [`title`](Self::title), [`body`](Self::body), [`created`](Self::created) and
/// [`author`](Self::author). It does not cover itself, nor [`meta`](Self::meta).
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Post {
    pub title: String,
    pub body: String,
    pub created: Timestamp,
    pub author: PublicKeyBytes,
    pub signature: SignatureBytes,
    /// Opaque, application-defined bytes. Not covered by the signature.
    pub meta: Vec<u8>,
}

impl Post {
    /// Create an unsigned `Post`. It must be [`sign`](Self::sign)-ed before it can be stored.
    pub fn new(title: String, body: String, created: Timestamp, author: PublicKeyBytes) -> Post {
        Post {
            title,
            body,
            created,
            author,
            signature: SignatureBytes::empty(),
            meta: Vec::new(),
        }
    }

    /// Get the bytes that the post's signature covers.
    ///
    /// Layout: [`POST_SIGNING_DOMAIN`], then the title and body each as a little-endian `u64` length
    /// followed by their UTF-8 bytes, then `created` as a little-endian `i64`, then the 32 author key
    /// bytes.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(
            POST_SIGNING_DOMAIN.len() + 16 + self.title.len() + self.body.len() + 8 + 32,
        );
        bytes.extend_from_slice(POST_SIGNING_DOMAIN);
        for field in [self.title.as_bytes(), self.body.as_bytes()] {
            bytes.extend_from_slice(&(field.len() as u64).to_le_bytes());
            bytes.extend_from_slice(field);
        }
        bytes.extend_from_slice(&self.created.int().to_le_bytes());
        bytes.extend_from_slice(&self.author.bytes());
        bytes
    }

    /// Sign the post's canonical bytes with `signing_key`, replacing any existing signature.
    ///
    /// This does not check that `signing_key` belongs to [`author`](Self::author). A post signed
    /// with somebody else's key is rejected later by the [verifier](crate::verifier).
    pub fn sign(&mut self, signing_key: &SigningKey) {
        self.signature = SignatureBytes::new(signing_key.sign(&self.canonical_bytes()).to_bytes());
    }
}

impl Object for Post {
    const KIND: ObjectKind = ObjectKind::Post;
}
