/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions of the events emitted by the pipeline, for event handling and logging.
//!
//! An event for a given action indicates that the action has been completed. Events are emitted
//! synchronously, on the caller's thread, in the order their actions complete within an operation.
//!
//! Register handlers for these events with the optional setters of
//! [`ForumSpec`](crate::forum::ForumSpec), or enable the [default loggers](crate::logging) with
//! [`Configuration::log_events`](crate::forum::Configuration::log_events).

use std::time::SystemTime;

use crate::{
    types::{
        data_types::{PublicKeyBytes, Reference},
        objects::ObjectKind,
    },
    verifier::SignatureError,
};

pub enum Event {
    // Events that write to the content store.
    SaveObject(SaveObjectEvent),
    PublishRoot(PublishRootEvent),
    // Completed top-level operations.
    CreateBoard(CreateBoardEvent),
    CreateThread(CreateThreadEvent),
    DeleteThread(DeleteThreadEvent),
    CreatePost(CreatePostEvent),
    DeletePost(DeletePostEvent),
    // Rejected content.
    RejectPost(RejectPostEvent),
}

/// An object was persisted to the content store.
pub struct SaveObjectEvent {
    pub timestamp: SystemTime,
    pub kind: ObjectKind,
    pub reference: Reference,
}

/// A board's root pointer was replaced.
pub struct PublishRootEvent {
    pub timestamp: SystemTime,
    pub board: PublicKeyBytes,
    pub root: Reference,
}

pub struct CreateBoardEvent {
    pub timestamp: SystemTime,
    pub board: PublicKeyBytes,
    pub name: String,
}

pub struct CreateThreadEvent {
    pub timestamp: SystemTime,
    pub board: PublicKeyBytes,
    pub thread: Reference,
    pub title: String,
}

pub struct DeleteThreadEvent {
    pub timestamp: SystemTime,
    pub board: PublicKeyBytes,
    pub thread: Reference,
    /// The removed thread page, now recorded as the board page's tombstone.
    pub thread_page: Reference,
}

pub struct CreatePostEvent {
    pub timestamp: SystemTime,
    pub board: PublicKeyBytes,
    pub thread: Reference,
    pub post: Reference,
}

pub struct DeletePostEvent {
    pub timestamp: SystemTime,
    pub board: PublicKeyBytes,
    pub thread: Reference,
    pub post: Reference,
}

/// A post (or a thread's opening post) failed signature verification, either on the write path or
/// when resolved from the store.
pub struct RejectPostEvent {
    pub timestamp: SystemTime,
    pub board: PublicKeyBytes,
    pub author: PublicKeyBytes,
    pub error: SignatureError,
}
