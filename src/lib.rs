/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! A Rust implementation of the content transaction pipeline of a replicated bulletin board system.
//!
//! Boards, threads and posts are stored as an immutable, content-addressed object graph. Nothing
//! that has been stored is ever edited: every mutation produces new objects and a new "page"
//! hierarchy, and the board's root pointer is then republished under the board's owning key to
//! expose the new state to readers and peers.
//!
//! ```text
//! root(board key) ──▶ BoardPage ──▶ Board
//!                        │
//!                        ├──▶ ThreadPage ──▶ Thread
//!                        │        └──▶ Post, Post, ...
//!                        └──▶ ThreadPage ──▶ Thread
//! ```
//!
//! ## Crate layout
//!
//! - [`types`]: the object schema, references, keys and signatures.
//! - [`verifier`]: checks that posts are signed by the author they claim.
//! - [`content_store`]: the pluggable content-addressed store the pipeline reads from and writes to,
//!   plus an in-memory implementation.
//! - [`pipeline`]: the read-modify-write stages and the operations composed from them.
//! - [`forum`]: the service type that library users build and invoke operations on.
//! - [`events`] and [`logging`]: observable events emitted by the pipeline and their default loggers.

pub mod types;

pub mod verifier;

pub mod content_store;

pub mod pipeline;

pub mod forum;

pub mod events;

pub mod logging;

pub(crate) mod event_handlers;
