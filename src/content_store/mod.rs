//! The content-addressed store that the pipeline reads objects from and writes objects to.
//!
//! # Pluggable persistence
//!
//! - The real store (and its peer-to-peer replication and subscription machinery) lives outside this
//!   crate.
//! - The pipeline merely requires that whatever the user provides implements the abstract functionality
//!   of a content-addressed get/put store plus one atomic root-pointer register per owning key.
//! - This abstract functionality is made concrete by the [`ContentStore`](pluggables::ContentStore)
//!   trait defined in the `pluggables` module. Its provided methods layer typed, hash-checked
//!   [`resolve`](pluggables::ContentStore::resolve) and [`save`](pluggables::ContentStore::save) on top
//!   of the four raw primitives an implementation supplies.
//! - [`MemStore`](mem_store::MemStore) is a volatile, in-memory implementation, useful for tests and for
//!   nodes that run without a disk.
//!
//! # Root pointers
//!
//! Every board has exactly one root pointer, keyed by the board's public key. Publishing a root
//! requires the matching secret key. Publishing is last-writer-wins: a store is not required to
//! compare the new root against the one it replaces.

pub mod pluggables;

pub mod mem_store;
