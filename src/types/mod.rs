//! Types that are used across the verifier, the content store and the pipeline.
//!
//! Definitions that only matter to a single component (e.g., the pipeline's in-memory
//! [`BoardView`](crate::pipeline::BoardView)) live in that component's module instead.

pub mod data_types;

pub mod crypto_primitives;

pub mod objects;

pub mod signed_messages;
