/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! A simple, volatile, in-memory implementation of [`ContentStore`].

use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::types::{
    crypto_primitives::SigningKey,
    data_types::{PublicKeyBytes, Reference},
};

use super::pluggables::{ContentStore, StoreError};

/// An in-memory implementation of [`ContentStore`].
///
/// Clones share the same underlying maps, so a `MemStore` handle can be given to every
/// [`Forum`](crate::forum::Forum) (and test) that should observe the same content.
#[derive(Clone, Default)]
pub struct MemStore(Arc<Mutex<MemStoreInner>>);

#[derive(Default)]
struct MemStoreInner {
    contents: HashMap<Reference, Vec<u8>>,
    roots: HashMap<PublicKeyBytes, Reference>,
}

impl MemStore {
    /// Create a new, empty `MemStore`.
    pub fn new() -> MemStore {
        MemStore::default()
    }

    /// Get the number of distinct objects stored.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.contents.len())
    }

    /// Check whether no objects are stored.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.contents.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemStoreInner>, StoreError> {
        self.0.lock().map_err(|_| {
            StoreError::Io(io::Error::new(
                io::ErrorKind::Other,
                "in-memory content store lock poisoned",
            ))
        })
    }
}

impl ContentStore for MemStore {
    fn get(&self, reference: &Reference) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock()?.contents.get(reference).cloned())
    }

    fn put(&mut self, reference: Reference, content: Vec<u8>) -> Result<(), StoreError> {
        self.lock()?.contents.insert(reference, content);
        Ok(())
    }

    fn root(&self, owner: &PublicKeyBytes) -> Result<Option<Reference>, StoreError> {
        Ok(self.lock()?.roots.get(owner).copied())
    }

    fn publish_root(
        &mut self,
        owner: &PublicKeyBytes,
        secret_key: &SigningKey,
        reference: Reference,
    ) -> Result<(), StoreError> {
        if PublicKeyBytes::from(secret_key.verifying_key()) != *owner {
            return Err(StoreError::Unauthorized { owner: *owner });
        }
        self.lock()?.roots.insert(*owner, reference);
        Ok(())
    }
}
