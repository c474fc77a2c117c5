//! A [`ContentStore`] that forwards to a [`MemStore`], counts the writes it forwards, and can be
//! made to fail writes.

use std::{
    io,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use bbs_content::{
    content_store::{
        mem_store::MemStore,
        pluggables::{ContentStore, StoreError},
    },
    types::{
        crypto_primitives::SigningKey,
        data_types::{PublicKeyBytes, Reference},
    },
};

/// Clones share the same `MemStore` and the same counters.
#[derive(Clone, Default)]
pub(crate) struct RecordingStore {
    inner: MemStore,
    puts: Arc<AtomicUsize>,
    publishes: Arc<AtomicUsize>,
    fail_puts: Arc<AtomicBool>,
}

impl RecordingStore {
    pub(crate) fn new() -> RecordingStore {
        RecordingStore::default()
    }

    /// Number of `put` calls so far, including ones that stored content that was already present.
    pub(crate) fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Number of successful `publish_root` calls so far.
    pub(crate) fn publishes(&self) -> usize {
        self.publishes.load(Ordering::SeqCst)
    }

    /// Make every subsequent `put` fail with an I/O error (`true`) or succeed again (`false`).
    pub(crate) fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// The underlying store. Writes made through it directly are not counted.
    pub(crate) fn inner(&self) -> &MemStore {
        &self.inner
    }
}

impl ContentStore for RecordingStore {
    fn get(&self, reference: &Reference) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(reference)
    }

    fn put(&mut self, reference: Reference, content: Vec<u8>) -> Result<(), StoreError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::new(io::ErrorKind::Other, "disk full")));
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(reference, content)
    }

    fn root(&self, owner: &PublicKeyBytes) -> Result<Option<Reference>, StoreError> {
        self.inner.root(owner)
    }

    fn publish_root(
        &mut self,
        owner: &PublicKeyBytes,
        secret_key: &SigningKey,
        reference: Reference,
    ) -> Result<(), StoreError> {
        self.inner.publish_root(owner, secret_key, reference)?;
        self.publishes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
