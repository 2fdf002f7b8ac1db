//! Lock-protected shared source

use super::{ByteSource, IndependentSource};
use crate::error::{PdfIoError, Result};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle on a source where every call runs under one mutex.
///
/// Clones refer to the same underlying source. The lock is held for the
/// duration of a single `get`/`get_range`/`length`/`close` call only.
#[derive(Clone)]
pub struct SynchronizedSource {
    inner: Arc<Mutex<Box<dyn ByteSource>>>,
}

impl SynchronizedSource {
    /// Take ownership of `source` behind a lock
    pub fn new(source: impl ByteSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    /// Take ownership of an already boxed source
    pub fn from_boxed(source: Box<dyn ByteSource>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(source)),
        }
    }

    /// Non-closing handle on the same source
    pub fn view(&self) -> IndependentSource<SynchronizedSource> {
        IndependentSource::new(self.clone())
    }

    /// Number of live handles on the underlying source
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Box<dyn ByteSource>>> {
        self.inner.lock().map_err(|_| PdfIoError::Poisoned)
    }
}

impl ByteSource for SynchronizedSource {
    fn get(&mut self, position: u64) -> Result<Option<u8>> {
        self.lock()?.get(position)
    }

    fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>> {
        self.lock()?.get_range(position, dest)
    }

    fn length(&self) -> Result<u64> {
        self.lock()?.length()
    }

    fn close(&mut self) -> Result<()> {
        self.lock()?.close()
    }
}

impl std::fmt::Debug for SynchronizedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynchronizedSource")
            .field("handles", &self.handle_count())
            .finish()
    }
}
