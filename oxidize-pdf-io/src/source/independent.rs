//! Wrapper that does not propagate `close`

use super::ByteSource;
use crate::error::Result;

/// Passes every operation through except [`ByteSource::close`], which does
/// nothing.
///
/// Used to hand a source to a consumer that closes what it is given, when
/// the backing storage is shared and must outlive that consumer.
#[derive(Debug, Clone)]
pub struct IndependentSource<S: ByteSource> {
    inner: S,
}

impl<S: ByteSource> IndependentSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteSource> ByteSource for IndependentSource<S> {
    fn get(&mut self, position: u64) -> Result<Option<u8>> {
        self.inner.get(position)
    }

    fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>> {
        self.inner.get_range(position, dest)
    }

    fn length(&self) -> Result<u64> {
        self.inner.length()
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
