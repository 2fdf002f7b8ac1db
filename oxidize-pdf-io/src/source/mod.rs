//! Position-addressed byte sources
//!
//! A [`ByteSource`] is a read-only range of bytes with a known length that is
//! accessed by absolute position. It has no cursor of its own; stateful
//! reading is done by [`crate::cursor::SourceCursor`].
//!
//! Sources compose: a [`WindowSource`] re-addresses a sub-range of another
//! source, a [`GroupSource`] concatenates several sources into one address
//! space, a [`BufferedSource`] adds a read-ahead block, and the
//! [`IndependentSource`] / [`SynchronizedSource`] wrappers control lifecycle
//! and sharing. [`SourceFactory`] picks the right composition for a given
//! input.
//!
//! # Example
//!
//! ```rust
//! use oxidize_pdf_io::source::{ArraySource, ByteSource, GroupSource, WindowSource};
//!
//! # fn main() -> oxidize_pdf_io::Result<()> {
//! let head = WindowSource::new(ArraySource::new(b"%PDF-1.7 junk".to_vec()), 0, 8);
//! let tail = ArraySource::new(b"\n%%EOF".to_vec());
//! let mut group = GroupSource::new(vec![Box::new(head), Box::new(tail)])?;
//!
//! let mut out = [0u8; 14];
//! assert_eq!(group.get_range(0, &mut out)?, Some(14));
//! assert_eq!(&out, b"%PDF-1.7\n%%EOF");
//! assert_eq!(group.get(14)?, None);
//! # Ok(())
//! # }
//! ```

use crate::error::Result;

pub mod array;
pub mod buffered;
pub mod factory;
pub mod file;
pub mod group;
pub mod independent;
pub mod mapped;
pub mod options;
pub mod synchronized;
pub mod window;

pub use array::ArraySource;
pub use buffered::BufferedSource;
pub use factory::SourceFactory;
pub use file::FileSource;
pub use group::GroupSource;
pub use independent::IndependentSource;
pub use mapped::MappedSource;
pub use options::SourceOptions;
pub use synchronized::SynchronizedSource;
pub use window::WindowSource;

/// Stateless, position-addressed read access to a range of bytes.
///
/// `None` is the end-of-data sentinel: a read at or beyond [`length`]
/// returns `Ok(None)` and never an error. Reads after [`close`] fail with
/// [`crate::PdfIoError::SourceClosed`].
///
/// [`length`]: ByteSource::length
/// [`close`]: ByteSource::close
pub trait ByteSource: Send {
    /// Byte at `position`, or `None` past the end
    fn get(&mut self, position: u64) -> Result<Option<u8>>;

    /// Copy bytes starting at `position` into `dest`.
    ///
    /// Returns the number of bytes copied, which may be less than
    /// `dest.len()`, or `None` when `position` is past the end.
    fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>>;

    /// Total number of addressable bytes
    fn length(&self) -> Result<u64>;

    /// Release backing resources. Closing twice is not an error.
    fn close(&mut self) -> Result<()>;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn get(&mut self, position: u64) -> Result<Option<u8>> {
        (**self).get(position)
    }

    fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>> {
        (**self).get_range(position, dest)
    }

    fn length(&self) -> Result<u64> {
        (**self).length()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// A source as held by a cursor: owned exclusively, shared behind a lock,
/// or a non-closing view of such a shared source.
///
/// The choice is made when the handle is built; an exclusive handle is never
/// upgraded behind the caller's back. Shared handles and views can both
/// spawn further views.
pub enum SourceHandle {
    Exclusive(Box<dyn ByteSource>),
    Shared(SynchronizedSource),
    View(IndependentSource<SynchronizedSource>),
}

impl SourceHandle {
    /// Wrap a source for exclusive use
    pub fn exclusive(source: impl ByteSource + 'static) -> Self {
        SourceHandle::Exclusive(Box::new(source))
    }

    /// Wrap a source for shared, synchronized use
    pub fn shared(source: impl ByteSource + 'static) -> Self {
        SourceHandle::Shared(SynchronizedSource::new(source))
    }

    /// Check if views can be created from this handle
    pub fn is_shared(&self) -> bool {
        !matches!(self, SourceHandle::Exclusive(_))
    }

    /// Convert into a synchronized source, wrapping an exclusive one.
    ///
    /// A view stays non-closing: it is wrapped rather than unwrapped.
    pub fn into_shared(self) -> SynchronizedSource {
        match self {
            SourceHandle::Exclusive(source) => SynchronizedSource::from_boxed(source),
            SourceHandle::Shared(source) => source,
            SourceHandle::View(view) => SynchronizedSource::new(view),
        }
    }

    /// New non-closing handle on the same shared source
    pub fn view(&self) -> Result<IndependentSource<SynchronizedSource>> {
        match self {
            SourceHandle::Shared(source) => Ok(source.view()),
            SourceHandle::View(view) => Ok(view.clone()),
            SourceHandle::Exclusive(_) => Err(crate::error::PdfIoError::ExclusiveSource),
        }
    }
}

impl ByteSource for SourceHandle {
    fn get(&mut self, position: u64) -> Result<Option<u8>> {
        match self {
            SourceHandle::Exclusive(source) => source.get(position),
            SourceHandle::Shared(source) => source.get(position),
            SourceHandle::View(source) => source.get(position),
        }
    }

    fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>> {
        match self {
            SourceHandle::Exclusive(source) => source.get_range(position, dest),
            SourceHandle::Shared(source) => source.get_range(position, dest),
            SourceHandle::View(source) => source.get_range(position, dest),
        }
    }

    fn length(&self) -> Result<u64> {
        match self {
            SourceHandle::Exclusive(source) => source.length(),
            SourceHandle::Shared(source) => source.length(),
            SourceHandle::View(source) => source.length(),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self {
            SourceHandle::Exclusive(source) => source.close(),
            SourceHandle::Shared(source) => source.close(),
            SourceHandle::View(source) => source.close(),
        }
    }
}

impl std::fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceHandle::Exclusive(_) => f.write_str("SourceHandle::Exclusive"),
            SourceHandle::Shared(_) => f.write_str("SourceHandle::Shared"),
            SourceHandle::View(_) => f.write_str("SourceHandle::View"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfIoError;

    #[test]
    fn test_exclusive_handle_has_no_view() {
        let handle = SourceHandle::exclusive(ArraySource::new(b"abc".to_vec()));
        assert!(!handle.is_shared());
        assert!(matches!(handle.view(), Err(PdfIoError::ExclusiveSource)));
    }

    #[test]
    fn test_shared_handle_view_reads_same_bytes() {
        let mut handle = SourceHandle::shared(ArraySource::new(b"abc".to_vec()));
        let mut view = handle.view().unwrap();

        assert_eq!(view.get(1).unwrap(), Some(b'b'));
        view.close().unwrap();
        // closing the view leaves the shared source open
        assert_eq!(handle.get(2).unwrap(), Some(b'c'));
    }

    #[test]
    fn test_view_handle_spawns_views_and_never_closes() {
        let shared = SourceHandle::shared(ArraySource::new(b"abc".to_vec()));
        let mut view = SourceHandle::View(shared.view().unwrap());
        assert!(view.is_shared());

        let mut nested = view.view().unwrap();
        assert_eq!(nested.get(0).unwrap(), Some(b'a'));

        view.close().unwrap();
        let mut reshared = view.into_shared();
        reshared.close().unwrap();
        assert_eq!(nested.get(2).unwrap(), Some(b'c'));
    }

    #[test]
    fn test_into_shared_keeps_content() {
        let handle = SourceHandle::exclusive(ArraySource::new(b"xyz".to_vec()));
        let mut shared = handle.into_shared();
        assert_eq!(shared.length().unwrap(), 3);
        assert_eq!(shared.get(0).unwrap(), Some(b'x'));
    }

    #[test]
    fn test_boxed_source_delegates() {
        let mut boxed: Box<dyn ByteSource> = Box::new(ArraySource::new(b"12".to_vec()));
        let mut dest = [0u8; 4];
        assert_eq!(boxed.get_range(0, &mut dest).unwrap(), Some(2));
        assert_eq!(&dest[..2], b"12");
        assert_eq!(boxed.get(2).unwrap(), None);
    }
}
