//! Builds the right source composition for a given input

use super::file::lock_exclusive;
use super::{
    ArraySource, BufferedSource, ByteSource, FileSource, GroupSource, MappedSource,
    SourceHandle, SourceOptions, SynchronizedSource, WindowSource,
};
use crate::error::{PdfIoError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Creates byte sources from arrays, files, streams, URLs and names.
///
/// Whether the returned handles are exclusive or shared is decided by
/// [`SourceOptions::shared`].
///
/// # Example
///
/// ```rust
/// use oxidize_pdf_io::source::{ByteSource, SourceFactory, SourceOptions};
///
/// # fn main() -> oxidize_pdf_io::Result<()> {
/// let factory = SourceFactory::with_options(SourceOptions::default().with_shared(true))
///     .with_resource("fonts/empty.pdf", b"%PDF-1.4\n%%EOF\n");
///
/// let mut source = factory.from_name("fonts/empty.pdf")?;
/// assert!(source.is_shared());
/// assert_eq!(source.get(0)?, Some(b'%'));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceFactory {
    options: SourceOptions,
    resources: HashMap<String, &'static [u8]>,
}

impl SourceFactory {
    /// Create a factory with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory with the given options
    pub fn with_options(options: SourceOptions) -> Self {
        Self {
            options,
            resources: HashMap::new(),
        }
    }

    /// Register an embedded resource that [`from_name`](Self::from_name)
    /// can resolve
    pub fn with_resource(mut self, name: impl Into<String>, data: &'static [u8]) -> Self {
        self.resources.insert(name.into(), data);
        self
    }

    pub fn options(&self) -> &SourceOptions {
        &self.options
    }

    /// Source over an in-memory byte array
    pub fn from_bytes(&self, data: impl Into<Arc<[u8]>>) -> SourceHandle {
        self.handle(ArraySource::new(data))
    }

    /// Source over an already opened file
    pub fn from_file(&self, file: File) -> Result<SourceHandle> {
        let source = self.file_source(file)?;
        Ok(self.handle(source))
    }

    /// Read a stream fully into memory
    pub fn from_reader<R: Read>(&self, mut reader: R) -> Result<SourceHandle> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(self.from_bytes(data))
    }

    /// Open a file on disk, honouring the force-read and locking options
    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<SourceHandle> {
        let path = path.as_ref();
        let file = File::open(path)?;
        if self.options.exclusive_lock {
            lock_exclusive(&file)?;
        }

        if self.options.force_read {
            tracing::debug!("Reading {} fully into memory", path.display());
            return self.from_reader(file);
        }
        self.from_file(file)
    }

    /// Fetch a URL fully into memory.
    ///
    /// `file:` URLs are read from disk. `http://` and `https://` need the
    /// `http` feature.
    pub fn from_url(&self, url: &str) -> Result<SourceHandle> {
        if let Some(path) = file_url_path(url) {
            tracing::debug!("Reading file URL {}", url);
            return self.from_reader(File::open(path)?);
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.fetch(url);
        }
        Err(PdfIoError::UnsupportedUrl(url.to_string()))
    }

    /// Resolve a name as a URL, then as a readable file, then as an
    /// embedded resource
    pub fn from_name(&self, name: &str) -> Result<SourceHandle> {
        if is_url_like(name) {
            return self.from_url(name);
        }
        if Path::new(name).is_file() {
            tracing::debug!("Opening {} from disk", name);
            return self.from_path(name);
        }
        match self.resources.get(name) {
            Some(data) => {
                tracing::debug!("Opening embedded resource {}", name);
                Ok(self.from_bytes(*data))
            }
            None => Err(PdfIoError::ResourceNotFound(name.to_string())),
        }
    }

    /// One contiguous source over several ranges of `source`.
    ///
    /// Each range becomes a window on the shared backing source and the
    /// windows are grouped in the given order.
    pub fn ranged(
        &self,
        source: impl ByteSource + 'static,
        ranges: &[Range<u64>],
    ) -> Result<SourceHandle> {
        let length = source.length()?;
        if let Some(bad) = ranges
            .iter()
            .find(|range| range.start > range.end || range.end > length)
        {
            return Err(PdfIoError::InvalidRange {
                start: bad.start,
                end: bad.end,
                length,
            });
        }

        let backing = SynchronizedSource::new(source);
        let windows = ranges
            .iter()
            .map(|range| {
                Box::new(WindowSource::new(
                    backing.clone(),
                    range.start,
                    range.end - range.start,
                )) as Box<dyn ByteSource>
            })
            .collect();

        Ok(self.handle(GroupSource::new(windows)?))
    }

    fn handle(&self, source: impl ByteSource + 'static) -> SourceHandle {
        if self.options.shared {
            SourceHandle::shared(source)
        } else {
            SourceHandle::exclusive(source)
        }
    }

    fn file_source(&self, file: File) -> Result<Box<dyn ByteSource>> {
        let length = file.metadata()?.len();

        if self.options.memory_mapping && length > 0 && length >= self.options.mmap_threshold {
            tracing::debug!("Memory mapping {} bytes", length);
            return Ok(Box::new(MappedSource::new(&file)?));
        }

        let source = FileSource::new(file)?;
        if self.options.read_ahead {
            Ok(Box::new(BufferedSource::new(source)?))
        } else {
            Ok(Box::new(source))
        }
    }

    #[cfg(feature = "http")]
    fn fetch(&self, url: &str) -> Result<SourceHandle> {
        tracing::debug!("Fetching {}", url);
        let response = ureq::get(url).call().map_err(|e| {
            PdfIoError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("{url}: {e}"),
            ))
        })?;
        self.from_reader(response.into_reader())
    }

    #[cfg(not(feature = "http"))]
    fn fetch(&self, url: &str) -> Result<SourceHandle> {
        Err(PdfIoError::UnsupportedUrl(format!(
            "{url} (built without the http feature)"
        )))
    }
}

fn is_url_like(name: &str) -> bool {
    name.starts_with("file:/") || name.starts_with("http://") || name.starts_with("https://")
}

/// Local path of a `file:` URL
fn file_url_path(url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix("file:")?;
    let rest = match rest.strip_prefix("//") {
        Some(authority_and_path) => {
            // drop an optional host, keep the absolute path
            let slash = authority_and_path.find('/')?;
            &authority_and_path[slash..]
        }
        None => rest,
    };

    #[cfg(windows)]
    let rest = match rest.as_bytes() {
        [b'/', drive, b':', ..] if drive.is_ascii_alphabetic() => &rest[1..],
        _ => rest,
    };

    Some(PathBuf::from(rest))
}
