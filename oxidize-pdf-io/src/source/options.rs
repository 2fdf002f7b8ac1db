//! Configuration for building byte sources

/// Options controlling how [`super::SourceFactory`] opens its inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// Read on-disk files fully into memory instead of reading on demand
    pub force_read: bool,
    /// Take an exclusive advisory lock on files opened by path
    pub exclusive_lock: bool,
    /// Enable memory mapping for file access
    pub memory_mapping: bool,
    /// Minimum file size (bytes) before memory mapping is used
    pub mmap_threshold: u64,
    /// Wrap file-backed sources in a read-ahead block
    pub read_ahead: bool,
    /// Build shared (synchronized) handles that support views
    pub shared: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            force_read: false,
            exclusive_lock: false,
            memory_mapping: true,
            mmap_threshold: 10 * 1024 * 1024, // 10MB
            read_ahead: true,
            shared: false,
        }
    }
}

impl SourceOptions {
    /// Create options that load every input into memory
    pub fn in_memory() -> Self {
        Self {
            force_read: true,
            memory_mapping: false,
            mmap_threshold: u64::MAX,
            read_ahead: false,
            ..Self::default()
        }
    }

    /// Create options optimized for large PDFs
    pub fn large_file() -> Self {
        Self {
            memory_mapping: true,
            mmap_threshold: 1024 * 1024, // 1MB
            ..Self::default()
        }
    }

    /// Read files fully into memory
    pub fn with_force_read(mut self, enabled: bool) -> Self {
        self.force_read = enabled;
        self
    }

    /// Lock opened files exclusively
    pub fn with_exclusive_lock(mut self, enabled: bool) -> Self {
        self.exclusive_lock = enabled;
        self
    }

    /// Enable memory mapping
    pub fn with_memory_mapping(mut self, enabled: bool) -> Self {
        self.memory_mapping = enabled;
        self
    }

    /// Set the memory mapping threshold
    pub fn with_mmap_threshold(mut self, bytes: u64) -> Self {
        self.mmap_threshold = bytes;
        self
    }

    /// Enable the read-ahead block on file sources
    pub fn with_read_ahead(mut self, enabled: bool) -> Self {
        self.read_ahead = enabled;
        self
    }

    /// Build shared handles
    pub fn with_shared(mut self, enabled: bool) -> Self {
        self.shared = enabled;
        self
    }
}
