//! File-backed byte source

use super::ByteSource;
use crate::error::{PdfIoError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

/// Source reading directly from an open file with positioned reads.
///
/// The length is captured once when the source is created. If the file
/// grows or shrinks afterwards the source does not notice; reads past the
/// real end simply return `None`. Not for concurrent use: wrap it in a
/// [`super::SynchronizedSource`] to share it.
#[derive(Debug)]
pub struct FileSource {
    file: Option<File>,
    length: u64,
    // Offset the OS file cursor currently sits at
    file_position: u64,
}

impl FileSource {
    /// Create a source over an open file
    pub fn new(file: File) -> Result<Self> {
        let length = file.metadata()?.len();
        Ok(Self {
            file: Some(file),
            length,
            file_position: 0,
        })
    }

    fn seek_to(&mut self, position: u64) -> Result<&mut File> {
        let file = self.file.as_mut().ok_or(PdfIoError::SourceClosed)?;
        if self.file_position != position {
            file.seek(SeekFrom::Start(position))?;
            self.file_position = position;
        }
        Ok(file)
    }
}

impl ByteSource for FileSource {
    fn get(&mut self, position: u64) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.get_range(position, &mut byte)? {
            Some(1) => Ok(Some(byte[0])),
            _ => Ok(None),
        }
    }

    fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>> {
        if self.file.is_none() {
            return Err(PdfIoError::SourceClosed);
        }
        if position >= self.length {
            return Ok(None);
        }

        let available = (self.length - position).min(dest.len() as u64) as usize;
        let file = self.seek_to(position)?;
        let count = match file.read(&mut dest[..available]) {
            Ok(count) => count,
            Err(e) => {
                // OS cursor is unknown now, force a seek on the next read
                self.file_position = u64::MAX;
                return Err(e.into());
            }
        };
        self.file_position += count as u64;

        if count == 0 && available > 0 {
            // file was truncated after the length was captured
            return Ok(None);
        }
        Ok(Some(count))
    }

    fn length(&self) -> Result<u64> {
        if self.file.is_none() {
            return Err(PdfIoError::SourceClosed);
        }
        Ok(self.length)
    }

    fn close(&mut self) -> Result<()> {
        self.file = None;
        Ok(())
    }
}

/// Take an exclusive advisory lock on `file`, failing if it is held elsewhere.
///
/// The lock is released when the file is closed.
#[cfg(unix)]
pub(crate) fn lock_exclusive(file: &File) -> Result<()> {
    use std::os::unix::io::AsRawFd;

    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result != 0 {
        return Err(PdfIoError::Lock(
            std::io::Error::last_os_error().to_string(),
        ));
    }
    Ok(())
}

#[cfg(windows)]
pub(crate) fn lock_exclusive(file: &File) -> Result<()> {
    use std::os::windows::io::AsRawHandle;
    use winapi::um::fileapi::LockFileEx;
    use winapi::um::minwinbase::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, OVERLAPPED};

    let locked = unsafe {
        let mut overlapped: OVERLAPPED = std::mem::zeroed();
        LockFileEx(
            file.as_raw_handle() as *mut _,
            LOCKFILE_EXCLUSIVE_LOCK | LOCKFILE_FAIL_IMMEDIATELY,
            0,
            u32::MAX,
            u32::MAX,
            &mut overlapped,
        )
    };
    if locked == 0 {
        return Err(PdfIoError::Lock(
            std::io::Error::last_os_error().to_string(),
        ));
    }
    Ok(())
}

#[cfg(not(any(unix, windows)))]
pub(crate) fn lock_exclusive(_file: &File) -> Result<()> {
    tracing::warn!("Exclusive file locking is not available on this platform");
    Ok(())
}
