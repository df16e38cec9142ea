//! # Local Filesystem Target

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::errors::{TargetError, TargetResult};
use super::PageTarget;
use crate::page::{PageBuffer, PAGE_SIZE};

/// Page access on the local filesystem.
///
/// Every call opens its own handle and drops it before returning.
#[derive(Debug, Clone)]
pub struct LocalTarget {
    sync_writes: bool,
}

impl LocalTarget {
    /// Create a local target; `sync_writes` fsyncs after every write.
    pub fn new(sync_writes: bool) -> Self {
        Self { sync_writes }
    }

    fn finish_write(&self, file: &File) -> io::Result<()> {
        if self.sync_writes {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl Default for LocalTarget {
    fn default() -> Self {
        Self::new(true)
    }
}

fn byte_offset(offset_in_pages: u64) -> u64 {
    offset_in_pages * PAGE_SIZE as u64
}

impl PageTarget for LocalTarget {
    // A file that ends before the page reads zero bytes, the same empty page
    // as a missing file. This is not a fault: zero bytes decode as the empty
    // header. Only a partial page is rejected, by the decoder.
    fn read_range(&self, path: &str, offset_in_pages: u64) -> TargetResult<PageBuffer> {
        let mut file = match File::open(Path::new(path)) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TargetError::read(path, e)),
        };

        file.seek(SeekFrom::Start(byte_offset(offset_in_pages)))
            .map_err(|e| TargetError::read(path, e))?;

        let mut buffer = Vec::with_capacity(PAGE_SIZE);
        file.take(PAGE_SIZE as u64)
            .read_to_end(&mut buffer)
            .map_err(|e| TargetError::read(path, e))?;

        Ok(buffer)
    }

    fn write_range(&self, path: &str, offset_in_pages: u64, buffer: &[u8]) -> TargetResult<()> {
        // No create, no truncate: only the addressed byte range changes.
        let mut file = OpenOptions::new()
            .write(true)
            .open(Path::new(path))
            .map_err(|e| TargetError::write(path, e))?;

        file.seek(SeekFrom::Start(byte_offset(offset_in_pages)))
            .map_err(|e| TargetError::write(path, e))?;
        file.write_all(buffer)
            .map_err(|e| TargetError::write(path, e))?;
        self.finish_write(&file)
            .map_err(|e| TargetError::write(path, e))
    }

    fn write_file(&self, path: &str, buffer: &[u8]) -> TargetResult<()> {
        let mut file = File::create(Path::new(path)).map_err(|e| TargetError::write(path, e))?;
        file.write_all(buffer)
            .map_err(|e| TargetError::write(path, e))?;
        self.finish_write(&file)
            .map_err(|e| TargetError::write(path, e))
    }
}
