use crate::error::{ElfError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Read-only, seekable access to the bytes of an object file.
///
/// Short reads are always errors. The wrapped handle is closed when the
/// source is dropped.
#[derive(Debug)]
pub struct ByteSource<R> {
    inner: R,
    position: u64,
}

impl ByteSource<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        log::debug!("opened {}", path.as_ref().display());
        Ok(Self::new(file))
    }
}

impl<R: Read + Seek> ByteSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Moves the cursor to an absolute file offset.
    ///
    /// Seeking past the end is allowed; the following read reports the truncation.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.position = self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Reads exactly `len` bytes from the current position.
    ///
    /// `what` names the record being read and ends up in the error.
    pub fn read_exact(&mut self, len: u64, what: &'static str) -> Result<Vec<u8>> {
        let start = self.position;
        // Grow with the data actually present instead of trusting `len`
        // (it comes from the file) for the allocation.
        let mut buf = Vec::new();
        let read = (&mut self.inner)
            .take(len)
            .read_to_end(&mut buf)
            .map_err(|e| ElfError::from_read(e, what, start, len))?;
        self.position += read as u64;

        if (read as u64) < len {
            log::debug!("short read of {what}: wanted {len} bytes at {start:#x}, got {read}");
            return Err(ElfError::TruncatedFile {
                what,
                offset: start,
                needed: len,
            });
        }
        Ok(buf)
    }

    pub fn position(&self) -> u64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn reads_exact_bytes_and_tracks_position() {
        let mut src = ByteSource::new(Cursor::new(b"0123456789".to_vec()));
        src.seek(3).unwrap();
        assert_eq!(src.read_exact(4, "test").unwrap(), b"3456");
        assert_eq!(src.position(), 7);
    }

    #[test]
    fn short_read_is_truncation() {
        let mut src = ByteSource::new(Cursor::new(vec![0u8; 8]));
        src.seek(6).unwrap();
        match src.read_exact(4, "record") {
            Err(ElfError::TruncatedFile {
                what,
                offset,
                needed,
            }) => {
                assert_eq!(what, "record");
                assert_eq!(offset, 6);
                assert_eq!(needed, 4);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn seek_past_end_then_read_is_truncation() {
        let mut src = ByteSource::new(Cursor::new(vec![0u8; 8]));
        src.seek(100).unwrap();
        assert!(matches!(
            src.read_exact(1, "record"),
            Err(ElfError::TruncatedFile { .. })
        ));
    }

    #[test]
    fn zero_length_read_is_empty() {
        let mut src = ByteSource::new(Cursor::new(Vec::new()));
        assert!(src.read_exact(0, "nothing").unwrap().is_empty());
    }

    #[test]
    fn opens_files_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"\x7fELF").unwrap();
        tmp.flush().unwrap();

        let mut src = ByteSource::open(tmp.path()).unwrap();
        assert_eq!(src.read_exact(4, "magic").unwrap(), b"\x7fELF");
    }

    #[test]
    fn missing_file_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = ByteSource::open(dir.path().join("does-not-exist")).unwrap_err();
        assert!(matches!(err, ElfError::IoFailure(_)));
    }
}
