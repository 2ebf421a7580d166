use std::io;

/// Everything that can go wrong while reading ELF metadata.
///
/// Every variant aborts the parse: a bad header or table invalidates all
/// offsets computed from it, so nothing is recovered partially.
#[derive(thiserror::Error, Debug)]
pub enum ElfError {
    /// The first four bytes are not `0x7F 'E' 'L' 'F'`.
    #[error("not an ELF file (magic {magic:02x?})")]
    NotAnElfFile { magic: [u8; 4] },

    /// Fewer bytes were available than a fixed-size or counted read requires.
    #[error("truncated file: {what} needs {needed} bytes at offset {offset:#x}")]
    TruncatedFile {
        what: &'static str,
        offset: u64,
        needed: u64,
    },

    /// A table index (or an offset into a table) lies outside the table.
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: u64,
        len: u64,
    },

    /// Open/seek/read failure that is not a short read.
    #[error("I/O error: {0}")]
    IoFailure(#[from] io::Error),
}

impl ElfError {
    /// Converts an I/O error from an exact read, turning EOF into truncation.
    pub(crate) fn from_read(err: io::Error, what: &'static str, offset: u64, needed: u64) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            ElfError::TruncatedFile {
                what,
                offset,
                needed,
            }
        } else {
            ElfError::IoFailure(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ElfError>;
