use crate::error::{ElfError, Result};
use crate::source::ByteSource;
use std::io::{Read, Seek};

/// A fixed-size record that appears in a counted table (program or section headers).
pub trait TableEntry: Sized {
    /// Bytes consumed by the decoded fields.
    const RECORD_SIZE: usize;

    /// Name used in logs and errors.
    const NAME: &'static str;

    /// Decodes one record from the start of `raw`.
    fn decode(raw: &[u8]) -> Result<Self>;
}

/// Reads `count` consecutive entries of `entry_size` bytes starting at `offset`.
///
/// A zero count yields an empty table without touching the source. A non-zero
/// count of zero-sized entries is rejected as truncated.
pub fn read_table<R: Read + Seek>(
    source: &mut ByteSource<R>,
    offset: u64,
    count: u64,
    entry_size: u64,
    what: &'static str,
) -> Result<Vec<Vec<u8>>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    if entry_size == 0 {
        return Err(ElfError::TruncatedFile {
            what,
            offset,
            needed: count,
        });
    }

    let total = count
        .checked_mul(entry_size)
        .filter(|total| offset.checked_add(*total).is_some())
        .ok_or(ElfError::TruncatedFile {
            what,
            offset,
            needed: u64::MAX,
        })?;

    log::debug!("reading {what}: {count} x {entry_size} bytes at {offset:#x}");
    source.seek(offset)?;
    let raw = source.read_exact(total, what)?;

    Ok(raw
        .chunks_exact(entry_size as usize)
        .map(<[u8]>::to_vec)
        .collect())
}

/// Reads a table and decodes every entry as `T`, preserving on-disk order.
pub fn read_entries<R: Read + Seek, T: TableEntry>(
    source: &mut ByteSource<R>,
    offset: u64,
    count: u64,
    entry_size: u64,
) -> Result<Vec<T>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    if entry_size < T::RECORD_SIZE as u64 {
        return Err(ElfError::TruncatedFile {
            what: T::NAME,
            offset,
            needed: T::RECORD_SIZE as u64,
        });
    }
    if entry_size > T::RECORD_SIZE as u64 {
        log::warn!(
            "{} entry size {entry_size} exceeds record size {}; ignoring trailing bytes",
            T::NAME,
            T::RECORD_SIZE
        );
    }

    read_table(source, offset, count, entry_size, T::NAME)?
        .iter()
        .map(|raw| T::decode(raw))
        .collect()
}
