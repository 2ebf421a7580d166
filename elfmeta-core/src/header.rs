pub mod elf;

use crate::error::{ElfError, Result};
use crate::header::elf::{Elf64Ehdr, ELF64_EHDR_SIZE, ELF_MAGIC};
use crate::source::ByteSource;
use std::io::{Read, Seek};

pub trait Header: std::fmt::Debug + Send + Sync {
    /// Returns the virtual address of the entry point.
    fn entry_point(&self) -> u64;

    /// Returns the machine architecture identifier.
    fn machine(&self) -> u16;

    /// Returns true if this is a 64-bit binary.
    fn is_64(&self) -> bool;

    /// Returns a short human-readable name, e.g. "ELF".
    fn format_name(&self) -> &'static str;

    /// Returns true if the binary represents an executable (vs object/lib).
    fn is_executable(&self) -> bool;
}

/// Reads and validates the file header at the source's current position.
///
/// The magic is checked before the rest of the record is read, so a file
/// that merely starts with foreign bytes fails with `NotAnElfFile` even if
/// it is shorter than a full header.
pub fn read_header<R: Read + Seek>(source: &mut ByteSource<R>) -> Result<Elf64Ehdr> {
    let start = source.position();
    let ident = source.read_exact(ELF_MAGIC.len() as u64, "ELF magic")?;
    let mut magic = [0u8; 4];
    magic.copy_from_slice(&ident);
    if magic != ELF_MAGIC {
        log::debug!("bad magic {magic:02x?} at {start:#x}");
        return Err(ElfError::NotAnElfFile { magic });
    }

    let rest = source.read_exact((ELF64_EHDR_SIZE - ELF_MAGIC.len()) as u64, "file header")?;
    let mut raw = Vec::with_capacity(ELF64_EHDR_SIZE);
    raw.extend_from_slice(&ident);
    raw.extend_from_slice(&rest);

    let ehdr = Elf64Ehdr::parse(&raw)?;
    if !ehdr.is_elf64_le() {
        log::warn!(
            "class {} / data encoding {} is not ELF64 little-endian; fields may be garbage",
            ehdr.class(),
            ehdr.data_encoding()
        );
    }
    log::debug!(
        "file header: type {} machine {} entry {:#x} phoff {:#x} x{} shoff {:#x} x{} shstrndx {}",
        ehdr.e_type,
        ehdr.e_machine,
        ehdr.e_entry,
        ehdr.e_phoff,
        ehdr.e_phnum,
        ehdr.e_shoff,
        ehdr.e_shnum,
        ehdr.e_shstrndx
    );
    Ok(ehdr)
}
