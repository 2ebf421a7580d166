//! Reads the structural metadata of 64-bit little-endian ELF files: file
//! header, program header table, section header table and section names.

pub mod error;
pub mod header;
pub mod metadata;
pub mod resolve;
pub mod sections;
pub mod segments;
pub mod source;
pub mod strtab;
pub mod tables;
pub mod well_known;

#[cfg(test)]
mod testutil;

pub use error::{ElfError, Result};
pub use header::elf::*;
pub use header::{read_header, Header};
pub use metadata::*;
pub use resolve::find_section_index;
pub use sections::*;
pub use segments::*;
pub use source::ByteSource;
pub use strtab::{extract_string_table, StringTable};
pub use tables::{read_entries, read_table, TableEntry};
pub use well_known::WellKnownSection;

pub type FileHeader = Elf64Ehdr;
pub type ProgramHeaderEntry = Elf64Phdr;
pub type SectionHeaderEntry = Elf64Shdr;
