use crate::error::{ElfError, Result};
use crate::header::elf::Elf64Ehdr;
use crate::header::read_header;
use crate::resolve::find_section_index;
use crate::sections::Elf64Shdr;
use crate::segments::Elf64Phdr;
use crate::source::ByteSource;
use crate::strtab::{extract_string_table, StringTable};
use crate::tables::read_entries;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

/// Everything read from an ELF file's headers, owned in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElfMetadata {
    pub header: Elf64Ehdr,
    /// Program headers in on-disk (load) order.
    pub program_headers: Vec<Elf64Phdr>,
    /// Section headers; position is the section index.
    pub section_headers: Vec<Elf64Shdr>,
    /// One name per entry of `section_headers`.
    pub string_table: StringTable,
}

impl ElfMetadata {
    /// Opens `path`, parses it and closes the file again.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(ElfFile::open(path)?.into_metadata())
    }

    /// Parses header, program headers, section headers and section names in one pass.
    pub fn parse<R: Read + Seek>(source: &mut ByteSource<R>) -> Result<Self> {
        source.seek(0)?;
        let header = read_header(source)?;

        let program_headers: Vec<Elf64Phdr> = read_entries(
            source,
            header.e_phoff,
            header.e_phnum.into(),
            header.e_phentsize.into(),
        )?;
        let section_headers: Vec<Elf64Shdr> = read_entries(
            source,
            header.e_shoff,
            header.e_shnum.into(),
            header.e_shentsize.into(),
        )?;

        let string_table = if section_headers.is_empty() {
            log::info!("no section headers; section names unavailable");
            StringTable::empty()
        } else {
            extract_string_table(source, &section_headers, header.e_shstrndx.into())?
        };

        log::info!(
            "parsed ELF: {} program headers, {} sections, names from section {}",
            program_headers.len(),
            section_headers.len(),
            header.e_shstrndx
        );

        Ok(Self {
            header,
            program_headers,
            section_headers,
            string_table,
        })
    }

    pub fn section_index(&self, name: &str) -> Option<usize> {
        find_section_index(&self.string_table, name)
    }

    /// Header of the lowest-index section called `name`.
    pub fn section_by_name(&self, name: &str) -> Option<&Elf64Shdr> {
        self.section_index(name)
            .and_then(|i| self.section_headers.get(i))
    }

    pub fn section_name(&self, index: usize) -> Option<&str> {
        self.string_table.name(index)
    }

    /// `(file_offset, size)` for the section at `index`, for whoever decodes its contents.
    pub fn section_bounds(&self, index: usize) -> Option<(u64, u64)> {
        self.section_headers.get(index).map(Elf64Shdr::file_range)
    }

    /// `(index, name, header)` for every section, in table order.
    pub fn sections(&self) -> impl Iterator<Item = (usize, &str, &Elf64Shdr)> {
        self.section_headers
            .iter()
            .enumerate()
            .map(|(i, sh)| (i, self.string_table.name(i).unwrap_or(""), sh))
    }
}

/// An open ELF file together with its parsed metadata.
///
/// The handle stays open so section contents can be read later; it is
/// closed when this is dropped.
#[derive(Debug)]
pub struct ElfFile<R = File> {
    source: ByteSource<R>,
    metadata: ElfMetadata,
}

impl ElfFile<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = ByteSource::open(&path)?;
        Self::from_source(source)
    }
}

impl<R: Read + Seek> ElfFile<R> {
    pub fn from_source(mut source: ByteSource<R>) -> Result<Self> {
        let metadata = ElfMetadata::parse(&mut source)?;
        Ok(Self {
            source,
            metadata,
        })
    }

    pub fn metadata(&self) -> &ElfMetadata {
        &self.metadata
    }

    /// Drops the file handle, keeping only the parsed tables.
    pub fn into_metadata(self) -> ElfMetadata {
        self.metadata
    }

    /// Raw bytes of the section at `index`. No interpretation is attempted.
    pub fn read_section(&mut self, index: usize) -> Result<Vec<u8>> {
        let (offset, size) =
            self.metadata
                .section_bounds(index)
                .ok_or(ElfError::IndexOutOfRange {
                    what: "section",
                    index: index as u64,
                    len: self.metadata.section_headers.len() as u64,
                })?;
        self.source.seek(offset)?;
        self.source.read_exact(size, "section contents")
    }
}
