use crate::error::{ElfError, Result};
use crate::sections::Elf64Shdr;
use crate::source::ByteSource;
use serde::Serialize;
use std::io::{Read, Seek};

/// The section header string table: its raw bytes plus one resolved name per section.
///
/// `names()[i]` is the name of section `i`, taken from that section's own
/// `sh_name` offset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StringTable {
    section_index: Option<usize>,
    #[serde(skip)]
    data: Vec<u8>,
    names: Vec<String>,
}

impl StringTable {
    /// Table for a file without sections.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolves every section's name out of `data`.
    pub fn from_bytes(data: Vec<u8>, section_headers: &[Elf64Shdr]) -> Self {
        let names = section_headers
            .iter()
            .enumerate()
            .map(|(i, sh)| match name_at(&data, sh.sh_name) {
                Some(name) => name,
                None => {
                    log::warn!(
                        "section {i}: name offset {:#x} outside string table of {} bytes",
                        sh.sh_name,
                        data.len()
                    );
                    String::new()
                }
            })
            .collect();

        Self {
            section_index: None,
            data,
            names,
        }
    }

    /// Index of the section this table was read from, if any.
    pub fn section_index(&self) -> Option<usize> {
        self.section_index
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the section at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Looks up the NUL-terminated string at an arbitrary byte offset.
    ///
    /// Returns `None` if the offset is out of bounds or the bytes are not UTF-8.
    pub fn get(&self, offset: u32) -> Option<&str> {
        let start = offset as usize;
        if start >= self.data.len() {
            return None;
        }
        let rest = &self.data[start..];
        let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        std::str::from_utf8(&rest[..end]).ok()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of resolved names (one per section).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Bytes from `offset` up to (excluding) the next NUL, or to the end of the blob.
///
/// An empty blob still gives the conventional empty name at offset 0.
fn name_at(data: &[u8], offset: u32) -> Option<String> {
    let start = offset as usize;
    if start >= data.len() {
        return (start == 0).then(String::new);
    }
    let rest = &data[start..];
    let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
    Some(String::from_utf8_lossy(&rest[..end]).into_owned())
}

/// Loads the string table section at `string_table_index` and names every
/// section in `section_headers` from it.
pub fn extract_string_table<R: Read + Seek>(
    source: &mut ByteSource<R>,
    section_headers: &[Elf64Shdr],
    string_table_index: usize,
) -> Result<StringTable> {
    let shdr = section_headers
        .get(string_table_index)
        .ok_or(ElfError::IndexOutOfRange {
            what: "string table section",
            index: string_table_index as u64,
            len: section_headers.len() as u64,
        })?;

    let (offset, size) = shdr.file_range();
    log::debug!("reading section name string table: {size} bytes at {offset:#x}");
    source.seek(offset)?;
    let data = source.read_exact(size, "section name string table")?;

    let mut table = StringTable::from_bytes(data, section_headers);
    table.section_index = Some(string_table_index);
    Ok(table)
}
