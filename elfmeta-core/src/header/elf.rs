use crate::error::{ElfError, Result};
use crate::header::Header;
use byteorder::{ReadBytesExt, LE};
use serde::Serialize;
use std::io::{self, Cursor, Read};

/// `0x7F 'E' 'L' 'F'`
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Size in bytes of the ELF64 file header.
pub const ELF64_EHDR_SIZE: usize = 64;

/// `e_ident[EI_CLASS]` value for 64-bit objects.
pub const ELFCLASS64: u8 = 2;

/// `e_ident[EI_DATA]` value for two's complement little-endian.
pub const ELFDATA2LSB: u8 = 1;

const EI_CLASS: usize = 4;
const EI_DATA: usize = 5;

pub const ET_NONE: u16 = 0;
pub const ET_REL: u16 = 1;
pub const ET_EXEC: u16 = 2;
pub const ET_DYN: u16 = 3;
pub const ET_CORE: u16 = 4;

/// Represents the ELF (Executable and Linkable Format) header for a 64-bit object file.
///
/// This structure corresponds to the standard `Elf64_Ehdr` defined in the ELF specification.
/// It appears at the very beginning of every ELF file and locates every other table.
///
/// Reference: [ELF Specification v1.2](https://refspecs.linuxfoundation.org/elf/elf.pdf)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elf64Ehdr {
    /// ELF identification bytes.
    ///
    /// The first 4 bytes are `0x7F`, `'E'`, `'L'`, `'F'`; the following ones
    /// encode class (32/64-bit), endianness, and version.
    pub e_ident: [u8; 16],

    /// Object file type (`ET_REL`, `ET_EXEC`, `ET_DYN`, `ET_CORE`).
    pub e_type: u16,

    /// Target architecture, e.g. `EM_X86_64` (62) or `EM_AARCH64` (183).
    pub e_machine: u16,

    /// ELF version (usually `EV_CURRENT` = 1).
    pub e_version: u32,

    /// Virtual address where execution starts.
    pub e_entry: u64,

    /// File offset of the program header table.
    pub e_phoff: u64,

    /// File offset of the section header table.
    pub e_shoff: u64,

    /// Processor-specific flags.
    pub e_flags: u32,

    /// Size of this header (64 for ELF64).
    pub e_ehsize: u16,

    /// Size of one entry in the program header table.
    pub e_phentsize: u16,

    /// Number of entries in the program header table.
    pub e_phnum: u16,

    /// Size of one entry in the section header table.
    pub e_shentsize: u16,

    /// Number of entries in the section header table.
    pub e_shnum: u16,

    /// Index of the section header string table.
    ///
    /// This section contains the names of all other sections.
    pub e_shstrndx: u16,
}

impl Elf64Ehdr {
    /// Decodes a header from its raw 64 bytes. Magic is not checked here.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(raw);
        Self::from_reader(&mut cur)
            .map_err(|e| ElfError::from_read(e, "file header", 0, ELF64_EHDR_SIZE as u64))
    }

    fn from_reader<R: Read>(cur: &mut R) -> io::Result<Self> {
        let mut e_ident = [0u8; 16];
        cur.read_exact(&mut e_ident)?;

        Ok(Elf64Ehdr {
            e_ident,
            e_type: cur.read_u16::<LE>()?,
            e_machine: cur.read_u16::<LE>()?,
            e_version: cur.read_u32::<LE>()?,
            e_entry: cur.read_u64::<LE>()?,
            e_phoff: cur.read_u64::<LE>()?,
            e_shoff: cur.read_u64::<LE>()?,
            e_flags: cur.read_u32::<LE>()?,
            e_ehsize: cur.read_u16::<LE>()?,
            e_phentsize: cur.read_u16::<LE>()?,
            e_phnum: cur.read_u16::<LE>()?,
            e_shentsize: cur.read_u16::<LE>()?,
            e_shnum: cur.read_u16::<LE>()?,
            e_shstrndx: cur.read_u16::<LE>()?,
        })
    }

    pub fn class(&self) -> u8 {
        self.e_ident[EI_CLASS]
    }

    pub fn data_encoding(&self) -> u8 {
        self.e_ident[EI_DATA]
    }

    pub fn is_elf64_le(&self) -> bool {
        self.class() == ELFCLASS64 && self.data_encoding() == ELFDATA2LSB
    }

    pub fn file_type(&self) -> &'static str {
        match self.e_type {
            ET_NONE => "NONE",
            ET_REL => "REL",
            ET_EXEC => "EXEC",
            ET_DYN => "DYN",
            ET_CORE => "CORE",
            _ => "UNKNOWN",
        }
    }
}

impl Header for Elf64Ehdr {
    fn entry_point(&self) -> u64 {
        self.e_entry
    }

    fn machine(&self) -> u16 {
        self.e_machine
    }

    fn is_64(&self) -> bool {
        self.class() == ELFCLASS64
    }

    fn format_name(&self) -> &'static str {
        "ELF"
    }

    fn is_executable(&self) -> bool {
        self.e_type == ET_EXEC
    }
}
