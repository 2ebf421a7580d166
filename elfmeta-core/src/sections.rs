use crate::error::{ElfError, Result};
use crate::tables::TableEntry;
use byteorder::{ReadBytesExt, LE};
use serde::Serialize;
use std::io::Cursor;

/// Size in bytes of one ELF64 section header.
pub const ELF64_SHDR_SIZE: usize = 64;

pub const SHT_NULL: u32 = 0;
pub const SHT_PROGBITS: u32 = 1;
pub const SHT_SYMTAB: u32 = 2;
pub const SHT_STRTAB: u32 = 3;
pub const SHT_RELA: u32 = 4;
pub const SHT_HASH: u32 = 5;
pub const SHT_DYNAMIC: u32 = 6;
pub const SHT_NOTE: u32 = 7;
/// Occupies no space in the file (`.bss`).
pub const SHT_NOBITS: u32 = 8;
pub const SHT_REL: u32 = 9;
pub const SHT_DYNSYM: u32 = 11;
pub const SHT_INIT_ARRAY: u32 = 14;
pub const SHT_FINI_ARRAY: u32 = 15;
pub const SHT_GNU_HASH: u32 = 0x6fff_fff6;

pub const SHF_WRITE: u64 = 0x1;
pub const SHF_ALLOC: u64 = 0x2;
pub const SHF_EXECINSTR: u64 = 0x4;

/// One entry of the section header table (`Elf64_Shdr`).
///
/// Its position in the table is the section index, the key every other
/// structure (including `e_shstrndx`) uses to refer to it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elf64Shdr {
    /// Offset of this section's name inside the section header string table.
    pub sh_name: u32,
    pub sh_type: u32,
    pub sh_flags: u64,
    /// Virtual address when loaded (0 for non-allocated sections).
    pub sh_addr: u64,
    /// File offset of the section contents.
    pub sh_offset: u64,
    /// Size of the section contents in bytes.
    pub sh_size: u64,
    pub sh_link: u32,
    pub sh_info: u32,
    pub sh_addralign: u64,
    /// Size of each entry for table-like sections, else 0.
    pub sh_entsize: u64,
}

impl Elf64Shdr {
    /// `(file_offset, size)` of the bytes this section occupies in the file.
    ///
    /// `SHT_NOBITS` sections occupy nothing, whatever `sh_size` says.
    pub fn file_range(&self) -> (u64, u64) {
        if self.sh_type == SHT_NOBITS {
            (self.sh_offset, 0)
        } else {
            (self.sh_offset, self.sh_size)
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.sh_type {
            SHT_NULL => "NULL",
            SHT_PROGBITS => "PROGBITS",
            SHT_SYMTAB => "SYMTAB",
            SHT_STRTAB => "STRTAB",
            SHT_RELA => "RELA",
            SHT_HASH => "HASH",
            SHT_DYNAMIC => "DYNAMIC",
            SHT_NOTE => "NOTE",
            SHT_NOBITS => "NOBITS",
            SHT_REL => "REL",
            SHT_DYNSYM => "DYNSYM",
            SHT_INIT_ARRAY => "INIT_ARRAY",
            SHT_FINI_ARRAY => "FINI_ARRAY",
            SHT_GNU_HASH => "GNU_HASH",
            _ => "UNKNOWN",
        }
    }

    /// `W`, `A` and `X` flag letters, `readelf` style.
    pub fn flags_string(&self) -> String {
        let mut s = String::new();
        if self.sh_flags & SHF_WRITE != 0 {
            s.push('W');
        }
        if self.sh_flags & SHF_ALLOC != 0 {
            s.push('A');
        }
        if self.sh_flags & SHF_EXECINSTR != 0 {
            s.push('X');
        }
        s
    }
}

impl TableEntry for Elf64Shdr {
    const RECORD_SIZE: usize = ELF64_SHDR_SIZE;
    const NAME: &'static str = "section header";

    fn decode(raw: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(raw);
        let mut read = || -> std::io::Result<Self> {
            Ok(Elf64Shdr {
                sh_name: cur.read_u32::<LE>()?,
                sh_type: cur.read_u32::<LE>()?,
                sh_flags: cur.read_u64::<LE>()?,
                sh_addr: cur.read_u64::<LE>()?,
                sh_offset: cur.read_u64::<LE>()?,
                sh_size: cur.read_u64::<LE>()?,
                sh_link: cur.read_u32::<LE>()?,
                sh_info: cur.read_u32::<LE>()?,
                sh_addralign: cur.read_u64::<LE>()?,
                sh_entsize: cur.read_u64::<LE>()?,
            })
        };
        read().map_err(|e| ElfError::from_read(e, Self::NAME, 0, Self::RECORD_SIZE as u64))
    }
}
