use crate::error::{ElfError, Result};
use crate::tables::TableEntry;
use byteorder::{ReadBytesExt, LE};
use serde::Serialize;
use std::io::Cursor;

/// Size in bytes of one ELF64 program header.
pub const ELF64_PHDR_SIZE: usize = 56;

pub const PT_NULL: u32 = 0;
pub const PT_LOAD: u32 = 1;
pub const PT_DYNAMIC: u32 = 2;
pub const PT_INTERP: u32 = 3;
pub const PT_NOTE: u32 = 4;
pub const PT_SHLIB: u32 = 5;
pub const PT_PHDR: u32 = 6;
pub const PT_TLS: u32 = 7;
pub const PT_GNU_EH_FRAME: u32 = 0x6474_e550;
pub const PT_GNU_STACK: u32 = 0x6474_e551;
pub const PT_GNU_RELRO: u32 = 0x6474_e552;
pub const PT_GNU_PROPERTY: u32 = 0x6474_e553;

pub const PF_X: u32 = 0x1;
pub const PF_W: u32 = 0x2;
pub const PF_R: u32 = 0x4;

/// One entry of the program header table (`Elf64_Phdr`), describing a segment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elf64Phdr {
    /// Segment type (`PT_LOAD`, `PT_DYNAMIC`, ...).
    pub p_type: u32,
    /// `PF_R` / `PF_W` / `PF_X` permission bits.
    pub p_flags: u32,
    /// File offset of the segment contents.
    pub p_offset: u64,
    pub p_vaddr: u64,
    pub p_paddr: u64,
    /// Bytes of the segment present in the file.
    pub p_filesz: u64,
    /// Bytes of the segment in memory (>= `p_filesz`, rest zero-filled).
    pub p_memsz: u64,
    pub p_align: u64,
}

impl Elf64Phdr {
    pub fn is_load(&self) -> bool {
        self.p_type == PT_LOAD
    }

    pub fn type_name(&self) -> &'static str {
        match self.p_type {
            PT_NULL => "NULL",
            PT_LOAD => "LOAD",
            PT_DYNAMIC => "DYNAMIC",
            PT_INTERP => "INTERP",
            PT_NOTE => "NOTE",
            PT_SHLIB => "SHLIB",
            PT_PHDR => "PHDR",
            PT_TLS => "TLS",
            PT_GNU_EH_FRAME => "GNU_EH_FRAME",
            PT_GNU_STACK => "GNU_STACK",
            PT_GNU_RELRO => "GNU_RELRO",
            PT_GNU_PROPERTY => "GNU_PROPERTY",
            _ => "UNKNOWN",
        }
    }

    /// Renders `p_flags` the way `readelf` does, e.g. `R E`.
    pub fn flags_string(&self) -> String {
        let bit = |mask, c| if self.p_flags & mask != 0 { c } else { ' ' };
        [bit(PF_R, 'R'), bit(PF_W, 'W'), bit(PF_X, 'E')]
            .iter()
            .collect()
    }
}

impl TableEntry for Elf64Phdr {
    const RECORD_SIZE: usize = ELF64_PHDR_SIZE;
    const NAME: &'static str = "program header";

    fn decode(raw: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(raw);
        let mut read = || -> std::io::Result<Self> {
            Ok(Elf64Phdr {
                p_type: cur.read_u32::<LE>()?,
                p_flags: cur.read_u32::<LE>()?,
                p_offset: cur.read_u64::<LE>()?,
                p_vaddr: cur.read_u64::<LE>()?,
                p_paddr: cur.read_u64::<LE>()?,
                p_filesz: cur.read_u64::<LE>()?,
                p_memsz: cur.read_u64::<LE>()?,
                p_align: cur.read_u64::<LE>()?,
            })
        };
        read().map_err(|e| ElfError::from_read(e, Self::NAME, 0, Self::RECORD_SIZE as u64))
    }
}
