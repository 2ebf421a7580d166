//! In-memory ELF64 image builder for unit tests.

use crate::header::elf::{ELF64_EHDR_SIZE, ELF_MAGIC, ELFCLASS64, ELFDATA2LSB, ET_EXEC};
use crate::sections::{ELF64_SHDR_SIZE, SHT_NULL, SHT_PROGBITS, SHT_STRTAB};
use crate::segments::ELF64_PHDR_SIZE;

struct Segment {
    p_type: u32,
    p_flags: u32,
    p_offset: u64,
    p_vaddr: u64,
    p_filesz: u64,
    p_memsz: u64,
}

struct Section {
    name: String,
    sh_type: u32,
    data: Vec<u8>,
}

/// Builds a well-formed ELF64 LE image.
///
/// Layout: header, program headers, section data (user sections then
/// `.shstrtab`), section header table. Section 0 is always the null section
/// once any section is added.
pub(crate) struct ElfImage {
    entry: u64,
    segments: Vec<Segment>,
    sections: Vec<Section>,
    shstrndx: Option<u16>,
}

impl ElfImage {
    pub(crate) fn new() -> Self {
        Self {
            entry: 0x40_1000,
            segments: Vec::new(),
            sections: Vec::new(),
            shstrndx: None,
        }
    }

    pub(crate) fn entry(mut self, entry: u64) -> Self {
        self.entry = entry;
        self
    }

    pub(crate) fn segment(
        mut self,
        p_type: u32,
        p_flags: u32,
        p_offset: u64,
        p_vaddr: u64,
        p_filesz: u64,
        p_memsz: u64,
    ) -> Self {
        self.segments.push(Segment {
            p_type,
            p_flags,
            p_offset,
            p_vaddr,
            p_filesz,
            p_memsz,
        });
        self
    }

    pub(crate) fn section(mut self, name: &str, data: &[u8]) -> Self {
        self.sections.push(Section {
            name: name.to_string(),
            sh_type: SHT_PROGBITS,
            data: data.to_vec(),
        });
        self
    }

    /// Overrides `e_shstrndx` instead of pointing it at the generated `.shstrtab`.
    pub(crate) fn shstrndx(mut self, index: u16) -> Self {
        self.shstrndx = Some(index);
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let phoff = ELF64_EHDR_SIZE;
        let mut buf = vec![0u8; phoff + self.segments.len() * ELF64_PHDR_SIZE];

        for (i, seg) in self.segments.iter().enumerate() {
            let b = &mut buf[phoff + i * ELF64_PHDR_SIZE..][..ELF64_PHDR_SIZE];
            b[0..4].copy_from_slice(&seg.p_type.to_le_bytes());
            b[4..8].copy_from_slice(&seg.p_flags.to_le_bytes());
            b[8..16].copy_from_slice(&seg.p_offset.to_le_bytes());
            b[16..24].copy_from_slice(&seg.p_vaddr.to_le_bytes());
            b[24..32].copy_from_slice(&seg.p_vaddr.to_le_bytes());
            b[32..40].copy_from_slice(&seg.p_filesz.to_le_bytes());
            b[40..48].copy_from_slice(&seg.p_memsz.to_le_bytes());
            b[48..56].copy_from_slice(&0x1000u64.to_le_bytes());
        }

        // (name offset, type, file offset, size) per section header.
        let mut headers: Vec<(u32, u32, u64, u64)> = Vec::new();
        let (shoff, shnum, shstrndx) = if self.sections.is_empty() {
            (0u64, 0u16, self.shstrndx.unwrap_or(0))
        } else {
            let mut strtab = vec![0u8];
            headers.push((0, SHT_NULL, 0, 0));

            for section in &self.sections {
                let name_off = strtab.len() as u32;
                strtab.extend_from_slice(section.name.as_bytes());
                strtab.push(0);
                let offset = buf.len() as u64;
                buf.extend_from_slice(&section.data);
                headers.push((name_off, section.sh_type, offset, section.data.len() as u64));
            }

            let name_off = strtab.len() as u32;
            strtab.extend_from_slice(b".shstrtab\0");
            let offset = buf.len() as u64;
            buf.extend_from_slice(&strtab);
            headers.push((name_off, SHT_STRTAB, offset, strtab.len() as u64));

            while buf.len() % 8 != 0 {
                buf.push(0);
            }
            let shoff = buf.len() as u64;
            let shstrndx = self.shstrndx.unwrap_or(headers.len() as u16 - 1);
            (shoff, headers.len() as u16, shstrndx)
        };

        for &(name, sh_type, offset, size) in &headers {
            let mut b = [0u8; ELF64_SHDR_SIZE];
            b[0..4].copy_from_slice(&name.to_le_bytes());
            b[4..8].copy_from_slice(&sh_type.to_le_bytes());
            b[24..32].copy_from_slice(&offset.to_le_bytes());
            b[32..40].copy_from_slice(&size.to_le_bytes());
            b[48..56].copy_from_slice(&1u64.to_le_bytes());
            buf.extend_from_slice(&b);
        }

        buf[0..4].copy_from_slice(&ELF_MAGIC);
        buf[4] = ELFCLASS64;
        buf[5] = ELFDATA2LSB;
        buf[6] = 1;
        buf[16..18].copy_from_slice(&ET_EXEC.to_le_bytes());
        // EM_X86_64
        buf[18..20].copy_from_slice(&62u16.to_le_bytes());
        buf[20..24].copy_from_slice(&1u32.to_le_bytes());
        buf[24..32].copy_from_slice(&self.entry.to_le_bytes());
        let phoff = if self.segments.is_empty() { 0 } else { phoff as u64 };
        buf[32..40].copy_from_slice(&phoff.to_le_bytes());
        buf[40..48].copy_from_slice(&shoff.to_le_bytes());
        buf[52..54].copy_from_slice(&(ELF64_EHDR_SIZE as u16).to_le_bytes());
        buf[54..56].copy_from_slice(&(ELF64_PHDR_SIZE as u16).to_le_bytes());
        buf[56..58].copy_from_slice(&(self.segments.len() as u16).to_le_bytes());
        buf[58..60].copy_from_slice(&(ELF64_SHDR_SIZE as u16).to_le_bytes());
        buf[60..62].copy_from_slice(&shnum.to_le_bytes());
        buf[62..64].copy_from_slice(&shstrndx.to_le_bytes());

        buf
    }
}
