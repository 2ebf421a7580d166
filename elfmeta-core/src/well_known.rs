use std::fmt;

/// Section names worth having a shorthand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownSection {
    // DWARF
    DebugInfo,    // .debug_info
    DebugAbbrev,  // .debug_abbrev
    DebugLine,    // .debug_line
    DebugStr,     // .debug_str
    DebugRanges,  // .debug_ranges
    DebugAranges, // .debug_aranges
    DebugFrame,   // .debug_frame

    // Unwinding
    EhFrame,    // .eh_frame
    EhFrameHdr, // .eh_frame_hdr

    // Code / data
    Text,   // .text
    Data,   // .data
    Rodata, // .rodata
    Bss,    // .bss

    // Symbols and names
    Symtab,   // .symtab
    Strtab,   // .strtab
    Shstrtab, // .shstrtab
    DynSym,   // .dynsym
    DynStr,   // .dynstr
}

impl WellKnownSection {
    pub const ALL: [WellKnownSection; 18] = [
        WellKnownSection::DebugInfo,
        WellKnownSection::DebugAbbrev,
        WellKnownSection::DebugLine,
        WellKnownSection::DebugStr,
        WellKnownSection::DebugRanges,
        WellKnownSection::DebugAranges,
        WellKnownSection::DebugFrame,
        WellKnownSection::EhFrame,
        WellKnownSection::EhFrameHdr,
        WellKnownSection::Text,
        WellKnownSection::Data,
        WellKnownSection::Rodata,
        WellKnownSection::Bss,
        WellKnownSection::Symtab,
        WellKnownSection::Strtab,
        WellKnownSection::Shstrtab,
        WellKnownSection::DynSym,
        WellKnownSection::DynStr,
    ];

    /// The exact on-disk section name.
    pub fn section_name(&self) -> &'static str {
        match self {
            WellKnownSection::DebugInfo => ".debug_info",
            WellKnownSection::DebugAbbrev => ".debug_abbrev",
            WellKnownSection::DebugLine => ".debug_line",
            WellKnownSection::DebugStr => ".debug_str",
            WellKnownSection::DebugRanges => ".debug_ranges",
            WellKnownSection::DebugAranges => ".debug_aranges",
            WellKnownSection::DebugFrame => ".debug_frame",
            WellKnownSection::EhFrame => ".eh_frame",
            WellKnownSection::EhFrameHdr => ".eh_frame_hdr",
            WellKnownSection::Text => ".text",
            WellKnownSection::Data => ".data",
            WellKnownSection::Rodata => ".rodata",
            WellKnownSection::Bss => ".bss",
            WellKnownSection::Symtab => ".symtab",
            WellKnownSection::Strtab => ".strtab",
            WellKnownSection::Shstrtab => ".shstrtab",
            WellKnownSection::DynSym => ".dynsym",
            WellKnownSection::DynStr => ".dynstr",
        }
    }
}

impl std::str::FromStr for WellKnownSection {
    type Err = String;

    /// Accepts the section name itself or its bare spelling, e.g. `debuginfo`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        let bare = |name: &str| name.trim_start_matches('.').replace('_', "");
        WellKnownSection::ALL
            .iter()
            .copied()
            .find(|w| w.section_name() == wanted || bare(w.section_name()) == wanted)
            .ok_or_else(|| format!("Unknown section: {}", s))
    }
}

impl fmt::Display for WellKnownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.section_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_spellings() {
        assert_eq!(
            ".debug_info".parse::<WellKnownSection>(),
            Ok(WellKnownSection::DebugInfo)
        );
        assert_eq!(
            "debuginfo".parse::<WellKnownSection>(),
            Ok(WellKnownSection::DebugInfo)
        );
        assert_eq!(
            "EhFrameHdr".parse::<WellKnownSection>(),
            Ok(WellKnownSection::EhFrameHdr)
        );
        assert!(".debug_loclists".parse::<WellKnownSection>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for w in WellKnownSection::ALL {
            assert_eq!(w.to_string().parse::<WellKnownSection>(), Ok(w));
        }
    }
}
