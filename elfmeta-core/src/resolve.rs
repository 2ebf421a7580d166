use crate::strtab::StringTable;

/// Index of the first section whose name is exactly `name`.
///
/// Duplicate names resolve to the lowest index. Absence is not an error;
/// callers decide whether a missing section matters.
pub fn find_section_index(string_table: &StringTable, name: &str) -> Option<usize> {
    string_table.names().iter().position(|n| n == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::{Elf64Shdr, SHT_PROGBITS};
    use proptest::prelude::*;

    fn table(names: &[&str]) -> StringTable {
        let mut blob = vec![0u8];
        let mut headers = Vec::new();
        for name in names {
            let sh_name = if name.is_empty() { 0 } else { blob.len() as u32 };
            if !name.is_empty() {
                blob.extend_from_slice(name.as_bytes());
                blob.push(0);
            }
            headers.push(Elf64Shdr {
                sh_name,
                sh_type: SHT_PROGBITS,
                sh_flags: 0,
                sh_addr: 0,
                sh_offset: 0,
                sh_size: 0,
                sh_link: 0,
                sh_info: 0,
                sh_addralign: 0,
                sh_entsize: 0,
            });
        }
        StringTable::from_bytes(blob, &headers)
    }

    #[test]
    fn finds_exact_name() {
        let t = table(&["", ".text", ".debug_info", ".shstrtab"]);
        assert_eq!(find_section_index(&t, ".debug_info"), Some(2));
        assert_eq!(find_section_index(&t, ""), Some(0));
    }

    #[test]
    fn lowest_index_wins_on_duplicates() {
        let t = table(&["", ".a", ".b", ".dup", ".c", ".d", ".e", ".dup"]);
        assert_eq!(find_section_index(&t, ".dup"), Some(3));
    }

    #[test]
    fn no_normalization() {
        let t = table(&["", ".debug_info"]);
        assert_eq!(find_section_index(&t, ".DEBUG_INFO"), None);
        assert_eq!(find_section_index(&t, "debug_info"), None);
        assert_eq!(find_section_index(&t, ".debug_info "), None);
    }

    #[test]
    fn missing_is_none() {
        assert_eq!(find_section_index(&table(&["", ".text"]), ".debug_info"), None);
        assert_eq!(find_section_index(&StringTable::empty(), ".text"), None);
    }

    proptest! {
        #[test]
        fn matches_first_position(
            names in prop::collection::vec("[.a-z_]{1,8}", 0..12),
            probe in "[.a-z_]{1,8}",
        ) {
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let t = table(&refs);
            let expected = names.iter().position(|n| *n == probe);
            prop_assert_eq!(find_section_index(&t, &probe), expected);
            prop_assert_eq!(find_section_index(&t, &probe), find_section_index(&t, &probe));
        }
    }
}
