use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use elfmeta_core::{Elf64Shdr, ElfFile, ElfMetadata, Header, WellKnownSection};
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

/// ELF metadata inspector
#[derive(Parser)]
#[command(
    name = "elfmeta",
    about = "Inspect ELF64 headers, segments, sections and section names",
    version,
    author
)]
struct Cli {
    /// Path to binary file
    #[arg(required = true)]
    path: std::path::PathBuf,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show entry point of binary
    Entry,
    /// Show the file header
    Header,
    /// List all program headers
    Segments,
    /// List all sections
    Sections,
    /// Resolve a section name to its index and file range
    Find {
        /// Section name, or a shorthand such as `debuginfo`
        name: String,
        /// Fail if the section does not exist
        #[arg(long)]
        require: bool,
    },
}

#[derive(Tabled)]
struct SegmentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Flags")]
    flags: String,
    #[tabled(rename = "Offset")]
    offset: String,
    #[tabled(rename = "VirtAddr")]
    vaddr: String,
    #[tabled(rename = "FileSiz")]
    filesz: String,
    #[tabled(rename = "MemSiz")]
    memsz: String,
}

#[derive(Tabled)]
struct SectionRow<'a> {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Address")]
    addr: String,
    #[tabled(rename = "Offset")]
    offset: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

#[derive(Serialize)]
struct SectionEntry<'a> {
    index: usize,
    name: &'a str,
    header: &'a Elf64Shdr,
}

#[derive(Serialize)]
struct Lookup<'a> {
    name: &'a str,
    index: Option<usize>,
    offset: Option<u64>,
    size: Option<u64>,
}

/// Maps shorthands like `debuginfo` to `.debug_info`; anything else is taken literally.
fn section_name(arg: &str) -> String {
    arg.parse::<WellKnownSection>()
        .map(|w| w.section_name().to_string())
        .unwrap_or_else(|_| arg.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_header(meta: &ElfMetadata) {
    let h = &meta.header;
    println!("{}", "ELF Header".bold());
    println!("  {:<28} {:02x?}", "Magic:", &h.e_ident[..4]);
    println!("  {:<28} {}", "Format:", h.format_name());
    println!("  {:<28} {}", "64-bit:", h.is_64());
    println!("  {:<28} {}", "Type:", h.file_type());
    println!("  {:<28} {}", "Machine:", h.machine());
    println!("  {:<28} 0x{:x}", "Entry point:", h.entry_point());
    println!("  {:<28} {} (bytes into file)", "Program headers offset:", h.e_phoff);
    println!("  {:<28} {} (bytes into file)", "Section headers offset:", h.e_shoff);
    println!("  {:<28} {}", "Program header count:", h.e_phnum);
    println!("  {:<28} {}", "Section header count:", h.e_shnum);
    println!("  {:<28} {}", "Section name table index:", h.e_shstrndx);
}

fn print_segments(meta: &ElfMetadata) {
    if meta.program_headers.is_empty() {
        println!("No program headers (relocatable object?).");
        return;
    }
    let rows = meta.program_headers.iter().enumerate().map(|(i, ph)| SegmentRow {
        index: i,
        kind: ph.type_name(),
        flags: ph.flags_string(),
        offset: format!("0x{:x}", ph.p_offset),
        vaddr: format!("0x{:x}", ph.p_vaddr),
        filesz: format!("0x{:x}", ph.p_filesz),
        memsz: format!("0x{:x}", ph.p_memsz),
    });
    println!("{}", Table::new(rows).with(Style::sharp()));
}

/// Same rows as the `sections` table, in JSON-friendly form.
fn section_entries(meta: &ElfMetadata) -> Vec<SectionEntry<'_>> {
    meta.sections()
        .map(|(index, name, header)| SectionEntry {
            index,
            name,
            header,
        })
        .collect()
}

fn print_sections(meta: &ElfMetadata) {
    if meta.section_headers.is_empty() {
        println!("No sections found (possibly stripped binary).");
        return;
    }
    let rows = meta.sections().map(|(i, name, sh)| SectionRow {
        index: i,
        name,
        kind: sh.type_name(),
        addr: format!("0x{:x}", sh.sh_addr),
        offset: format!("0x{:x}", sh.sh_offset),
        size: format!("0x{:x}", sh.sh_size),
        flags: sh.flags_string(),
    });
    println!("{}", Table::new(rows).with(Style::sharp()));
}

fn find(meta: &ElfMetadata, arg: &str, require: bool, json: bool) -> Result<()> {
    let name = section_name(arg);
    let index = meta.section_index(&name);
    let bounds = index.and_then(|i| meta.section_bounds(i));

    if json {
        print_json(&Lookup {
            name: &name,
            index,
            offset: bounds.map(|(offset, _)| offset),
            size: bounds.map(|(_, size)| size),
        })?;
    } else {
        match (index, bounds) {
            (Some(i), Some((offset, size))) => println!(
                "{} is section {} (offset 0x{:x}, size 0x{:x})",
                name.green(),
                i,
                offset,
                size
            ),
            _ => println!("{} {}", name.yellow(), "not found".yellow()),
        }
    }

    if index.is_none() {
        log::warn!("section {name} not present");
        if require {
            bail!("required section {name} not found");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let file = ElfFile::open(&cli.path)
        .with_context(|| format!("failed to read ELF metadata from {}", cli.path.display()))?;
    let meta = file.metadata();

    match cli.command {
        Command::Entry => {
            let entry = meta.header.entry_point();
            if cli.json {
                print_json(&serde_json::json!({ "entry": entry }))?;
            } else {
                println!("Entry point: 0x{entry:x}");
            }
        }

        Command::Header => {
            if cli.json {
                print_json(&meta.header)?;
            } else {
                print_header(meta);
            }
        }

        Command::Segments => {
            if cli.json {
                print_json(&meta.program_headers)?;
            } else {
                print_segments(meta);
            }
        }

        Command::Sections => {
            if cli.json {
                print_json(&section_entries(meta))?;
            } else {
                print_sections(meta);
            }
        }

        Command::Find { name, require } => find(meta, &name, require, cli.json)?,
    }

    Ok(())
}
