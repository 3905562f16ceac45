//! Inspect ELF files from the command line.
//!
//! Prints the file header, program headers and section headers as aligned
//! text or JSON, and extracts raw segment and section bytes.

mod cli;
mod output;
mod verbose;

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use elfpeek::consts::{ELFCLASS32, ELFCLASS64, ELFDATA2LSB, ELFDATA2MSB, SHT_NOBITS};
use elfpeek::{ElfFile, HeaderField, Record, SectionHeaderField};

use crate::cli::{Cli, Command, FileArg, HeaderArgs, SectionArgs, SegmentArgs, TableArgs};
use crate::output::{Format, SectionRow};
use crate::verbose::{Timer, dprintln, vprintln};

fn main() -> Result<()> {
    let cli = Cli::parse();
    verbose::init(verbose::Verbosity::from_flags(cli.quiet, cli.verbose));
    let format = if cli.json { Format::Json } else { Format::Text };

    match cli.command {
        Command::Header(ref args) => cmd_header(args, format),
        Command::Phdrs(ref args) => cmd_phdrs(args, format),
        Command::Shdrs(ref args) => cmd_shdrs(args, format),
        Command::Sections(ref args) => cmd_sections(args, format),
        Command::Segment(ref args) => cmd_segment(args),
        Command::Section(ref args) => cmd_section(args),
    }
}

// ===========================================================================
// File access
// ===========================================================================

/// Open `path` and report anything unusual about its identification.
fn open(path: &Path) -> Result<ElfFile> {
    let _t = Timer::start("open");
    let mut elf =
        ElfFile::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    check_layout(&mut elf)?;
    Ok(elf)
}

/// Emit diagnostics for identification bytes the reader had to guess about.
fn check_layout(elf: &mut ElfFile) -> Result<()> {
    let class = elf.header_value(HeaderField::Class)?;
    if class != u64::from(ELFCLASS32) && class != u64::from(ELFCLASS64) {
        vprintln!("EI_CLASS is {class}, reading as {:?}", elf.byte_class());
    }
    let data = elf.header_value(HeaderField::Data)?;
    if data != u64::from(ELFDATA2LSB) && data != u64::from(ELFDATA2MSB) {
        vprintln!("EI_DATA is {data}, reading as {:?}", elf.endianness());
    }

    // The identification bytes are guaranteed; the rest of the header is not.
    let expected = elf.byte_class().header_size();
    match elf.header_value(HeaderField::EhSize) {
        Ok(ehsize) if ehsize != expected => {
            vprintln!(
                "EI_EHSIZE is {ehsize}, expected {expected} for {:?}",
                elf.byte_class()
            );
        }
        Ok(_) => {}
        Err(e) if e.is_truncated() => dprintln!("warning: file header is truncated"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Read entry `index`, or every entry below `count`, tagging each with its index.
fn collect_entries<F>(
    what: &str,
    count: usize,
    index: Option<usize>,
    mut read: impl FnMut(usize) -> elfpeek::Result<Record<F>>,
) -> Result<Vec<(usize, Record<F>)>> {
    let indices: Vec<usize> = match index {
        Some(index) => vec![index],
        None => (0..count).collect(),
    };
    indices
        .into_iter()
        .map(|i| {
            let record = read(i).with_context(|| format!("failed to read {what} {i}"))?;
            Ok((i, record))
        })
        .collect()
}

/// Write raw bytes to `output`, or to stdout.
fn write_bytes(bytes: &[u8], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
            vprintln!("wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("failed to write to stdout")?;
            stdout.flush().context("failed to write to stdout")?;
        }
    }
    Ok(())
}

// ===========================================================================
// Commands
// ===========================================================================

/// Print the file header, or one field of it.
fn cmd_header(args: &HeaderArgs, format: Format) -> Result<()> {
    let mut elf = open(&args.file)?;
    let out = match args.field {
        Some(field) => {
            let value = elf
                .header_field(field)
                .with_context(|| format!("failed to read {field}"))?;
            output::field(field, &value, format)?
        }
        None => {
            let header = elf.header().context("failed to read file header")?;
            output::record(&header, format)?
        }
    };
    print!("{out}");
    Ok(())
}

/// Print program headers.
fn cmd_phdrs(args: &TableArgs, format: Format) -> Result<()> {
    let mut elf = open(&args.file)?;
    let count = elf.program_header_count()?;
    vprintln!("{count} program headers");
    let entries = collect_entries("program header", count, args.index, |i| {
        elf.program_header(i)
    })?;
    print!("{}", output::table("Program header", &entries, format)?);
    Ok(())
}

/// Print section headers.
fn cmd_shdrs(args: &TableArgs, format: Format) -> Result<()> {
    let mut elf = open(&args.file)?;
    let count = elf.section_count()?;
    vprintln!("{count} section headers");
    let entries = collect_entries("section header", count, args.index, |i| {
        elf.section_header(i)
    })?;
    print!("{}", output::table("Section header", &entries, format)?);
    Ok(())
}

/// List every section's index, name, type and size.
fn cmd_sections(args: &FileArg, format: Format) -> Result<()> {
    let mut elf = open(&args.file)?;
    let count = elf.section_count()?;
    let mut rows = Vec::with_capacity(count);
    for index in 0..count {
        let name = elf
            .section_name(index)
            .with_context(|| format!("failed to read name of section {index}"))?;
        let kind = elf.section_header_field(SectionHeaderField::Type, index)?;
        let size = elf.section_header_value(SectionHeaderField::Size, index)?;
        rows.push(SectionRow {
            index,
            name,
            kind,
            size,
        });
    }
    print!("{}", output::sections(&rows, format)?);
    Ok(())
}

/// Extract the raw bytes of a segment.
fn cmd_segment(args: &SegmentArgs) -> Result<()> {
    let mut elf = open(&args.file)?;
    let bytes = {
        let _t = Timer::start("read segment");
        elf.raw_segment(args.index)
            .with_context(|| format!("failed to read segment {}", args.index))?
    };
    write_bytes(&bytes, args.output.as_deref())
}

/// Extract the raw bytes of a named section.
fn cmd_section(args: &SectionArgs) -> Result<()> {
    let mut elf = open(&args.file)?;
    let index = elf.section_index(&args.name)?;
    vprintln!("{} is section {index}", args.name);
    let nobits =
        elf.section_header_value(SectionHeaderField::Type, index)? == u64::from(SHT_NOBITS);
    if nobits && !args.file_data {
        dprintln!(
            "warning: {} is SHT_NOBITS; its SH_SIZE bytes are unrelated file contents",
            args.name
        );
    }
    let bytes = {
        let _t = Timer::start("read section");
        if args.file_data {
            elf.section_file_data(index)
        } else {
            elf.section_data(index)
        }
        .with_context(|| format!("failed to read section {}", args.name))?
    };
    write_bytes(&bytes, args.output.as_deref())
}
