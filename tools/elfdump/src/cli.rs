//! Command-line interface definitions for elfdump.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use elfpeek::HeaderField;

/// Inspect ELF headers and extract raw sections and segments.
#[derive(Parser)]
#[command(name = "elfdump", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Print records as JSON instead of aligned text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress everything except requested data and errors.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report layout diagnostics and timings.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the file header, or a single field of it.
    Header(HeaderArgs),
    /// Print program headers.
    Phdrs(TableArgs),
    /// Print section headers.
    Shdrs(TableArgs),
    /// List section indices, names and sizes.
    Sections(FileArg),
    /// Extract the raw bytes of a segment.
    Segment(SegmentArgs),
    /// Extract the raw bytes of a named section.
    Section(SectionArgs),
}

/// A lone input file.
#[derive(Args)]
pub struct FileArg {
    /// ELF file to read.
    pub file: PathBuf,
}

/// Arguments for the `header` subcommand.
#[derive(Args)]
pub struct HeaderArgs {
    /// ELF file to read.
    pub file: PathBuf,

    /// Only print this field (e.g. `EI_MACHINE`, case-insensitive).
    #[arg(long, short = 'f')]
    pub field: Option<HeaderField>,
}

/// Arguments for the `phdrs` and `shdrs` subcommands.
#[derive(Args)]
pub struct TableArgs {
    /// ELF file to read.
    pub file: PathBuf,

    /// Only print the entry at this index.
    #[arg(long, short = 'i')]
    pub index: Option<usize>,
}

/// Arguments for the `segment` subcommand.
#[derive(Args)]
pub struct SegmentArgs {
    /// ELF file to read.
    pub file: PathBuf,

    /// Program header index.
    pub index: usize,

    /// Write bytes here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for the `section` subcommand.
#[derive(Args)]
pub struct SectionArgs {
    /// ELF file to read.
    pub file: PathBuf,

    /// Exact section name, e.g. `.text`.
    pub name: String,

    /// Only bytes the section occupies in the file (nothing for `SHT_NOBITS`).
    #[arg(long)]
    pub file_data: bool,

    /// Write bytes here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}
