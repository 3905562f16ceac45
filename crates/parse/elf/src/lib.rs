//! Descriptor-driven ELF header reader.
//!
//! Reads the file header, program header table and section header table of
//! ELF32 and ELF64 files in either byte order, one field at a time, straight
//! from a seekable file. Nothing is loaded up front: every field read seeks to
//! the field's absolute offset, reads it, and puts the cursor back.
//!
//! Field locations live in static descriptor tables ([`desc`]) that carry the
//! offset and width of each field under both layouts. Symbolic decoding of
//! type, machine, OS-ABI and flag fields goes through the tables in
//! [`consts`].
//!
//! # Usage
//!
//! ```no_run
//! use elfpeek::{ElfFile, HeaderField};
//!
//! fn dump(path: &str) -> elfpeek::Result<()> {
//!     let mut elf = ElfFile::open(path)?;
//!     println!("machine: {}", elf.header_field(HeaderField::Machine)?);
//!     for name in elf.section_names()? {
//!         println!("section {name}");
//!     }
//!     let text = elf.section(".text")?;
//!     println!(".text is {} bytes", text.len());
//!     Ok(())
//! }
//! ```
//!
//! # Limitations
//!
//! Only the magic signature is validated. Entry counts, table offsets and
//! sizes are taken from the file as-is, so a corrupt file produces either an
//! I/O error or well-formed but meaningless values. Callers handling untrusted
//! input must sanity-check counts and sizes themselves.
//!
//! A handle is not synchronized. All reads take `&mut self`; sharing one handle
//! between threads needs an external lock.

#![forbid(unsafe_code)]

pub mod consts;
pub mod desc;
pub mod error;
pub mod file;
pub mod header;
pub mod section;
pub mod segment;
pub mod value;

#[cfg(test)]
pub(crate) mod testutil;

pub use consts::EnumTable;
pub use desc::{Field, FieldDesc, HeaderField, ProgramHeaderField, SectionHeaderField, Table};
pub use error::{ElfError, Result};
pub use file::{ByteClass, ElfFile, Endianness};
pub use value::{FieldValue, Record};
