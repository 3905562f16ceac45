//! Program header parsing and raw segment extraction.

use std::io::{Read, Seek};

use crate::consts::SEGMENT_TYPE;
use crate::desc::{HeaderField, ProgramHeaderField, Table};
use crate::error::{ElfError, Result};
use crate::file::{ElfFile, entry_offset};
use crate::value::{FieldValue, Record};

impl<R: Read + Seek> ElfFile<R> {
    /// Number of program header entries (`EI_PHNUM`).
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::Io`] if the file header is truncated.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "EI_PHNUM is a 16-bit field"
    )]
    pub fn program_header_count(&mut self) -> Result<usize> {
        Ok(self.header_value(HeaderField::PhNum)? as usize)
    }

    /// Bounds-checks `index` and returns the file offset of its entry.
    fn program_header_base(&mut self, index: usize) -> Result<u64> {
        let count = self.header_value(HeaderField::PhNum)?;
        if index as u64 >= count {
            return Err(ElfError::NoSuchIndex {
                table: Table::ProgramHeader,
                index,
                count,
            });
        }
        let entsize = self.header_value(HeaderField::PhEntSize)?;
        let phoff = self.header_value(HeaderField::PhOff)?;
        entry_offset(phoff, index, entsize)
    }

    fn program_field_at(&mut self, field: ProgramHeaderField, base: u64) -> Result<Option<FieldValue>> {
        let Some(value) = self.read_desc(field.desc(), base)? else {
            return Ok(None);
        };
        Ok(Some(match field {
            ProgramHeaderField::Type => FieldValue::enumerated(value, &SEGMENT_TYPE),
            _ => FieldValue::Int(value),
        }))
    }

    /// Reads the raw integer of one field of program header `index`.
    ///
    /// Returns `None` for the flags field that does not exist under this
    /// file's byte class.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSuchIndex`] if `index` is not below `EI_PHNUM`,
    /// and [`ElfError::Io`] on a short read.
    pub fn program_header_value(
        &mut self,
        field: ProgramHeaderField,
        index: usize,
    ) -> Result<Option<u64>> {
        let base = self.program_header_base(index)?;
        self.read_desc(field.desc(), base)
    }

    /// Reads and decodes one field of program header `index`.
    ///
    /// `P_TYPE` comes back as [`FieldValue::Enum`]. `P_FLAGS` is `None` for
    /// ELF32 files and `P_FLAGS32` is `None` for ELF64 files.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSuchIndex`] if `index` is not below `EI_PHNUM`,
    /// and [`ElfError::Io`] on a short read.
    pub fn program_header_field(
        &mut self,
        field: ProgramHeaderField,
        index: usize,
    ) -> Result<Option<FieldValue>> {
        let base = self.program_header_base(index)?;
        self.program_field_at(field, base)
    }

    /// Reads every field of program header `index`, in table order.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSuchIndex`] if `index` is not below `EI_PHNUM`,
    /// and [`ElfError::Io`] on a short read.
    pub fn program_header(&mut self, index: usize) -> Result<Record<ProgramHeaderField>> {
        let base = self.program_header_base(index)?;
        ProgramHeaderField::ALL
            .iter()
            .map(|&field| Ok((field, self.program_field_at(field, base)?)))
            .collect()
    }

    /// Reads the `P_FILESZ` bytes of segment `index` starting at `P_OFFSET`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSuchIndex`] if `index` is not below `EI_PHNUM`,
    /// and [`ElfError::Io`] if the file ends before the segment does.
    pub fn raw_segment(&mut self, index: usize) -> Result<Vec<u8>> {
        let base = self.program_header_base(index)?;
        let offset = self.read_present(ProgramHeaderField::Offset, base)?;
        let filesz = self.read_present(ProgramHeaderField::FileSz, base)?;
        self.read_bytes(offset, filesz)
    }

    /// Reads a program header field that exists in both layouts.
    fn read_present(&mut self, field: ProgramHeaderField, base: u64) -> Result<u64> {
        match self.read_desc(field.desc(), base)? {
            Some(value) => Ok(value),
            None => unreachable!("{field} has no {:?} layout", self.byte_class()),
        }
    }
}
