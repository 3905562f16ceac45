//! Section header parsing, section name resolution and section extraction.
//!
//! Section names are not stored in the section headers themselves: `SH_NAME`
//! is an offset into the section named by `EI_SHSTRNDX`, and the name is the
//! NUL-terminated string found there.

use std::io::{self, Read, Seek};

use crate::consts::{SECTION_FLAGS, SECTION_TYPE, SHT_NOBITS};
use crate::desc::{HeaderField, SectionHeaderField, Table};
use crate::error::{ElfError, Result};
use crate::file::{ElfFile, entry_offset};
use crate::value::{FieldValue, Record};

impl<R: Read + Seek> ElfFile<R> {
    /// Number of section header entries (`EI_SHNUM`).
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::Io`] if the file header is truncated.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "EI_SHNUM is a 16-bit field"
    )]
    pub fn section_count(&mut self) -> Result<usize> {
        Ok(self.header_value(HeaderField::ShNum)? as usize)
    }

    /// Bounds-checks `index` and returns the file offset of its entry.
    fn section_header_base(&mut self, index: usize) -> Result<u64> {
        let count = self.header_value(HeaderField::ShNum)?;
        if index as u64 >= count {
            return Err(ElfError::NoSuchIndex {
                table: Table::SectionHeader,
                index,
                count,
            });
        }
        let entsize = self.header_value(HeaderField::ShEntSize)?;
        let shoff = self.header_value(HeaderField::ShOff)?;
        entry_offset(shoff, index, entsize)
    }

    fn section_value_at(&mut self, field: SectionHeaderField, base: u64) -> Result<u64> {
        match self.read_desc(field.desc(), base)? {
            Some(value) => Ok(value),
            None => unreachable!("{field} has no {:?} layout", self.byte_class()),
        }
    }

    fn section_field_at(&mut self, field: SectionHeaderField, base: u64) -> Result<FieldValue> {
        let value = self.section_value_at(field, base)?;
        Ok(match field {
            SectionHeaderField::Type => FieldValue::enumerated(value, &SECTION_TYPE),
            SectionHeaderField::Flags => FieldValue::flags(value, &SECTION_FLAGS),
            SectionHeaderField::Name => FieldValue::Name {
                offset: value,
                name: self.section_string(value)?,
            },
            _ => FieldValue::Int(value),
        })
    }

    /// Reads the string at `offset` in the section name string table.
    fn section_string(&mut self, offset: u64) -> Result<String> {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "EI_SHSTRNDX is a 16-bit field"
        )]
        let strndx = self.header_value(HeaderField::ShStrNdx)? as usize;
        let table = self.section_header_value(SectionHeaderField::Offset, strndx)?;
        let start = table.checked_add(offset).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "section name offset overflows")
        })?;
        self.read_cstr(start)
    }

    /// Reads the raw integer of one field of section header `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSuchIndex`] if `index` is not below `EI_SHNUM`,
    /// and [`ElfError::Io`] on a short read.
    pub fn section_header_value(&mut self, field: SectionHeaderField, index: usize) -> Result<u64> {
        let base = self.section_header_base(index)?;
        self.section_value_at(field, base)
    }

    /// Reads and decodes one field of section header `index`.
    ///
    /// `SH_TYPE` comes back as [`FieldValue::Enum`], `SH_FLAGS` as
    /// [`FieldValue::Flags`] and `SH_NAME` as [`FieldValue::Name`] with the
    /// string resolved through the section name string table.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSuchIndex`] if `index` (or `EI_SHSTRNDX`, when
    /// resolving a name) is not below `EI_SHNUM`, and [`ElfError::Io`] on a
    /// short read or a name that is not valid UTF-8.
    pub fn section_header_field(
        &mut self,
        field: SectionHeaderField,
        index: usize,
    ) -> Result<FieldValue> {
        let base = self.section_header_base(index)?;
        self.section_field_at(field, base)
    }

    /// Reads every field of section header `index`, in table order.
    ///
    /// # Errors
    ///
    /// Same as [`section_header_field`](Self::section_header_field).
    pub fn section_header(&mut self, index: usize) -> Result<Record<SectionHeaderField>> {
        let base = self.section_header_base(index)?;
        SectionHeaderField::ALL
            .iter()
            .map(|&field| Ok((field, Some(self.section_field_at(field, base)?))))
            .collect()
    }

    /// Returns the name of section `index`.
    ///
    /// # Errors
    ///
    /// Same as [`section_header_field`](Self::section_header_field).
    pub fn section_name(&mut self, index: usize) -> Result<String> {
        let offset = self.section_header_value(SectionHeaderField::Name, index)?;
        self.section_string(offset)
    }

    /// Returns every section name, in index order.
    ///
    /// # Errors
    ///
    /// Same as [`section_header_field`](Self::section_header_field).
    pub fn section_names(&mut self) -> Result<Vec<String>> {
        let count = self.section_count()?;
        (0..count).map(|index| self.section_name(index)).collect()
    }

    /// Returns the index of the first section named exactly `name`.
    ///
    /// The empty name is compared like any other, so it matches the first
    /// section whose name is empty (normally the null section).
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSuchName`] if no section matches, or any error
    /// raised while decoding a name along the way.
    pub fn section_index(&mut self, name: &str) -> Result<usize> {
        let count = self.section_count()?;
        for index in 0..count {
            if self.section_name(index)? == name {
                return Ok(index);
            }
        }
        Err(ElfError::NoSuchName(name.to_owned()))
    }

    /// Returns the index of the first section with `SH_TYPE == sh_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::Io`] on a short read.
    pub fn find_section_by_type(&mut self, sh_type: u32) -> Result<Option<usize>> {
        let count = self.section_count()?;
        for index in 0..count {
            if self.section_header_value(SectionHeaderField::Type, index)? == u64::from(sh_type) {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Reads the `SH_SIZE` bytes of section `index` starting at `SH_OFFSET`.
    ///
    /// The header is taken at its word, including for `SHT_NOBITS` sections,
    /// whose bytes are whatever the file holds at that offset. Use
    /// [`section_file_data`](Self::section_file_data) to skip those.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSuchIndex`] if `index` is not below `EI_SHNUM`,
    /// and [`ElfError::Io`] if the file ends before the section does.
    pub fn section_data(&mut self, index: usize) -> Result<Vec<u8>> {
        let base = self.section_header_base(index)?;
        self.section_bytes_at(base)
    }

    /// Like [`section_data`](Self::section_data), but `SHT_NOBITS` sections
    /// occupy no file space and yield an empty vector.
    ///
    /// # Errors
    ///
    /// Same as [`section_data`](Self::section_data).
    pub fn section_file_data(&mut self, index: usize) -> Result<Vec<u8>> {
        let base = self.section_header_base(index)?;
        if self.section_value_at(SectionHeaderField::Type, base)? == u64::from(SHT_NOBITS) {
            return Ok(Vec::new());
        }
        self.section_bytes_at(base)
    }

    fn section_bytes_at(&mut self, base: u64) -> Result<Vec<u8>> {
        let offset = self.section_value_at(SectionHeaderField::Offset, base)?;
        let size = self.section_value_at(SectionHeaderField::Size, base)?;
        self.read_bytes(offset, size)
    }

    /// Reads the contents of the first section named exactly `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSuchName`] if no section matches, and
    /// [`ElfError::Io`] if a name cannot be decoded or the file ends before
    /// the section does.
    pub fn section(&mut self, name: &str) -> Result<Vec<u8>> {
        let index = self.section_index(name)?;
        self.section_data(index)
    }
}
