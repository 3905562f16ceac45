//! The ELF handle and the field reader.
//!
//! [`ElfFile`] owns a seekable resource and remembers the byte class and
//! endianness found in the identification bytes. Every read goes through a
//! [`Restore`] guard, so the cursor is back where it was once the read
//! returns, whether it succeeded or not.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use crate::consts::{EI_CLASS, EI_DATA, ELF_MAGIC, ELFCLASS32, ELFDATA2LSB};
use crate::desc::FieldDesc;
use crate::error::{ElfError, Result};

/// Field widths of the two physical layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ByteClass {
    /// `ELFCLASS32`.
    Elf32,
    /// `ELFCLASS64`.
    Elf64,
}

impl ByteClass {
    /// Maps the class byte. Anything other than `ELFCLASS32` reads as 64-bit.
    #[must_use]
    pub fn from_ident(byte: u8) -> Self {
        if byte == ELFCLASS32 { Self::Elf32 } else { Self::Elf64 }
    }

    /// Size of the file header under this class.
    #[must_use]
    pub fn header_size(self) -> u64 {
        match self {
            Self::Elf32 => 52,
            Self::Elf64 => 64,
        }
    }
}

/// Byte order of multi-byte fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Endianness {
    /// `ELFDATA2LSB`.
    Little,
    /// `ELFDATA2MSB`.
    Big,
}

impl Endianness {
    /// Maps the data-encoding byte. Anything other than `ELFDATA2LSB` reads as
    /// big-endian.
    #[must_use]
    pub fn from_ident(byte: u8) -> Self {
        if byte == ELFDATA2LSB { Self::Little } else { Self::Big }
    }

    /// Decodes up to eight bytes as an unsigned integer.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> u64 {
        debug_assert!(bytes.len() <= 8);
        let fold = |acc: u64, &b: &u8| (acc << 8) | u64::from(b);
        match self {
            Self::Little => bytes.iter().rev().fold(0, fold),
            Self::Big => bytes.iter().fold(0, fold),
        }
    }
}

/// Saves the reader position and seeks back to it on drop.
struct Restore<'a, R: Seek> {
    reader: &'a mut R,
    saved: u64,
}

impl<'a, R: Seek> Restore<'a, R> {
    fn new(reader: &'a mut R) -> io::Result<Self> {
        let saved = reader.stream_position()?;
        Ok(Self { reader, saved })
    }
}

impl<R: Seek> Deref for Restore<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.reader
    }
}

impl<R: Seek> DerefMut for Restore<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.reader
    }
}

impl<R: Seek> Drop for Restore<'_, R> {
    fn drop(&mut self) {
        // Reads always seek absolutely, so a failed restore cannot corrupt one.
        let _ = self.reader.seek(SeekFrom::Start(self.saved));
    }
}

/// An open ELF file.
///
/// Byte class and endianness are fixed at construction. The underlying
/// resource is owned exclusively and released when the handle is dropped or
/// [closed](Self::close).
#[derive(Debug)]
pub struct ElfFile<R = File> {
    path: Option<PathBuf>,
    reader: R,
    class: ByteClass,
    endianness: Endianness,
}

impl ElfFile<File> {
    /// Opens the file at `path` and validates its identification bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::Io`] if the file cannot be opened or is too short,
    /// and [`ElfError::InvalidFileFormat`] if it does not start with the ELF
    /// magic. The file is closed before either error is returned.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut elf = Self::from_reader(file)?;
        elf.path = Some(path.to_path_buf());
        Ok(elf)
    }
}

impl<R: Read + Seek> ElfFile<R> {
    /// Wraps an already-open resource and validates its identification bytes.
    ///
    /// The resource is left positioned at the start of the file.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::InvalidFileFormat`] if the first four bytes are not
    /// the ELF magic, and [`ElfError::Io`] if the read fails or the class and
    /// data-encoding bytes are missing. The resource is dropped on error.
    pub fn from_reader(mut reader: R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let mut ident = Vec::with_capacity(EI_DATA + 1);
        (&mut reader).take(EI_DATA as u64 + 1).read_to_end(&mut ident)?;

        if !ident.starts_with(&ELF_MAGIC) {
            ident.truncate(ELF_MAGIC.len());
            return Err(ElfError::InvalidFileFormat {
                expected: ELF_MAGIC,
                found: ident,
            });
        }
        if ident.len() <= EI_DATA {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "identification bytes end before the data encoding",
            )
            .into());
        }

        reader.seek(SeekFrom::Start(0))?;
        Ok(Self {
            path: None,
            reader,
            class: ByteClass::from_ident(ident[EI_CLASS]),
            endianness: Endianness::from_ident(ident[EI_DATA]),
        })
    }

    /// Checks whether `reader` starts with the ELF magic, leaving its position
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns any seek or read error other than a short read.
    pub fn is_elf(reader: &mut R) -> io::Result<bool> {
        let mut guard = Restore::new(reader)?;
        guard.seek(SeekFrom::Start(0))?;
        let mut magic = [0u8; 4];
        match guard.read_exact(&mut magic) {
            Ok(()) => Ok(magic == ELF_MAGIC),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Reads the `width`-byte unsigned integer at absolute `offset`, in the
    /// file's byte order.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::Io`] if fewer than `width` bytes remain.
    ///
    /// # Panics
    ///
    /// Panics if `width` is not between 1 and 8. Widths come from the
    /// descriptor tables, so this is a programming error.
    pub fn read_field(&mut self, offset: u64, width: usize) -> Result<u64> {
        assert!((1..=8).contains(&width), "field width {width} out of range");
        let mut buf = [0u8; 8];
        let mut guard = Restore::new(&mut self.reader)?;
        guard.seek(SeekFrom::Start(offset))?;
        guard.read_exact(&mut buf[..width])?;
        Ok(self.endianness.decode(&buf[..width]))
    }

    /// Reads exactly `len` raw bytes at absolute `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::Io`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let mut guard = Restore::new(&mut self.reader)?;
        guard.seek(SeekFrom::Start(offset))?;
        // Grown as data arrives; `len` comes from the file and may be bogus.
        let mut data = Vec::new();
        (&mut *guard).take(len).read_to_end(&mut data)?;
        if (data.len() as u64) < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "wanted {len} bytes at {offset:#x}, only {} available",
                    data.len()
                ),
            )
            .into());
        }
        Ok(data)
    }

    /// Reads the NUL-terminated UTF-8 string at absolute `offset`.
    pub(crate) fn read_cstr(&mut self, offset: u64) -> Result<String> {
        let mut guard = Restore::new(&mut self.reader)?;
        guard.seek(SeekFrom::Start(offset))?;
        let mut bytes = Vec::new();
        BufReader::new(&mut *guard).read_until(0, &mut bytes)?;
        if bytes.pop() != Some(0) {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("string at {offset:#x} is not NUL-terminated"),
            )
            .into());
        }
        String::from_utf8(bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
    }

    /// Reads the field described by `desc` relative to `base`, or `None` if
    /// the field does not exist under this file's class.
    pub(crate) fn read_desc(&mut self, desc: FieldDesc, base: u64) -> Result<Option<u64>> {
        let Some((offset, width)) = desc.select(self.class) else {
            return Ok(None);
        };
        let offset = base.checked_add(offset).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "field offset overflows")
        })?;
        self.read_field(offset, width).map(Some)
    }
}

/// Absolute offset of entry `index` in a table at `table` with `entsize`-byte
/// entries.
pub(crate) fn entry_offset(table: u64, index: usize, entsize: u64) -> Result<u64> {
    (index as u64)
        .checked_mul(entsize)
        .and_then(|rel| rel.checked_add(table))
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "entry offset overflows").into())
}

impl<R> ElfFile<R> {
    /// Path the file was opened from, if it came from [`ElfFile::open`].
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Byte class read from the identification bytes.
    #[must_use]
    pub fn byte_class(&self) -> ByteClass {
        self.class
    }

    /// Byte order read from the identification bytes.
    #[must_use]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Releases the underlying resource.
    pub fn close(self) {
        drop(self);
    }

    /// Gives the underlying resource back to the caller.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.reader
    }
}
