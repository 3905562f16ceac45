//! Error type shared by every reading operation.

use std::io;

use crate::desc::Table;

/// Convenience alias used throughout the crate.
pub type Result<T, E = ElfError> = core::result::Result<T, E>;

/// Errors that can occur while reading an ELF file.
#[derive(Debug, thiserror::Error)]
pub enum ElfError {
    /// The file does not start with the ELF magic bytes.
    #[error("invalid file format: expected magic {expected:02x?}, found {found:02x?}")]
    InvalidFileFormat {
        /// The magic sequence every ELF file starts with.
        expected: [u8; 4],
        /// The leading bytes actually read (shorter than four for tiny files).
        found: Vec<u8>,
    },

    /// An underlying seek or read failed, including reads past end of file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An indexed lookup fell outside the table's entry count.
    #[error("no {table} at index {index} (table has {count} entries)")]
    NoSuchIndex {
        /// The table that was indexed.
        table: Table,
        /// The requested index.
        index: usize,
        /// Entry count read from the file header.
        count: u64,
    },

    /// No section carries the requested name.
    #[error("no section named `{0}`")]
    NoSuchName(String),

    /// A field name given as text does not belong to the table.
    #[error("unknown {table} field `{name}`")]
    UnknownField {
        /// The table that was searched.
        table: Table,
        /// The name as given.
        name: String,
    },
}

impl ElfError {
    /// Returns `true` if this error came from a read past the end of the file.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_errors() {
        let errors = [
            ElfError::InvalidFileFormat {
                expected: *b"\x7fELF",
                found: vec![0x4d, 0x5a],
            },
            ElfError::Io(io::Error::from(io::ErrorKind::UnexpectedEof)),
            ElfError::NoSuchIndex {
                table: Table::ProgramHeader,
                index: 3,
                count: 3,
            },
            ElfError::NoSuchName(".nope".into()),
            ElfError::UnknownField {
                table: Table::Header,
                name: "EI_BOGUS".into(),
            },
        ];
        for err in &errors {
            let msg = format!("{err}");
            assert!(!msg.is_empty());
        }
    }

    #[test]
    fn no_such_index_message_names_table() {
        let err = ElfError::NoSuchIndex {
            table: Table::SectionHeader,
            index: 9,
            count: 4,
        };
        assert_eq!(err.to_string(), "no section at index 9 (table has 4 entries)");
    }

    #[test]
    fn truncation_is_detected() {
        let eof = ElfError::Io(io::Error::from(io::ErrorKind::UnexpectedEof));
        let other = ElfError::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(eof.is_truncated());
        assert!(!other.is_truncated());
        assert!(!ElfError::NoSuchName(String::new()).is_truncated());
    }
}
