//! File header parsing.

use std::io::{Read, Seek};

use crate::consts::{EnumTable, MACHINE, OBJECT_TYPE, OS_ABI};
use crate::desc::HeaderField;
use crate::error::Result;
use crate::file::ElfFile;
use crate::value::{FieldValue, Record};

impl HeaderField {
    /// The enumeration table that names this field's values, if any.
    #[must_use]
    pub fn symbols(self) -> Option<&'static EnumTable> {
        match self {
            Self::OsAbi => Some(&OS_ABI),
            Self::ObjectType => Some(&OBJECT_TYPE),
            Self::Machine => Some(&MACHINE),
            _ => None,
        }
    }
}

impl<R: Read + Seek> ElfFile<R> {
    /// Reads the raw integer of a header field.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::Io`](crate::ElfError::Io) if the file is too short.
    pub fn header_value(&mut self, field: HeaderField) -> Result<u64> {
        match self.read_desc(field.desc(), 0)? {
            Some(value) => Ok(value),
            None => unreachable!("header field {field} has no {:?} layout", self.byte_class()),
        }
    }

    /// Reads and decodes a header field.
    ///
    /// OS-ABI, object type and machine come back as [`FieldValue::Enum`];
    /// everything else as [`FieldValue::Int`].
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::Io`](crate::ElfError::Io) if the file is too short.
    pub fn header_field(&mut self, field: HeaderField) -> Result<FieldValue> {
        let value = self.header_value(field)?;
        Ok(match field.symbols() {
            Some(table) => FieldValue::enumerated(value, table),
            None => FieldValue::Int(value),
        })
    }

    /// Reads every header field, in table order.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::Io`](crate::ElfError::Io) if the file is too short.
    pub fn header(&mut self) -> Result<Record<HeaderField>> {
        HeaderField::ALL
            .iter()
            .map(|&field| Ok((field, Some(self.header_field(field)?))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::consts::ELF_MAGIC;
    use crate::file::{ByteClass, Endianness};
    use crate::testutil::{ENTRY, TestElf};

    #[test]
    fn header_matches_fixture_metadata() {
        for fixture in TestElf::all_samples() {
            let mut elf = fixture.open();
            let header = elf.header().expect("valid header");

            let class = match fixture.class {
                ByteClass::Elf32 => 1,
                ByteClass::Elf64 => 2,
            };
            let data = match fixture.endianness {
                Endianness::Little => 1,
                Endianness::Big => 2,
            };
            assert_eq!(header.raw(HeaderField::Class), Some(class));
            assert_eq!(header.raw(HeaderField::Data), Some(data));
            assert_eq!(header.raw(HeaderField::Entry), Some(ENTRY));
            assert_eq!(header.raw(HeaderField::EhSize), Some(fixture.ehsize()));
            assert_eq!(header.raw(HeaderField::PhEntSize), Some(fixture.phentsize()));
            assert_eq!(header.raw(HeaderField::PhOff), Some(fixture.ehsize()));
            assert_eq!(header.raw(HeaderField::PhNum), Some(2));
            assert_eq!(header.raw(HeaderField::ShEntSize), Some(fixture.shentsize()));
            assert_eq!(header.raw(HeaderField::ShNum), Some(6));
            assert_eq!(header.raw(HeaderField::ShStrNdx), Some(5));
            assert_eq!(header.raw(HeaderField::Version), Some(1));
            assert_eq!(header.raw(HeaderField::Pad), Some(0));
        }
    }

    #[test]
    fn magic_decodes_in_file_order() {
        let mut little = TestElf::sample64().open();
        let mut big = TestElf::sample(ByteClass::Elf64, Endianness::Big).open();
        assert_eq!(
            little.header_value(HeaderField::Magic).unwrap(),
            u64::from(u32::from_le_bytes(ELF_MAGIC))
        );
        assert_eq!(
            big.header_value(HeaderField::Magic).unwrap(),
            u64::from(u32::from_be_bytes(ELF_MAGIC))
        );
    }

    #[test]
    fn symbolic_fields() {
        let mut fixture = TestElf::sample32();
        fixture.osabi = 3;
        fixture.machine = 0x28;
        fixture.e_type = 3;
        let mut elf = fixture.open();

        assert_eq!(
            elf.header_field(HeaderField::OsAbi).unwrap(),
            FieldValue::Enum { value: 3, name: Some("linux") }
        );
        assert_eq!(elf.header_field(HeaderField::Machine).unwrap().symbol(), Some("ARM"));
        assert_eq!(elf.header_field(HeaderField::ObjectType).unwrap().symbol(), Some("ET_DYN"));
        assert_eq!(elf.header_field(HeaderField::Entry).unwrap(), FieldValue::Int(ENTRY));
    }

    #[test]
    fn unknown_machine_has_no_name() {
        let mut fixture = TestElf::sample(ByteClass::Elf64, Endianness::Big);
        fixture.machine = 0x1234;
        let mut elf = fixture.open();
        assert_eq!(
            elf.header_field(HeaderField::Machine).unwrap(),
            FieldValue::Enum { value: 0x1234, name: None }
        );
    }

    #[test]
    fn processor_flags() {
        let mut fixture = TestElf::sample(ByteClass::Elf32, Endianness::Big);
        fixture.flags = 0x0500_0400;
        let mut elf = fixture.open();
        assert_eq!(elf.header_value(HeaderField::Flags).unwrap(), 0x0500_0400);
    }

    #[test]
    fn record_in_table_order() {
        let mut elf = TestElf::sample64().open();
        let header = elf.header().unwrap();
        let fields: Vec<_> = header.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, HeaderField::ALL);
        assert!(header.iter().all(|(_, v)| v.is_some()));
    }

    #[test]
    fn reads_are_idempotent_and_order_independent() {
        for fixture in TestElf::all_samples() {
            let mut elf = fixture.open();
            let baseline = elf.header().unwrap();

            for &field in HeaderField::ALL.iter().rev() {
                let once = elf.header_field(field).unwrap();
                let twice = elf.header_field(field).unwrap();
                assert_eq!(once, twice);
                // Interleave an unrelated read.
                elf.section_header_value(crate::SectionHeaderField::Size, 1).unwrap();
                assert_eq!(Some(&once), baseline.get(field));
            }
        }
    }

    #[test]
    fn truncated_header_is_io_error() {
        let mut bytes = TestElf::sample64().build();
        bytes.truncate(0x20);
        let mut elf = ElfFile::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(elf.header_value(HeaderField::Machine).unwrap(), 0x3e);
        assert!(elf.header_value(HeaderField::ShOff).unwrap_err().is_truncated());
        assert!(elf.header().unwrap_err().is_truncated());
    }
}
