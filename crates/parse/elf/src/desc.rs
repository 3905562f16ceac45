//! Field descriptor tables for the file header, program header and section
//! header.
//!
//! Every field is described once with its offset and width under both the
//! 32-bit and the 64-bit layout. A field that does not exist in one layout has
//! no offset or width for it. [`FieldDesc::select`] is the only place that
//! branches on the byte class.

use core::fmt;
use core::str::FromStr;

use crate::error::ElfError;
use crate::file::ByteClass;

/// Location of one field under both physical layouts.
///
/// Offsets are relative to the start of the structure that holds the field
/// (the file, a program header entry, or a section header entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDesc {
    /// Byte offset in the 32-bit layout.
    pub offset_32: Option<u32>,
    /// Byte offset in the 64-bit layout.
    pub offset_64: Option<u32>,
    /// Byte width in the 32-bit layout.
    pub width_32: Option<u8>,
    /// Byte width in the 64-bit layout.
    pub width_64: Option<u8>,
}

impl FieldDesc {
    const fn both(offset_32: u32, offset_64: u32, width_32: u8, width_64: u8) -> Self {
        Self {
            offset_32: Some(offset_32),
            offset_64: Some(offset_64),
            width_32: Some(width_32),
            width_64: Some(width_64),
        }
    }

    const fn only_32(offset: u32, width: u8) -> Self {
        Self {
            offset_32: Some(offset),
            offset_64: None,
            width_32: Some(width),
            width_64: None,
        }
    }

    const fn only_64(offset: u32, width: u8) -> Self {
        Self {
            offset_32: None,
            offset_64: Some(offset),
            width_32: None,
            width_64: Some(width),
        }
    }

    /// Returns `(offset, width)` under `class`, or `None` if the field does not
    /// exist in that layout.
    #[must_use]
    pub fn select(&self, class: ByteClass) -> Option<(u64, usize)> {
        let (offset, width) = match class {
            ByteClass::Elf32 => (self.offset_32, self.width_32),
            ByteClass::Elf64 => (self.offset_64, self.width_64),
        };
        Some((u64::from(offset?), usize::from(width?)))
    }
}

/// The three descriptor tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// The fixed file header.
    Header,
    /// The indexed program header table.
    ProgramHeader,
    /// The indexed section header table.
    SectionHeader,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Header => "header",
            Self::ProgramHeader => "program header",
            Self::SectionHeader => "section",
        })
    }
}

/// A named field of one of the descriptor tables.
pub trait Field: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// The table this field belongs to.
    const TABLE: Table;

    /// Every field of the table, in table order.
    fn all() -> &'static [Self];

    /// Canonical upper-case field name.
    fn name(self) -> &'static str;

    /// Layout descriptor of this field.
    fn desc(self) -> FieldDesc;
}

/// Defines a field enum together with its descriptor table.
macro_rules! field_table {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $table:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $text:literal => $desc:expr,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every field, in table order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Canonical upper-case field name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Layout descriptor of this field.
            #[must_use]
            pub const fn desc(self) -> FieldDesc {
                match self {
                    $(Self::$variant => $desc,)+
                }
            }
        }

        impl Field for $name {
            const TABLE: Table = Table::$table;

            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn name(self) -> &'static str {
                $name::name(self)
            }

            fn desc(self) -> FieldDesc {
                $name::desc(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = ElfError;

            /// Parses a canonical field name, ignoring ASCII case.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|field| field.name().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ElfError::UnknownField {
                        table: Table::$table,
                        name: s.to_owned(),
                    })
            }
        }
    };
}

field_table! {
    /// Fields of the ELF file header.
    pub enum HeaderField: Header {
        /// Magic signature, `7f 'E' 'L' 'F'`.
        Magic = "EI_MAG" => FieldDesc::both(0x00, 0x00, 4, 4),
        /// Byte class: 1 for 32-bit, 2 for 64-bit.
        Class = "EI_CLASS" => FieldDesc::both(0x04, 0x04, 1, 1),
        /// Data encoding: 1 for little-endian, 2 for big-endian.
        Data = "EI_DATA" => FieldDesc::both(0x05, 0x05, 1, 1),
        /// Identification version, always 1.
        IdentVersion = "EI_VERSION" => FieldDesc::both(0x06, 0x06, 1, 1),
        /// Target OS ABI.
        OsAbi = "EI_OSABI" => FieldDesc::both(0x07, 0x07, 1, 1),
        /// ABI version; meaning depends on the OS ABI.
        AbiVersion = "EI_ABIVERSION" => FieldDesc::both(0x08, 0x08, 1, 1),
        /// Unused identification padding.
        Pad = "EI_PAD" => FieldDesc::both(0x09, 0x09, 7, 7),
        /// Object file type.
        ObjectType = "EI_OBJTYPE" => FieldDesc::both(0x10, 0x10, 2, 2),
        /// Target instruction set.
        Machine = "EI_MACHINE" => FieldDesc::both(0x12, 0x12, 2, 2),
        /// Object file version, always 1.
        Version = "EI_VERSION1" => FieldDesc::both(0x14, 0x14, 4, 4),
        /// Entry point virtual address.
        Entry = "EI_ENTRY_ADDR" => FieldDesc::both(0x18, 0x18, 4, 8),
        /// File offset of the program header table.
        PhOff = "EI_PHOFF" => FieldDesc::both(0x1c, 0x20, 4, 8),
        /// File offset of the section header table.
        ShOff = "EI_SHOFF" => FieldDesc::both(0x20, 0x28, 4, 8),
        /// Processor-specific flags.
        Flags = "EI_FLAGS" => FieldDesc::both(0x24, 0x30, 4, 4),
        /// Size of this header.
        EhSize = "EI_EHSIZE" => FieldDesc::both(0x28, 0x34, 2, 2),
        /// Size of one program header entry.
        PhEntSize = "EI_PHENTSIZE" => FieldDesc::both(0x2a, 0x36, 2, 2),
        /// Number of program header entries.
        PhNum = "EI_PHNUM" => FieldDesc::both(0x2c, 0x38, 2, 2),
        /// Size of one section header entry.
        ShEntSize = "EI_SHENTSIZE" => FieldDesc::both(0x2e, 0x3a, 2, 2),
        /// Number of section header entries.
        ShNum = "EI_SHNUM" => FieldDesc::both(0x30, 0x3c, 2, 2),
        /// Index of the section holding section names.
        ShStrNdx = "EI_SHSTRNDX" => FieldDesc::both(0x32, 0x3e, 2, 2),
    }
}

field_table! {
    /// Fields of one program header entry.
    ///
    /// The flags word sits at a different place in each layout, so it is
    /// described twice: [`Flags`](Self::Flags) exists only in ELF64 and
    /// [`Flags32`](Self::Flags32) only in ELF32.
    pub enum ProgramHeaderField: ProgramHeader {
        /// Segment type.
        Type = "P_TYPE" => FieldDesc::both(0x00, 0x00, 4, 4),
        /// Segment flags, ELF64 position.
        Flags = "P_FLAGS" => FieldDesc::only_64(0x04, 4),
        /// File offset of the segment.
        Offset = "P_OFFSET" => FieldDesc::both(0x04, 0x08, 4, 8),
        /// Virtual address of the segment.
        VAddr = "P_VADDR" => FieldDesc::both(0x08, 0x10, 4, 8),
        /// Physical address of the segment.
        PAddr = "P_PADDR" => FieldDesc::both(0x0c, 0x18, 4, 8),
        /// Size of the segment in the file.
        FileSz = "P_FILESZ" => FieldDesc::both(0x10, 0x20, 4, 8),
        /// Size of the segment in memory.
        MemSz = "P_MEMSZ" => FieldDesc::both(0x14, 0x28, 4, 8),
        /// Segment flags, ELF32 position.
        Flags32 = "P_FLAGS32" => FieldDesc::only_32(0x18, 4),
        /// Segment alignment.
        Align = "P_ALIGN" => FieldDesc::both(0x1c, 0x30, 4, 8),
    }
}

field_table! {
    /// Fields of one section header entry.
    pub enum SectionHeaderField: SectionHeader {
        /// Offset of the section name in the section name string table.
        Name = "SH_NAME" => FieldDesc::both(0x00, 0x00, 4, 4),
        /// Section type.
        Type = "SH_TYPE" => FieldDesc::both(0x04, 0x04, 4, 4),
        /// Section attribute flags.
        Flags = "SH_FLAGS" => FieldDesc::both(0x08, 0x08, 4, 8),
        /// Virtual address of the section in memory.
        Addr = "SH_ADDR" => FieldDesc::both(0x0c, 0x10, 4, 8),
        /// File offset of the section data.
        Offset = "SH_OFFSET" => FieldDesc::both(0x10, 0x18, 4, 8),
        /// Size of the section.
        Size = "SH_SIZE" => FieldDesc::both(0x14, 0x20, 4, 8),
        /// Index of an associated section.
        Link = "SH_LINK" => FieldDesc::both(0x18, 0x28, 4, 4),
        /// Extra information, type-dependent.
        Info = "SH_INFO" => FieldDesc::both(0x1c, 0x2c, 4, 4),
        /// Required alignment.
        AddrAlign = "SH_ADDRALIGN" => FieldDesc::both(0x20, 0x30, 4, 8),
        /// Size of one entry for table-like sections.
        EntSize = "SH_ENTSIZE" => FieldDesc::both(0x24, 0x38, 4, 8),
    }
}
