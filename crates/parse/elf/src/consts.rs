//! ELF constants and symbolic enumeration tables.
//!
//! Each [`EnumTable`] maps symbolic names to the integer codes of one field
//! and is used for reverse lookup when decoding.

/// ELF magic bytes: `\x7fELF`.
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Offset of the class byte in the identification bytes.
pub const EI_CLASS: usize = 4;

/// Offset of the data-encoding byte in the identification bytes.
pub const EI_DATA: usize = 5;

/// ELF class: 32-bit.
pub const ELFCLASS32: u8 = 1;

/// ELF class: 64-bit.
pub const ELFCLASS64: u8 = 2;

/// ELF data encoding: little-endian.
pub const ELFDATA2LSB: u8 = 1;

/// ELF data encoding: big-endian.
pub const ELFDATA2MSB: u8 = 2;

/// Program header type: loadable segment.
pub const PT_LOAD: u32 = 1;

/// Section type: string table.
pub const SHT_STRTAB: u32 = 3;

/// Section type: occupies no space in the file (`.bss`).
pub const SHT_NOBITS: u32 = 8;

/// A static bidirectional mapping between symbolic names and integer codes.
#[derive(Debug)]
pub struct EnumTable {
    entries: &'static [(&'static str, u64)],
}

impl EnumTable {
    /// Creates a table from `(name, value)` pairs in definition order.
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, u64)]) -> Self {
        Self { entries }
    }

    /// Returns the first name whose value equals `value`.
    #[must_use]
    pub fn name_of(&self, value: u64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|&&(_, v)| v == value)
            .map(|&(name, _)| name)
    }

    /// Returns the value registered under `name`.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|&&(n, _)| n == name)
            .map(|&(_, value)| value)
    }

    /// Returns the names of the entries present in `mask`, in definition order.
    ///
    /// Single-bit entries match when their bit is set. Multi-bit entries are
    /// ranges and match when `mask` has a bit in them that no single-bit
    /// entry names. For a table whose entries cover every bit, OR-ing each
    /// matched value ANDed with `mask` gives back `mask`.
    #[must_use]
    pub fn flags_in(&self, mask: u64) -> Vec<&'static str> {
        let named = self
            .entries
            .iter()
            .filter(|&&(_, bits)| bits.is_power_of_two())
            .fold(0, |acc, &(_, bits)| acc | bits);
        let rest = mask & !named;
        self.entries
            .iter()
            .filter(|&&(_, bits)| {
                if bits.is_power_of_two() {
                    mask & bits != 0
                } else {
                    rest & bits != 0
                }
            })
            .map(|&(name, _)| name)
            .collect()
    }

    /// All `(name, value)` pairs in definition order.
    #[must_use]
    pub fn entries(&self) -> &'static [(&'static str, u64)] {
        self.entries
    }
}

/// Target OS ABI (`EI_OSABI`).
pub static OS_ABI: EnumTable = EnumTable::new(&[
    ("system_v", 0x00),
    ("hp_ux", 0x01),
    ("netbsd", 0x02),
    ("linux", 0x03),
    ("gnu_hurd", 0x04),
    ("solaris", 0x06),
    ("aix", 0x07),
    ("irix", 0x08),
    ("freebsd", 0x09),
    ("tru64", 0x0a),
    ("novell_modesto", 0x0b),
    ("openbsd", 0x0c),
    ("openvms", 0x0d),
    ("nonstop_kernel", 0x0e),
    ("aros", 0x0f),
    ("fenix_os", 0x10),
    ("cloudabi", 0x11),
    ("stratus_technologies_openvos", 0x12),
    ("arm", 0x61),
    ("standalone", 0xff),
]);

/// Object file type (`EI_OBJTYPE`).
pub static OBJECT_TYPE: EnumTable = EnumTable::new(&[
    ("ET_NONE", 0x0),
    ("ET_REL", 0x1),
    ("ET_EXEC", 0x2),
    ("ET_DYN", 0x3),
    ("ET_CORE", 0x4),
    ("ET_LOOS", 0xfe00),
    ("ET_HIOS", 0xfeff),
    ("ET_LOPROC", 0xff00),
    ("ET_HIPROC", 0xffff),
]);

/// Target instruction set (`EI_MACHINE`).
pub static MACHINE: EnumTable = EnumTable::new(&[
    ("none", 0x00),
    ("SPARC", 0x02),
    ("x86", 0x03),
    ("m68k", 0x04),
    ("MIPS", 0x08),
    ("PowerPC", 0x14),
    ("PowerPC64", 0x15),
    ("s390", 0x16),
    ("ARM", 0x28),
    ("SuperH", 0x2a),
    ("SPARCV9", 0x2b),
    ("IA_64", 0x32),
    ("amd64", 0x3e),
    ("Aarch64", 0xb7),
    ("RISC_V", 0xf3),
    ("BPF", 0xf7),
    ("LoongArch", 0x102),
]);

/// Segment type (`P_TYPE`).
pub static SEGMENT_TYPE: EnumTable = EnumTable::new(&[
    ("PT_NULL", 0x0),
    ("PT_LOAD", 0x1),
    ("PT_DYNAMIC", 0x2),
    ("PT_INTERP", 0x3),
    ("PT_NOTE", 0x4),
    ("PT_SHLIB", 0x5),
    ("PT_PHDR", 0x6),
    ("PT_TLS", 0x7),
    ("PT_LOOS", 0x6000_0000),
    ("PT_GNU_EH_FRAME", 0x6474_e550),
    ("PT_GNU_STACK", 0x6474_e551),
    ("PT_GNU_RELRO", 0x6474_e552),
    ("PT_GNU_PROPERTY", 0x6474_e553),
    ("PT_HIOS", 0x6fff_ffff),
    ("PT_LOPROC", 0x7000_0000),
    ("PT_HIPROC", 0x7fff_ffff),
]);

/// Section type (`SH_TYPE`).
pub static SECTION_TYPE: EnumTable = EnumTable::new(&[
    ("SHT_NULL", 0x0),
    ("SHT_PROGBITS", 0x1),
    ("SHT_SYMTAB", 0x2),
    ("SHT_STRTAB", 0x3),
    ("SHT_RELA", 0x4),
    ("SHT_HASH", 0x5),
    ("SHT_DYNAMIC", 0x6),
    ("SHT_NOTE", 0x7),
    ("SHT_NOBITS", 0x8),
    ("SHT_REL", 0x9),
    ("SHT_SHLIB", 0x0a),
    ("SHT_DYNSYM", 0x0b),
    ("SHT_INIT_ARRAY", 0x0e),
    ("SHT_FINI_ARRAY", 0x0f),
    ("SHT_PREINIT_ARRAY", 0x10),
    ("SHT_GROUP", 0x11),
    ("SHT_SYMTAB_SHNDX", 0x12),
    ("SHT_RELR", 0x13),
    ("SHT_LOOS", 0x6000_0000),
    ("SHT_GNU_ATTRIBUTES", 0x6fff_fff5),
    ("SHT_GNU_HASH", 0x6fff_fff6),
    ("SHT_GNU_LIBLIST", 0x6fff_fff7),
    ("SHT_GNU_VERDEF", 0x6fff_fffd),
    ("SHT_GNU_VERNEED", 0x6fff_fffe),
    ("SHT_GNU_VERSYM", 0x6fff_ffff),
    ("SHT_LOPROC", 0x7000_0000),
    ("SHT_HIPROC", 0x7fff_ffff),
]);

/// Section attribute flags (`SH_FLAGS`).
///
/// `MASKOS` and `MASKPROC` report OS and processor bits without a name of
/// their own; `RESERVED` covers the bits the gABI leaves unassigned.
pub static SECTION_FLAGS: EnumTable = EnumTable::new(&[
    ("WRITE", 0x1),
    ("ALLOC", 0x2),
    ("EXECINSTR", 0x4),
    ("MERGE", 0x10),
    ("STRINGS", 0x20),
    ("INFO_LINK", 0x40),
    ("LINK_ORDER", 0x80),
    ("OS_NONCONFORMING", 0x100),
    ("GROUP", 0x200),
    ("TLS", 0x400),
    ("COMPRESSED", 0x800),
    ("MASKOS", 0x0ff0_0000),
    ("MASKPROC", 0xf000_0000),
    ("ORDERED", 0x4000_0000),
    ("EXCLUDE", 0x8000_0000),
    ("RESERVED", 0xffff_ffff_000f_f008),
]);
