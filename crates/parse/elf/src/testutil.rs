//! In-memory ELF images for unit tests.
//!
//! Images are laid out with hard-coded field orders and widths, independent of
//! the descriptor tables, so tests check the tables against known layouts.
//!
//! Layout: file header, program headers, segment data, section data, section
//! headers. Section 0 is the null section and `.shstrtab` is appended last.

use std::io::Cursor;

use crate::consts::{ELF_MAGIC, PT_LOAD, SHT_NOBITS, SHT_STRTAB};
use crate::file::{ByteClass, ElfFile, Endianness};

pub(crate) const SHT_PROGBITS: u32 = 1;
pub(crate) const PT_NOTE: u32 = 4;
pub(crate) const PF_X: u32 = 1;
pub(crate) const PF_R: u32 = 4;
pub(crate) const SHF_WRITE: u64 = 0x1;
pub(crate) const SHF_ALLOC: u64 = 0x2;
pub(crate) const SHF_EXECINSTR: u64 = 0x4;
pub(crate) const SHF_MERGE: u64 = 0x10;
pub(crate) const SHF_STRINGS: u64 = 0x20;

/// Payload of the sample `.text` section and `PT_LOAD` segment.
pub(crate) const TEXT: &[u8] = &[0x55, 0x48, 0x89, 0xe5, 0x90, 0xc3];
/// Payload of the sample `.data` section.
pub(crate) const DATA: &[u8] = b"hello, elf!";
/// Payload of the sample `.comment` section.
pub(crate) const COMMENT: &[u8] = b"GCC: (GNU) 13.2.0\0";
/// Entry point of the sample images.
pub(crate) const ENTRY: u64 = 0x0040_1000;

pub(crate) struct TestSegment {
    pub p_type: u32,
    pub flags: u32,
    pub vaddr: u64,
    pub data: Vec<u8>,
    pub memsz: u64,
}

pub(crate) struct TestSection {
    pub name: &'static str,
    pub sh_type: u32,
    pub flags: u64,
    pub addr: u64,
    pub data: Vec<u8>,
    /// `SH_SIZE`; differs from `data.len()` only for `SHT_NOBITS`.
    pub size: u64,
}

impl TestSection {
    pub(crate) fn progbits(name: &'static str, flags: u64, data: &[u8]) -> Self {
        Self {
            name,
            sh_type: SHT_PROGBITS,
            flags,
            addr: 0,
            data: data.to_vec(),
            size: data.len() as u64,
        }
    }

    pub(crate) fn nobits(name: &'static str, flags: u64, size: u64) -> Self {
        Self {
            name,
            sh_type: SHT_NOBITS,
            flags,
            addr: 0,
            data: Vec::new(),
            size,
        }
    }
}

pub(crate) struct TestElf {
    pub class: ByteClass,
    pub endianness: Endianness,
    pub osabi: u8,
    pub e_type: u16,
    pub machine: u16,
    pub entry: u64,
    pub flags: u32,
    pub segments: Vec<TestSegment>,
    pub sections: Vec<TestSection>,
}

/// Appends `value` as a `width`-byte integer.
struct Writer {
    buf: Vec<u8>,
    endianness: Endianness,
}

impl Writer {
    fn put(&mut self, value: u64, width: usize) {
        let bytes = match self.endianness {
            Endianness::Little => value.to_le_bytes()[..width].to_vec(),
            Endianness::Big => value.to_be_bytes()[8 - width..].to_vec(),
        };
        self.buf.extend_from_slice(&bytes);
    }
}

impl TestElf {
    pub(crate) fn new(class: ByteClass, endianness: Endianness) -> Self {
        Self {
            class,
            endianness,
            osabi: 0,
            e_type: 2,
            machine: 0x3e,
            entry: ENTRY,
            flags: 0,
            segments: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// An image with a `PT_LOAD` and a `PT_NOTE` segment and the sections
    /// `.text`, `.data`, `.bss`, `.comment` and `.shstrtab` (indices 1 to 5).
    pub(crate) fn sample(class: ByteClass, endianness: Endianness) -> Self {
        let mut elf = Self::new(class, endianness);
        elf.segments.push(TestSegment {
            p_type: PT_LOAD,
            flags: PF_R | PF_X,
            vaddr: 0x0040_0000,
            data: TEXT.to_vec(),
            memsz: TEXT.len() as u64 + 0x100,
        });
        elf.segments.push(TestSegment {
            p_type: PT_NOTE,
            flags: PF_R,
            vaddr: 0,
            data: b"note".to_vec(),
            memsz: 4,
        });
        elf.sections.push(TestSection::progbits(".text", SHF_ALLOC | SHF_EXECINSTR, TEXT));
        elf.sections.push(TestSection::progbits(".data", SHF_WRITE | SHF_ALLOC, DATA));
        elf.sections.push(TestSection::nobits(".bss", SHF_WRITE | SHF_ALLOC, 0x40));
        elf.sections.push(TestSection::progbits(".comment", SHF_MERGE | SHF_STRINGS, COMMENT));
        elf
    }

    pub(crate) fn sample32() -> Self {
        Self::sample(ByteClass::Elf32, Endianness::Little)
    }

    pub(crate) fn sample64() -> Self {
        Self::sample(ByteClass::Elf64, Endianness::Little)
    }

    /// Every byte-class and endianness combination of [`TestElf::sample`].
    pub(crate) fn all_samples() -> [Self; 4] {
        [
            Self::sample(ByteClass::Elf32, Endianness::Little),
            Self::sample(ByteClass::Elf32, Endianness::Big),
            Self::sample(ByteClass::Elf64, Endianness::Little),
            Self::sample(ByteClass::Elf64, Endianness::Big),
        ]
    }

    fn word(&self) -> usize {
        match self.class {
            ByteClass::Elf32 => 4,
            ByteClass::Elf64 => 8,
        }
    }

    pub(crate) fn ehsize(&self) -> u64 {
        match self.class {
            ByteClass::Elf32 => 52,
            ByteClass::Elf64 => 64,
        }
    }

    pub(crate) fn phentsize(&self) -> u64 {
        match self.class {
            ByteClass::Elf32 => 32,
            ByteClass::Elf64 => 56,
        }
    }

    pub(crate) fn shentsize(&self) -> u64 {
        match self.class {
            ByteClass::Elf32 => 40,
            ByteClass::Elf64 => 64,
        }
    }

    /// Section names in index order, including the null section and
    /// `.shstrtab`.
    pub(crate) fn section_names(&self) -> Vec<&'static str> {
        let mut names = vec![""];
        names.extend(self.sections.iter().map(|s| s.name));
        names.push(".shstrtab");
        names
    }

    /// Builds the `.shstrtab` contents and each section's name offset.
    fn shstrtab(&self) -> (Vec<u8>, Vec<u64>) {
        let mut table = vec![0u8];
        let mut offsets = vec![0];
        for name in self.section_names().into_iter().skip(1) {
            offsets.push(table.len() as u64);
            table.extend_from_slice(name.as_bytes());
            table.push(0);
        }
        (table, offsets)
    }

    #[allow(clippy::too_many_lines)]
    pub(crate) fn build(&self) -> Vec<u8> {
        let word = self.word();
        let phnum = self.segments.len() as u64;
        let (shstrtab, name_offsets) = self.shstrtab();
        let shnum = self.sections.len() as u64 + 2;

        // Lay out data regions.
        let mut cursor = self.ehsize() + phnum * self.phentsize();
        let mut segment_offsets = Vec::new();
        for seg in &self.segments {
            segment_offsets.push(cursor);
            cursor += seg.data.len() as u64;
        }
        let mut section_offsets = vec![0];
        for sec in &self.sections {
            section_offsets.push(cursor);
            cursor += sec.data.len() as u64;
        }
        section_offsets.push(cursor);
        cursor += shstrtab.len() as u64;
        let shoff = cursor;

        let mut w = Writer {
            buf: Vec::new(),
            endianness: self.endianness,
        };

        // Identification.
        w.buf.extend_from_slice(&ELF_MAGIC);
        w.buf.push(match self.class {
            ByteClass::Elf32 => 1,
            ByteClass::Elf64 => 2,
        });
        w.buf.push(match self.endianness {
            Endianness::Little => 1,
            Endianness::Big => 2,
        });
        w.buf.push(1);
        w.buf.push(self.osabi);
        w.buf.push(0);
        w.buf.extend_from_slice(&[0; 7]);

        // Rest of the file header.
        w.put(u64::from(self.e_type), 2);
        w.put(u64::from(self.machine), 2);
        w.put(1, 4);
        w.put(self.entry, word);
        w.put(if phnum > 0 { self.ehsize() } else { 0 }, word);
        w.put(shoff, word);
        w.put(u64::from(self.flags), 4);
        w.put(self.ehsize(), 2);
        w.put(self.phentsize(), 2);
        w.put(phnum, 2);
        w.put(self.shentsize(), 2);
        w.put(shnum, 2);
        w.put(shnum - 1, 2);
        assert_eq!(w.buf.len() as u64, self.ehsize());

        // Program headers.
        for (seg, &offset) in self.segments.iter().zip(&segment_offsets) {
            let filesz = seg.data.len() as u64;
            match self.class {
                ByteClass::Elf32 => {
                    w.put(u64::from(seg.p_type), 4);
                    w.put(offset, 4);
                    w.put(seg.vaddr, 4);
                    w.put(seg.vaddr, 4);
                    w.put(filesz, 4);
                    w.put(seg.memsz, 4);
                    w.put(u64::from(seg.flags), 4);
                    w.put(0x1000, 4);
                }
                ByteClass::Elf64 => {
                    w.put(u64::from(seg.p_type), 4);
                    w.put(u64::from(seg.flags), 4);
                    w.put(offset, 8);
                    w.put(seg.vaddr, 8);
                    w.put(seg.vaddr, 8);
                    w.put(filesz, 8);
                    w.put(seg.memsz, 8);
                    w.put(0x1000, 8);
                }
            }
        }

        // Data.
        for seg in &self.segments {
            w.buf.extend_from_slice(&seg.data);
        }
        for sec in &self.sections {
            w.buf.extend_from_slice(&sec.data);
        }
        w.buf.extend_from_slice(&shstrtab);
        assert_eq!(w.buf.len() as u64, shoff);

        // Section headers: null, user sections, .shstrtab.
        #[allow(clippy::too_many_arguments)]
        let put_shdr = |w: &mut Writer,
                        name: u64,
                        sh_type: u32,
                        flags: u64,
                        addr: u64,
                        offset: u64,
                        size: u64,
                        align: u64| {
            w.put(name, 4);
            w.put(u64::from(sh_type), 4);
            w.put(flags, word);
            w.put(addr, word);
            w.put(offset, word);
            w.put(size, word);
            w.put(0, 4);
            w.put(0, 4);
            w.put(align, word);
            w.put(0, word);
        };
        put_shdr(&mut w, 0, 0, 0, 0, 0, 0, 0);
        for (i, sec) in self.sections.iter().enumerate() {
            put_shdr(
                &mut w,
                name_offsets[i + 1],
                sec.sh_type,
                sec.flags,
                sec.addr,
                section_offsets[i + 1],
                sec.size,
                1,
            );
        }
        let last = name_offsets.len() - 1;
        put_shdr(
            &mut w,
            name_offsets[last],
            SHT_STRTAB,
            0,
            0,
            section_offsets[last],
            shstrtab.len() as u64,
            1,
        );

        w.buf
    }

    pub(crate) fn open(&self) -> ElfFile<Cursor<Vec<u8>>> {
        ElfFile::from_reader(Cursor::new(self.build())).expect("fixture is a valid ELF image")
    }
}
