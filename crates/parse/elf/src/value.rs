//! Decoded field values and whole-entry records.

use core::fmt;

use crate::consts::EnumTable;
use crate::desc::Field;

/// A decoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum FieldValue {
    /// A plain unsigned integer.
    Int(u64),
    /// An enumerated code and its symbolic name, if the code is known.
    Enum {
        /// The raw code.
        value: u64,
        /// The matching table name.
        name: Option<&'static str>,
    },
    /// A flags bitmask and the names of the flags set in it.
    Flags {
        /// The raw bitmask.
        value: u64,
        /// Names of the set flags, in table order.
        names: Vec<&'static str>,
    },
    /// A string-table offset and the string found there.
    Name {
        /// The raw offset into the string table.
        offset: u64,
        /// The decoded string.
        name: String,
    },
}

impl FieldValue {
    /// Decodes `value` against `table`.
    #[must_use]
    pub fn enumerated(value: u64, table: &EnumTable) -> Self {
        Self::Enum {
            value,
            name: table.name_of(value),
        }
    }

    /// Decomposes `value` into the flags of `table`.
    #[must_use]
    pub fn flags(value: u64, table: &EnumTable) -> Self {
        Self::Flags {
            value,
            names: table.flags_in(value),
        }
    }

    /// The raw integer read from the file.
    #[must_use]
    pub fn raw(&self) -> u64 {
        match *self {
            Self::Int(value)
            | Self::Enum { value, .. }
            | Self::Flags { value, .. }
            | Self::Name { offset: value, .. } => value,
        }
    }

    /// The symbolic name of an enumerated value, or the string of a name value.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Self::Enum { name, .. } => *name,
            Self::Name { name, .. } => Some(name),
            Self::Int(_) | Self::Flags { .. } => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value:#x}"),
            Self::Enum { value, name } => {
                write!(f, "{value:#x} ({})", name.unwrap_or("unknown"))
            }
            Self::Flags { value, names } => write!(f, "{value:#x} [{}]", names.join(", ")),
            Self::Name { offset, name } => write!(f, "{offset} {name:?}"),
        }
    }
}

/// Every field of one header entry, in table order.
///
/// A field maps to `None` when it does not exist under the file's byte class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<F> {
    entries: Vec<(F, Option<FieldValue>)>,
}

impl<F: Field> Record<F> {
    /// Returns the decoded value of `field`.
    #[must_use]
    pub fn get(&self, field: F) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Returns the raw integer of `field`.
    #[must_use]
    pub fn raw(&self, field: F) -> Option<u64> {
        self.get(field).map(FieldValue::raw)
    }

    /// Iterates over `(field, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (F, Option<&FieldValue>)> + '_ {
        self.entries.iter().map(|(f, value)| (*f, value.as_ref()))
    }

    /// Number of fields in the record, present or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F> FromIterator<(F, Option<FieldValue>)> for Record<F> {
    fn from_iter<I: IntoIterator<Item = (F, Option<FieldValue>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl<F: Field> serde::Serialize for Record<F> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field.name(), value)?;
        }
        map.end()
    }
}
