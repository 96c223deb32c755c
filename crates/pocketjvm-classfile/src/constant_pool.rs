use crate::error::ClassFileError;
use crate::reader::Cursor;

// Tag values from the class-file constant pool; only the tags this engine's
// method-resolution path can actually encounter are given structured
// variants. Everything else (Float, Long, Double, MethodHandle,
// MethodType, Dynamic/InvokeDynamic, Module, Package) is read far enough to
// skip correctly and stored as `Other` — this engine has no use for them
// and spec.md §4.4 explicitly says unrecognized `ldc` tags are silently
// ignored, which `Other` models directly.
const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantPoolEntry {
    Utf8(String),
    Integer(i32),
    Class { name_index: u16 },
    String { utf8_index: u16 },
    Fieldref { class_index: u16, name_and_type_index: u16 },
    Methodref { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodref { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    /// The slot immediately following a Long/Double entry; the format
    /// reserves it but no entry may ever reference it.
    Unusable,
    /// A tag this engine does not interpret (see the module doc above).
    Other,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstantPool {
    /// Index 0 is unused (the format is 1-indexed); `entries[0]` is a
    /// placeholder so `entries[i]` lines up with pool index `i`.
    entries: Vec<ConstantPoolEntry>,
}

impl ConstantPool {
    /// Builds a pool directly from already-resolved entries, for callers
    /// that construct a [`ClassFile`](crate::ClassFile) in memory instead
    /// of parsing one from bytes (tests, mainly). `entries[0]` must be the
    /// 1-indexing placeholder; `entries[i]` is then constant-pool index `i`.
    pub fn from_entries(entries: Vec<ConstantPoolEntry>) -> Self {
        Self { entries }
    }

    pub fn parse(cursor: &mut Cursor, count: u16) -> Result<Self, ClassFileError> {
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(ConstantPoolEntry::Other); // index 0 placeholder

        // `count` is "number of entries + 1"; the loop below must also
        // skip an extra slot after every Long/Double, per the format.
        let mut index = 1u16;
        while index < count {
            let tag = cursor.read_u8()?;
            let entry = match tag {
                TAG_UTF8 => {
                    let len = cursor.read_u16()?;
                    let bytes = cursor.bytes(len as usize)?;
                    let text = String::from_utf8_lossy(bytes).into_owned();
                    ConstantPoolEntry::Utf8(text)
                }
                TAG_INTEGER => ConstantPoolEntry::Integer(cursor.read_i32()?),
                TAG_CLASS => ConstantPoolEntry::Class {
                    name_index: cursor.read_u16()?,
                },
                TAG_STRING => ConstantPoolEntry::String {
                    utf8_index: cursor.read_u16()?,
                },
                TAG_FIELDREF => ConstantPoolEntry::Fieldref {
                    class_index: cursor.read_u16()?,
                    name_and_type_index: cursor.read_u16()?,
                },
                TAG_METHODREF => ConstantPoolEntry::Methodref {
                    class_index: cursor.read_u16()?,
                    name_and_type_index: cursor.read_u16()?,
                },
                TAG_INTERFACE_METHODREF => ConstantPoolEntry::InterfaceMethodref {
                    class_index: cursor.read_u16()?,
                    name_and_type_index: cursor.read_u16()?,
                },
                TAG_NAME_AND_TYPE => ConstantPoolEntry::NameAndType {
                    name_index: cursor.read_u16()?,
                    descriptor_index: cursor.read_u16()?,
                },
                TAG_FLOAT => {
                    cursor.skip(4)?;
                    ConstantPoolEntry::Other
                }
                TAG_METHOD_TYPE | TAG_MODULE | TAG_PACKAGE => {
                    cursor.skip(2)?;
                    ConstantPoolEntry::Other
                }
                TAG_METHOD_HANDLE => {
                    cursor.skip(3)?;
                    ConstantPoolEntry::Other
                }
                TAG_DYNAMIC | TAG_INVOKE_DYNAMIC => {
                    cursor.skip(4)?;
                    ConstantPoolEntry::Other
                }
                TAG_LONG | TAG_DOUBLE => {
                    cursor.skip(8)?;
                    entries.push(ConstantPoolEntry::Other);
                    entries.push(ConstantPoolEntry::Unusable);
                    index += 2;
                    continue;
                }
                other => {
                    tracing::warn!(tag = other, "unrecognized constant pool tag, skipping as opaque");
                    ConstantPoolEntry::Other
                }
            };
            entries.push(entry);
            index += 1;
        }

        Ok(Self { entries })
    }

    pub fn get(&self, index: u16) -> Result<&ConstantPoolEntry, ClassFileError> {
        self.entries
            .get(index as usize)
            .ok_or(ClassFileError::BadConstantPoolIndex(index))
    }

    pub fn utf8(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            ConstantPoolEntry::Utf8(s) => Ok(s),
            _ => Err(ClassFileError::WrongConstantPoolEntryKind(index)),
        }
    }

    pub fn integer(&self, index: u16) -> Result<i32, ClassFileError> {
        match self.get(index)? {
            ConstantPoolEntry::Integer(v) => Ok(*v),
            _ => Err(ClassFileError::WrongConstantPoolEntryKind(index)),
        }
    }

    /// Resolves a `NameAndType` entry to its `(name, descriptor)` strings.
    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str), ClassFileError> {
        match self.get(index)? {
            ConstantPoolEntry::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?)),
            _ => Err(ClassFileError::WrongConstantPoolEntryKind(index)),
        }
    }

    /// Resolves a `Methodref` (or `InterfaceMethodref`) entry to the
    /// `(name, descriptor)` of the method it names. The referenced class
    /// itself is not resolved further — this engine loads a single class
    /// and every static call target lives in it (spec.md §1 Non-goals:
    /// "class loading beyond a single class").
    pub fn methodref_name_and_type(&self, index: u16) -> Result<(&str, &str), ClassFileError> {
        match self.get(index)? {
            ConstantPoolEntry::Methodref {
                name_and_type_index,
                ..
            }
            | ConstantPoolEntry::InterfaceMethodref {
                name_and_type_index,
                ..
            } => self.name_and_type(*name_and_type_index),
            _ => Err(ClassFileError::WrongConstantPoolEntryKind(index)),
        }
    }
}
