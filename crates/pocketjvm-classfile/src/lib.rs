//! Reads the class-file format this engine's instruction stream is
//! patterned after and produces the immutable [`ClassFile`] the execution
//! engine in `pocketjvm-vm` treats as read-only input.
//!
//! This is spec.md's "external collaborator": the parser, method lookup,
//! and descriptor-derived parameter count. It is implemented here (rather
//! than left as a stub) so the workspace loads and runs real compiled
//! class files end to end, but it is deliberately not part of the
//! execution engine's design — see `pocketjvm-vm` for that.

pub mod constant_pool;
pub mod error;
pub mod method;
mod reader;

use std::fs;
use std::path::Path;

pub use constant_pool::{ConstantPool, ConstantPoolEntry};
pub use error::ClassFileError;
pub use method::Method;
use reader::Cursor;

const MAGIC: u32 = 0xCAFEBABE;
/// Highest class-file major version this engine has been checked against.
/// Newer class files may well use only instructions this engine supports,
/// but rejecting them outright keeps the contract simple: this is not a
/// verifier, and a version bump can silently introduce constant-pool tags
/// or attributes this reader does not know how to skip correctly.
const MAX_SUPPORTED_MAJOR_VERSION: u16 = 68; // Java SE 24

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub constant_pool: ConstantPool,
    pub methods: Vec<Method>,
}

impl ClassFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassFileError> {
        let bytes = fs::read(path)?;
        Self::parse(&bytes)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, ClassFileError> {
        let mut cursor = Cursor::new(bytes);

        let magic = cursor.read_u32()?;
        if magic != MAGIC {
            return Err(ClassFileError::BadMagic);
        }

        let minor_version = cursor.read_u16()?;
        let major_version = cursor.read_u16()?;
        if major_version > MAX_SUPPORTED_MAJOR_VERSION {
            return Err(ClassFileError::UnsupportedVersion {
                major: major_version,
                minor: minor_version,
            });
        }

        let constant_pool_count = cursor.read_u16()?;
        let constant_pool = ConstantPool::parse(&mut cursor, constant_pool_count)?;

        let _access_flags = cursor.read_u16()?;
        let _this_class = cursor.read_u16()?;
        let _super_class = cursor.read_u16()?;

        let interfaces_count = cursor.read_u16()?;
        for _ in 0..interfaces_count {
            cursor.read_u16()?;
        }

        let fields_count = cursor.read_u16()?;
        for _ in 0..fields_count {
            skip_member(&mut cursor)?;
        }

        let methods_count = cursor.read_u16()?;
        let mut methods = Vec::with_capacity(methods_count as usize);
        for _ in 0..methods_count {
            methods.push(parse_method(&mut cursor, &constant_pool)?);
        }

        let class_attributes_count = cursor.read_u16()?;
        for _ in 0..class_attributes_count {
            skip_attribute(&mut cursor)?;
        }

        Ok(Self {
            constant_pool,
            methods,
        })
    }

    /// Exact match on both name and descriptor — spec.md §6's
    /// `find_method`.
    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&Method> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }

    /// Resolves a constant-pool index pointing at a method reference to the
    /// method it names within this class — spec.md §6's
    /// `find_method_from_index`.
    pub fn find_method_from_index(&self, index: u16) -> Result<Option<&Method>, ClassFileError> {
        let (name, descriptor) = self.constant_pool.methodref_name_and_type(index)?;
        Ok(self.find_method(name, descriptor))
    }
}

/// Reads a `field_info` or the common prefix of a `method_info` (access
/// flags, name index, descriptor index) and its attribute list, returning
/// nothing — used where the member itself carries no information this
/// engine needs (fields) but its variable-length attributes must still be
/// skipped correctly to keep the cursor aligned for what follows.
fn skip_member(cursor: &mut Cursor) -> Result<(), ClassFileError> {
    let _access_flags = cursor.read_u16()?;
    let _name_index = cursor.read_u16()?;
    let _descriptor_index = cursor.read_u16()?;
    let attributes_count = cursor.read_u16()?;
    for _ in 0..attributes_count {
        skip_attribute(cursor)?;
    }
    Ok(())
}

fn skip_attribute(cursor: &mut Cursor) -> Result<(), ClassFileError> {
    let _name_index = cursor.read_u16()?;
    let length = cursor.read_u32()?;
    cursor.skip(length as usize)?;
    Ok(())
}

fn parse_method(cursor: &mut Cursor, pool: &ConstantPool) -> Result<Method, ClassFileError> {
    let _access_flags = cursor.read_u16()?;
    let name_index = cursor.read_u16()?;
    let descriptor_index = cursor.read_u16()?;
    let name = pool.utf8(name_index)?.to_owned();
    let descriptor = pool.utf8(descriptor_index)?.to_owned();

    let attributes_count = cursor.read_u16()?;
    let mut code_attribute = None;
    for _ in 0..attributes_count {
        let attribute_name_index = cursor.read_u16()?;
        let length = cursor.read_u32()?;
        let attribute_name = pool.utf8(attribute_name_index)?;

        if attribute_name == "Code" {
            code_attribute = Some(parse_code_attribute(cursor)?);
        } else {
            cursor.skip(length as usize)?;
        }
    }

    let (max_stack, max_locals, code) =
        code_attribute.ok_or(ClassFileError::MissingCodeAttribute)?;

    Ok(Method {
        name,
        descriptor,
        max_stack,
        max_locals,
        code,
    })
}

/// Reads a `Code` attribute's body. The attribute's own `attribute_length`
/// was already consumed by the caller as part of reading the name/length
/// pair; everything from `max_stack` onward is read field-by-field instead
/// of trusting that length, so a malformed length cannot desynchronize the
/// cursor from the rest of the method table.
fn parse_code_attribute(cursor: &mut Cursor) -> Result<(u16, u16, Vec<u8>), ClassFileError> {
    let max_stack = cursor.read_u16()?;
    let max_locals = cursor.read_u16()?;
    let code_length = cursor.read_u32()?;
    let code = cursor.bytes(code_length as usize)?.to_vec();

    let exception_table_length = cursor.read_u16()?;
    for _ in 0..exception_table_length {
        cursor.skip(8)?; // start_pc, end_pc, handler_pc, catch_type: 4 x u16
    }

    let attributes_count = cursor.read_u16()?;
    for _ in 0..attributes_count {
        skip_attribute(cursor)?;
    }

    Ok((max_stack, max_locals, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_magic() {
        let bytes = [0u8; 16];
        assert!(matches!(
            ClassFile::parse(&bytes),
            Err(ClassFileError::BadMagic)
        ));
    }
}
