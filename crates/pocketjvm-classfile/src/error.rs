use std::io;

/// Everything that can go wrong while reading a class file.
///
/// Every variant here is fatal to the load in progress — there is no
/// recoverable path once a class file fails to parse, matching this
/// engine's "trusted input" stance (see the core crate's `VmError`, which
/// is fatal in exactly the same way once execution begins).
#[derive(Debug, thiserror::Error)]
pub enum ClassFileError {
    #[error("could not read class file: {0}")]
    Io(#[from] io::Error),

    #[error("not a class file (bad magic number)")]
    BadMagic,

    #[error("class file format version {major}.{minor} is newer than this engine supports")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("class file ended before a complete {0} could be read")]
    Truncated(&'static str),

    #[error("constant pool index {0} is out of range")]
    BadConstantPoolIndex(u16),

    #[error("constant pool entry at index {0} has the wrong kind for this use")]
    WrongConstantPoolEntryKind(u16),

    #[error("method's Code attribute is missing")]
    MissingCodeAttribute,
}
