//! Shared value types for the pocketjvm workspace: the opcode table and the
//! tagged return value produced by a method invocation.
//!
//! This crate carries no logic beyond straightforward conversions — it
//! exists so `pocketjvm-classfile` and `pocketjvm-vm` agree on the opcode
//! numbering without either depending on the other.

pub mod opcode;

pub use opcode::Opcode;

/// The result of invoking a method: either nothing, or a single 32-bit
/// signed value.
///
/// Array-returning methods also produce `Int`, where the integer is a heap
/// reference rather than a plain number — the engine does not distinguish
/// the two at this type's level, only the caller's use of the value does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnValue {
    Void,
    Int(i32),
}

impl ReturnValue {
    pub fn is_void(&self) -> bool {
        matches!(self, ReturnValue::Void)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            ReturnValue::Int(v) => Some(*v),
            ReturnValue::Void => None,
        }
    }
}
