use pocketjvm_classfile::{ClassFile, ConstantPoolEntry};
use pocketjvm_types::Opcode;

use crate::decode;
use crate::error::VmError;
use crate::frame::Frame;

/// The literal value an `iconst_*` opcode pushes.
pub fn constant_value(opcode: Opcode) -> i32 {
    use Opcode::*;
    match opcode {
        IconstM1 => -1,
        Iconst0 => 0,
        Iconst1 => 1,
        Iconst2 => 2,
        Iconst3 => 3,
        Iconst4 => 4,
        Iconst5 => 5,
        _ => unreachable!("constant_value called with a non-iconst opcode"),
    }
}

/// `ldc`: unknown or non-integer constant-pool tags are silently ignored,
/// matching the source's behavior (§9 Open Questions).
pub fn ldc(frame: &mut Frame, code: &[u8], opcode_pc: usize, class: &ClassFile) -> Result<(), VmError> {
    let index = decode::u8_at(code, opcode_pc + 1) as u16;
    if let Ok(ConstantPoolEntry::Integer(v)) = class.constant_pool.get(index) {
        frame.stack.push(*v)?;
    }
    Ok(())
}
