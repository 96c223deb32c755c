use std::io::Write;

use pocketjvm_classfile::ClassFile;
use pocketjvm_types::ReturnValue;

use crate::decode;
use crate::engine;
use crate::error::VmError;
use crate::frame::Frame;
use crate::heap::Heap;

/// `invokevirtual`: pop the top of stack and print it as a signed decimal
/// integer followed by a newline. This is the engine's single
/// externally observable intrinsic (§4.6). `out` is always standard
/// output in `pocketjvm-cli`; tests substitute an in-memory buffer so
/// printed output can be asserted on without touching the process's real
/// stdout.
pub fn print(frame: &mut Frame, out: &mut dyn Write) -> Result<(), VmError> {
    let v = frame.stack.pop()?;
    writeln!(out, "{v}").expect("write to output sink");
    Ok(())
}

/// `invokestatic`: resolve the callee by constant-pool index, transfer
/// arguments into its locals in left-to-right order, recurse on the host
/// call stack, and push whatever the callee returns (§4.4, §4.5).
pub fn invoke_static(
    frame: &mut Frame,
    code: &[u8],
    opcode_pc: usize,
    class: &ClassFile,
    heap: &mut Heap,
    out: &mut dyn Write,
) -> Result<(), VmError> {
    let index = decode::u16_at(code, opcode_pc + 1);
    let callee = class
        .find_method_from_index(index)?
        .ok_or(VmError::BadMethodIndex(index))?;

    let arity = callee.parameter_count();
    if (frame.stack.depth() as u16) < arity {
        return Err(VmError::ArityMismatch {
            expected: arity,
            found: frame.stack.depth(),
        });
    }

    let mut locals = vec![0i32; callee.max_locals as usize];
    // Popped right-to-left; the leftmost parameter ends up at locals[0].
    for i in (0..arity as usize).rev() {
        locals[i] = frame.stack.pop()?;
    }

    match engine::invoke(class, heap, callee, locals, out)? {
        ReturnValue::Void => {}
        ReturnValue::Int(v) => frame.stack.push(v)?,
    }
    Ok(())
}
