use std::io::Write;

use pocketjvm_classfile::{ClassFile, Method};
use pocketjvm_types::ReturnValue;

use crate::error::VmError;
use crate::frame::Frame;
use crate::heap::Heap;
use crate::interpreter;

const MAIN_NAME: &str = "main";
const MAIN_DESCRIPTOR: &str = "([Ljava/lang/String;)V";

/// The frame & invoker algorithm (§4.5): allocate a new operand stack,
/// run the decode/dispatch loop, release the stack, and return the
/// result. `locals` is owned by whoever is calling in (the outermost
/// driver via [`run_main`], or `invokestatic` recursing into this same
/// function) and is dropped here along with the rest of the frame.
pub fn invoke(
    class: &ClassFile,
    heap: &mut Heap,
    method: &Method,
    locals: Vec<i32>,
    out: &mut dyn Write,
) -> Result<ReturnValue, VmError> {
    tracing::debug!(method = %method.name, arity = locals.len(), "invoke");
    let mut frame = Frame::new(locals, method.max_stack);
    interpreter::run(&mut frame, &method.code, class, heap, out)
}

/// Locates and runs the fixed entry point (§6 Entry method): a method
/// named `main` with descriptor `([Ljava/lang/String;)V`. Its absence, or
/// a non-void result, is fatal.
pub fn run_main(class: &ClassFile, heap: &mut Heap, out: &mut dyn Write) -> Result<(), VmError> {
    let method = class
        .find_method(MAIN_NAME, MAIN_DESCRIPTOR)
        .ok_or_else(|| VmError::MissingEntryPoint {
            name: MAIN_NAME.to_owned(),
            descriptor: MAIN_DESCRIPTOR.to_owned(),
        })?;

    let locals = vec![0i32; method.max_locals as usize];
    match invoke(class, heap, method, locals, out)? {
        ReturnValue::Void => Ok(()),
        ReturnValue::Int(_) => Err(VmError::NonVoidMain),
    }
}
