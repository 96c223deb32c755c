//! The decode/dispatch loop (§4.3, §4.4) and its per-category instruction
//! semantics. `run` is the only entry point; everything else here is
//! organized by the same groupings the instruction listing uses
//! (constants, locals, arithmetic, branches, invocation, arrays).

pub mod arithmetic;
pub mod arrays;
pub mod branches;
pub mod constants;
pub mod invocation;
pub mod locals;

use std::io::Write;

use pocketjvm_classfile::ClassFile;
use pocketjvm_types::{Opcode, ReturnValue};

use crate::decode;
use crate::error::VmError;
use crate::frame::Frame;
use crate::heap::Heap;

/// The outcome of dispatching a single instruction: either the frame keeps
/// running at a new `pc`, or a `return`/`ireturn`/`areturn` produced a
/// result and the frame is done.
enum Step {
    Continue(usize),
    Return(ReturnValue),
}

/// Runs one frame's instruction stream to completion (§4.5 step 3): decode
/// one instruction at the current `pc`, dispatch its effect, and repeat
/// until a `return`/`ireturn`/`areturn` produces a result, or `pc` runs off
/// the end of `code` (the dispatch state machine's only other terminal
/// state — §4.4).
pub fn run(
    frame: &mut Frame,
    code: &[u8],
    class: &ClassFile,
    heap: &mut Heap,
    out: &mut dyn Write,
) -> Result<ReturnValue, VmError> {
    loop {
        if frame.pc >= code.len() {
            return Ok(ReturnValue::Void);
        }

        let opcode_pc = frame.pc;
        let byte = code[opcode_pc];
        let opcode = Opcode::decode(byte).ok_or(VmError::UnknownOpcode(byte, opcode_pc))?;
        tracing::trace!(pc = opcode_pc, ?opcode, "dispatch");

        // Dispatched through a closure, not inline, so every error raised
        // below (stack over/underflow, division by zero, a bad heap
        // reference, ...) can be tagged with the pc that produced it before
        // it escapes `run` (§7 Observability) — `UnknownOpcode` above
        // already carries its own pc and never reaches this closure.
        let step = (|| -> Result<Step, VmError> {
            use Opcode::*;

            let next_pc = opcode_pc + 1 + opcode.immediate_len();

            Ok(match opcode {
                Nop => Step::Continue(next_pc),

                IconstM1 | Iconst0 | Iconst1 | Iconst2 | Iconst3 | Iconst4 | Iconst5 => {
                    frame.stack.push(constants::constant_value(opcode))?;
                    Step::Continue(next_pc)
                }
                Bipush => {
                    frame.stack.push(decode::i8_at(code, opcode_pc + 1))?;
                    Step::Continue(next_pc)
                }
                Sipush => {
                    frame.stack.push(decode::i16_at(code, opcode_pc + 1))?;
                    Step::Continue(next_pc)
                }
                Ldc => {
                    constants::ldc(frame, code, opcode_pc, class)?;
                    Step::Continue(next_pc)
                }

                Iload | Aload => {
                    locals::load_indexed(frame, code, opcode_pc)?;
                    Step::Continue(next_pc)
                }
                Iload0 | Aload0 => {
                    locals::load_fixed(frame, 0)?;
                    Step::Continue(next_pc)
                }
                Iload1 | Aload1 => {
                    locals::load_fixed(frame, 1)?;
                    Step::Continue(next_pc)
                }
                Iload2 | Aload2 => {
                    locals::load_fixed(frame, 2)?;
                    Step::Continue(next_pc)
                }
                Iload3 | Aload3 => {
                    locals::load_fixed(frame, 3)?;
                    Step::Continue(next_pc)
                }
                Istore | Astore => {
                    locals::store_indexed(frame, code, opcode_pc)?;
                    Step::Continue(next_pc)
                }
                Istore0 | Astore0 => {
                    locals::store_fixed(frame, 0)?;
                    Step::Continue(next_pc)
                }
                Istore1 | Astore1 => {
                    locals::store_fixed(frame, 1)?;
                    Step::Continue(next_pc)
                }
                Istore2 | Astore2 => {
                    locals::store_fixed(frame, 2)?;
                    Step::Continue(next_pc)
                }
                Istore3 | Astore3 => {
                    locals::store_fixed(frame, 3)?;
                    Step::Continue(next_pc)
                }

                Iadd | Isub | Imul | Idiv | Irem | Ineg | Ishl | Ishr | Iushr | Iand | Ior
                | Ixor => {
                    arithmetic::apply(frame, opcode)?;
                    Step::Continue(next_pc)
                }
                Iinc => {
                    locals::iinc(frame, code, opcode_pc)?;
                    Step::Continue(next_pc)
                }

                Ifeq | Ifne | Iflt | Ifge | Ifgt | Ifle | IfIcmpeq | IfIcmpne | IfIcmplt
                | IfIcmpge | IfIcmpgt | IfIcmple | Goto => {
                    Step::Continue(branches::dispatch(frame, code, opcode, opcode_pc)?)
                }

                Getstatic => Step::Continue(next_pc),
                Invokevirtual => {
                    invocation::print(frame, out)?;
                    Step::Continue(next_pc)
                }
                Invokestatic => {
                    invocation::invoke_static(frame, code, opcode_pc, class, heap, out)?;
                    Step::Continue(next_pc)
                }
                Return => Step::Return(ReturnValue::Void),
                Ireturn | Areturn => {
                    let v = frame.stack.pop()?;
                    Step::Return(ReturnValue::Int(v))
                }

                Newarray => {
                    arrays::newarray(frame, code, opcode_pc, heap)?;
                    Step::Continue(next_pc)
                }
                Arraylength => {
                    arrays::arraylength(frame, heap)?;
                    Step::Continue(next_pc)
                }
                Iaload => {
                    arrays::iaload(frame, heap)?;
                    Step::Continue(next_pc)
                }
                Iastore => {
                    arrays::iastore(frame, heap)?;
                    Step::Continue(next_pc)
                }
                Dup => {
                    arrays::dup(frame)?;
                    Step::Continue(next_pc)
                }
            })
        })()
        .map_err(|e| VmError::at_pc(opcode_pc, e))?;

        match step {
            Step::Continue(pc) => frame.pc = pc,
            Step::Return(rv) => return Ok(rv),
        }
    }
}

#[cfg(test)]
mod tests {
    use pocketjvm_classfile::{ClassFile, ConstantPool, ConstantPoolEntry, Method};

    use super::*;
    use crate::heap::Heap;

    fn main_method(max_stack: u16, max_locals: u16, code: Vec<u8>) -> Method {
        Method {
            name: "main".to_owned(),
            descriptor: "([Ljava/lang/String;)V".to_owned(),
            max_stack,
            max_locals,
            code,
        }
    }

    fn empty_pool() -> ConstantPool {
        ConstantPool::from_entries(vec![ConstantPoolEntry::Other])
    }

    #[test]
    fn fatal_error_is_tagged_with_the_faulting_opcode_pc() {
        // bipush 1; bipush 0; idiv (pc 4) -- fails here; invokevirtual; return
        let code = vec![0x10, 0x01, 0x10, 0x00, 0x6c, 0xb6, 0x00, 0x00, 0xb1];
        let method = main_method(2, 0, code);
        let mut frame = Frame::new(Vec::new(), method.max_stack);
        let class = ClassFile {
            constant_pool: empty_pool(),
            methods: vec![],
        };
        let mut heap = Heap::new();
        let mut out = Vec::new();

        let err = run(&mut frame, &method.code, &class, &mut heap, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "at pc 4: division by zero");
        match err {
            VmError::AtPc { pc, source } => {
                assert_eq!(pc, 4);
                assert!(matches!(*source, VmError::DivisionByZero));
            }
            other => panic!("expected VmError::AtPc, got {other:?}"),
        }
    }

    #[test]
    fn recursive_invokestatic_keeps_the_innermost_faulting_pc() {
        // Constant pool: #1 "boom", #2 "()I", #3 NameAndType(1, 2), #4 Methodref(_, 3).
        let pool = ConstantPool::from_entries(vec![
            ConstantPoolEntry::Other,
            ConstantPoolEntry::Utf8("boom".to_owned()),
            ConstantPoolEntry::Utf8("()I".to_owned()),
            ConstantPoolEntry::NameAndType {
                name_index: 1,
                descriptor_index: 2,
            },
            ConstantPoolEntry::Methodref {
                class_index: 0,
                name_and_type_index: 3,
            },
        ]);

        // main: invokestatic #4 (boom) at pc 0; invokevirtual; return
        let main_code = vec![0xb8, 0x00, 0x04, 0xb6, 0x00, 0x00, 0xb1];
        // boom: bipush 1; bipush 0; idiv (pc 4); ireturn
        let boom_code = vec![0x10, 0x01, 0x10, 0x00, 0x6c, 0xac];

        let class = ClassFile {
            constant_pool: pool,
            methods: vec![
                main_method(2, 0, main_code.clone()),
                Method {
                    name: "boom".to_owned(),
                    descriptor: "()I".to_owned(),
                    max_stack: 2,
                    max_locals: 0,
                    code: boom_code,
                },
            ],
        };

        let mut frame = Frame::new(Vec::new(), 2);
        let mut heap = Heap::new();
        let mut out = Vec::new();
        let err = run(&mut frame, &main_code, &class, &mut heap, &mut out).unwrap_err();

        // The faulting idiv is at pc 4 inside `boom`, not at pc 0 where main
        // invoked it -- the outer invokestatic must not overwrite that pc.
        match err {
            VmError::AtPc { pc, source } => {
                assert_eq!(pc, 4);
                assert!(matches!(*source, VmError::DivisionByZero));
            }
            other => panic!("expected VmError::AtPc, got {other:?}"),
        }
    }
}
