use pocketjvm_types::Opcode;

use crate::decode;
use crate::error::VmError;
use crate::frame::Frame;

/// All conditional and unconditional branches (§4.4 Branches). The target,
/// when taken, is the opcode's own address plus the stored signed offset —
/// not the post-immediates address (§9 Branch offset arithmetic).
pub fn dispatch(
    frame: &mut Frame,
    code: &[u8],
    opcode: Opcode,
    opcode_pc: usize,
) -> Result<usize, VmError> {
    use Opcode::*;

    let taken = match opcode {
        Goto => true,
        Ifeq | Ifne | Iflt | Ifge | Ifgt | Ifle => {
            let v = frame.stack.pop()?;
            compare_to_zero(opcode, v)
        }
        IfIcmpeq | IfIcmpne | IfIcmplt | IfIcmpge | IfIcmpgt | IfIcmple => {
            let b = frame.stack.pop()?;
            let a = frame.stack.pop()?;
            compare(opcode, a, b)
        }
        _ => unreachable!("dispatch called with a non-branch opcode"),
    };

    if taken {
        let offset = decode::i16_at(code, opcode_pc + 1) as i64;
        Ok((opcode_pc as i64 + offset) as usize)
    } else {
        Ok(opcode_pc + 3)
    }
}

fn compare_to_zero(opcode: Opcode, v: i32) -> bool {
    use Opcode::*;
    match opcode {
        Ifeq => v == 0,
        Ifne => v != 0,
        Iflt => v < 0,
        Ifge => v >= 0,
        Ifgt => v > 0,
        Ifle => v <= 0,
        _ => unreachable!(),
    }
}

fn compare(opcode: Opcode, a: i32, b: i32) -> bool {
    use Opcode::*;
    match opcode {
        IfIcmpeq => a == b,
        IfIcmpne => a != b,
        IfIcmplt => a < b,
        IfIcmpge => a >= b,
        IfIcmpgt => a > b,
        IfIcmple => a <= b,
        _ => unreachable!(),
    }
}
