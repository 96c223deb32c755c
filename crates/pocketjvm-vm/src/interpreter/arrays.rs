use crate::decode;
use crate::error::VmError;
use crate::frame::Frame;
use crate::heap::Heap;

/// The only `newarray` type byte this engine supports (§4.3): a
/// one-dimensional array of ints.
const TYPE_INT_ARRAY: u8 = 10;

pub fn newarray(
    frame: &mut Frame,
    code: &[u8],
    opcode_pc: usize,
    heap: &mut Heap,
) -> Result<(), VmError> {
    let type_byte = decode::u8_at(code, opcode_pc + 1);
    if type_byte != TYPE_INT_ARRAY {
        return Err(VmError::UnsupportedArrayType(type_byte));
    }
    let count = frame.stack.pop()?;
    let reference = heap.allocate_int_array(count);
    frame.stack.push(reference)
}

pub fn arraylength(frame: &mut Frame, heap: &Heap) -> Result<(), VmError> {
    let reference = frame.stack.pop()?;
    let length = heap.length(reference)?;
    frame.stack.push(length)
}

pub fn iaload(frame: &mut Frame, heap: &Heap) -> Result<(), VmError> {
    let index = frame.stack.pop()?;
    let reference = frame.stack.pop()?;
    let value = heap.load(reference, index)?;
    frame.stack.push(value)
}

pub fn iastore(frame: &mut Frame, heap: &mut Heap) -> Result<(), VmError> {
    let value = frame.stack.pop()?;
    let index = frame.stack.pop()?;
    let reference = frame.stack.pop()?;
    heap.store(reference, index, value)
}

/// `dup`: duplicate the top of stack. Grouped under arrays in the source's
/// own instruction listing — it exists to let array-store sequences keep
/// the array reference on the stack across repeated `iastore`s.
pub fn dup(frame: &mut Frame) -> Result<(), VmError> {
    let v = frame.stack.pop()?;
    frame.stack.push(v)?;
    frame.stack.push(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::OperandStack;

    fn frame() -> Frame {
        Frame {
            pc: 0,
            locals: Vec::new(),
            stack: OperandStack::new(8),
        }
    }

    #[test]
    fn newarray_rejects_unsupported_type_bytes() {
        let mut f = frame();
        f.stack.push(3).unwrap();
        let mut heap = Heap::new();
        let code = [0xbc, 4]; // newarray, type 4 (float)
        assert!(matches!(
            newarray(&mut f, &code, 0, &mut heap),
            Err(VmError::UnsupportedArrayType(4))
        ));
    }

    #[test]
    fn newarray_then_store_then_load_round_trips() {
        let mut f = frame();
        let mut heap = Heap::new();
        f.stack.push(3).unwrap();
        let code = [0xbc, 10]; // newarray, type 10 (int)
        newarray(&mut f, &code, 0, &mut heap).unwrap();
        let reference = f.stack.pop().unwrap();

        f.stack.push(reference).unwrap();
        f.stack.push(1).unwrap();
        f.stack.push(99).unwrap();
        iastore(&mut f, &mut heap).unwrap();

        f.stack.push(reference).unwrap();
        f.stack.push(1).unwrap();
        iaload(&mut f, &heap).unwrap();
        assert_eq!(f.stack.pop().unwrap(), 99);
    }

    #[test]
    fn dup_pushes_a_second_copy() {
        let mut f = frame();
        f.stack.push(5).unwrap();
        dup(&mut f).unwrap();
        assert_eq!(f.stack.depth(), 2);
        assert_eq!(f.stack.pop().unwrap(), 5);
        assert_eq!(f.stack.pop().unwrap(), 5);
    }
}
