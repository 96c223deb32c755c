use crate::stack::OperandStack;

/// Per-invocation execution context (§3 Frame). Owned exclusively by the
/// invocation that created it and released when that invocation returns —
/// there is no frame pool or frame stack; recursion is the host call stack
/// (§9 "Frame recursion uses host stack").
pub struct Frame {
    pub pc: usize,
    pub locals: Vec<i32>,
    pub stack: OperandStack,
}

impl Frame {
    /// `locals` is pre-filled by the caller: positions `0..arity` hold the
    /// arguments, the rest are zero (§3: "zero-initialized except positions
    /// 0..arity-1").
    pub fn new(locals: Vec<i32>, max_stack: u16) -> Self {
        Self {
            pc: 0,
            locals,
            stack: OperandStack::new(max_stack as usize),
        }
    }
}
