/// Every condition that violates an execution invariant. Every variant is
/// fatal — there is no recoverable path once one is raised (§7: this is a
/// trusted-input interpreter, not a verifier).
#[derive(Debug, thiserror::Error)]
pub enum VmError {
    #[error("operand stack overflow (capacity {capacity})")]
    StackOverflow { capacity: usize },

    #[error("operand stack underflow")]
    StackUnderflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("array index {index} out of bounds for length {length}")]
    ArrayIndexOutOfBounds { index: i32, length: i32 },

    #[error("heap reference {0} does not name a live array")]
    BadHeapReference(i32),

    #[error("unknown opcode 0x{0:02x} at pc {1}")]
    UnknownOpcode(u8, usize),

    #[error("newarray type byte {0} is not supported (only integer arrays, type 10, are)")]
    UnsupportedArrayType(u8),

    #[error("constant pool index {0} does not resolve to a method in this class")]
    BadMethodIndex(u16),

    #[error("call expected {expected} arguments but only {found} were available")]
    ArityMismatch { expected: u16, found: usize },

    #[error("class file has no '{name}{descriptor}' method")]
    MissingEntryPoint { name: String, descriptor: String },

    #[error("'main' must return void but returned an int")]
    NonVoidMain,

    #[error(transparent)]
    ClassFile(#[from] pocketjvm_classfile::ClassFileError),

    #[error("at pc {pc}: {source}")]
    AtPc {
        pc: usize,
        #[source]
        source: Box<VmError>,
    },
}

impl VmError {
    /// Attaches the pc of the opcode whose dispatch produced `err`, so the
    /// top-level diagnostic (§7 Observability) can name a location for
    /// conditions besides `UnknownOpcode`, which already carries one.
    ///
    /// If `err` is already an `AtPc` (raised by a recursive `invokestatic`
    /// call further down the host call stack), it is left alone — the
    /// innermost pc is the one that actually names the fault.
    pub fn at_pc(pc: usize, err: VmError) -> VmError {
        match err {
            VmError::AtPc { .. } => err,
            other => VmError::AtPc {
                pc,
                source: Box::new(other),
            },
        }
    }
}
