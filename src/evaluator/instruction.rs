//! Bytecode instruction set for the stack machine

use crate::functions::registry::{BinaryFn, UnaryFn};

/// A single stack-machine instruction
///
/// Binary instructions pop `b` then `a` and push `a op b`.
#[derive(Debug, Clone, Copy)]
pub enum Instruction {
    /// Push a value from the constant pool
    LoadConst(u32),
    /// Push the integration variable
    LoadVar,

    // Binary operations
    Add,
    Sub,
    Mul,
    Div,
    Pow,

    // Unary operations
    Neg,
    Recip,
    Sqrt,
    Abs,

    // Fused powers
    Square,
    Cube,

    /// Apply a one-argument built-in kernel
    Call1(UnaryFn),
    /// Apply a two-argument built-in kernel
    Call2(BinaryFn),
}

impl Instruction {
    /// Net change in stack depth after executing this instruction
    pub(crate) fn stack_effect(self) -> isize {
        match self {
            Instruction::LoadConst(_) | Instruction::LoadVar => 1,
            Instruction::Add
            | Instruction::Sub
            | Instruction::Mul
            | Instruction::Div
            | Instruction::Pow
            | Instruction::Call2(_) => -1,
            Instruction::Neg
            | Instruction::Recip
            | Instruction::Sqrt
            | Instruction::Abs
            | Instruction::Square
            | Instruction::Cube
            | Instruction::Call1(_) => 0,
        }
    }
}
