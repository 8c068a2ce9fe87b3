//! Compiled expression evaluator for fast numerical evaluation.
//!
//! This module converts expression trees into flat bytecode that can be evaluated
//! without tree traversal. The evaluator is immutable after compilation, so one
//! instance can be shared across threads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌────────────┐    ┌─────────────────────┐
//! │    Expr     │ -> │  Compiler  │ -> │  CompiledEvaluator  │
//! │ (AST Tree)  │    │ (Bytecode) │    │   (Stack Machine)   │
//! └─────────────┘    └────────────┘    └─────────────────────┘
//!                                              │
//!                          ┌───────────────────┼───────────────────┐
//!                          ▼                   ▼                   ▼
//!                    ┌──────────┐       ┌──────────┐       ┌──────────┐
//!                    │ evaluate │       │eval_batch│       │ parallel │
//!                    │ (scalar) │       │  (SIMD)  │       │  (Rayon) │
//!                    └──────────┘       └──────────┘       └──────────┘
//! ```
//!
//! All three paths run the same bytecode with the same kernels, so a point
//! produces the same bits no matter which path evaluated it.
//!
//! # Example
//!
//! ```
//! use riemann_anafis::{parse, CompiledEvaluator};
//!
//! let expr = parse("sin(x) * cos(x) + x^2").unwrap();
//! let evaluator = CompiledEvaluator::compile(&expr).unwrap();
//!
//! let result = evaluator.evaluate(0.5);
//! assert!((result - (0.5_f64.sin() * 0.5_f64.cos() + 0.25)).abs() < 1e-12);
//! ```

mod compiler;
mod execution;
mod instruction;
mod simd;


pub use compiler::MAX_STACK_DEPTH;

use crate::Expr;
use crate::error::ParseError;
use compiler::Compiler;
use instruction::Instruction;

/// Bytecode program for a single-variable expression
#[derive(Clone)]
pub struct CompiledEvaluator {
    /// Flat instruction stream in post-order
    instructions: Box<[Instruction]>,
    /// Deduplicated constant pool
    constants: Box<[f64]>,
    /// Stack slots needed, computed at compile time
    stack_size: usize,
}

impl CompiledEvaluator {
    /// Compile an expression over `x` into bytecode
    ///
    /// # Errors
    ///
    /// - `UnknownVariable` if the expression names a symbol other than `x`
    ///   or a known constant
    /// - `UnknownFunction` / `InvalidArity` for bad calls
    /// - `StackOverflow` if evaluation would need more than [`MAX_STACK_DEPTH`] slots
    pub fn compile(expr: &Expr) -> Result<Self, ParseError> {
        let mut compiler = Compiler::new();
        compiler.compile_expr(expr)?;
        let (instructions, constants, stack_size) = compiler.into_parts();

        Ok(Self {
            instructions: instructions.into_boxed_slice(),
            constants: constants.into_boxed_slice(),
            stack_size,
        })
    }

    /// Number of bytecode instructions
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Maximum stack depth required during evaluation
    #[must_use]
    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    /// True when the program is a single constant load
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(*self.instructions, [Instruction::LoadConst(_)])
    }
}

impl std::fmt::Debug for CompiledEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledEvaluator")
            .field("instruction_count", &self.instructions.len())
            .field("stack_size", &self.stack_size)
            .field("constant_count", &self.constants.len())
            .finish()
    }
}
