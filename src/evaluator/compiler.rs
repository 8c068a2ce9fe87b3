//! Expression compiler for the bytecode evaluator.
//!
//! This module compiles symbolic [`Expr`] expressions into bytecode
//! ([`Instruction`]s) that can be executed by the [`CompiledEvaluator`].
//!
//! # Compilation Process
//!
//! 1. **Constant folding**: subtrees without `x` are evaluated once, with the
//!    same kernels the VM uses
//! 2. **Power specialisation**: `u^2`, `u^3` and `u^-1` become fused instructions;
//!    `u^0.5` stays a `Pow`, since `sqrt` differs from `powf` at `-0` and `-inf`
//! 3. **Instruction emission**: post-order walk of the tree
//!
//! The compiler tracks stack depth throughout compilation so the VM can
//! pre-allocate the exact stack size it needs.
//!
//! [`CompiledEvaluator`]: super::CompiledEvaluator

use super::instruction::Instruction;
use crate::error::ParseError;
use crate::functions::Registry;
use crate::known_symbols;
use crate::{Expr, ExprKind};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Maximum allowed stack depth to prevent deeply nested expressions from causing issues.
pub const MAX_STACK_DEPTH: usize = 1024;

/// Internal compiler state for transforming expressions to bytecode.
pub struct Compiler {
    /// Emitted bytecode instructions
    instructions: Vec<Instruction>,
    /// Current stack depth during compilation
    current_stack: usize,
    /// Maximum stack depth seen during compilation
    max_stack: usize,
    /// Constant pool for numeric literals
    constants: Vec<f64>,
    /// Map from constant bit pattern → pool index (deduplication)
    const_map: FxHashMap<u64, u32>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            instructions: Vec::with_capacity(32),
            current_stack: 0,
            max_stack: 0,
            constants: Vec::new(),
            const_map: FxHashMap::default(),
        }
    }

    /// Add a constant to the pool, deduplicating by bit pattern.
    #[inline]
    pub(crate) fn add_const(&mut self, val: f64) -> u32 {
        let bits = val.to_bits();
        match self.const_map.entry(bits) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => {
                // Pool size is bounded by the node limit of the parser
                #[allow(clippy::cast_possible_truncation)]
                let idx = self.constants.len() as u32;
                self.constants.push(val);
                v.insert(idx);
                idx
            }
        }
    }

    /// Emit an instruction and track its effect on the stack depth.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::StackOverflow` if the stack would exceed `MAX_STACK_DEPTH`.
    pub(crate) fn emit(&mut self, instr: Instruction) -> Result<(), ParseError> {
        let effect = instr.stack_effect();
        self.current_stack = self.current_stack.saturating_add_signed(effect);
        if self.current_stack > MAX_STACK_DEPTH {
            return Err(ParseError::StackOverflow {
                depth: self.current_stack,
                limit: MAX_STACK_DEPTH,
            });
        }
        self.max_stack = self.max_stack.max(self.current_stack);
        self.instructions.push(instr);
        Ok(())
    }

    /// Consume the compiler, returning `(instructions, constants, max_stack)`
    pub(crate) fn into_parts(self) -> (Vec<Instruction>, Vec<f64>, usize) {
        (self.instructions, self.constants, self.max_stack)
    }

    /// Emitted instructions so far
    #[cfg(test)]
    pub(crate) fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Evaluate a subtree that does not depend on `x`.
    ///
    /// Returns `None` when the subtree mentions the variable or cannot be
    /// folded (unknown name, wrong arity).
    pub(crate) fn try_eval_const(expr: &Expr) -> Option<f64> {
        match &expr.kind {
            ExprKind::Number(n) => Some(*n),
            ExprKind::Symbol(s) => known_symbols::constant_value(s),
            ExprKind::FunctionCall { name, args } => {
                let values = args
                    .iter()
                    .map(Self::try_eval_const)
                    .collect::<Option<Vec<f64>>>()?;
                Registry::get(name)?.eval(&values)
            }
            ExprKind::Add(u, v) => Some(Self::try_eval_const(u)? + Self::try_eval_const(v)?),
            ExprKind::Sub(u, v) => Some(Self::try_eval_const(u)? - Self::try_eval_const(v)?),
            ExprKind::Mul(u, v) => Some(Self::try_eval_const(u)? * Self::try_eval_const(v)?),
            ExprKind::Div(u, v) => Some(Self::try_eval_const(u)? / Self::try_eval_const(v)?),
            ExprKind::Pow(u, v) => Some(Self::try_eval_const(u)?.powf(Self::try_eval_const(v)?)),
        }
    }

    /// Compile an expression tree, appending to the instruction stream.
    ///
    /// # Errors
    ///
    /// - `UnknownVariable`: symbol other than `x` or a known constant
    /// - `UnknownFunction` / `InvalidArity`: bad function call
    /// - `StackOverflow`: expression too deeply nested
    pub(crate) fn compile_expr(&mut self, expr: &Expr) -> Result<(), ParseError> {
        if let Some(value) = Self::try_eval_const(expr) {
            let idx = self.add_const(value);
            return self.emit(Instruction::LoadConst(idx));
        }

        match &expr.kind {
            ExprKind::Number(n) => {
                let idx = self.add_const(*n);
                self.emit(Instruction::LoadConst(idx))
            }
            ExprKind::Symbol(s) => {
                if &**s == known_symbols::VARIABLE {
                    self.emit(Instruction::LoadVar)
                } else {
                    Err(ParseError::UnknownVariable {
                        name: s.to_string(),
                        span: None,
                    })
                }
            }
            ExprKind::FunctionCall { name, args } => self.compile_function_call(name, args),
            ExprKind::Add(u, v) => self.compile_binary(u, v, Instruction::Add),
            ExprKind::Sub(u, v) => self.compile_binary(u, v, Instruction::Sub),
            ExprKind::Mul(u, v) => {
                if u.is_neg_one_num() {
                    self.compile_expr(v)?;
                    self.emit(Instruction::Neg)
                } else {
                    self.compile_binary(u, v, Instruction::Mul)
                }
            }
            ExprKind::Div(u, v) => {
                if u.as_number() == Some(1.0) {
                    self.compile_expr(v)?;
                    self.emit(Instruction::Recip)
                } else {
                    self.compile_binary(u, v, Instruction::Div)
                }
            }
            ExprKind::Pow(base, exp) => self.compile_power(base, exp),
        }
    }

    fn compile_binary(&mut self, u: &Expr, v: &Expr, instr: Instruction) -> Result<(), ParseError> {
        self.compile_expr(u)?;
        self.compile_expr(v)?;
        self.emit(instr)
    }

    fn compile_power(&mut self, base: &Expr, exp: &Expr) -> Result<(), ParseError> {
        // e^u uses the exp kernel
        if base.as_symbol().is_some_and(known_symbols::is_euler) {
            self.compile_expr(exp)?;
            return self.emit(Instruction::Call1(f64::exp));
        }

        let fused = match Self::try_eval_const(exp) {
            Some(2.0) => Some(Instruction::Square),
            Some(3.0) => Some(Instruction::Cube),
            Some(-1.0) => Some(Instruction::Recip),
            _ => None,
        };

        match fused {
            Some(instr) => {
                self.compile_expr(base)?;
                self.emit(instr)
            }
            None => self.compile_binary(base, exp, Instruction::Pow),
        }
    }

    fn compile_function_call(&mut self, name: &str, args: &[Expr]) -> Result<(), ParseError> {
        let def = Registry::get(name).ok_or_else(|| ParseError::UnknownFunction {
            name: name.to_string(),
            span: None,
        })?;

        let arity_error = || ParseError::InvalidArity {
            name: name.to_string(),
            expected: def.arity_text(),
            got: args.len(),
        };

        match args {
            [arg] => {
                let kernel = def.unary.ok_or_else(arity_error)?;
                self.compile_expr(arg)?;
                let instr = match name {
                    "sqrt" => Instruction::Sqrt,
                    "abs" => Instruction::Abs,
                    _ => Instruction::Call1(kernel),
                };
                self.emit(instr)
            }
            [a, b] => {
                let kernel = def.binary.ok_or_else(arity_error)?;
                self.compile_expr(a)?;
                self.compile_expr(b)?;
                self.emit(Instruction::Call2(kernel))
            }
            _ => Err(arity_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn compile(s: &str) -> Compiler {
        let mut compiler = Compiler::new();
        compiler.compile_expr(&parse(s).unwrap()).unwrap();
        compiler
    }

    #[test]
    fn test_constant_folding() {
        let compiler = compile("2 * pi + 1");
        assert_eq!(compiler.instructions().len(), 1);
        assert!(matches!(compiler.instructions()[0], Instruction::LoadConst(_)));
        let (_, constants, max_stack) = compiler.into_parts();
        assert_eq!(constants, vec![2.0 * std::f64::consts::PI + 1.0]);
        assert_eq!(max_stack, 1);
    }

    #[test]
    fn test_compile_square() {
        let compiler = compile("x**2");
        let instrs = compiler.instructions();
        assert_eq!(instrs.len(), 2);
        assert!(matches!(instrs[0], Instruction::LoadVar));
        assert!(matches!(instrs[1], Instruction::Square));
    }

    #[test]
    fn test_compile_negation() {
        let compiler = compile("-x");
        assert!(matches!(compiler.instructions()[1], Instruction::Neg));
    }

    #[test]
    fn test_stack_depth() {
        // x + (x * (x - 1)) needs three slots
        let (_, _, max_stack) = compile("x + x * (x - 1)").into_parts();
        assert_eq!(max_stack, 3);
    }

    #[test]
    fn test_constants_deduplicated() {
        let (_, constants, _) = compile("x^4 + 4 * x + 4").into_parts();
        assert_eq!(constants, vec![4.0]);
    }

    #[test]
    fn test_unbound_variable() {
        let expr = Expr::add_expr(Expr::symbol("x"), Expr::symbol("y"));
        let err = Compiler::new().compile_expr(&expr).unwrap_err();
        assert!(matches!(err, ParseError::UnknownVariable { ref name, .. } if name == "y"));
    }

    #[test]
    fn test_unknown_function() {
        let expr = Expr::func_multi("gamma", vec![Expr::symbol("x")]);
        let err = Compiler::new().compile_expr(&expr).unwrap_err();
        assert!(matches!(err, ParseError::UnknownFunction { .. }));
    }
}
