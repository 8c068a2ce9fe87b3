//! Scalar evaluation implementation for the bytecode evaluator.
//!
//! Expressions whose stack fits in [`INLINE_STACK_SIZE`] slots run on a
//! fixed-size array; deeper ones fall back to a heap buffer.

use super::CompiledEvaluator;
use super::instruction::Instruction;

/// Size of the inline stack buffer (on CPU stack, not heap).
///
/// 48 elements * 8 bytes = 384 bytes.
const INLINE_STACK_SIZE: usize = 48;

impl CompiledEvaluator {
    /// Evaluate the expression at a single point.
    ///
    /// Returns `NaN` or an infinity where the expression is undefined
    /// (e.g. `ln(-1)`, `1/0`); no error is raised.
    ///
    /// # Example
    ///
    /// ```
    /// use riemann_anafis::{parse, CompiledEvaluator};
    ///
    /// let eval = CompiledEvaluator::compile(&parse("x^2 + 1").unwrap()).unwrap();
    /// assert_eq!(eval.evaluate(3.0), 10.0);
    /// assert!(CompiledEvaluator::compile(&parse("sqrt(x)").unwrap()).unwrap().evaluate(-1.0).is_nan());
    /// ```
    #[inline]
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        if self.stack_size <= INLINE_STACK_SIZE {
            let mut stack = [0.0_f64; INLINE_STACK_SIZE];
            self.execute(x, &mut stack)
        } else {
            let mut stack = vec![0.0_f64; self.stack_size];
            self.execute(x, &mut stack)
        }
    }

    /// Run the bytecode over a caller-provided stack buffer.
    ///
    /// The compiler guarantees the buffer is deep enough and every pop is
    /// preceded by a matching push.
    fn execute(&self, x: f64, stack: &mut [f64]) -> f64 {
        let mut sp = 0_usize;

        for instr in &*self.instructions {
            match *instr {
                Instruction::LoadConst(idx) => {
                    stack[sp] = self.constants[idx as usize];
                    sp += 1;
                }
                Instruction::LoadVar => {
                    stack[sp] = x;
                    sp += 1;
                }

                Instruction::Add => {
                    sp -= 1;
                    stack[sp - 1] += stack[sp];
                }
                Instruction::Sub => {
                    sp -= 1;
                    stack[sp - 1] -= stack[sp];
                }
                Instruction::Mul => {
                    sp -= 1;
                    stack[sp - 1] *= stack[sp];
                }
                Instruction::Div => {
                    sp -= 1;
                    stack[sp - 1] /= stack[sp];
                }
                Instruction::Pow => {
                    sp -= 1;
                    stack[sp - 1] = stack[sp - 1].powf(stack[sp]);
                }
                Instruction::Call2(kernel) => {
                    sp -= 1;
                    stack[sp - 1] = kernel(stack[sp - 1], stack[sp]);
                }

                Instruction::Neg => stack[sp - 1] = -stack[sp - 1],
                Instruction::Recip => stack[sp - 1] = 1.0 / stack[sp - 1],
                Instruction::Sqrt => stack[sp - 1] = stack[sp - 1].sqrt(),
                Instruction::Abs => stack[sp - 1] = stack[sp - 1].abs(),
                Instruction::Square => {
                    let v = stack[sp - 1];
                    stack[sp - 1] = v * v;
                }
                Instruction::Cube => {
                    let v = stack[sp - 1];
                    stack[sp - 1] = v * v * v;
                }
                Instruction::Call1(kernel) => stack[sp - 1] = kernel(stack[sp - 1]),
            }
        }

        debug_assert_eq!(sp, 1, "bytecode must leave exactly one value");
        if sp == 1 { stack[0] } else { f64::NAN }
    }
}
