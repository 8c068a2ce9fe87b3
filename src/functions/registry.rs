use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Single-argument numeric kernel
pub(crate) type UnaryFn = fn(f64) -> f64;

/// Two-argument numeric kernel
pub(crate) type BinaryFn = fn(f64, f64) -> f64;

/// Definition of a built-in function including its evaluation kernels
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin", "log")
    pub name: &'static str,

    /// Kernel used for the one-argument form
    pub unary: Option<UnaryFn>,

    /// Kernel used for the two-argument form
    pub binary: Option<BinaryFn>,

    /// LaTeX operator name (e.g., `\sin`); `None` falls back to `\operatorname`
    pub latex: Option<&'static str>,
}

impl FunctionDefinition {
    /// Acceptable argument count (arity)
    pub(crate) fn arity(&self) -> RangeInclusive<usize> {
        match (self.unary, self.binary) {
            (Some(_), Some(_)) => 1..=2,
            (None, Some(_)) => 2..=2,
            _ => 1..=1,
        }
    }

    /// Helper to check if argument count is valid
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity().contains(&args)
    }

    /// Human-readable arity for error messages
    pub(crate) fn arity_text(&self) -> String {
        let arity = self.arity();
        if arity.start() == arity.end() {
            arity.start().to_string()
        } else {
            format!("{} or {}", arity.start(), arity.end())
        }
    }

    /// Evaluate with already-computed argument values
    pub(crate) fn eval(&self, args: &[f64]) -> Option<f64> {
        match args {
            [a] => self.unary.map(|f| f(*a)),
            [a, b] => self.binary.map(|f| f(*a, *b)),
            _ => None,
        }
    }
}

/// Static registry storing all function definitions
static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

/// Initialize the registry with all function definitions
fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    let defs = super::definitions::all_definitions();
    let mut map = FxHashMap::with_capacity_and_hasher(defs.len(), Default::default());

    for def in defs {
        map.insert(def.name, def);
    }

    map
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Get a function definition by name - O(1) HashMap lookup
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }
}
