//! Reserved symbol names: the integration variable and named constants

/// The only free variable an integrand may reference
pub const VARIABLE: &str = "x";

/// Named constants and their values
static CONSTANTS: &[(&str, f64)] = &[
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("E", std::f64::consts::E),
];

/// Look up the numeric value of a named constant
pub fn constant_value(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, value)| *value)
}

/// True when `name` is the Euler constant in any accepted spelling
pub fn is_euler(name: &str) -> bool {
    matches!(name, "e" | "E")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_lookup() {
        assert_eq!(constant_value("pi"), Some(std::f64::consts::PI));
        assert_eq!(constant_value("E"), constant_value("e"));
        assert_eq!(constant_value("x"), None);
        assert!(is_euler("E"));
        assert!(!is_euler("pi"));
    }
}
