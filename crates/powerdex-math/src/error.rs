use thiserror::Error;

/// Errors from exact arithmetic.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MathError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Factorial table holds up to {max}!, requested {requested}!")]
    FactorialOutOfRange { requested: usize, max: usize },
}
