//! Powerdex Math - exact arithmetic for power index computation.
//!
//! No floating point anywhere: weights, thresholds and ordering counts are
//! `BigUint`s, and quotients are rendered to decimal strings by long
//! division on the remainder.

pub mod factorial;
pub mod division;
pub mod error;

pub use factorial::{binomial_row, FactorialTable};
pub use division::{ceil_div, long_division, DEFAULT_PRECISION};
pub use error::MathError;
