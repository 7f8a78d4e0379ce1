//! Built-in mathematical functions and constants.
//!
//! Every function takes its arguments as a slice already checked against the arity it
//! is registered with, and returns `Err` instead of a sentinel value when its input is
//! outside its domain (negative factorial, `r > n` for combinations). Transcendental
//! functions go through `libm` so the crate stays usable without `std`; out-of-range
//! inputs to those follow IEEE semantics (`sqrt(-1)` is NaN).

use alloc::format;

use libm::{
    acos, asin, atan, cbrt, ceil, cos, exp, fabs, floor, log as ln, log10, pow, round, sin, sqrt,
    tan,
};

use crate::Real;
use crate::constants::{E, PI};
use crate::error::{ExprError, Result};
use crate::registry::Registry;
use crate::types::Arity;

fn unary(f: fn(Real) -> Real) -> impl Fn(&[Real]) -> Result<Real> {
    move |args| Ok(f(args[0]))
}

pub fn cot(a: Real) -> Real {
    1.0 / tan(a)
}

pub fn sec(a: Real) -> Real {
    1.0 / cos(a)
}

pub fn cosec(a: Real) -> Real {
    1.0 / sin(a)
}

pub fn deg2rad(a: Real) -> Real {
    a * (PI / 180.0)
}

pub fn rad2deg(a: Real) -> Real {
    a * (180.0 / PI)
}

/// Smallest argument. Fails on an empty list.
pub fn min(args: &[Real]) -> Result<Real> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| ExprError::InvalidArgument("min requires at least one argument".into()))?;
    Ok(rest.iter().fold(*first, |acc, &v| if v < acc { v } else { acc }))
}

/// Largest argument. Fails on an empty list.
pub fn max(args: &[Real]) -> Result<Real> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| ExprError::InvalidArgument("max requires at least one argument".into()))?;
    Ok(rest.iter().fold(*first, |acc, &v| if v > acc { v } else { acc }))
}

/// `n!` for the integer part of `n`.
///
/// Fractional inputs are truncated, so `factorial(3.7)` is `6`. Negative inputs fail
/// with [`ExprError::InvalidArgument`].
pub fn factorial(n: Real) -> Result<Real> {
    if n < 0.0 {
        return Err(ExprError::InvalidArgument(format!(
            "factorial of negative number {}",
            n
        )));
    }
    // 171! overflows f64
    if n >= 171.0 {
        return Ok(Real::INFINITY);
    }
    let mut result = 1.0;
    let mut i = 2.0;
    while i <= n {
        result *= i;
        i += 1.0;
    }
    Ok(result)
}

fn check_selection(name: &str, n: Real, r: Real) -> Result<()> {
    if n < 0.0 || r < 0.0 || r > n {
        return Err(ExprError::InvalidArgument(format!(
            "{}({}, {}) requires 0 <= r <= n",
            name, n, r
        )));
    }
    Ok(())
}

/// Combinations: `n! / (r! (n - r)!)`.
pub fn ncr(n: Real, r: Real) -> Result<Real> {
    check_selection("nCr", n, r)?;
    Ok(factorial(n)? / (factorial(r)? * factorial(n - r)?))
}

/// Permutations: `n! / (n - r)!`.
pub fn npr(n: Real, r: Real) -> Result<Real> {
    check_selection("nPr", n, r)?;
    Ok(factorial(n)? / factorial(n - r)?)
}

/// Registers the 26 built-in functions.
pub fn register_builtin_functions(registry: &mut Registry) -> Result<()> {
    // Trigonometric
    registry.register_function("sin", Arity::Fixed(1), unary(sin))?;
    registry.register_function("cos", Arity::Fixed(1), unary(cos))?;
    registry.register_function("tan", Arity::Fixed(1), unary(tan))?;
    registry.register_function("cot", Arity::Fixed(1), unary(cot))?;
    registry.register_function("sec", Arity::Fixed(1), unary(sec))?;
    registry.register_function("cosec", Arity::Fixed(1), unary(cosec))?;

    // Inverse trigonometric
    registry.register_function("asin", Arity::Fixed(1), unary(asin))?;
    registry.register_function("acos", Arity::Fixed(1), unary(acos))?;
    registry.register_function("atan", Arity::Fixed(1), unary(atan))?;

    // Powers and roots
    registry.register_function("pow", Arity::Fixed(2), |args| Ok(pow(args[0], args[1])))?;
    registry.register_function("sqrt", Arity::Fixed(1), unary(sqrt))?;
    registry.register_function("cbrt", Arity::Fixed(1), unary(cbrt))?;

    // Logarithms and exponential
    registry.register_function("ln", Arity::Fixed(1), unary(ln))?;
    registry.register_function("log10", Arity::Fixed(1), unary(log10))?;
    registry.register_function("exp", Arity::Fixed(1), unary(exp))?;

    // Absolute value and rounding
    registry.register_function("abs", Arity::Fixed(1), unary(fabs))?;
    registry.register_function("floor", Arity::Fixed(1), unary(floor))?;
    registry.register_function("ceil", Arity::Fixed(1), unary(ceil))?;
    registry.register_function("round", Arity::Fixed(1), unary(round))?;

    // Angle conversion
    registry.register_function("deg2rad", Arity::Fixed(1), unary(deg2rad))?;
    registry.register_function("rad2deg", Arity::Fixed(1), unary(rad2deg))?;

    registry.register_function("min", Arity::Variadic { min: 1 }, min)?;
    registry.register_function("max", Arity::Variadic { min: 1 }, max)?;

    // Combinatorics
    registry.register_function("factorial", Arity::Fixed(1), |args| factorial(args[0]))?;
    registry.register_function("nCr", Arity::Fixed(2), |args| ncr(args[0], args[1]))?;
    registry.register_function("nPr", Arity::Fixed(2), |args| npr(args[0], args[1]))?;

    Ok(())
}

/// Registers the 13 built-in constants.
pub fn register_builtin_constants(registry: &mut Registry) -> Result<()> {
    registry.register_constant("pi", PI)?;
    registry.register_constant("e", E)?;
    registry.register_constant("tau", core::f64::consts::TAU)?;
    registry.register_constant("phi", (1.0 + sqrt(5.0)) / 2.0)?;

    registry.register_constant("sqrt2", core::f64::consts::SQRT_2)?;
    registry.register_constant("sqrt3", sqrt(3.0))?;
    registry.register_constant("sqrt5", sqrt(5.0))?;

    registry.register_constant("ln2", core::f64::consts::LN_2)?;
    registry.register_constant("ln10", core::f64::consts::LN_10)?;
    registry.register_constant("log2e", core::f64::consts::LOG2_E)?;
    registry.register_constant("log10e", core::f64::consts::LOG10_E)?;

    registry.register_constant("invpi", core::f64::consts::FRAC_1_PI)?;
    registry.register_constant("inv2pi", 1.0 / core::f64::consts::TAU)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0.0).unwrap(), 1.0);
        assert_eq!(factorial(5.0).unwrap(), 120.0);
        assert_eq!(factorial(3.7).unwrap(), 6.0);
        assert!(factorial(200.0).unwrap().is_infinite());
        assert!(matches!(
            factorial(-1.0),
            Err(ExprError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_combinations_and_permutations() {
        assert_eq!(ncr(5.0, 2.0).unwrap(), 10.0);
        assert_eq!(npr(4.0, 2.0).unwrap(), 12.0);
        assert_eq!(ncr(6.0, 0.0).unwrap(), 1.0);
        assert_eq!(npr(6.0, 6.0).unwrap(), 720.0);
        assert!(ncr(2.0, 3.0).is_err());
        assert!(npr(-1.0, 0.0).is_err());
        assert!(ncr(3.0, -1.0).is_err());
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min(&[3.0, -1.0, 2.0]).unwrap(), -1.0);
        assert_eq!(max(&[3.0, -1.0, 2.0]).unwrap(), 3.0);
        assert_eq!(max(&[7.0]).unwrap(), 7.0);
        assert!(matches!(min(&[]), Err(ExprError::InvalidArgument(_))));
        assert!(matches!(max(&[]), Err(ExprError::InvalidArgument(_))));
    }

    #[test]
    fn test_reciprocal_trig_and_conversion() {
        assert_approx_eq!(cot(PI / 4.0), 1.0);
        assert_approx_eq!(sec(0.0), 1.0);
        assert_approx_eq!(cosec(PI / 2.0), 1.0);
        assert_approx_eq!(deg2rad(180.0), PI);
        assert_approx_eq!(rad2deg(PI / 2.0), 90.0);
    }

    #[test]
    fn test_builtin_tables_are_complete() {
        let registry = Registry::new();
        assert_eq!(registry.function_count(), 26);
        assert_eq!(registry.constant_count(), 13);
        assert_eq!(
            registry.find_function("min").unwrap().arity,
            Arity::Variadic { min: 1 }
        );
        assert_eq!(registry.find_function("nPr").unwrap().arity, Arity::Fixed(2));
        assert_approx_eq!(registry.find_constant("phi").unwrap(), 1.618033988749895);
        assert_approx_eq!(registry.find_constant("inv2pi").unwrap(), 0.15915494309189535);
    }
}
