#![cfg_attr(not(test), no_std)]
#![doc = r#"
# exprlib

A small, embeddable, no_std-friendly arithmetic expression parser and evaluator.

## Overview

exprlib parses a textual formula (numbers, variables, `+ - * / ^`, unary minus,
parentheses and nested function calls) into an abstract syntax tree, then
evaluates that tree against caller-owned variable bindings. It is meant to be
linked into a host application such as a calculator, a spreadsheet cell or a
scripting hook.

Key features:
- Precedence climbing parser that scans characters directly, with right-associative `^`
- Constant folding at parse time (`2 * 3 + x` is stored as `6 + x`)
- Live variable bindings: re-evaluate one parsed tree after changing a variable
- A registry of 26 built-in functions and 13 constants, extensible at runtime
- Typed errors that map onto ten stable error codes for C-style hosts

## Quick Start

```rust
use exprlib::{interp, Registry};

let registry = Registry::new();
let result = interp("2 + 3 * 4", &registry, None).unwrap();
assert_eq!(result, 14.0);

// `^` is right-associative
let result = interp("2 ^ 3 ^ 2", &registry, None).unwrap();
assert_eq!(result, 512.0);
```

## Variables

Variables are bound to [`core::cell::Cell`] slots owned by the caller. The
parser only checks that a name resolves; the value is read when the tree is
evaluated, so one tree can be evaluated again after the slot changes.

```rust
use core::cell::Cell;
use exprlib::{evaluate, parse, Context, Registry};

let registry = Registry::new();
let x = Cell::new(2.0);
let mut ctx = Context::new();
ctx.bind("x", &x).unwrap();

let ast = parse("x ^ 2", &registry, Some(&ctx)).unwrap();
assert_eq!(evaluate(&ast, &registry, Some(&ctx)).unwrap(), 4.0);

x.set(10.0);
assert_eq!(evaluate(&ast, &registry, Some(&ctx)).unwrap(), 100.0);
```

## Custom Functions

```rust
use exprlib::{interp, Arity, Registry};

let mut registry = Registry::new();
registry
    .register_function("hypot", Arity::Fixed(2), |args| {
        Ok((args[0] * args[0] + args[1] * args[1]).sqrt())
    })
    .unwrap();

assert_eq!(interp("hypot(3, 4)", &registry, None).unwrap(), 5.0);
```

## Error Handling

```rust
use exprlib::{interp, parse, ErrorKind, ExprError, Registry};

let registry = Registry::new();

// Literal division by zero is caught while parsing
let err = parse("1 / 0", &registry, None).unwrap_err();
assert_eq!(err, ExprError::DivideByZero);

// Every error maps onto one of ten stable codes
let err = interp("y + 1", &registry, None).unwrap_err();
assert_eq!(err.kind(), ErrorKind::UndefinedVariable);
assert_eq!(err.kind().code(), 2);
assert_eq!(err.kind().message(), "Undefined Variable");
```

## Operator Precedence

| Precedence | Operators | Associativity |
|------------|-----------|---------------|
| 10         | `+` `-`   | Left          |
| 20         | `*` `/`   | Left          |
| 30         | `^`       | Right         |

Unary minus is handled before any binary operator, so `-2 ^ 2` is `(0 - 2) ^ 2 = 4`.

## Threading

A [`Registry`] stores its functions behind `Rc` and is neither `Send` nor
`Sync`. Hosts that share one across threads must wrap it in their own lock.
"#]

extern crate alloc;

pub mod context;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod eval;
pub mod functions;
pub mod registry;
pub mod types;

pub use context::*;
pub use engine::*;
pub use error::{ErrorKind, ExprError, Result, status};
pub use eval::*;
pub use registry::*;
pub use types::*;

/// Floating-point type used for every value in an expression.
pub type Real = f64;

/// Upper bound on the number of functions a [`Registry`] can hold (power of two).
pub const MAX_FUNCTIONS: usize = 64;

/// Upper bound on the number of constants a [`Registry`] can hold (power of two).
pub const MAX_CONSTANTS: usize = 32;

/// Upper bound on the number of bindings a [`Context`] can hold.
pub const MAX_VARIABLES: usize = 32;

/// Longest function or constant name the registry accepts, in bytes.
pub const MAX_NAME_LEN: usize = 32;

/// Longest expression the parser accepts, in bytes.
pub const MAX_EXPRESSION_LENGTH: usize = 4096;

/// Deepest nesting of sub-expressions the parser accepts.
pub const MAX_PARSE_DEPTH: usize = 256;

/// Deepest tree the evaluator walks. Left-associative chains are not nested by the
/// parser, so a parsed tree can be as deep as its expression is long.
pub const MAX_EVAL_DEPTH: usize = MAX_EXPRESSION_LENGTH;

pub mod constants {
    use super::Real;

    pub const PI: Real = core::f64::consts::PI;
    pub const E: Real = core::f64::consts::E;
    pub const TEST_PRECISION: Real = 1e-10;
}

/// Utility macro to check if two floating point values are approximately equal
/// within a specified epsilon. Supports optional format arguments like assert_eq!.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $crate::constants::TEST_PRECISION)
    };
    ($left:expr, $right:expr, $epsilon:expr $(,)?) => {{
        let left_val: $crate::Real = $left;
        let right_val: $crate::Real = $right;
        let eps: $crate::Real = $epsilon;

        if left_val.is_nan() && right_val.is_nan() {
            // NaN == NaN for our purposes
        } else if left_val.is_infinite()
            && right_val.is_infinite()
            && left_val.signum() == right_val.signum()
        {
            // Same-signed infinities are equal
        } else {
            assert!(
                (left_val - right_val).abs() < eps,
                "assertion failed: `(left ≈ right)` (left: `{}`, right: `{}`, epsilon: `{}`)",
                left_val,
                right_val,
                eps
            );
        }
    }};
    ($left:expr, $right:expr, $epsilon:expr, $fmt:expr $(, $arg:tt)* $(,)?) => {{
        let left_val: $crate::Real = $left;
        let right_val: $crate::Real = $right;
        let eps: $crate::Real = $epsilon;

        if left_val.is_nan() && right_val.is_nan() {
        } else if left_val.is_infinite()
            && right_val.is_infinite()
            && left_val.signum() == right_val.signum()
        {
        } else {
            assert!((left_val - right_val).abs() < eps, $fmt $(, $arg)*);
        }
    }};
}
