//! Type definitions for the expression parser and evaluator.
//!
//! This module contains the core data structures shared by the parser, the evaluator
//! and the registry: the Abstract Syntax Tree (AST), the binary operator tags, function
//! arity and the native function object, plus the bounded name types used by the
//! registry tables.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::Real;
use crate::error::{ExprError, Result};

/// Bounded string used as a registry key.
pub type HString = heapless::String<{ crate::MAX_NAME_LEN }>;

/// Function names share the registry key type.
pub type FunctionName = HString;

/// Conversion of borrowed names into bounded registry keys.
pub trait TryIntoHeaplessString {
    fn try_into_heapless(&self) -> Result<HString>;
}

impl TryIntoHeaplessString for str {
    fn try_into_heapless(&self) -> Result<HString> {
        HString::try_from(self).map_err(|_| ExprError::NameTooLong {
            name: self.to_string(),
        })
    }
}

/// Abstract Syntax Tree (AST) node representing an expression.
///
/// Each parent owns its children exclusively, so dropping the root releases the whole
/// tree exactly once. Trees are never modified after the parser returns them.
///
/// Dropping is iterative and [`evaluate`](crate::evaluate) stops at
/// [`MAX_EVAL_DEPTH`](crate::MAX_EVAL_DEPTH), so arbitrarily deep hand-built trees are
/// safe to release and evaluate. The other helpers and the derived impls recurse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A literal numerical value, or the folded result of a literal-only sub-expression.
    ///
    /// Examples: `3.14`, `42`
    Number(Real),

    /// A named constant or context variable, resolved at evaluation time.
    ///
    /// Examples: `x`, `pi`, `rate_2`
    Variable(String),

    /// A binary operation.
    ///
    /// Unary minus is represented as `0 - operand`.
    Operator {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// A function call with its argument expressions in source order.
    ///
    /// Examples: `sin(x)`, `max(a, b, c)`, `exp(1)`
    FunctionCall { name: String, args: Vec<Expr> },
}

impl Expr {
    pub fn is_number(&self) -> bool {
        matches!(self, Expr::Number(_))
    }

    /// The literal value if this node is a [`Expr::Number`].
    pub fn as_number(&self) -> Option<Real> {
        match self {
            Expr::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Variable(_) => 1,
            Expr::Operator { left, right, .. } => 1 + left.node_count() + right.node_count(),
            Expr::FunctionCall { args, .. } => {
                1 + args.iter().map(Expr::node_count).sum::<usize>()
            }
        }
    }

    /// Length of the longest root-to-leaf path, counting nodes.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Variable(_) => 1,
            Expr::Operator { left, right, .. } => 1 + left.depth().max(right.depth()),
            Expr::FunctionCall { args, .. } => {
                1 + args.iter().map(Expr::depth).max().unwrap_or(0)
            }
        }
    }

    /// Names of the variables and constants the tree references, in first-occurrence order.
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Expr::Operator { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expr::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
        }
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

impl Expr {
    /// Moves interior children into `pending`, leaving leaves in place.
    fn detach_children(&mut self, pending: &mut Vec<Expr>) {
        match self {
            Expr::Number(_) | Expr::Variable(_) => {}
            Expr::Operator { left, right, .. } => {
                for child in [left, right] {
                    if !matches!(**child, Expr::Number(_) | Expr::Variable(_)) {
                        pending.push(core::mem::replace(&mut **child, Expr::Number(0.0)));
                    }
                }
            }
            Expr::FunctionCall { args, .. } => pending.append(args),
        }
    }
}

/// The five binary operators of the grammar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn from_char(c: char) -> Option<BinaryOp> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            '^' => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    /// Binding strength used by precedence climbing.
    pub fn precedence(self) -> i32 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 10,
            BinaryOp::Mul | BinaryOp::Div => 20,
            BinaryOp::Pow => 30,
        }
    }

    pub fn is_right_associative(self) -> bool {
        self == BinaryOp::Pow
    }

    /// Applies the operator. Shared by constant folding and evaluation.
    pub fn apply(self, left: Real, right: Real) -> Result<Real> {
        match self {
            BinaryOp::Add => Ok(left + right),
            BinaryOp::Sub => Ok(left - right),
            BinaryOp::Mul => Ok(left * right),
            BinaryOp::Div => {
                if right == 0.0 {
                    Err(ExprError::DivideByZero)
                } else {
                    Ok(left / right)
                }
            }
            BinaryOp::Pow => Ok(libm::pow(left, right)),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Number of arguments a native function accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    /// Exactly this many arguments.
    Fixed(usize),
    /// Any count of at least `min`.
    Variadic { min: usize },
}

impl Arity {
    /// `true` if a call with `count` arguments is allowed.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => count == n,
            Arity::Variadic { min } => count >= min,
        }
    }
}

/// Legacy integer encoding: `n >= 0` is fixed, `-1` is variadic with at least one argument.
impl TryFrom<i32> for Arity {
    type Error = ExprError;

    fn try_from(raw: i32) -> Result<Arity> {
        match raw {
            -1 => Ok(Arity::Variadic { min: 1 }),
            n if n >= 0 => Ok(Arity::Fixed(n as usize)),
            n => Err(ExprError::InvalidArity(n)),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{}", n),
            Arity::Variadic { min } => write!(f, "at least {}", min),
        }
    }
}

/// Callable stored in the registry: ordered argument values in, value or error out.
pub type NativeFn = Rc<dyn Fn(&[Real]) -> Result<Real>>;

/// A Rust function registered under a name.
///
/// # Example
///
/// ```
/// # use exprlib::{interp, Arity, Registry};
/// let mut registry = Registry::new();
///
/// registry
///     .register_function("clamp01", Arity::Fixed(1), |args| {
///         Ok(args[0].max(0.0).min(1.0))
///     })
///     .unwrap();
///
/// let result = interp("clamp01(3)", &registry, None).unwrap();
/// assert_eq!(result, 1.0);
/// ```
#[derive(Clone)]
pub struct NativeFunction {
    /// The name of the function as it is used in expressions.
    pub name: FunctionName,

    /// Argument counts the function accepts.
    pub arity: Arity,

    /// The implementation.
    pub implementation: NativeFn,
}

impl NativeFunction {
    /// Invokes the implementation after checking `args` against the arity.
    ///
    /// A count the arity does not accept fails with
    /// [`ExprError::InvalidFunctionCall`] instead of reaching the implementation.
    pub fn call(&self, args: &[Real]) -> Result<Real> {
        if !self.arity.accepts(args.len()) {
            return Err(ExprError::InvalidFunctionCall {
                name: self.name.to_string(),
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.implementation)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
