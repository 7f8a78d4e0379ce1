//! Tree-walking evaluator.
//!
//! Evaluation is a post-order walk: operands before operators, arguments before the
//! call. Variables are read from the registry constants first and then from the
//! context slots, so a tree parsed once can be evaluated again after the host changes
//! a bound value.

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::Real;
use crate::context::Context;
use crate::error::{ExprError, Result};
use crate::registry::Registry;
use crate::types::Expr;

/// Computes the value of `expr`.
///
/// The first failure anywhere in the tree is returned as is; later siblings are not
/// evaluated.
///
/// # Examples
///
/// ```
/// use core::cell::Cell;
/// use exprlib::{evaluate, parse, Context, Registry};
///
/// let registry = Registry::new();
/// let z = Cell::new(4.0);
/// let ctx = Context::new().with("z", &z).unwrap();
///
/// let expr = parse("1 / z", &registry, Some(&ctx)).unwrap();
/// assert_eq!(evaluate(&expr, &registry, Some(&ctx)).unwrap(), 0.25);
///
/// z.set(0.0);
/// assert!(evaluate(&expr, &registry, Some(&ctx)).is_err());
/// ```
pub fn evaluate(expr: &Expr, registry: &Registry, context: Option<&Context<'_>>) -> Result<Real> {
    debug!("evaluating expression");
    eval_node(expr, registry, context, 0)
}

fn eval_node(
    expr: &Expr,
    registry: &Registry,
    context: Option<&Context<'_>>,
    depth: usize,
) -> Result<Real> {
    // Trees built by hand or deserialized never went through the parser's limits
    if depth >= crate::MAX_EVAL_DEPTH {
        return Err(ExprError::RecursionLimit(format!(
            "Expression too deep: evaluation exceeds {} levels",
            crate::MAX_EVAL_DEPTH
        )));
    }
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Variable(name) => eval_variable(name, registry, context),
        Expr::Operator { op, left, right } => {
            let left = eval_node(left, registry, context, depth + 1)?;
            let right = eval_node(right, registry, context, depth + 1)?;
            op.apply(left, right)
        }
        Expr::FunctionCall { name, args } => eval_call(name, args, registry, context, depth),
    }
}

fn eval_variable(name: &str, registry: &Registry, context: Option<&Context<'_>>) -> Result<Real> {
    registry
        .find_constant(name)
        .or_else(|| context.and_then(|ctx| ctx.get(name)))
        .ok_or_else(|| {
            debug!("undefined variable '{}' at evaluation", name);
            ExprError::UndefinedVariable {
                name: name.to_string(),
            }
        })
}

fn eval_call(
    name: &str,
    args: &[Expr],
    registry: &Registry,
    context: Option<&Context<'_>>,
    depth: usize,
) -> Result<Real> {
    let function = registry.find_function(name).ok_or_else(|| {
        debug!("call to unregistered function '{}'", name);
        ExprError::UnknownFunction {
            name: name.to_string(),
        }
    })?;

    if !function.arity.accepts(args.len()) {
        return Err(ExprError::InvalidFunctionCall {
            name: name.to_string(),
            expected: function.arity,
            found: args.len(),
        });
    }

    let values = args
        .iter()
        .map(|arg| eval_node(arg, registry, context, depth + 1))
        .collect::<Result<Vec<Real>>>()?;

    trace!("dispatching '{}' with {:?}", name, values);
    function.call(&values)
}
