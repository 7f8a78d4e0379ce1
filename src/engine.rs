//! Expression parser.
//!
//! Recursive descent for primaries and unary minus, precedence climbing for the binary
//! operators. The parser reads characters straight from a [`Cursor`] and folds any
//! operator whose operands are both literals, so `2 * 3 + x` comes back as
//! `6 + x`.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::Real;
use crate::context::Context;
use crate::cursor::Cursor;
use crate::error::{ExprError, Result};
use crate::eval::evaluate;
use crate::registry::Registry;
use crate::types::{BinaryOp, Expr};

struct Parser<'a> {
    cursor: Cursor<'a>,
    registry: &'a Registry,
    context: Option<&'a Context<'a>>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, registry: &'a Registry, context: Option<&'a Context<'a>>) -> Self {
        Self {
            cursor: Cursor::new(input),
            registry,
            context,
            depth: 0,
        }
    }

    /// Runs `f` one nesting level deeper, failing once the limit is reached.
    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= crate::MAX_PARSE_DEPTH {
            return Err(ExprError::RecursionLimit(format!(
                "Expression too complex: nesting exceeds {} levels at position {}",
                crate::MAX_PARSE_DEPTH,
                self.cursor.position()
            )));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let lhs = self.parse_unary()?;
        self.parse_binary_rhs(0, lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        self.descend(Self::parse_primary)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.cursor.peek_significant() {
            Some('-') => {
                self.cursor.advance();
                let operand = self.parse_unary()?;
                // Negation stays a node even for literal operands
                Ok(Expr::Operator {
                    op: BinaryOp::Sub,
                    left: Box::new(Expr::Number(0.0)),
                    right: Box::new(operand),
                })
            }
            Some('(') => {
                let open = self.cursor.position();
                self.cursor.advance();
                let inner = self.parse_expr()?;
                if !self.cursor.eat(')') {
                    debug!("unclosed '(' at position {}", open);
                    return Err(ExprError::UnmatchedParenthesis { position: open });
                }
                Ok(inner)
            }
            Some(c) if c.is_ascii_digit() => {
                let start = self.cursor.position();
                self.cursor.number().map(Expr::Number).ok_or_else(|| {
                    ExprError::Syntax(format!("Invalid number literal at position {}", start))
                })
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.parse_identifier(),
            Some(c) => {
                let position = self.cursor.position();
                debug!("unexpected '{}' at position {}", c, position);
                Err(ExprError::Syntax(format!(
                    "Unexpected character '{}' at position {}",
                    c, position
                )))
            }
            None => Err(ExprError::Syntax(format!(
                "Unexpected end of input at position {}",
                self.cursor.position()
            ))),
        }
    }

    fn parse_identifier(&mut self) -> Result<Expr> {
        let start = self.cursor.position();
        let name = self.cursor.identifier().ok_or_else(|| {
            ExprError::Syntax(format!("Expected identifier at position {}", start))
        })?;

        if self.cursor.peek_significant() == Some('(') {
            return self.parse_call(name);
        }

        let known = self.registry.has_constant(name)
            || self.context.is_some_and(|ctx| ctx.contains(name));
        if !known {
            debug!("undefined identifier '{}' at position {}", name, start);
            return Err(ExprError::UndefinedVariable {
                name: name.to_string(),
            });
        }
        Ok(Expr::Variable(name.to_string()))
    }

    /// Parses `( arg, ... )` after a function name. The name is resolved at evaluation.
    fn parse_call(&mut self, name: &str) -> Result<Expr> {
        let open = self.cursor.position();
        self.cursor.advance();

        let mut args = Vec::new();
        if !self.cursor.eat(')') {
            loop {
                args.push(self.parse_expr()?);
                if self.cursor.eat(',') {
                    continue;
                }
                if self.cursor.eat(')') {
                    break;
                }
                return Err(match self.cursor.peek_significant() {
                    None => ExprError::UnmatchedParenthesis { position: open },
                    Some(c) => ExprError::Syntax(format!(
                        "Expected ',' or ')' in call to '{}' at position {}, found '{}'",
                        name,
                        self.cursor.position(),
                        c
                    )),
                });
            }
        }

        trace!("call to '{}' with {} argument(s)", name, args.len());
        Ok(Expr::FunctionCall {
            name: name.to_string(),
            args,
        })
    }

    /// Binary operator at the cursor, if any. Does not consume it.
    fn peek_operator(&mut self) -> Option<BinaryOp> {
        self.cursor.peek_significant().and_then(BinaryOp::from_char)
    }

    fn parse_binary_rhs(&mut self, min_prec: i32, mut lhs: Expr) -> Result<Expr> {
        loop {
            let Some(op) = self.peek_operator() else {
                return Ok(lhs);
            };
            let prec = op.precedence();
            if prec < min_prec {
                return Ok(lhs);
            }
            self.cursor.advance();

            let mut rhs = self.parse_unary()?;
            if let Some(next) = self.peek_operator() {
                let next_prec = next.precedence();
                let chain_right = op.is_right_associative() && next_prec == prec;
                if next_prec > prec || chain_right {
                    let rhs_min = if chain_right { prec } else { prec + 1 };
                    rhs = self.descend(move |p| p.parse_binary_rhs(rhs_min, rhs))?;
                }
            }

            lhs = self.combine(op, lhs, rhs)?;
        }
    }

    fn combine(&self, op: BinaryOp, left: Expr, right: Expr) -> Result<Expr> {
        if let (Expr::Number(l), Expr::Number(r)) = (&left, &right) {
            let value = op.apply(*l, *r).inspect_err(|_| {
                debug!(
                    "literal division by zero before position {}",
                    self.cursor.position()
                );
            })?;
            trace!("folded {} {} {} into {}", l, op, r, value);
            return Ok(Expr::Number(value));
        }
        Ok(Expr::Operator {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn finish(&mut self) -> Result<()> {
        match self.cursor.peek_significant() {
            None => Ok(()),
            Some(')') => Err(ExprError::Syntax(format!(
                "Unexpected closing parenthesis at position {}",
                self.cursor.position()
            ))),
            Some(c) => {
                debug!("trailing input at position {}", self.cursor.position());
                Err(ExprError::Syntax(format!(
                    "Unexpected '{}' at position {}",
                    c,
                    self.cursor.position()
                )))
            }
        }
    }
}

/// Parses `text` into an expression tree.
///
/// Every bare identifier must name a registry constant or a variable bound in
/// `context`, otherwise parsing fails with [`ExprError::UndefinedVariable`]. Function
/// names are looked up only when the tree is evaluated. Sub-expressions made of
/// literals alone are folded, and a literal division by literal zero fails here with
/// [`ExprError::DivideByZero`].
///
/// # Examples
///
/// ```
/// use exprlib::{parse, Expr, Registry};
///
/// let registry = Registry::new();
/// assert_eq!(parse("(1 + 2) * 4", &registry, None).unwrap(), Expr::Number(12.0));
///
/// assert!(parse("1 +", &registry, None).is_err());
/// assert!(parse("2 3", &registry, None).is_err());
/// ```
pub fn parse(text: &str, registry: &Registry, context: Option<&Context<'_>>) -> Result<Expr> {
    debug!("parsing '{}'", text);
    if text.len() > crate::MAX_EXPRESSION_LENGTH {
        return Err(ExprError::Syntax(format!(
            "Expression too long: {} bytes (maximum is {})",
            text.len(),
            crate::MAX_EXPRESSION_LENGTH
        )));
    }

    let mut parser = Parser::new(text, registry, context);
    let expr = parser.parse_expr()?;
    parser.finish()?;
    Ok(expr)
}

/// Parses and evaluates `text` in one step.
///
/// ```
/// use exprlib::{interp, Registry};
///
/// let registry = Registry::new();
/// let value = interp("nCr(5, 2) + nPr(4, 2)", &registry, None).unwrap();
/// assert_eq!(value, 22.0);
/// ```
pub fn interp(text: &str, registry: &Registry, context: Option<&Context<'_>>) -> Result<Real> {
    let expr = parse(text, registry, context)?;
    evaluate(&expr, registry, context)
}

/// Releases a tree. Equivalent to dropping it.
pub fn release(expr: Expr) {
    trace!("releasing tree");
    drop(expr);
}
