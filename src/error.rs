//! Error types and handling for the exprlib crate.
//!
//! Every fallible operation returns [`Result`]. The first failure encountered while
//! parsing or evaluating is propagated unchanged to the caller; nothing later in the
//! same call can overwrite it. Hosts that want a flat status code (for example to hand
//! across a C boundary) can map any error onto one of the ten [`ErrorKind`] codes.

use alloc::string::String;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Arity;

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, ExprError>;

/// Error type for expression parsing, evaluation and registry mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Malformed input: unexpected character, missing operand, trailing input.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// A `(` whose matching `)` never arrived.
    #[error("Unmatched parenthesis opened at position {position}")]
    UnmatchedParenthesis { position: usize },

    /// A function was called with an argument count its [`Arity`] does not allow.
    #[error("Invalid function call to '{name}': expected {expected} arguments, found {found}")]
    InvalidFunctionCall {
        /// Name of the function that was called
        name: String,
        /// What the registry entry accepts
        expected: Arity,
        /// Number of arguments actually supplied
        found: usize,
    },

    /// A bare identifier is neither a registry constant nor a context variable.
    ///
    /// Bind the variable with [`Context::bind`](crate::Context::bind) or register a
    /// constant with [`Registry::register_constant`](crate::Registry::register_constant).
    #[error("Undefined variable: '{name}'")]
    UndefinedVariable { name: String },

    /// Division whose divisor is exactly zero.
    #[error("Division by zero")]
    DivideByZero,

    /// A bounded table is full.
    #[error("Capacity exceeded for {0}")]
    CapacityExceeded(&'static str),

    /// A name does not fit the bounded name buffer.
    #[error("Name too long: '{name}'")]
    NameTooLong { name: String },

    /// The expression nests deeper than [`MAX_PARSE_DEPTH`](crate::MAX_PARSE_DEPTH).
    #[error("Recursion limit exceeded: {0}")]
    RecursionLimit(String),

    /// A built-in or host function rejected its input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A raw arity below the variadic sentinel `-1`.
    #[error("Invalid arity: {0}")]
    InvalidArity(i32),

    /// A call names a function that is not registered.
    #[error("Unknown function: '{name}'")]
    UnknownFunction { name: String },

    /// A required input was empty.
    #[error("Missing input: {0}")]
    NullInput(&'static str),

    /// A function with the same name is already registered.
    #[error("Function already registered: '{name}'")]
    DuplicateFunction { name: String },

    /// A constant with the same name is already registered.
    #[error("Constant already registered: '{name}'")]
    DuplicateConstant { name: String },

    /// Anything else, typically raised by a host function.
    #[error("{0}")]
    Other(String),
}

impl ExprError {
    /// Maps the error onto its stable [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExprError::Syntax(_)
            | ExprError::UnmatchedParenthesis { .. }
            | ExprError::InvalidFunctionCall { .. } => ErrorKind::Syntax,
            ExprError::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            ExprError::DivideByZero => ErrorKind::DivisionByZero,
            ExprError::CapacityExceeded(_)
            | ExprError::NameTooLong { .. }
            | ExprError::RecursionLimit(_) => ErrorKind::AllocationFailed,
            ExprError::InvalidArgument(_) | ExprError::InvalidArity(_) => {
                ErrorKind::InvalidArgument
            }
            ExprError::UnknownFunction { .. } => ErrorKind::FunctionNotFound,
            ExprError::NullInput(_) => ErrorKind::NullInput,
            ExprError::DuplicateFunction { .. } | ExprError::DuplicateConstant { .. } => {
                ErrorKind::DuplicateFunction
            }
            ExprError::Other(_) => ErrorKind::Unknown,
        }
    }
}

impl From<String> for ExprError {
    fn from(err: String) -> ExprError {
        ExprError::Other(err)
    }
}

/// Flat classification of an outcome, with stable numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ErrorKind {
    Success = 0,
    Syntax = 1,
    UndefinedVariable = 2,
    DivisionByZero = 3,
    AllocationFailed = 4,
    InvalidArgument = 5,
    FunctionNotFound = 6,
    NullInput = 7,
    DuplicateFunction = 8,
    Unknown = 9,
}

const ERROR_MESSAGES: [&str; 10] = [
    "Success",
    "Syntax Error",
    "Undefined Variable",
    "Division by Zero",
    "Allocation Failed",
    "Invalid Argument",
    "Function Not Found",
    "Null Input",
    "Duplicate Function",
    "Unknown Error",
];

impl ErrorKind {
    const ALL: [ErrorKind; 10] = [
        ErrorKind::Success,
        ErrorKind::Syntax,
        ErrorKind::UndefinedVariable,
        ErrorKind::DivisionByZero,
        ErrorKind::AllocationFailed,
        ErrorKind::InvalidArgument,
        ErrorKind::FunctionNotFound,
        ErrorKind::NullInput,
        ErrorKind::DuplicateFunction,
        ErrorKind::Unknown,
    ];

    /// Numeric code of this kind, `0` for success.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`ErrorKind::code`].
    pub fn from_code(code: u8) -> Option<ErrorKind> {
        Self::ALL.get(code as usize).copied()
    }

    /// Human-readable message for this kind.
    pub const fn message(self) -> &'static str {
        ERROR_MESSAGES[self as usize]
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Status code of a finished call: [`ErrorKind::Success`] for `Ok`, the error's kind otherwise.
pub fn status<T>(result: &Result<T>) -> ErrorKind {
    match result {
        Ok(_) => ErrorKind::Success,
        Err(err) => err.kind(),
    }
}
