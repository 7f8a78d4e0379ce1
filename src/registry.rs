//! Named native functions and constants available to expressions.
//!
//! A [`Registry`] is an explicit value the host owns and passes to
//! [`parse`](crate::parse) and [`evaluate`](crate::evaluate). Both tables are bounded
//! `heapless` maps; registering past [`MAX_FUNCTIONS`](crate::MAX_FUNCTIONS) or
//! [`MAX_CONSTANTS`](crate::MAX_CONSTANTS) fails instead of reallocating.
//!
//! The registry stores its callables behind `Rc`, so it is neither `Send` nor `Sync`.
//! Hosts that need one registry on several threads must provide their own locking.

use alloc::rc::Rc;
use alloc::string::ToString;

use heapless::FnvIndexMap;
use log::{trace, warn};

use crate::Real;
use crate::error::{ExprError, Result};
use crate::functions::{register_builtin_constants, register_builtin_functions};
use crate::types::{Arity, FunctionName, HString, NativeFunction, TryIntoHeaplessString};

pub type NativeFunctionMap = FnvIndexMap<FunctionName, NativeFunction, { crate::MAX_FUNCTIONS }>;
pub type ConstantMap = FnvIndexMap<HString, Real, { crate::MAX_CONSTANTS }>;

/// Function and constant tables.
///
/// # Examples
///
/// ```
/// use exprlib::{interp, Arity, ErrorKind, Registry};
///
/// let mut registry = Registry::new();
/// registry.register_constant("g", 9.81).unwrap();
/// registry
///     .register_function("avg", Arity::Variadic { min: 1 }, |args| {
///         Ok(args.iter().sum::<f64>() / args.len() as f64)
///     })
///     .unwrap();
///
/// assert_eq!(interp("avg(1, 2, 3) * g", &registry, None).unwrap(), 2.0 * 9.81);
///
/// // Names are unique
/// let err = registry
///     .register_function("avg", Arity::Fixed(1), |args| Ok(args[0]))
///     .unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::DuplicateFunction);
/// ```
#[derive(Clone)]
pub struct Registry {
    functions: NativeFunctionMap,
    constants: ConstantMap,
}

impl Registry {
    /// Creates a registry holding the built-in functions and constants.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.initialize();
        registry
    }

    /// Creates a registry with no functions and no constants.
    pub fn empty() -> Self {
        Self {
            functions: NativeFunctionMap::new(),
            constants: ConstantMap::new(),
        }
    }

    /// Resets both tables to exactly the built-ins, dropping anything the host added.
    pub fn initialize(&mut self) {
        self.functions.clear();
        self.constants.clear();
        if let Err(err) =
            register_builtin_functions(self).and_then(|()| register_builtin_constants(self))
        {
            warn!("built-in registration failed: {}", err);
        }
        debug_assert_eq!(self.functions.len(), 26);
        debug_assert_eq!(self.constants.len(), 13);
    }

    /// Registers a native function under `name`.
    ///
    /// Fails without touching the table when `name` is empty
    /// ([`ExprError::NullInput`]), too long ([`ExprError::NameTooLong`]), already
    /// registered ([`ExprError::DuplicateFunction`]) or when the table is full
    /// ([`ExprError::CapacityExceeded`]).
    pub fn register_function<F>(&mut self, name: &str, arity: Arity, implementation: F) -> Result<()>
    where
        F: Fn(&[Real]) -> Result<Real> + 'static,
    {
        let key = Self::key(name)?;
        if self.functions.contains_key(&key) {
            warn!("rejected duplicate function '{}'", name);
            return Err(ExprError::DuplicateFunction {
                name: name.to_string(),
            });
        }
        let function = NativeFunction {
            name: key.clone(),
            arity,
            implementation: Rc::new(implementation),
        };
        match self.functions.insert(key, function) {
            Ok(_) => {
                trace!("registered function '{}' with arity {}", name, arity);
                Ok(())
            }
            Err(_) => {
                warn!("function table full, cannot register '{}'", name);
                Err(ExprError::CapacityExceeded("functions"))
            }
        }
    }

    /// Registers a function using the integer arity encoding (`-1` for variadic).
    pub fn register_function_raw<F>(&mut self, name: &str, arity: i32, implementation: F) -> Result<()>
    where
        F: Fn(&[Real]) -> Result<Real> + 'static,
    {
        let arity = Arity::try_from(arity).inspect_err(|_| {
            warn!("rejected function '{}' with invalid arity", name);
        })?;
        self.register_function(name, arity, implementation)
    }

    /// Registers a named constant. Same failure rules as [`Registry::register_function`].
    pub fn register_constant(&mut self, name: &str, value: Real) -> Result<()> {
        let key = Self::key(name)?;
        if self.constants.contains_key(&key) {
            warn!("rejected duplicate constant '{}'", name);
            return Err(ExprError::DuplicateConstant {
                name: name.to_string(),
            });
        }
        self.constants
            .insert(key, value)
            .map(|_| ())
            .map_err(|_| ExprError::CapacityExceeded("constants"))
    }

    pub fn find_function(&self, name: &str) -> Option<&NativeFunction> {
        let key = name.try_into_heapless().ok()?;
        self.functions.get(&key)
    }

    pub fn find_constant(&self, name: &str) -> Option<Real> {
        let key = name.try_into_heapless().ok()?;
        self.constants.get(&key).copied()
    }

    pub fn has_constant(&self, name: &str) -> bool {
        self.find_constant(name).is_some()
    }

    /// Removes every function. Constants are unaffected.
    pub fn clear_functions(&mut self) {
        self.functions.clear();
    }

    /// Removes every constant. Functions are unaffected.
    pub fn clear_constants(&mut self) {
        self.constants.clear();
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn constant_count(&self) -> usize {
        self.constants.len()
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(|name| name.as_str())
    }

    pub fn constant_names(&self) -> impl Iterator<Item = &str> {
        self.constants.keys().map(|name| name.as_str())
    }

    fn key(name: &str) -> Result<HString> {
        if name.is_empty() {
            warn!("rejected registration with an empty name");
            return Err(ExprError::NullInput("name"));
        }
        name.try_into_heapless()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.functions.len())
            .field("constants", &self.constants.len())
            .finish()
    }
}
