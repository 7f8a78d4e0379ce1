//! Caller-owned variable bindings.
//!
//! A [`Context`] is an ordered list of `(name, slot)` pairs. Slots are
//! [`Cell`]s owned by the host; the engine only reads them, and only while evaluating,
//! so a parsed tree picks up whatever values the slots hold at that moment.

use core::cell::Cell;

use crate::Real;
use crate::error::{ExprError, Result};

/// One variable: a name and the live slot holding its value.
#[derive(Clone, Copy, Debug)]
pub struct Binding<'a> {
    pub name: &'a str,
    pub slot: &'a Cell<Real>,
}

/// Variable environment for parsing and evaluation.
///
/// Names are not checked for uniqueness; lookups return the first binding with a
/// matching name. Registry constants take priority over bindings of the same name.
///
/// # Examples
///
/// ```
/// use core::cell::Cell;
/// use exprlib::{interp, Context, Registry};
///
/// let registry = Registry::new();
/// let width = Cell::new(3.0);
/// let height = Cell::new(4.0);
///
/// let mut ctx = Context::new();
/// ctx.bind("width", &width).unwrap();
/// ctx.bind("height", &height).unwrap();
///
/// let area = interp("width * height", &registry, Some(&ctx)).unwrap();
/// assert_eq!(area, 12.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Context<'a> {
    bindings: heapless::Vec<Binding<'a>, { crate::MAX_VARIABLES }>,
}

impl<'a> Context<'a> {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self {
            bindings: heapless::Vec::new(),
        }
    }

    /// Appends a binding of `name` to `slot`.
    ///
    /// Fails with [`ExprError::NullInput`] for an empty name and
    /// [`ExprError::CapacityExceeded`] once [`MAX_VARIABLES`](crate::MAX_VARIABLES)
    /// bindings exist.
    pub fn bind(&mut self, name: &'a str, slot: &'a Cell<Real>) -> Result<()> {
        if name.is_empty() {
            return Err(ExprError::NullInput("variable name"));
        }
        self.bindings
            .push(Binding { name, slot })
            .map_err(|_| ExprError::CapacityExceeded("variables"))
    }

    /// Builder-style [`Context::bind`].
    pub fn with(mut self, name: &'a str, slot: &'a Cell<Real>) -> Result<Self> {
        self.bind(name, slot)?;
        Ok(self)
    }

    /// First binding named `name`.
    pub fn find(&self, name: &str) -> Option<&Binding<'a>> {
        self.bindings.iter().find(|binding| binding.name == name)
    }

    /// Current value of the first binding named `name`.
    pub fn get(&self, name: &str) -> Option<Real> {
        self.find(name).map(|binding| binding.slot.get())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding<'a>> {
        self.bindings.iter()
    }
}
