//! Positional parameters for prepared statements.

use std::any::{Any, type_name};
use std::fmt::Display;

use super::DbError;

/// A single bound parameter, tagged with the MySQL bind type it uses.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Float(f64),
    Int(i64),
    Str(String),
}

impl Param {
    /// Bind type code: `d` for floats, `i` for integers, `s` for strings.
    pub fn bind_code(&self) -> char {
        match self {
            Param::Float(_) => 'd',
            Param::Int(_) => 'i',
            Param::Str(_) => 's',
        }
    }

    /// Bind any string-convertible value as a string.
    pub fn display<T: Display + ?Sized>(value: &T) -> Self {
        Param::Str(value.to_string())
    }

    /// Pick a bind type for raw text: integer if it parses as one, then
    /// float, otherwise string.
    pub fn infer_from_str(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            return Param::Int(i);
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => Param::Float(f),
            _ => Param::Str(raw.to_string()),
        }
    }

    /// Infer a bind type from a value whose concrete type is only known at runtime.
    ///
    /// Returns the type name when the value is neither a number nor a string.
    pub fn infer<T: Any>(value: &T) -> Result<Self, &'static str> {
        let any = value as &dyn Any;

        if let Some(f) = any.downcast_ref::<f64>() {
            return Ok(Param::Float(*f));
        }
        if let Some(f) = any.downcast_ref::<f32>() {
            return Ok(Param::Float(f64::from(*f)));
        }
        if let Some(i) = any.downcast_ref::<i64>() {
            return Ok(Param::Int(*i));
        }
        if let Some(i) = any.downcast_ref::<i32>() {
            return Ok(Param::Int(i64::from(*i)));
        }
        if let Some(i) = any.downcast_ref::<i16>() {
            return Ok(Param::Int(i64::from(*i)));
        }
        if let Some(i) = any.downcast_ref::<i8>() {
            return Ok(Param::Int(i64::from(*i)));
        }
        if let Some(i) = any.downcast_ref::<u32>() {
            return Ok(Param::Int(i64::from(*i)));
        }
        if let Some(i) = any.downcast_ref::<u16>() {
            return Ok(Param::Int(i64::from(*i)));
        }
        if let Some(i) = any.downcast_ref::<u8>() {
            return Ok(Param::Int(i64::from(*i)));
        }
        if let Some(u) = any.downcast_ref::<u64>() {
            return Ok(unsigned(*u));
        }
        if let Some(u) = any.downcast_ref::<usize>() {
            return Ok(unsigned(*u as u64));
        }
        if let Some(b) = any.downcast_ref::<bool>() {
            return Ok(Param::Int(i64::from(*b)));
        }
        if let Some(s) = any.downcast_ref::<String>() {
            return Ok(Param::Str(s.clone()));
        }
        if let Some(s) = any.downcast_ref::<&str>() {
            return Ok(Param::Str((*s).to_string()));
        }

        Err(type_name::<T>())
    }

    pub(crate) fn into_driver(self) -> mysql::Value {
        match self {
            Param::Float(f) => mysql::Value::Double(f),
            Param::Int(i) => mysql::Value::Int(i),
            Param::Str(s) => mysql::Value::Bytes(s.into_bytes()),
        }
    }
}

/// Unsigned values past `i64::MAX` travel as decimal text; the server coerces them.
fn unsigned(u: u64) -> Param {
    match i64::try_from(u) {
        Ok(i) => Param::Int(i),
        Err(_) => Param::Str(u.to_string()),
    }
}

macro_rules! param_from {
    ($variant:ident: $($ty:ty),+ => $conv:expr) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Param::$variant($conv(value))
                }
            }
        )+
    };
}

param_from!(Float: f64, f32 => f64::from);
param_from!(Int: i64, i32, i16, i8, u32, u16, u8, bool => i64::from);
param_from!(Str: String, &str, &String => String::from);

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Bound(Param),
    Unbindable(&'static str),
}

/// Ordered collection of positional parameters for one prepared statement.
///
/// Build it from a `Vec<Param>`, an iterator of `Param`, the `params!` macro,
/// or the `push*` builder methods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    slots: Vec<Slot>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statically typed parameter.
    pub fn push(mut self, param: impl Into<Param>) -> Self {
        self.slots.push(Slot::Bound(param.into()));
        self
    }

    /// Append any string-convertible value, bound as a string.
    pub fn push_display<T: Display + ?Sized>(self, value: &T) -> Self {
        self.push(Param::display(value))
    }

    /// Append a value whose bind type is inferred at runtime.
    ///
    /// Values that are neither numbers nor strings are kept as unbindable
    /// and rejected when the statement is bound.
    pub fn push_any<T: Any>(mut self, value: &T) -> Self {
        let slot = match Param::infer(value) {
            Ok(param) => Slot::Bound(param),
            Err(type_name) => Slot::Unbindable(type_name),
        };
        self.slots.push(slot);
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Concatenated bind codes, e.g. `"dis"`. `None` if any slot is unbindable.
    pub fn type_signature(&self) -> Option<String> {
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Bound(p) => Some(p.bind_code()),
                Slot::Unbindable(_) => None,
            })
            .collect()
    }

    /// Validate every slot and split into signature and driver values.
    pub(crate) fn resolve(self, query: &str) -> Result<(String, Vec<mysql::Value>), DbError> {
        let mut signature = String::with_capacity(self.slots.len());
        let mut values = Vec::with_capacity(self.slots.len());

        for (position, slot) in self.slots.into_iter().enumerate() {
            match slot {
                Slot::Bound(param) => {
                    signature.push(param.bind_code());
                    values.push(param.into_driver());
                }
                Slot::Unbindable(type_name) => {
                    return Err(DbError::UnbindableParam {
                        position,
                        type_name: type_name.to_string(),
                        query: query.to_string(),
                    });
                }
            }
        }

        Ok((signature, values))
    }
}

impl From<Vec<Param>> for Params {
    fn from(params: Vec<Param>) -> Self {
        params.into_iter().collect()
    }
}

impl FromIterator<Param> for Params {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(Slot::Bound).collect(),
        }
    }
}

/// Build [`Params`] from a list of values convertible into [`Param`].
///
/// ```ignore
/// let params = params![5, 1.5, "name"];
/// assert_eq!(params.type_signature().as_deref(), Some("ids"));
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::db::Params::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::db::Params::from(vec![$($crate::db::Param::from($value)),+])
    };
}
