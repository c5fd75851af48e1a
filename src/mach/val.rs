use crate::error;
use crate::lang::{Error, Ident};
use std::convert::TryFrom;
use std::rc::Rc;

/// ## Typed value
///
/// Every evaluation produces one of these. `Null` means an argument
/// position was left empty and is never coerced to zero.

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Number(f64),
    String(Rc<str>),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Number,
    String,
}

impl Val {
    pub fn default_for(value_type: ValueType) -> Val {
        match value_type {
            ValueType::Number => Val::Number(0.0),
            ValueType::String => Val::String("".into()),
        }
    }

    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Val::Number(_) => Some(ValueType::Number),
            Val::String(_) => Some(ValueType::String),
            Val::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Val::Null)
    }
}

impl From<Ident> for ValueType {
    fn from(ident: Ident) -> Self {
        if ident.is_string() {
            ValueType::String
        } else {
            ValueType::Number
        }
    }
}

impl TryFrom<Val> for f64 {
    type Error = Error;
    fn try_from(val: Val) -> std::result::Result<Self, Self::Error> {
        match val {
            Val::Number(n) => Ok(n),
            Val::String(_) => Err(error!(TypeMismatch)),
            Val::Null => Err(error!(ExpectedExpression)),
        }
    }
}

impl TryFrom<Val> for i32 {
    type Error = Error;
    fn try_from(val: Val) -> std::result::Result<Self, Self::Error> {
        let n = f64::try_from(val)?;
        if n.is_finite() && n >= i32::min_value() as f64 && n <= i32::max_value() as f64 {
            Ok(n as i32)
        } else {
            Err(error!(Overflow))
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Number(n) => {
                let s = if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                };
                if *n < 0.0 {
                    write!(f, "{} ", s)
                } else {
                    write!(f, " {} ", s)
                }
            }
            Val::String(s) => write!(f, "{}", s),
            Val::Null => Ok(()),
        }
    }
}
