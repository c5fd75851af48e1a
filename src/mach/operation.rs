use super::{Val, ValueType};
use crate::error;
use crate::lang::token::Operator;
use crate::lang::Error;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

const TRUE: f64 = -1.0;
const FALSE: f64 = 0.0;

pub struct Operation {}

impl Operation {
    /// Type of the result, without computing it. The validation pass uses
    /// this so that it never raises arithmetic errors.
    pub fn result_type(op: Operator, lhs: &Val, rhs: &Val) -> Result<ValueType> {
        use Operator::*;
        match (lhs, rhs) {
            (Val::Number(_), Val::Number(_)) => match op {
                Not => Err(error!(InternalError; "NOT IS UNARY")),
                _ => Ok(ValueType::Number),
            },
            (Val::String(_), Val::String(_)) => match op {
                Plus => Ok(ValueType::String),
                Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => {
                    Ok(ValueType::Number)
                }
                _ => Err(error!(TypeMismatch)),
            },
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn binary(op: Operator, lhs: Val, rhs: Val) -> Result<Val> {
        match (lhs, rhs) {
            (Val::Number(l), Val::Number(r)) => Ok(Val::Number(Operation::number(op, l, r)?)),
            (Val::String(l), Val::String(r)) => Operation::string(op, &l, &r),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn number(op: Operator, l: f64, r: f64) -> Result<f64> {
        use Operator::*;
        let n = match op {
            Plus => l + r,
            Minus => l - r,
            Multiply => l * r,
            Divide => {
                if r == 0.0 {
                    return Err(error!(DivisionByZero));
                }
                l / r
            }
            Caret => l.powf(r),
            DivideInt => {
                let (l, r) = (integer(l)?, integer(r)?);
                if r == 0 {
                    return Err(error!(DivisionByZero));
                }
                match l.checked_div(r) {
                    Some(n) => n as f64,
                    None => return Err(error!(Overflow)),
                }
            }
            Modulus => {
                let (l, r) = (integer(l)?, integer(r)?);
                if r == 0 {
                    return Err(error!(DivisionByZero));
                }
                match l.checked_rem(r) {
                    Some(n) => n as f64,
                    None => return Err(error!(Overflow)),
                }
            }
            Equal => truth(l == r),
            NotEqual => truth(l != r),
            Less => truth(l < r),
            LessEqual => truth(l <= r),
            Greater => truth(l > r),
            GreaterEqual => truth(l >= r),
            And => (integer(l)? & integer(r)?) as f64,
            Or => (integer(l)? | integer(r)?) as f64,
            Xor => (integer(l)? ^ integer(r)?) as f64,
            Not => return Err(error!(InternalError; "NOT IS UNARY")),
        };
        if n.is_finite() {
            Ok(n)
        } else {
            Err(error!(Overflow))
        }
    }

    fn string(op: Operator, l: &str, r: &str) -> Result<Val> {
        use Operator::*;
        let n = match op {
            Plus => {
                let mut s = String::with_capacity(l.len() + r.len());
                s.push_str(l);
                s.push_str(r);
                if s.chars().count() > 255 {
                    return Err(error!(StringTooLong));
                }
                return Ok(Val::String(s.into()));
            }
            Equal => truth(l == r),
            NotEqual => truth(l != r),
            Less => truth(l < r),
            LessEqual => truth(l <= r),
            Greater => truth(l > r),
            GreaterEqual => truth(l >= r),
            _ => return Err(error!(TypeMismatch)),
        };
        Ok(Val::Number(n))
    }

    pub fn negate(val: Val) -> Result<Val> {
        match val {
            Val::Number(n) => Ok(Val::Number(-n)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        match val {
            Val::Number(n) => Ok(Val::Number(!integer(n)? as f64)),
            _ => Err(error!(TypeMismatch)),
        }
    }
}

fn integer(n: f64) -> Result<i32> {
    i32::try_from(Val::Number(n))
}

fn truth(b: bool) -> f64 {
    if b {
        TRUE
    } else {
        FALSE
    }
}
