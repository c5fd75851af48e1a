use crate::error;
use crate::lang::token::Word;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

pub struct Function {}

impl Function {
    /// Single-argument numeric functions. RND needs the generator and is
    /// handled by the interpreter.
    pub fn call(word: Word, n: f64) -> Result<f64> {
        match word {
            Word::Abs => Ok(n.abs()),
            Word::Int => Ok(n.floor()),
            Word::Sgn => Ok(Function::sgn(n)),
            Word::Sqr => Function::sqr(n),
            _ => Err(error!(InternalError; "NOT A FUNCTION")),
        }
    }

    fn sgn(n: f64) -> f64 {
        if n > 0.0 {
            1.0
        } else if n < 0.0 {
            -1.0
        } else {
            0.0
        }
    }

    fn sqr(n: f64) -> Result<f64> {
        if n < 0.0 {
            return Err(error!(InvalidParameter));
        }
        Ok(n.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_floors() {
        assert_eq!(Function::call(Word::Int, -2.5), Ok(-3.0));
        assert_eq!(Function::call(Word::Int, 2.5), Ok(2.0));
    }

    #[test]
    fn test_sqr_negative() {
        assert!(Function::call(Word::Sqr, -1.0).is_err());
        assert_eq!(Function::call(Word::Sqr, 16.0), Ok(4.0));
    }
}
