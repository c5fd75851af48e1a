use super::{Interpreter, Pass, Result};
use crate::error;
use crate::lang::token::{Operator, Word, NEGATION_PRECEDENCE, NOT_PRECEDENCE};
use crate::lang::{Ident, Token};
use crate::mach::function::Function;
use crate::mach::operation::Operation;
use crate::mach::{Attributes, Val, ValueType};
use rand::Rng;
use std::convert::TryFrom;

impl Interpreter {
    pub(super) fn evaluate_expression(&mut self, pass: Pass) -> Result<Val> {
        self.expression(pass, 0)
    }

    pub(super) fn evaluate_number(&mut self, pass: Pass) -> Result<f64> {
        f64::try_from(self.evaluate_expression(pass)?)
    }

    /// Range checks only bite when executing; validation values are
    /// placeholders.
    pub(super) fn evaluate_numeric_expression(
        &mut self,
        pass: Pass,
        min: f64,
        max: f64,
    ) -> Result<f64> {
        let n = self.evaluate_number(pass)?;
        if pass == Pass::Execute && !(min..=max).contains(&n) {
            return Err(error!(InvalidParameter));
        }
        Ok(n)
    }

    /// `Val::Null` when the argument position is empty.
    pub(super) fn evaluate_optional_numeric_expression(
        &mut self,
        pass: Pass,
        min: f64,
        max: f64,
    ) -> Result<Val> {
        if self.peek().is_argument_end() {
            return Ok(Val::Null);
        }
        Ok(Val::Number(self.evaluate_numeric_expression(pass, min, max)?))
    }

    /// Either a parenthesized list of fields merged into `base`, or a plain
    /// value for the whole register. A leading `(` always opens the field
    /// list, so `(1+2)*4` is rejected; write `12` or `0+(1+2)*4` instead.
    pub(super) fn evaluate_attributes<A: Attributes>(&mut self, pass: Pass, base: A) -> Result<A> {
        if self.peek() != Token::LParen {
            let n = self.evaluate_numeric_expression(pass, 0.0, 255.0)?;
            return Ok(A::from_value(n as u8));
        }
        self.pc += 1;
        let mut value = u32::from(base.value());
        for (index, field) in A::FIELDS.iter().enumerate() {
            if index > 0 {
                match self.peek() {
                    Token::Comma => self.pc += 1,
                    Token::RParen => break,
                    _ => return Err(error!(ExpectedComma)),
                }
            }
            let max = f64::from(field.max());
            if let Val::Number(n) = self.evaluate_optional_numeric_expression(pass, 0.0, max)? {
                value = field.insert(value, n as u32);
            }
        }
        self.expect_right_parenthesis()?;
        Ok(A::from_value(value as u8))
    }

    /// Subscripts, starting at the opening parenthesis.
    pub(super) fn evaluate_indices(&mut self, pass: Pass) -> Result<Vec<i32>> {
        self.pc += 1;
        let mut indices = vec![];
        loop {
            indices.push(i32::try_from(self.evaluate_expression(pass)?)?);
            match self.peek() {
                Token::Comma => self.pc += 1,
                Token::RParen => {
                    self.pc += 1;
                    return Ok(indices);
                }
                _ => return Err(error!(ExpectedRightParenthesis)),
            }
        }
    }

    fn expression(&mut self, pass: Pass, min_precedence: usize) -> Result<Val> {
        let mut lhs = self.primary(pass)?;
        loop {
            let op = match self.peek() {
                Token::Operator(op) => op,
                _ => break,
            };
            let precedence = match op.precedence() {
                Some(precedence) if precedence >= min_precedence => precedence,
                _ => break,
            };
            self.pc += 1;
            // ^ is left associative like the rest
            let rhs = self.expression(pass, precedence + 1)?;
            lhs = match pass {
                Pass::Validate => Val::default_for(Operation::result_type(op, &lhs, &rhs)?),
                Pass::Execute => Operation::binary(op, lhs, rhs)?,
            };
        }
        Ok(lhs)
    }

    fn primary(&mut self, pass: Pass) -> Result<Val> {
        match self.peek() {
            Token::Number(n) => {
                self.pc += 1;
                Ok(Val::Number(n))
            }
            Token::String(s) => {
                self.pc += 1;
                Ok(Val::String(s))
            }
            Token::LParen => {
                self.pc += 1;
                let val = self.expression(pass, 0)?;
                self.expect_right_parenthesis()?;
                Ok(val)
            }
            Token::Operator(Operator::Minus) => {
                self.pc += 1;
                let val = self.expression(pass, NEGATION_PRECEDENCE)?;
                Operation::negate(val)
            }
            Token::Operator(Operator::Plus) => {
                self.pc += 1;
                let val = self.expression(pass, NEGATION_PRECEDENCE)?;
                Ok(Val::Number(f64::try_from(val)?))
            }
            Token::Operator(Operator::Not) => {
                self.pc += 1;
                let val = self.expression(pass, NOT_PRECEDENCE)?;
                Operation::not(val)
            }
            Token::Ident(ident) => self.variable_value(pass, ident),
            Token::Word(word) if word.is_function() => self.function(pass, word),
            _ => Err(error!(ExpectedExpression)),
        }
    }

    /// Unassigned simple variables read as their default without being
    /// created.
    fn variable_value(&mut self, pass: Pass, ident: Ident) -> Result<Val> {
        self.pc += 1;
        let default = Val::default_for(ValueType::from(ident));
        if self.peek() == Token::LParen {
            let indices = self.evaluate_indices(pass)?;
            if pass == Pass::Validate {
                return Ok(default);
            }
            let key = self.key(ident);
            return Ok(self.vars.array_value(key, &indices)?.clone());
        }
        let key = self.key(ident);
        if pass == Pass::Validate || self.vars.get_simple(key).is_none() {
            return Ok(default);
        }
        self.vars.fetch(key)
    }

    fn function(&mut self, pass: Pass, word: Word) -> Result<Val> {
        self.pc += 1;
        if word == Word::Rnd {
            return self.function_rnd(pass);
        }
        if self.peek() != Token::LParen {
            return Err(error!(SyntaxError; "EXPECTED LEFT PARENTHESIS"));
        }
        self.pc += 1;
        let n = self.evaluate_number(pass)?;
        self.expect_right_parenthesis()?;
        match pass {
            Pass::Validate => Ok(Val::Number(0.0)),
            Pass::Execute => Ok(Val::Number(Function::call(word, n)?)),
        }
    }

    /// RND alone is a fraction in [0, 1). RND(N) is a whole number 0..=N.
    fn function_rnd(&mut self, pass: Pass) -> Result<Val> {
        let mut limit = None;
        if self.peek() == Token::LParen {
            self.pc += 1;
            limit = Some(self.evaluate_number(pass)?);
            self.expect_right_parenthesis()?;
        }
        if pass == Pass::Validate {
            return Ok(Val::Number(0.0));
        }
        let n = match limit {
            None => self.rng.gen::<f64>(),
            Some(limit) => {
                let limit = i32::try_from(Val::Number(limit))?;
                if limit < 0 {
                    return Err(error!(InvalidParameter));
                }
                self.rng.gen_range(0..=limit) as f64
            }
        };
        Ok(Val::Number(n))
    }
}
