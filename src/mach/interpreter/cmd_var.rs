use super::{Interpreter, Pass, Result};
use crate::error;
use crate::lang::token::{Operator, Word};
use crate::lang::{ErrorCode, Ident, Token};
use crate::mach::{Val, ValueType};

/// Left side of an assignment.
#[derive(Debug)]
pub(super) enum Target {
    Simple(Ident),
    Element(Ident, Vec<i32>),
}

impl Target {
    fn ident(&self) -> Ident {
        match self {
            Target::Simple(ident) | Target::Element(ident, _) => *ident,
        }
    }
}

impl Interpreter {
    /// [LET] var = expr
    pub(super) fn cmd_let(&mut self, pass: Pass) -> Result<()> {
        if self.peek() == Token::Word(Word::Let) {
            self.pc += 1;
        }
        let target = self.target(pass)?;
        self.expect(Token::Operator(Operator::Equal), ErrorCode::ExpectedEqual)?;
        let value = self.evaluate_expression(pass)?;
        self.end_of_statement()?;
        self.assign(pass, &target, value)
    }

    /// DIM name(bounds)[,name(bounds)...]
    pub(super) fn cmd_dim(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        let mut arrays = vec![];
        loop {
            let ident = self.expect_ident()?;
            if self.peek() != Token::LParen {
                return Err(error!(SyntaxError; "EXPECTED LEFT PARENTHESIS"));
            }
            let bounds = self.evaluate_indices(pass)?;
            arrays.push((ident, bounds));
            if self.peek() != Token::Comma {
                break;
            }
            self.pc += 1;
        }
        self.end_of_statement()?;

        if pass == Pass::Validate {
            return Ok(());
        }
        let arrays: Vec<_> = arrays
            .into_iter()
            .map(|(ident, bounds)| {
                let sizes: Vec<i32> = bounds.iter().map(|b| b.saturating_add(1)).collect();
                (self.key(ident), ValueType::from(ident), sizes)
            })
            .collect();
        self.vars.dim_all(&arrays)
    }

    pub(super) fn target(&mut self, pass: Pass) -> Result<Target> {
        let ident = self.expect_ident()?;
        if self.peek() == Token::LParen {
            Ok(Target::Element(ident, self.evaluate_indices(pass)?))
        } else {
            Ok(Target::Simple(ident))
        }
    }

    /// Types are checked on both passes. A simple variable springs into
    /// existence on first assignment.
    pub(super) fn assign(&mut self, pass: Pass, target: &Target, value: Val) -> Result<()> {
        let ident = target.ident();
        if value.value_type() != Some(ValueType::from(ident)) {
            return Err(error!(TypeMismatch));
        }
        if pass == Pass::Validate {
            return Ok(());
        }
        let key = self.key(ident);
        match target {
            Target::Simple(_) => {
                if self.vars.get_simple(key).is_none() {
                    self.vars.create_simple(key, ValueType::from(ident), None)?;
                }
                self.vars.store(key, value)
            }
            Target::Element(_, indices) => self.vars.store_array(key, indices, value),
        }
    }
}
