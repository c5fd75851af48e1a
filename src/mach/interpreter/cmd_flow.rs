use super::cmd_var::Target;
use super::{Block, Flow, Frame, Interpreter, Param, Pass, Result, Sub};
use crate::error;
use crate::lang::token::{Operator, Word};
use crate::lang::{ErrorCode, Ident, Symbol, Token};
use crate::mach::{Event, Val, ValueType, VarKey};
use std::convert::TryFrom;

const ZONE_WIDTH: usize = 14;

/// How one CALL argument binds to its parameter.
#[derive(Debug)]
enum Arg {
    Value(Val),
    Reference(Ident),
    ArrayReference(Ident),
}

impl Interpreter {
    /// PRINT [expr][;|,]...
    pub(super) fn cmd_print(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        let mut s = String::new();
        let mut linefeed = true;
        loop {
            match self.peek() {
                Token::Colon | Token::Eol => break,
                Token::Semicolon => {
                    self.pc += 1;
                    linefeed = false;
                }
                Token::Comma => {
                    self.pc += 1;
                    linefeed = false;
                    let column = s.chars().count() % ZONE_WIDTH;
                    s.push_str(&" ".repeat(ZONE_WIDTH - column));
                }
                _ => {
                    let val = self.evaluate_expression(pass)?;
                    s.push_str(&val.to_string());
                    linefeed = true;
                }
            }
        }
        self.end_of_statement()?;
        if linefeed {
            s.push('\n');
        }
        if pass == Pass::Execute {
            self.events.push_back(Event::Print(s));
        }
        Ok(())
    }

    /// FOR var = from TO limit [STEP step]
    pub(super) fn cmd_for(&mut self, pass: Pass) -> Result<()> {
        let start = self.pc;
        self.pc += 1;
        let ident = self.expect_ident()?;
        if ident.is_string() {
            return Err(error!(TypeMismatch));
        }
        self.expect(Token::Operator(Operator::Equal), ErrorCode::ExpectedEqual)?;
        let from = self.evaluate_number(pass)?;
        self.expect(Token::Word(Word::To), ErrorCode::ExpectedTo)?;
        let limit = self.evaluate_number(pass)?;
        let step = if self.peek() == Token::Word(Word::Step) {
            self.pc += 1;
            self.evaluate_number(pass)?
        } else {
            1.0
        };
        self.end_of_statement()?;

        match pass {
            Pass::Validate => self.blocks.push(Block::For(ident.symbol(), start)),
            Pass::Execute => {
                self.assign(pass, &Target::Simple(ident), Val::Number(from))?;
                let var = self.key(ident);
                self.stack.push(Frame::For {
                    var,
                    limit,
                    step,
                    body: self.pc,
                })
            }
        }
    }

    /// NEXT [var]
    pub(super) fn cmd_next(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        let ident = match self.peek() {
            Token::Ident(ident) => {
                self.pc += 1;
                Some(ident)
            }
            _ => None,
        };
        self.end_of_statement()?;

        if pass == Pass::Validate {
            return match self.blocks.last() {
                Some(Block::For(symbol, _))
                    if ident.map_or(true, |ident| ident.symbol() == *symbol) =>
                {
                    self.blocks.pop().map(|_| ())
                }
                _ => Err(error!(NextWithoutFor)),
            };
        }

        let (var, limit, step, body) = match self.stack.last() {
            Some(Frame::For {
                var,
                limit,
                step,
                body,
            }) => (*var, *limit, *step, *body),
            _ => return Err(error!(NextWithoutFor)),
        };
        if let Some(ident) = ident {
            if ident.symbol() != var.symbol {
                return Err(error!(NextWithoutFor));
            }
        }
        let value = f64::try_from(self.vars.fetch(var)?)? + step;
        self.vars.store(var, Val::Number(value))?;
        let again = if step < 0.0 {
            value >= limit
        } else {
            value <= limit
        };
        if again {
            self.pc = body;
        } else {
            self.stack.pop()?;
        }
        Ok(())
    }

    /// SUB name[(param[()],...)]
    pub(super) fn cmd_sub(&mut self, pass: Pass) -> Result<()> {
        let start = self.pc;
        self.pc += 1;
        let name = self.expect_ident()?;
        let mut params: Vec<Param> = vec![];
        if self.peek() == Token::LParen {
            self.pc += 1;
            if self.peek() == Token::RParen {
                self.pc += 1;
            } else {
                loop {
                    let ident = self.expect_ident()?;
                    let mut is_array = false;
                    if self.peek() == Token::LParen {
                        self.pc += 1;
                        self.expect_right_parenthesis()?;
                        is_array = true;
                    }
                    if params
                        .iter()
                        .any(|p| p.ident == ident && p.is_array == is_array)
                    {
                        return Err(error!(VariableAlreadyDefined));
                    }
                    params.push(Param { ident, is_array });
                    match self.peek() {
                        Token::Comma => self.pc += 1,
                        Token::RParen => {
                            self.pc += 1;
                            break;
                        }
                        _ => return Err(error!(ExpectedRightParenthesis)),
                    }
                }
            }
        }
        self.end_of_statement()?;

        match pass {
            Pass::Validate => {
                if self.blocks.iter().any(|b| matches!(b, Block::Sub(..))) {
                    return Err(error!(NestedSub));
                }
                if self.subs.contains_key(&name.symbol()) {
                    return Err(error!(SubprogramAlreadyDefined));
                }
                self.subs.insert(
                    name.symbol(),
                    Sub {
                        params,
                        body: self.pc,
                        end: self.pc,
                    },
                );
                self.blocks.push(Block::Sub(name.symbol(), start))
            }
            Pass::Execute => {
                // Bodies only run through CALL.
                self.pc = match self.subs.get(&name.symbol()) {
                    Some(sub) => sub.end,
                    None => return Err(error!(InternalError; "SUB NOT INDEXED")),
                };
                Ok(())
            }
        }
    }

    /// END SUB
    pub(super) fn cmd_end_sub(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        self.end_of_statement()?;
        match pass {
            Pass::Validate => match self.blocks.last() {
                Some(Block::Sub(symbol, _)) => {
                    let symbol = *symbol;
                    self.blocks.pop()?;
                    if let Some(sub) = self.subs.get_mut(&symbol) {
                        sub.end = self.pc;
                    }
                    Ok(())
                }
                Some(Block::For(..)) => Err(error!(ForWithoutNext)),
                None => Err(error!(EndSubWithoutSub)),
            },
            Pass::Execute => self.return_from_sub(),
        }
    }

    /// EXIT SUB
    pub(super) fn cmd_exit_sub(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        self.end_of_statement()?;
        match pass {
            Pass::Validate => {
                if self.blocks.iter().any(|b| matches!(b, Block::Sub(..))) {
                    Ok(())
                } else {
                    Err(error!(ExitSubOutsideSub))
                }
            }
            Pass::Execute => self.return_from_sub(),
        }
    }

    /// CALL name[(arg,...)]
    pub(super) fn cmd_call(&mut self, pass: Pass) -> Result<()> {
        let start = self.pc;
        self.pc += 1;
        let name = self.expect_ident()?;
        let mut args = vec![];
        if self.peek() == Token::LParen {
            self.pc += 1;
            if self.peek() == Token::RParen {
                self.pc += 1;
            } else {
                loop {
                    args.push(self.argument(pass)?);
                    match self.peek() {
                        Token::Comma => self.pc += 1,
                        Token::RParen => {
                            self.pc += 1;
                            break;
                        }
                        _ => return Err(error!(ExpectedRightParenthesis)),
                    }
                }
            }
        }
        self.end_of_statement()?;

        match pass {
            Pass::Validate => {
                self.calls.push((name.symbol(), args.len(), start));
                Ok(())
            }
            Pass::Execute => self.enter_sub(name.symbol(), args),
        }
    }

    /// END
    pub(super) fn cmd_end(&mut self, pass: Pass) -> Result<Flow> {
        self.pc += 1;
        self.end_of_statement()?;
        match pass {
            Pass::Validate => Ok(Flow::Continue),
            Pass::Execute => Ok(Flow::End),
        }
    }

    /// A bare variable is passed by reference, `A()` passes a whole
    /// array, anything else is evaluated.
    fn argument(&mut self, pass: Pass) -> Result<Arg> {
        if let Token::Ident(ident) = self.peek() {
            match (self.peek_at(1), self.peek_at(2)) {
                (Token::Comma, _) | (Token::RParen, _) => {
                    self.pc += 1;
                    return Ok(Arg::Reference(ident));
                }
                (Token::LParen, Token::RParen) => {
                    self.pc += 3;
                    return Ok(Arg::ArrayReference(ident));
                }
                _ => {}
            }
        }
        Ok(Arg::Value(self.evaluate_expression(pass)?))
    }

    fn enter_sub(&mut self, name: Symbol, args: Vec<Arg>) -> Result<()> {
        let sub = match self.subs.get(&name) {
            Some(sub) => sub.clone(),
            None => return Err(error!(UndefinedSubprogram)),
        };
        if sub.params.len() != args.len() {
            return Err(error!(WrongNumberOfArguments));
        }
        let level = match self.level.checked_add(1) {
            Some(level) => level,
            None => return Err(error!(StackOverflow)),
        };

        // Everything is checked before the store is touched.
        for (param, arg) in sub.params.iter().zip(&args) {
            let param_type = ValueType::from(param.ident);
            let matches = match arg {
                Arg::Value(val) => !param.is_array && val.value_type() == Some(param_type),
                Arg::Reference(ident) => {
                    !param.is_array && ValueType::from(*ident) == param_type
                }
                Arg::ArrayReference(ident) => {
                    if self.vars.get_array(self.key(*ident)).is_none() {
                        return Err(error!(ArrayNotDimensioned));
                    }
                    param.is_array && ValueType::from(*ident) == param_type
                }
            };
            if !matches {
                return Err(error!(TypeMismatch));
            }
        }

        self.stack.push(Frame::Call { return_pc: self.pc })?;
        for (param, arg) in sub.params.iter().zip(args) {
            let param_type = ValueType::from(param.ident);
            let key = VarKey::new(param.ident.symbol(), level);
            match arg {
                Arg::Value(val) => {
                    self.vars.create_simple(key, param_type, None)?;
                    self.vars.store(key, val)?;
                }
                Arg::Reference(ident) => {
                    let target = self.key(ident);
                    if self.vars.get_simple(target).is_none() {
                        self.vars.create_simple(target, param_type, None)?;
                    }
                    self.vars.create_simple(key, param_type, Some(target))?;
                }
                Arg::ArrayReference(ident) => {
                    let target = self.key(ident);
                    self.vars.create_array_reference(key, target)?;
                }
            }
        }
        self.level = level;
        self.pc = sub.body;
        Ok(())
    }

    /// Unwinds loops left open inside the subprogram, then frees its scope.
    fn return_from_sub(&mut self) -> Result<()> {
        loop {
            match self.stack.pop() {
                Ok(Frame::Call { return_pc }) => {
                    self.vars.free(self.level);
                    self.level = self.level.saturating_sub(1);
                    self.pc = return_pc;
                    return Ok(());
                }
                Ok(Frame::For { .. }) => continue,
                Err(_) => return Err(error!(EndSubWithoutSub)),
            }
        }
    }
}
