/*!
## Statement interpreter

Statements are executed straight from the token stream. A program is
walked twice: a validation pass parses every statement and checks block
structure without touching any state, then the executing pass runs it.
Both passes make identical parsing decisions; the `Pass` argument only
gates side effects.
*/

use super::{AudioRegisters, Event, Level, Program, Stack, Var, VarKey, MAX_STACK};
use crate::error;
use crate::lang::token::Word;
use crate::lang::{Error, ErrorCode, Ident, LineNumber, Symbol, Token};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, VecDeque};

mod cmd_audio;
mod cmd_flow;
mod cmd_var;
mod expr;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Validate,
    Execute,
}

/// What the host should do after a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    End,
    Run,
    New,
    List,
}

#[derive(Debug)]
enum Frame {
    For {
        var: VarKey,
        limit: f64,
        step: f64,
        body: usize,
    },
    Call {
        return_pc: usize,
    },
}

// Open blocks seen by the validation pass, with the pc that opened them.
#[derive(Debug)]
enum Block {
    For(Symbol, usize),
    Sub(Symbol, usize),
}

#[derive(Debug, Clone)]
struct Param {
    ident: Ident,
    is_array: bool,
}

#[derive(Debug, Clone)]
struct Sub {
    params: Vec<Param>,
    body: usize,
    end: usize,
}

#[derive(Debug)]
pub struct Interpreter {
    program: Program,
    pc: usize,
    level: Level,
    vars: Var,
    audio: AudioRegisters,
    stack: Stack<Frame>,
    blocks: Stack<Block>,
    subs: HashMap<Symbol, Sub>,
    calls: Vec<(Symbol, usize, usize)>,
    rng: StdRng,
    events: VecDeque<Event>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter {
            program: Program::new(),
            pc: 0,
            level: 0,
            vars: Var::new(),
            audio: AudioRegisters::new(),
            stack: Stack::new(MAX_STACK, "TOO MANY NESTED LOOPS OR CALLS"),
            blocks: Stack::new(MAX_STACK, "TOO MANY NESTED BLOCKS"),
            subs: HashMap::new(),
            calls: vec![],
            rng: StdRng::from_entropy(),
            events: VecDeque::new(),
        }
    }

    /// Installs a program. Variables and registers survive; anything left
    /// over from an interrupted subprogram call does not.
    pub fn load(&mut self, program: Program) {
        self.program = program;
        self.pc = 0;
        self.level = 0;
        self.vars.free(1);
        self.stack.clear();
        self.blocks.clear();
        self.subs.clear();
        self.calls.clear();
    }

    pub fn clear_variables(&mut self) {
        self.vars.clear();
        self.level = 0;
    }

    pub fn vars(&self) -> &Var {
        &self.vars
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn audio(&self) -> &AudioRegisters {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioRegisters {
        &mut self.audio
    }

    pub fn line_number(&self) -> LineNumber {
        self.program.line_number_for(self.pc)
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn pop_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// The whole program is parsed once with side effects suppressed.
    pub fn validate(&mut self) -> Result<()> {
        self.pc = 0;
        while self.pc < self.program.len() {
            let start = self.pc;
            if let Err(error) = self.statement(Pass::Validate) {
                return Err(error.in_line_number(self.program.line_number_for(start)));
            }
        }
        if let Some(block) = self.blocks.last() {
            let (code, pc) = match block {
                Block::For(_, pc) => (ErrorCode::ForWithoutNext, *pc),
                Block::Sub(_, pc) => (ErrorCode::SubWithoutEndSub, *pc),
            };
            return Err(Error::new(code).in_line_number(self.program.line_number_for(pc)));
        }
        for (name, argc, pc) in self.calls.drain(..) {
            let line_number = self.program.line_number_for(pc);
            match self.subs.get(&name) {
                None => return Err(error!(UndefinedSubprogram, line_number)),
                Some(sub) if sub.params.len() != argc => {
                    return Err(error!(WrongNumberOfArguments, line_number))
                }
                Some(_) => {}
            }
        }
        self.pc = 0;
        Ok(())
    }

    /// Runs one statement of the executing pass.
    pub fn step(&mut self) -> Result<Flow> {
        if self.pc >= self.program.len() {
            return Ok(Flow::End);
        }
        let start = self.pc;
        self.statement(Pass::Execute)
            .map_err(|error| error.in_line_number(self.program.line_number_for(start)))
    }

    fn statement(&mut self, pass: Pass) -> Result<Flow> {
        use Word::*;
        let word = match self.peek() {
            Token::Eol | Token::Colon => {
                self.pc += 1;
                return Ok(Flow::Continue);
            }
            Token::Ident(_) => Let,
            Token::Word(word) => word,
            _ => return Err(error!(SyntaxError; "EXPECTED STATEMENT")),
        };
        match word {
            Voice => self.cmd_voice(pass)?,
            VoiceA => self.cmd_voice_a(pass)?,
            VoiceEg => self.cmd_voice_eg(pass)?,
            VoiceLfo => self.cmd_voice_lfo(pass)?,
            VoiceLfoA => self.cmd_voice_lfo_a(pass)?,
            Play => self.cmd_play(pass)?,
            Let => self.cmd_let(pass)?,
            Dim => self.cmd_dim(pass)?,
            Print => self.cmd_print(pass)?,
            For => self.cmd_for(pass)?,
            Next => self.cmd_next(pass)?,
            Sub => self.cmd_sub(pass)?,
            EndSub => self.cmd_end_sub(pass)?,
            ExitSub => self.cmd_exit_sub(pass)?,
            Call => self.cmd_call(pass)?,
            Randomize => self.cmd_randomize(pass)?,
            End => return self.cmd_end(pass),
            Run => return self.cmd_host(pass, Flow::Run),
            New => return self.cmd_host(pass, Flow::New),
            List => return self.cmd_host(pass, Flow::List),
            Abs | Exit | Int | Rem | Rnd | Sgn | Sqr | Step | To => {
                return Err(error!(SyntaxError; "EXPECTED STATEMENT"))
            }
        }
        Ok(Flow::Continue)
    }

    fn peek(&self) -> Token {
        self.program.token(self.pc)
    }

    fn peek_at(&self, offset: usize) -> Token {
        self.program.token(self.pc + offset)
    }

    fn expect(&mut self, token: Token, code: ErrorCode) -> Result<()> {
        if self.peek() == token {
            self.pc += 1;
            Ok(())
        } else {
            Err(Error::new(code))
        }
    }

    fn expect_comma(&mut self) -> Result<()> {
        self.expect(Token::Comma, ErrorCode::ExpectedComma)
    }

    fn expect_right_parenthesis(&mut self) -> Result<()> {
        self.expect(Token::RParen, ErrorCode::ExpectedRightParenthesis)
    }

    fn expect_ident(&mut self) -> Result<Ident> {
        match self.peek() {
            Token::Ident(ident) => {
                self.pc += 1;
                Ok(ident)
            }
            _ => Err(error!(ExpectedIdentifier)),
        }
    }

    fn end_of_statement(&mut self) -> Result<()> {
        if self.peek().is_statement_end() {
            self.pc += 1;
            Ok(())
        } else {
            Err(error!(ExpectedEndOfStatement))
        }
    }

    fn key(&self, ident: Ident) -> VarKey {
        VarKey::new(ident.symbol(), self.level)
    }

    fn enable_audio(&mut self) {
        if self.audio.enable_audio() {
            self.events.push_back(Event::ControlsChanged);
        }
    }

    fn cmd_host(&mut self, pass: Pass, flow: Flow) -> Result<Flow> {
        self.pc += 1;
        self.end_of_statement()?;
        match pass {
            Pass::Validate => Ok(Flow::Continue),
            Pass::Execute => Ok(flow),
        }
    }

    fn cmd_randomize(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        let seed = self.evaluate_number(pass)?;
        self.end_of_statement()?;
        if pass == Pass::Execute {
            self.rng = StdRng::seed_from_u64(seed as i64 as u64);
        }
        Ok(())
    }
}
