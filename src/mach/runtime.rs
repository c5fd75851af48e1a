use super::{AudioRegisters, Flow, Interpreter, Program, MAX_LINE_LEN};
use crate::error;
use crate::lang::{lex, Error, LineNumber, Symbols, Token};
use std::collections::BTreeMap;

/// ## Events for the host
///
/// `execute` hands these back one at a time. Anything the program wants
/// the outside world to see travels this way.

#[derive(Debug, PartialEq)]
pub enum Event {
    Stopped,
    Running,
    Print(String),
    List(String),
    Errors(Vec<Error>),
    /// Audio was switched on; hosts with a control surface redraw it.
    ControlsChanged,
}

#[derive(Debug)]
struct Line {
    text: String,
    tokens: Vec<Token>,
}

#[derive(Debug, Default)]
pub struct Runtime {
    source: BTreeMap<u16, Line>,
    symbols: Symbols,
    interpreter: Interpreter,
    running: bool,
}

impl Runtime {
    pub fn new() -> Runtime {
        Runtime::default()
    }

    /// A numbered line is stored, or deleted when nothing follows the
    /// number. Anything else runs at once. Returns true when the input
    /// is worth keeping in history.
    pub fn enter(&mut self, s: &str) -> bool {
        if s.chars().count() > MAX_LINE_LEN {
            self.report(error!(LineBufferOverflow));
            return false;
        }
        let (line_number, tokens) = lex(s, &mut self.symbols);
        match line_number {
            Some(number) => {
                let text = strip_line_number(s);
                if text.is_empty() {
                    self.source.remove(&number);
                } else {
                    let text = text.to_string();
                    self.source.insert(number, Line { text, tokens });
                }
                true
            }
            None => {
                if tokens.is_empty() {
                    return false;
                }
                self.start(Program::compile(vec![(None, tokens)]));
                true
            }
        }
    }

    /// Runs up to `cycles` statements, stopping early at the first event.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(event) = self.interpreter.pop_event() {
            return event;
        }
        if !self.running {
            return Event::Stopped;
        }
        for _ in 0..cycles {
            match self.interpreter.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::End) => self.running = false,
                Ok(Flow::Run) => self.run(),
                Ok(Flow::New) => {
                    self.source.clear();
                    self.interpreter.clear_variables();
                    self.running = false;
                }
                Ok(Flow::List) => {
                    let listing = self.listing();
                    self.interpreter.push_event(Event::List(listing));
                }
                Err(error) => self.report(error),
            }
            if let Some(event) = self.interpreter.pop_event() {
                return event;
            }
            if !self.running {
                return Event::Stopped;
            }
        }
        Event::Running
    }

    pub fn interrupt(&mut self) {
        if self.running {
            let line_number = self.interpreter.line_number();
            self.report(error!(Break, line_number));
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn listing(&self) -> String {
        self.source
            .iter()
            .map(|(number, line)| format!("{} {}", number, line.text))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn line(&self, number: u16) -> Option<String> {
        self.source
            .get(&number)
            .map(|line| format!("{} {}", number, line.text))
    }

    pub fn audio(&self) -> &AudioRegisters {
        self.interpreter.audio()
    }

    pub fn audio_mut(&mut self) -> &mut AudioRegisters {
        self.interpreter.audio_mut()
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    fn run(&mut self) {
        let lines: Vec<(LineNumber, Vec<Token>)> = self
            .source
            .iter()
            .map(|(number, line)| (Some(*number), line.tokens.clone()))
            .collect();
        self.interpreter.clear_variables();
        self.start(Program::compile(lines));
    }

    fn start(&mut self, program: Program) {
        self.interpreter.load(program);
        match self.interpreter.validate() {
            Ok(()) => self.running = true,
            Err(error) => self.report(error),
        }
    }

    fn report(&mut self, error: Error) {
        self.running = false;
        self.interpreter.push_event(Event::Errors(vec![error]));
    }
}

fn strip_line_number(s: &str) -> &str {
    s.trim_start()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_delete_lines() {
        let mut r = Runtime::new();
        assert!(r.enter("20 PRINT 2"));
        assert!(r.enter("10   PRINT 1"));
        assert_eq!(r.listing(), "10 PRINT 1\n20 PRINT 2");
        assert!(r.enter("20"));
        assert_eq!(r.listing(), "10 PRINT 1");
        assert!(r.enter("5 REM"));
        assert_eq!(r.line(5), Some("5 REM".to_string()));
        assert_eq!(r.execute(10), Event::Stopped);
    }

    #[test]
    fn test_direct_line_runs() {
        let mut r = Runtime::new();
        assert!(r.enter("PRINT 1+1"));
        assert!(r.is_running());
        assert_eq!(r.execute(10), Event::Print(" 2 \n".to_string()));
        assert_eq!(r.execute(10), Event::Stopped);
    }

    #[test]
    fn test_line_too_long() {
        let mut r = Runtime::new();
        assert!(!r.enter(&"A".repeat(300)));
        match r.execute(10) {
            Event::Errors(errors) => assert_eq!(errors[0].to_string(), "?LINE BUFFER OVERFLOW"),
            event => panic!("{:?}", event),
        }
    }
}
