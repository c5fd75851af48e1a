extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::mach::{AudioRegisters, Event, Runtime, NUM_VOICES};
use ansi_term::{Colour, Style};
use linefeed::{Completer, Completion, Interface, Prompter, ReadResult, Terminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn main() {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    if let Err(error) = main_loop(interrupted) {
        eprintln!("{}", error);
    }
}

fn main_loop(interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let mut runtime = Runtime::default();
    let command = Interface::new("NX BASIC")?;
    command.write_fmt(format_args!("NX BASIC\nREADY.\n"))?;

    loop {
        if interrupted.load(Ordering::SeqCst) {
            runtime.interrupt();
            interrupted.store(false, Ordering::SeqCst);
        };
        match runtime.execute(5000) {
            Event::Stopped => {
                let snapshot = Arc::new(LineCompleter::new(&runtime));
                let saved_completer = command.completer();
                command.set_completer(snapshot);
                let string = match command.read_line()? {
                    ReadResult::Input(string) => string,
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                };
                command.set_completer(saved_completer);
                if runtime.enter(&string) {
                    command.add_history_unique(string);
                }
            }
            Event::Errors(errors) => {
                for error in errors.iter() {
                    command.write_fmt(format_args!(
                        "{}\n",
                        Style::new().bold().paint(error.to_string())
                    ))?;
                }
            }
            Event::Running => {}
            Event::Print(s) => {
                command.write_fmt(format_args!("{}", s))?;
            }
            Event::List(s) => {
                command.write_fmt(format_args!("{}\n", s))?;
            }
            Event::ControlsChanged => {
                command.write_fmt(format_args!("{}\n", audio_indicator(runtime.audio())))?;
            }
        }
    }
    Ok(())
}

fn audio_indicator(audio: &AudioRegisters) -> String {
    let mut s = String::new();
    if audio.is_audio_enabled() {
        s.push_str(&Colour::Green.bold().paint("AUDIO ON").to_string());
    } else {
        s.push_str(&Style::new().dimmed().paint("AUDIO OFF").to_string());
    }
    for n in 0..NUM_VOICES {
        let voice = audio.voice(n);
        let label = format!(" V{}:{}", n, voice.frequency());
        if voice.attr.gate() != 0 {
            s.push_str(&Colour::Yellow.paint(label).to_string());
        } else {
            s.push_str(&label);
        }
    }
    s
}

/// Tab after a bare line number recalls that line for editing.
struct LineCompleter {
    lines: Vec<(u16, String)>,
}

impl LineCompleter {
    fn new(runtime: &Runtime) -> LineCompleter {
        let lines = runtime
            .listing()
            .lines()
            .filter_map(|line| {
                let number = line.split(' ').next()?.parse::<u16>().ok()?;
                Some((number, line.to_string()))
            })
            .collect();
        LineCompleter { lines }
    }
}

impl<Term: Terminal> Completer<Term> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        let num = prompter.buffer().parse::<u16>().ok()?;
        let (_, s) = self.lines.iter().find(|(n, _)| *n == num)?;
        let mut comp = Completion::simple(s.clone());
        comp.suffix = linefeed::complete::Suffix::None;
        Some(vec![comp])
    }
}
