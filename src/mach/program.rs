use crate::lang::{LineNumber, Token};

/// ## Tokenized program
///
/// Lines are laid end to end, each closed by `Token::Eol`. The
/// interpreter addresses tokens by position.

#[derive(Debug, Default)]
pub struct Program {
    tokens: Vec<Token>,
    lines: Vec<(usize, LineNumber)>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn compile<T: IntoIterator<Item = (LineNumber, Vec<Token>)>>(lines: T) -> Program {
        let mut program = Program::new();
        for (line_number, mut tokens) in lines {
            program.lines.push((program.tokens.len(), line_number));
            program.tokens.append(&mut tokens);
            program.tokens.push(Token::Eol);
        }
        program
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Past the end reads as an endless run of `Eol`.
    pub fn token(&self, pc: usize) -> Token {
        self.tokens.get(pc).cloned().unwrap_or(Token::Eol)
    }

    pub fn line_number_for(&self, pc: usize) -> LineNumber {
        match self.lines.binary_search_by(|(start, _)| start.cmp(&pc)) {
            Ok(index) => self.lines[index].1,
            Err(0) => None,
            Err(index) => self.lines[index - 1].1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::token::Word;

    #[test]
    fn test_line_lookup() {
        let program = Program::compile(vec![
            (Some(10), vec![Token::Word(Word::End)]),
            (Some(20), vec![Token::Word(Word::Run), Token::Colon, Token::Word(Word::End)]),
        ]);
        assert_eq!(program.len(), 6);
        assert_eq!(program.line_number_for(0), Some(10));
        assert_eq!(program.line_number_for(1), Some(10));
        assert_eq!(program.line_number_for(2), Some(20));
        assert_eq!(program.line_number_for(5), Some(20));
        assert_eq!(program.token(99), Token::Eol);
    }
}
