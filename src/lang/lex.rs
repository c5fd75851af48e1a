use super::{token::*, LineNumber, Symbols, MAX_LINE_NUMBER};

pub fn lex(s: &str, symbols: &mut Symbols) -> (LineNumber, Vec<Token>) {
    BasicLexer::lex(s, symbols)
}

fn is_basic_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r' || c == '\n'
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_basic_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_basic_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

trait Tokenizers<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>>;
    fn symbols(&mut self) -> &mut Symbols;

    fn whitespace(&mut self) {
        while let Some(pk) = self.chars().peek() {
            if !is_basic_whitespace(*pk) {
                break;
            }
            self.chars().next();
        }
    }

    fn number(&mut self) -> Option<Token> {
        let mut s = String::new();
        let mut decimal = false;
        let mut exp = false;
        while let Some(&pk) = self.chars().peek() {
            let ch = pk.to_ascii_uppercase();
            if is_basic_digit(ch) {
                s.push(ch);
            } else if ch == '.' && !decimal && !exp {
                decimal = true;
                s.push(ch);
            } else if ch == 'E' && !exp && !s.is_empty() {
                exp = true;
                s.push(ch);
                self.chars().next();
                if let Some(&sign) = self.chars().peek() {
                    if sign == '+' || sign == '-' {
                        s.push(sign);
                        self.chars().next();
                    }
                }
                continue;
            } else {
                break;
            }
            self.chars().next();
        }
        match s.parse::<f64>() {
            Ok(n) => Some(Token::Number(n)),
            Err(_) => Some(Token::Unknown(s)),
        }
    }

    fn string(&mut self) -> Option<Token> {
        let mut s = String::new();
        self.chars().next();
        while let Some(ch) = self.chars().next() {
            if ch == '"' {
                break;
            }
            s.push(ch);
        }
        Some(Token::String(s.into()))
    }

    fn alphabetic(&mut self) -> Option<Token> {
        let mut s = String::new();
        while let Some(&pk) = self.chars().peek() {
            if !is_basic_word_char(pk) {
                break;
            }
            s.push(pk.to_ascii_uppercase());
            self.chars().next();
        }
        if let Some(token) = Word::from_string(&s) {
            return Some(Token::Word(token));
        }
        if let Some(op) = Operator::from_string(&s) {
            return Some(Token::Operator(op));
        }
        if let Some('$') = self.chars().peek() {
            self.chars().next();
            s.push('$');
        }
        let ident = self.symbols().intern(&s);
        Some(Token::Ident(ident))
    }

    fn minutia(&mut self) -> Option<Token> {
        let ch = self.chars().next()?;
        let token = match ch {
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ':' => Token::Colon,
            ';' => Token::Semicolon,
            '?' => Token::Word(Word::Print),
            '\'' => Token::Word(Word::Rem),
            '<' | '>' => {
                let mut s = ch.to_string();
                if let Some(&pk) = self.chars().peek() {
                    if pk == '=' || (ch == '<' && pk == '>') {
                        s.push(pk);
                        self.chars().next();
                    }
                }
                match Operator::from_string(&s) {
                    Some(op) => Token::Operator(op),
                    None => Token::Unknown(s),
                }
            }
            _ => match Operator::from_string(&ch.to_string()) {
                Some(op) => Token::Operator(op),
                None => Token::Unknown(ch.to_string()),
            },
        };
        Some(token)
    }
}

struct BasicLexer<'a, 'b> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    symbols: &'b mut Symbols,
    remark: bool,
}

impl<'a, 'b> Tokenizers<'a> for BasicLexer<'a, 'b> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>> {
        &mut self.chars
    }
    fn symbols(&mut self) -> &mut Symbols {
        &mut *self.symbols
    }
}

impl<'a, 'b> Iterator for BasicLexer<'a, 'b> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remark {
            return None;
        }
        self.whitespace();
        let pk = *self.chars.peek()?;
        let token = if is_basic_digit(pk) || pk == '.' {
            self.number()
        } else if is_basic_alphabetic(pk) {
            self.alphabetic()
        } else if pk == '"' {
            self.string()
        } else {
            self.minutia()
        };
        if let Some(Token::Word(Word::Rem)) = token {
            self.remark = true;
            return None;
        }
        token
    }
}

impl<'a, 'b> BasicLexer<'a, 'b> {
    fn lex(s: &str, symbols: &mut Symbols) -> (LineNumber, Vec<Token>) {
        let trimmed = s.trim_start();
        let digits = trimmed.chars().take_while(|c| is_basic_digit(*c)).count();
        let mut line_number = None;
        let mut rest = trimmed;
        if digits > 0 {
            if let Ok(n) = trimmed[..digits].parse::<u16>() {
                if n <= MAX_LINE_NUMBER {
                    line_number = Some(n);
                    rest = &trimmed[digits..];
                }
            }
        }
        let mut tokens: Vec<Token> = BasicLexer {
            chars: rest.chars().peekable(),
            symbols,
            remark: false,
        }
        .collect();
        BasicLexer::collapse_sub(&mut tokens);
        (line_number, tokens)
    }

    fn collapse_sub(tokens: &mut Vec<Token>) {
        let mut locs: Vec<(usize, Token)> = vec![];
        for (index, tt) in tokens.windows(2).enumerate() {
            if let Token::Word(Word::Sub) = tt[1] {
                match tt[0] {
                    Token::Word(Word::End) => locs.push((index, Token::Word(Word::EndSub))),
                    Token::Word(Word::Exit) => locs.push((index, Token::Word(Word::ExitSub))),
                    _ => {}
                }
            }
        }
        while let Some((index, token)) = locs.pop() {
            tokens.splice(index..index + 2, Some(token));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_number() {
        let mut symbols = Symbols::new();
        let (ln, tokens) = lex("10 END", &mut symbols);
        assert_eq!(ln, Some(10));
        assert_eq!(tokens, vec![Token::Word(Word::End)]);
        let (ln, _) = lex("65530 END", &mut symbols);
        assert_eq!(ln, None);
    }

    #[test]
    fn test_end_sub() {
        let mut symbols = Symbols::new();
        let (_, tokens) = lex("end sub:exit sub:end", &mut symbols);
        assert_eq!(
            tokens,
            vec![
                Token::Word(Word::EndSub),
                Token::Colon,
                Token::Word(Word::ExitSub),
                Token::Colon,
                Token::Word(Word::End),
            ]
        );
    }
}
