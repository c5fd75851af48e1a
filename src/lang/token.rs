pub use super::ident::Ident;
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Unknown(String),
    Number(f64),
    String(Rc<str>),
    Word(Word),
    Operator(Operator),
    Ident(Ident),
    LParen,
    RParen,
    Comma,
    Colon,
    Semicolon,
    Eol,
}

impl Token {
    /// Punctuation that closes an argument position. An optional argument
    /// sitting in front of one of these was omitted.
    pub fn is_argument_end(&self) -> bool {
        matches!(
            self,
            Token::Comma | Token::RParen | Token::Colon | Token::Semicolon | Token::Eol
        )
    }

    pub fn is_statement_end(&self) -> bool {
        matches!(self, Token::Colon | Token::Eol)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Word {
    Abs,
    Call,
    Dim,
    End,
    EndSub,
    Exit,
    ExitSub,
    For,
    Int,
    Let,
    List,
    New,
    Next,
    Play,
    Print,
    Randomize,
    Rem,
    Rnd,
    Run,
    Sgn,
    Sqr,
    Step,
    Sub,
    To,
    Voice,
    VoiceA,
    VoiceEg,
    VoiceLfo,
    VoiceLfoA,
}

const WORDS: &[(&str, Word)] = &[
    ("ABS", Word::Abs),
    ("CALL", Word::Call),
    ("DIM", Word::Dim),
    ("END", Word::End),
    ("EXIT", Word::Exit),
    ("FOR", Word::For),
    ("INT", Word::Int),
    ("LET", Word::Let),
    ("LIST", Word::List),
    ("NEW", Word::New),
    ("NEXT", Word::Next),
    ("PLAY", Word::Play),
    ("PRINT", Word::Print),
    ("?", Word::Print),
    ("RANDOMIZE", Word::Randomize),
    ("REM", Word::Rem),
    ("'", Word::Rem),
    ("RND", Word::Rnd),
    ("RUN", Word::Run),
    ("SGN", Word::Sgn),
    ("SQR", Word::Sqr),
    ("STEP", Word::Step),
    ("SUB", Word::Sub),
    ("TO", Word::To),
    ("VOICE", Word::Voice),
    ("VOICE.A", Word::VoiceA),
    ("VOICE.EG", Word::VoiceEg),
    ("VOICE.LFO", Word::VoiceLfo),
    ("VOICE.LFO.A", Word::VoiceLfoA),
];

impl Word {
    pub fn from_string(s: &str) -> Option<Word> {
        WORDS.iter().find(|(name, _)| *name == s).map(|(_, w)| *w)
    }

    pub fn is_function(&self) -> bool {
        use Word::*;
        matches!(self, Abs | Int | Rnd | Sgn | Sqr)
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Word::*;
        match self {
            EndSub => write!(f, "END SUB"),
            ExitSub => write!(f, "EXIT SUB"),
            Rem => write!(f, "REM"),
            Print => write!(f, "PRINT"),
            word => match WORDS.iter().find(|(_, w)| w == word) {
                Some((name, _)) => write!(f, "{}", name),
                None => write!(f, "{:?}", word),
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Caret,
    Multiply,
    Divide,
    DivideInt,
    Modulus,
    Plus,
    Minus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
    Xor,
}

impl Operator {
    pub fn from_string(s: &str) -> Option<Operator> {
        use Operator::*;
        Some(match s {
            "^" => Caret,
            "*" => Multiply,
            "/" => Divide,
            "\\" => DivideInt,
            "MOD" => Modulus,
            "+" => Plus,
            "-" => Minus,
            "=" => Equal,
            "<>" => NotEqual,
            "<" => Less,
            "<=" => LessEqual,
            ">" => Greater,
            ">=" => GreaterEqual,
            "NOT" => Not,
            "AND" => And,
            "OR" => Or,
            "XOR" => Xor,
            _ => return None,
        })
    }

    /// Binding strength as a binary operator. `NOT` is prefix only.
    pub fn precedence(&self) -> Option<usize> {
        use Operator::*;
        match self {
            Or | Xor => Some(1),
            And => Some(2),
            Not => None,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => Some(4),
            Plus | Minus => Some(5),
            Modulus => Some(6),
            DivideInt => Some(7),
            Multiply | Divide => Some(8),
            Caret => Some(10),
        }
    }
}

pub const NOT_PRECEDENCE: usize = 3;
pub const NEGATION_PRECEDENCE: usize = 9;

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Caret => write!(f, "^"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            DivideInt => write!(f, "\\"),
            Modulus => write!(f, "MOD"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Equal => write!(f, "="),
            NotEqual => write!(f, "<>"),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Not => write!(f, "NOT"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),
            Xor => write!(f, "XOR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        assert_eq!(Word::from_string("VOICE.LFO.A"), Some(Word::VoiceLfoA));
        assert_eq!(Word::from_string("PICKLES"), None);
        assert_eq!(Operator::from_string("<>"), Some(Operator::NotEqual));
    }

    #[test]
    fn test_display() {
        assert_eq!(Word::VoiceEg.to_string(), "VOICE.EG");
        assert_eq!(Word::EndSub.to_string(), "END SUB");
        assert_eq!(Operator::Modulus.to_string(), "MOD");
    }
}
