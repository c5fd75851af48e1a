use super::LineNumber;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line_number: LineNumber,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: None,
            message: "",
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn is_direct(&self) -> bool {
        self.line_number.is_none()
    }

    /// Errors raised deep inside an evaluation don't know their line.
    /// The runtime attaches it once, on the way out.
    pub fn in_line_number(&self, line: LineNumber) -> Error {
        if self.line_number.is_some() {
            return self.clone();
        }
        Error {
            code: self.code,
            line_number: line,
            message: self.message,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            line_number: self.line_number,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SyntaxError = 2,
    NextWithoutFor = 3,
    ForWithoutNext = 4,
    InvalidParameter = 5,
    Overflow = 6,
    OutOfMemory = 7,
    StackOverflow = 8,
    IndexOutOfBounds = 9,
    ArrayNotDimensioned = 10,
    DivisionByZero = 11,
    TypeMismatch = 13,
    StringTooLong = 15,
    WrongNumberOfDimensions = 16,
    TooManyDimensions = 17,
    VariableAlreadyDefined = 18,
    UndefinedSubprogram = 19,
    SubprogramAlreadyDefined = 20,
    WrongNumberOfArguments = 21,
    SubWithoutEndSub = 22,
    EndSubWithoutSub = 23,
    NestedSub = 24,
    ExitSubOutsideSub = 25,
    ExpectedComma = 30,
    ExpectedExpression = 31,
    ExpectedEndOfStatement = 32,
    ExpectedRightParenthesis = 33,
    ExpectedEqual = 34,
    ExpectedTo = 35,
    ExpectedIdentifier = 36,
    Break = 50,
    InternalError = 51,
    LineBufferOverflow = 52,
}

impl ErrorCode {
    fn as_str(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            SyntaxError => "SYNTAX ERROR",
            NextWithoutFor => "NEXT WITHOUT FOR",
            ForWithoutNext => "FOR WITHOUT NEXT",
            InvalidParameter => "INVALID PARAMETER",
            Overflow => "OVERFLOW",
            OutOfMemory => "OUT OF MEMORY",
            StackOverflow => "STACK OVERFLOW",
            IndexOutOfBounds => "INDEX OUT OF BOUNDS",
            ArrayNotDimensioned => "ARRAY NOT DIMENSIONED",
            DivisionByZero => "DIVISION BY ZERO",
            TypeMismatch => "TYPE MISMATCH",
            StringTooLong => "STRING TOO LONG",
            WrongNumberOfDimensions => "WRONG NUMBER OF DIMENSIONS",
            TooManyDimensions => "TOO MANY DIMENSIONS",
            VariableAlreadyDefined => "VARIABLE ALREADY DEFINED",
            UndefinedSubprogram => "UNDEFINED SUBPROGRAM",
            SubprogramAlreadyDefined => "SUBPROGRAM ALREADY DEFINED",
            WrongNumberOfArguments => "WRONG NUMBER OF ARGUMENTS",
            SubWithoutEndSub => "SUB WITHOUT END SUB",
            EndSubWithoutSub => "END SUB WITHOUT SUB",
            NestedSub => "SUB INSIDE SUB",
            ExitSubOutsideSub => "EXIT SUB OUTSIDE SUB",
            ExpectedComma => "EXPECTED COMMA",
            ExpectedExpression => "EXPECTED EXPRESSION",
            ExpectedEndOfStatement => "EXPECTED END OF STATEMENT",
            ExpectedRightParenthesis => "EXPECTED RIGHT PARENTHESIS",
            ExpectedEqual => "EXPECTED EQUAL SIGN",
            ExpectedTo => "EXPECTED TO",
            ExpectedIdentifier => "EXPECTED IDENTIFIER",
            Break => "BREAK",
            InternalError => "INTERNAL ERROR",
            LineBufferOverflow => "LINE BUFFER OVERFLOW",
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" {}", line_number));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if suffix.is_empty() {
            write!(f, "?{}", self.code.as_str())
        } else if self.line_number.is_some() {
            write!(f, "?{} IN{}", self.code.as_str(), suffix)
        } else {
            write!(f, "?{}{}", self.code.as_str(), suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(error!(ExpectedComma).to_string(), "?EXPECTED COMMA");
        assert_eq!(
            error!(InvalidParameter, Some(30)).to_string(),
            "?INVALID PARAMETER IN 30"
        );
        assert_eq!(
            error!(SyntaxError; "UNKNOWN STATEMENT").to_string(),
            "?SYNTAX ERROR; UNKNOWN STATEMENT"
        );
    }

    #[test]
    fn test_line_number_sticks() {
        let e = error!(Overflow, Some(10)).in_line_number(Some(20));
        assert_eq!(e.line_number(), Some(10));
    }
}
