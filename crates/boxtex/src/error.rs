//! Error taxonomy: bad input versus bad environment.

use std::fmt;

use strum_macros::IntoStaticStr;

/// An error raised while parsing, carrying the character offset into the
/// (macro-expanded) input where it was detected.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError(pub usize, pub ParseErrKind);

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrKind {
    UnexpectedEof,
    /// A group opened with the given delimiter never closed.
    UnclosedGroup(String),
    UnexpectedClose(char),
    UnknownCommand(String),
    UnknownEnvironment(String),
    MismatchedEnvironment {
        expected: String,
        got: String,
    },
    MissingArgument {
        cmd: String,
        expected: usize,
        got: usize,
    },
    InvalidMacroName(String),
    MacroAlreadyDefined(String),
    UndefinedMacro(String),
    /// Macro rewriting exceeded the expansion depth or iteration cap.
    ExpansionTooDeep(String),
    DoubleScript(DoubleScriptKind),
    /// Not a delimiter after `\left`, `\right` or `\middle`.
    InvalidDelimiter(String),
    UnknownColor(String),
    ExpectedLength(String),
    ExpectedNumber(String),
    MisplacedAlignment,
    /// `\right` (or `\end`) with no matching opener.
    UnmatchedRight(String),
    /// `\middle` outside `\left...\right`.
    MisplacedMiddle,
    UnmatchedDollar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum DoubleScriptKind {
    #[strum(serialize = "superscript")]
    Sup,
    #[strum(serialize = "subscript")]
    Sub,
}

impl ParseErrKind {
    /// Returns the error message as a string.
    pub fn string(&self) -> String {
        match self {
            ParseErrKind::UnexpectedEof => "Unexpected end of input.".to_string(),
            ParseErrKind::UnclosedGroup(open) => {
                "Group opened with \"".to_string() + open + "\" is never closed."
            }
            ParseErrKind::UnexpectedClose(c) => {
                let mut s = "Unexpected closing delimiter: '".to_string();
                s.push(*c);
                s += "'.";
                s
            }
            ParseErrKind::UnknownCommand(cmd) => "Unknown command \"\\".to_string() + cmd + "\".",
            ParseErrKind::UnknownEnvironment(env) => {
                "Unknown environment \"".to_string() + env + "\"."
            }
            ParseErrKind::MismatchedEnvironment { expected, got } => {
                "Expected \"\\end{".to_string() + expected + "}\", but got \"\\end{" + got + "}\"."
            }
            ParseErrKind::MissingArgument { cmd, expected, got } => {
                "Command \"\\".to_string()
                    + cmd
                    + "\" expects "
                    + &expected.to_string()
                    + " argument(s), got "
                    + &got.to_string()
                    + "."
            }
            ParseErrKind::InvalidMacroName(name) => {
                "Invalid macro name: \"\\".to_string() + name + "\"."
            }
            ParseErrKind::MacroAlreadyDefined(name) => {
                "Macro \"\\".to_string() + name + "\" is already defined."
            }
            ParseErrKind::UndefinedMacro(name) => {
                "Macro \"\\".to_string() + name + "\" has not been defined."
            }
            ParseErrKind::ExpansionTooDeep(name) => {
                "Macro expansion of \"\\".to_string() + name + "\" is too deep."
            }
            ParseErrKind::DoubleScript(kind) => {
                "Double ".to_string() + <&str>::from(kind) + "."
            }
            ParseErrKind::InvalidDelimiter(got) => {
                "\"".to_string() + got + "\" is not a delimiter."
            }
            ParseErrKind::UnknownColor(color) => "Unknown color \"".to_string() + color + "\".",
            ParseErrKind::ExpectedLength(got) => {
                "Expected a length with units, got \"".to_string() + got + "\"."
            }
            ParseErrKind::ExpectedNumber(got) => {
                "Expected a number, got \"".to_string() + got + "\"."
            }
            ParseErrKind::MisplacedAlignment => {
                "Alignment mark \"&\" outside an array environment.".to_string()
            }
            ParseErrKind::UnmatchedRight(cmd) => {
                "\"\\".to_string() + cmd + "\" has no matching opener."
            }
            ParseErrKind::MisplacedMiddle => {
                "\"\\middle\" may only appear between \\left and \\right.".to_string()
            }
            ParseErrKind::UnmatchedDollar => "Unmatched \"$\".".to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0, self.1.string())
    }
}

impl std::error::Error for ParseError {}

/// Anything that can go wrong between input and pixels. Callers can tell
/// bad input (`Parse`) apart from a misused API (`InvalidState`).
#[derive(Debug, Clone, PartialEq)]
pub enum TexError {
    Parse(ParseError),
    /// The render builder was driven without a required parameter.
    InvalidState(&'static str),
}

impl fmt::Display for TexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TexError::Parse(e) => e.fmt(f),
            TexError::InvalidState(msg) => write!(f, "invalid state: {msg}"),
        }
    }
}

impl std::error::Error for TexError {}

impl From<ParseError> for TexError {
    fn from(e: ParseError) -> Self {
        TexError::Parse(e)
    }
}
