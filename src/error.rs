use failure::{Backtrace, Context, Fail};
use std::fmt;
use std::io;

#[derive(Debug)]
pub struct Error {
    inner: Context<ErrorKind>,
}

#[derive(Clone, Debug, PartialEq, Eq, Fail)]
pub enum ErrorKind {
    #[fail(display = "syntax error at line {}, column {}: {}", line, column, message)]
    Syntax {
        line: i32,
        column: i32,
        message: String,
    },
    #[fail(display = "type error: {}", _0)]
    Type(String),
    #[fail(display = "integer division by zero")]
    DivisionByZero,
    #[fail(display = "runtime type mismatch: {}", _0)]
    Mismatch(String),
    #[fail(display = "unknown function '{}'", _0)]
    UnknownFunction(String),
    #[fail(display = "readln: input exhausted")]
    InputExhausted,
    #[fail(display = "I/O error")]
    Io,
}

impl ErrorKind {
    /// Faults raised while evaluating, as opposed to rejections before the
    /// program starts running.
    pub fn is_runtime_fault(&self) -> bool {
        match self {
            ErrorKind::DivisionByZero
            | ErrorKind::Mismatch(_)
            | ErrorKind::UnknownFunction(_)
            | ErrorKind::InputExhausted => true,
            ErrorKind::Syntax { .. } | ErrorKind::Type(_) | ErrorKind::Io => false,
        }
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.inner.get_context()
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&dyn Fail> {
        self.inner.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.inner.backtrace()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner.cause() {
            Some(cause) => write!(f, "{}: {}", self.inner, cause),
            None => fmt::Display::fmt(&self.inner, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Context::new(kind),
        }
    }
}

impl From<Context<ErrorKind>> for Error {
    fn from(inner: Context<ErrorKind>) -> Error {
        Error { inner }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error {
            inner: err.context(ErrorKind::Io),
        }
    }
}
