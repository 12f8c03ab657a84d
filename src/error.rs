//! Error types raised by the compiler and the render-time executor.
//!
//! Compilation fails only on malformed templates or configuration. Rendering
//! fails when an encoded literal is corrupt or when one of the host-supplied
//! collaborators (expression host, write callback) reports an error.

use thiserror::Error;

/// Boxed error returned by host callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A start delimiter with no matching end delimiter before end-of-input.
    #[error("unterminated `{start}` at offset {offset}: no matching `{end}` before end of input")]
    UnterminatedDelimiter {
        start: String,
        end: String,
        /// Character offset of the unmatched start delimiter.
        offset: usize,
    },

    #[error("invalid delimiter configuration: {0}")]
    InvalidConfiguration(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("expected `\\x` escape at byte {0}")]
    BadEscape(usize),

    #[error("truncated escape at byte {0}")]
    Truncated(usize),

    #[error("invalid hex digit {digit:?} at byte {at}")]
    BadHexDigit { digit: char, at: usize },

    #[error("decoded literal is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("corrupt literal in instruction stream: {0}")]
    Literal(#[from] LiteralError),

    #[error("evaluating `{expr}` failed")]
    Host {
        expr: String,
        #[source]
        source: BoxError,
    },

    #[error("splicing `{code}` failed")]
    Splice {
        code: String,
        #[source]
        source: BoxError,
    },

    #[error("write callback failed")]
    Write(#[source] BoxError),
}
