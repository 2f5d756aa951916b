pub mod ast;
pub mod emitter;
pub mod lexer;
pub mod parser;
pub mod vacation;

/// A lexing or parsing failure, located by byte offset into the script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}
