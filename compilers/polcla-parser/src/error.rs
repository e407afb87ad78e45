use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("line {line}: malformed row '{content}'")]
    Malformed { line: usize, content: String },

    #[error("line {line}: {field} '{value}' is not a number")]
    NotANumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: unbalanced brackets in tree")]
    Unbalanced { line: usize },
}

pub type Result<T> = std::result::Result<T, ReadError>;
