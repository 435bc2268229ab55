use thiserror::Error;

#[derive(Error, Debug)]
pub enum CadwireError {
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { message: String, offset: usize },
    #[error("Invalid symbol: '{0}'")]
    InvalidSymbol(String),
    #[error("Structure error: {0}")]
    Structure(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, CadwireError>;

impl CadwireError {
    pub fn syntax(message: impl Into<String>, offset: usize) -> Self {
        Self::Syntax { message: message.into(), offset }
    }
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
