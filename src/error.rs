use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtmoError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid universe: {message}")]
    InvalidUniverse { message: String },
    #[error("Invalid breakpoints for term '{term}': {message}")]
    InvalidBreakpoints { term: String, message: String },
    #[error("Duplicate term '{term}' in variable '{variable}'")]
    DuplicateTerm { variable: String, term: String },
    #[error("Duplicate variable '{0}'")]
    DuplicateVariable(String),
    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("Variable '{variable}' cannot be used as {role}")]
    WrongRole { variable: String, role: String },
    #[error("Duplicate rule '{0}'")]
    DuplicateRule(String),
    #[error("Unknown term '{term}' in variable '{variable}'")]
    UnknownTerm { variable: String, term: String },
    #[error("Rule '{rule}' is empty: {message}")]
    EmptyRule { rule: String, message: String },
    #[error("Incomplete input: no value for '{variable}'")]
    IncompleteInput { variable: String },
    #[error("Undefined defuzzification: no rule fired for '{output}'")]
    UndefinedDefuzzification { output: String },
    #[error("Invalid input '{variable}': {message}")]
    InvalidInput { variable: String, message: String },
    #[error("Data error: {0}")]
    Data(String),
    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, AtmoError>;

// Helper conversions
impl From<std::io::Error> for AtmoError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
impl From<serde_json::Error> for AtmoError {
    fn from(e: serde_json::Error) -> Self { Self::Data(e.to_string()) }
}
impl From<config::ConfigError> for AtmoError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
