use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure that is surfaced to the user by a command.
///
/// The tag is attached as `anyhow` context, so callers can recover it with
/// `err.downcast_ref::<ErrorType>()`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The money home directory or its `config.json` is missing or invalid.
    Config,
    /// The transaction snapshot could not be read or parsed.
    Snapshot,
    /// A value provided on the command line could not be understood.
    Input,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorType::Config => "Configuration error",
            ErrorType::Snapshot => "Snapshot error",
            ErrorType::Input => "Invalid input",
        };
        f.write_str(s)
    }
}

/// Tags an internal error with an `ErrorType` before it leaves a public command.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Result<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.context(error_type))
    }
}
