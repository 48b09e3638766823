use bon::bon;
use miette::{Diagnostic, Report};
pub use pipelight_error::{CastError, PipelightError, TomlError};

use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TplvmError {
    ////////////////////////////////
    // Lib native errors
    #[error(transparent)]
    #[diagnostic(transparent)]
    WrapError(#[from] WrapError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    LibError(#[from] LibError),

    ////////////////////////////////
    // Template lifecycle
    #[error(transparent)]
    #[diagnostic(transparent)]
    PreconditionViolation(#[from] PreconditionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    StorageError(#[from] StorageError),

    ////////////////////////////////
    // Type convertion
    #[error(transparent)]
    #[diagnostic(code(serde::error))]
    SerdeError(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(toml::error))]
    TomlSerError(#[from] toml::ser::Error),

    #[error(transparent)]
    #[diagnostic(code(tplvm::strum::error))]
    StrumError(#[from] strum::ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    CastError(#[from] CastError),

    #[error(transparent)]
    #[diagnostic(code(tplvm::io::error))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(tplvm::uuid::error))]
    UuidError(#[from] uuid::Error),

    ////////////////////////////////
    // Process execution
    #[error(transparent)]
    #[diagnostic(transparent)]
    PipelightError(#[from] PipelightError),
}

/**
A config error with help higher origin
Can be recursively chained.
*/
#[derive(Debug, Error, Diagnostic)]
#[error("{}", message)]
#[diagnostic(code(tplvm::wrap::error))]
pub struct WrapError {
    pub message: String,
    #[diagnostic_source]
    pub origin: Report,
    #[help]
    pub help: String,
}

#[bon]
impl WrapError {
    #[builder]
    pub fn new(msg: &str, help: &str, origin: Report) -> Self {
        Self {
            message: msg.to_owned(),
            help: help.to_owned(),
            origin,
        }
    }
}

/**
A root cause error with no inner origin
*/
#[derive(Debug, Error, Diagnostic)]
#[error("{}", message)]
#[diagnostic(code(tplvm::lib::error))]
pub struct LibError {
    pub message: String,
    #[help]
    pub help: String,
}

#[bon]
impl LibError {
    #[builder]
    pub fn new(msg: &str, help: &str) -> Self {
        Self {
            message: msg.to_owned(),
            help: help.to_owned(),
        }
    }
}

/**
An operation was attempted on a vm in a state that forbids it,
like committing a template while it runs.
Must abort the operation, never be retried blindly.
*/
#[derive(Debug, Error, Diagnostic)]
#[error("{}", message)]
#[diagnostic(code(tplvm::precondition::error), severity(Error))]
pub struct PreconditionError {
    pub message: String,
    /// Name of the offending vm.
    pub vm: String,
    #[help]
    pub help: String,
}

#[bon]
impl PreconditionError {
    #[builder]
    pub fn new(msg: &str, vm: &str, help: &str) -> Self {
        Self {
            message: msg.to_owned(),
            vm: vm.to_owned(),
            help: help.to_owned(),
        }
    }
}

/**
A storage backend failure on a vm image.
The image may be left in a partial state.
*/
#[derive(Debug, Error, Diagnostic)]
#[error("{}", message)]
#[diagnostic(code(tplvm::storage::error))]
pub struct StorageError {
    pub message: String,
    /// The image or directory the backend was working on.
    pub path: String,
    #[diagnostic_source]
    pub origin: Report,
    #[help]
    pub help: String,
}

#[bon]
impl StorageError {
    #[builder]
    pub fn new(msg: &str, path: &str, help: Option<&str>, origin: Report) -> Self {
        Self {
            message: msg.to_owned(),
            path: path.to_owned(),
            help: help
                .unwrap_or("Check the image file permissions and the free space left on device.")
                .to_owned(),
            origin,
        }
    }
}
