//! Error types reported per command line.

use std::io;
use std::path::PathBuf;

/// Errors that abort a single command line.
///
/// None of these stop the interactive loop; the caller reports them on
/// standard error and prompts again.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Bad working-directory target or a missing builtin/redirection argument.
    #[error("{0}")]
    Path(String),

    /// A redirection file or the pipe could not be opened.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A child process could not be created.
    #[error("{program}: {reason}")]
    Process { program: String, reason: String },
}

impl ShellError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ShellError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn process(program: impl Into<String>, reason: impl ToString) -> Self {
        ShellError::Process {
            program: program.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
