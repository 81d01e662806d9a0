//! Errors from toolchain invocations.

use std::time::Duration;
use thiserror::Error;

/// Result type for toolchain calls.
pub type ExecResult<T> = std::result::Result<T, ExecError>;

/// A toolchain call that did not complete successfully.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The command could not be started (binary missing, bad directory, ...)
    #[error("failed to run '{command}'")]
    Spawn {
        /// The command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully.
    #[error("'{command}' failed ({}) with output: {output}", describe_status(.code))]
    Failed {
        /// The command line that was run
        command: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
        /// Trimmed combined stdout and stderr
        output: String,
    },

    /// The command exceeded its deadline and was killed.
    #[error("'{command}' timed out after {}s", .after.as_secs())]
    TimedOut {
        /// The command line that was run
        command: String,
        /// The deadline that was exceeded
        after: Duration,
    },

    /// The command succeeded but its output could not be understood.
    #[error("unexpected output from '{command}': {output}")]
    UnexpectedOutput {
        /// The command line that was run
        command: String,
        /// The output that could not be parsed
        output: String,
    },
}

impl ExecError {
    /// Combined output of the failed command, when there is any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Failed { output, .. } | Self::UnexpectedOutput { output, .. } => {
                Some(output.as_str())
            }
            Self::Spawn { .. } | Self::TimedOut { .. } => None,
        }
    }
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}
