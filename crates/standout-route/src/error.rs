//! Errors raised while parsing a command level.
//!
//! Only two things can go wrong during dispatch: the flag engine rejects a
//! token, or fewer positionals remain than the node's [`MinArgs`] policy
//! requires. Both are terminal for the node that raised them; no hook at that
//! node or below runs.
//!
//! [`MinArgs`]: crate::MinArgs

use thiserror::Error;

/// Error returned by [`Command::parse`](crate::Command::parse) and
/// [`Command::execute`](crate::Command::execute).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The flag engine rejected a token (unknown flag, malformed or missing value).
    #[error("failed to parse flags for command '{command}': {source}")]
    FlagParse {
        /// Name of the command whose flags failed to parse
        command: String,
        /// The underlying clap error
        #[source]
        source: clap::Error,
    },

    /// Fewer positional arguments remained than the command requires.
    #[error("command '{command}' expects at least {expected} argument(s), got {found}")]
    InsufficientArgs {
        /// Name of the command that rejected its arguments
        command: String,
        /// Minimum number of positionals the command takes
        expected: usize,
        /// Number of positionals left after flag extraction
        found: usize,
    },
}

impl DispatchError {
    /// Returns the name of the command that raised this error.
    pub fn command(&self) -> &str {
        match self {
            DispatchError::FlagParse { command, .. } => command,
            DispatchError::InsufficientArgs { command, .. } => command,
        }
    }

    /// Returns true if the flag engine rejected the input.
    pub fn is_flag_error(&self) -> bool {
        matches!(self, DispatchError::FlagParse { .. })
    }

    /// Returns the clap error kind for flag parse failures.
    pub fn flag_error_kind(&self) -> Option<clap::error::ErrorKind> {
        match self {
            DispatchError::FlagParse { source, .. } => Some(source.kind()),
            DispatchError::InsufficientArgs { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_args_message() {
        let err = DispatchError::InsufficientArgs {
            command: "deploy".into(),
            expected: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "command 'deploy' expects at least 2 argument(s), got 1"
        );
        assert_eq!(err.command(), "deploy");
        assert!(!err.is_flag_error());
        assert_eq!(err.flag_error_kind(), None);
    }

    #[test]
    fn test_flag_parse_exposes_kind() {
        let source = clap::Error::new(clap::error::ErrorKind::UnknownArgument);
        let err = DispatchError::FlagParse {
            command: "root".into(),
            source,
        };
        assert!(err.is_flag_error());
        assert_eq!(
            err.flag_error_kind(),
            Some(clap::error::ErrorKind::UnknownArgument)
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
