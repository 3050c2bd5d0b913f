#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("Could not determine ordering between: {}", .0.join(", "))]
    CyclicDependencies(Vec<String>),
    #[error("No stacks match the name(s) {}", .0.join(", "))]
    NoStacksMatch(Vec<String>),
    #[error("invalid stack selector {pattern:?}: {source}")]
    InvalidSelector {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("duplicate stack id {0}")]
    DuplicateStack(String),
    #[error("invalid environment {0:?}, expected aws://<account>/<region>")]
    InvalidEnvironment(String),
    #[error("invalid cloud assembly manifest {path}: {reason}")]
    Manifest { path: String, reason: String },
    #[error("unknown output format {0:?}, expected one of ids, long, json, tree")]
    UnknownFormat(String),
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn manifest(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Error::Manifest {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Process exit code used by `main` when this error ends the run.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Error::CyclicDependencies(_) => 2,
            Error::NoStacksMatch(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_names_the_stacks() {
        let err = Error::CyclicDependencies(vec!["Test-Stack-A".into(), "Test-Stack-B".into()]);
        assert_eq!(
            err.to_string(),
            "Could not determine ordering between: Test-Stack-A, Test-Stack-B"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_match_lists_patterns() {
        let err = Error::NoStacksMatch(vec!["Foo*".into()]);
        assert_eq!(err.to_string(), "No stacks match the name(s) Foo*");
        assert_eq!(err.exit_code(), 3);
    }
}
