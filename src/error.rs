use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every fatal condition a conversion can end in.
#[derive(Debug, Error)]
pub enum TidyError {
    #[error("problem parsing xml files: {source_name}: {message}")]
    Xml {
        source_name: String,
        message: String,
    },
    #[error("input file has valid xml, but <{element}> is missing under <{parent}>")]
    MissingElement { parent: String, element: String },
    #[error("input file has valid xml, but <{element}> is not valid: {reason}")]
    InvalidValue { element: String, reason: String },
    #[error("cannot overwrite output file under noclobber: {}", .0.display())]
    NoClobber(PathBuf),
    #[error("cannot find column: {0}")]
    ColumnNotFound(String),
    #[error("cannot find category from command args or in input file: {0}")]
    CategoryNotFound(String),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

pub type TidyResult<T> = Result<T, TidyError>;

impl TidyError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        TidyError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn invalid(element: impl Into<String>, reason: impl Into<String>) -> Self {
        TidyError::InvalidValue {
            element: element.into(),
            reason: reason.into(),
        }
    }

    /// A closed downstream pipe ends the run quietly rather than as a failure.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, TidyError::Io { source, .. } if source.kind() == io::ErrorKind::BrokenPipe)
    }

    /// Fold a CSV writer failure into the I/O variant where it wraps one.
    pub fn from_csv(context: impl Into<String>, err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(source) => TidyError::io(context, source),
            other => TidyError::io(
                context,
                io::Error::new(io::ErrorKind::Other, format!("{other:?}")),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_pipe_is_recognised() {
        let err = TidyError::io("writing rows", io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(err.is_broken_pipe());

        let err = TidyError::io("writing rows", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!err.is_broken_pipe());
        assert!(!TidyError::ColumnNotFound("x".into()).is_broken_pipe());
    }

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            TidyError::ColumnNotFound("colour".into()).to_string(),
            "cannot find column: colour"
        );
        assert_eq!(
            TidyError::NoClobber(PathBuf::from("out.csv")).to_string(),
            "cannot overwrite output file under noclobber: out.csv"
        );
    }
}
