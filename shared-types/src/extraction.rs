use crate::mail::AttachmentSlot;
use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can abort an extraction run.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("The target path '{}' is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    #[error("IMAP error: {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error(
        "There was already an attachment '{slot}' given for the current mail. \
         Attachments given were: '{previous}', '{current}'"
    )]
    DuplicateAttachment {
        slot: AttachmentSlot,
        previous: String,
        current: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No date of the form DD.MM.YYYY in subject '{0}' to anchor time-only values")]
    MissingSubjectDate(String),

    #[error("No complete FRITZ!DECT mails found, nothing to combine")]
    NoRecords,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    pub fn transport<E>(context: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        ExtractionError::Transport {
            context: context.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_attachment_names_both_files() {
        let err = ExtractionError::DuplicateAttachment {
            slot: AttachmentSlot::DataCsv,
            previous: "first.csv".to_string(),
            current: "second.csv".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("data_csv"));
        assert!(message.contains("first.csv"));
        assert!(message.contains("second.csv"));
    }

    #[test]
    fn test_transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ExtractionError::transport("Failed to connect", io);

        assert!(err.to_string().contains("Failed to connect"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_a_directory_message() {
        let err = ExtractionError::NotADirectory(PathBuf::from("/tmp/missing"));
        assert_eq!(
            err.to_string(),
            "The target path '/tmp/missing' is not a directory."
        );
    }
}
