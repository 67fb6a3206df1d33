use chrono::DateTime;
use extractors::{AttachmentClassifier, CandidateRecord};
use mail_parser::{Message, MessageParser, MimeHeaders, PartType};
use shared_types::{AttachmentBlob, ExtractionError, MailRecord};
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// An authenticated mailbox session.
pub trait Mailbox {
    /// Ids of all messages whose subject contains `subject_marker`, in mailbox order.
    fn search(&mut self, subject_marker: &str) -> Result<Vec<u32>, ExtractionError>;

    /// The full RFC822 source of one message.
    fn fetch_raw(&mut self, id: u32) -> Result<Vec<u8>, ExtractionError>;

    fn logout(&mut self) -> Result<(), ExtractionError>;
}

/// Complete report mails of one mailbox session.
///
/// Owns the session: once exhausted, failed or dropped, the session is
/// logged out and a new one must be opened to search again.
pub struct MailRecords<M: Mailbox> {
    mailbox: Option<M>,
    pending: VecDeque<u32>,
    classifier: AttachmentClassifier,
}

impl<M: Mailbox> MailRecords<M> {
    pub fn open(
        mut mailbox: M,
        subject_marker: &str,
        classifier: AttachmentClassifier,
    ) -> Result<Self, ExtractionError> {
        match mailbox.search(subject_marker) {
            Ok(ids) => {
                tracing::debug!("Found {} mails matching '{}'", ids.len(), subject_marker);
                Ok(Self {
                    mailbox: Some(mailbox),
                    pending: ids.into(),
                    classifier,
                })
            }
            Err(e) => {
                close_session(mailbox);
                Err(e)
            }
        }
    }

    fn close(&mut self) {
        if let Some(mailbox) = self.mailbox.take() {
            close_session(mailbox);
        }
    }

    fn next_record(&mut self) -> Option<Result<MailRecord, ExtractionError>> {
        loop {
            let mailbox = self.mailbox.as_mut()?;
            let id = self.pending.pop_front()?;

            let raw = match mailbox.fetch_raw(id) {
                Ok(raw) => raw,
                Err(e) => return Some(Err(e)),
            };

            match parse_message(&raw, &self.classifier) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<M: Mailbox> Iterator for MailRecords<M> {
    type Item = Result<MailRecord, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.next_record();
        if !matches!(item, Some(Ok(_))) {
            self.close();
        }
        item
    }
}

impl<M: Mailbox> FusedIterator for MailRecords<M> {}

impl<M: Mailbox> Drop for MailRecords<M> {
    fn drop(&mut self) {
        self.close();
    }
}

fn close_session<M: Mailbox>(mut mailbox: M) {
    match mailbox.logout() {
        Ok(()) => tracing::debug!("Closed mailbox session"),
        Err(e) => tracing::warn!("Failed to close mailbox session: {}", e),
    }
}

fn html_body(message: &Message) -> Option<String> {
    message.html_bodies().find_map(|part| match &part.body {
        PartType::Html(html) => Some(html.to_string()),
        _ => None,
    })
}

/// Classifies one raw message.
///
/// `Ok(None)` means the mail lacks a required field and was skipped; a
/// second attachment for an already filled slot is an error.
pub fn parse_message(
    raw: &[u8],
    classifier: &AttachmentClassifier,
) -> Result<Option<MailRecord>, ExtractionError> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| ExtractionError::Parse("Failed to parse email".to_string()))?;

    let subject = message.subject().map(|s| s.to_string());
    let date = message
        .date()
        .and_then(|d| DateTime::parse_from_rfc3339(&d.to_rfc3339()).ok());

    let mut candidate = CandidateRecord::new(subject, date, html_body(&message));

    for part in message.attachments() {
        let Some(filename) = part.attachment_name() else {
            continue;
        };
        let blob = AttachmentBlob::new(filename, part.contents().to_vec());
        if let Some(slot) = candidate.add_attachment(classifier, blob)? {
            tracing::trace!("Attachment '{}' classified as {}", filename, slot);
        }
    }

    let subject = candidate.subject.clone().unwrap_or_default();
    let date = candidate
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unknown date".to_string());

    match candidate.into_record() {
        Ok(record) => Ok(Some(record)),
        Err(missing) => {
            let missing: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
            tracing::warn!(
                "Ignoring {} from {} as the following field(s) {} were missing.",
                subject,
                date,
                missing.join(",")
            );
            Ok(None)
        }
    }
}
