//! Types shared between the extractors and the mail extraction tool.

pub mod extraction;
pub mod mail;

pub use extraction::ExtractionError;
pub use mail::{AttachmentBlob, AttachmentSlot, MailField, MailRecord, ServerData};
