pub mod mailbox;
pub mod real_imap_client;

pub use mailbox::{parse_message, MailRecords, Mailbox};
pub use real_imap_client::RealImapClient;
