//! Extractors Crate
//!
//! Network-free logic for FRITZ!DECT report mails.
//!
//! # Available Extractors
//!
//! - `AttachmentClassifier` / `CandidateRecord`: sort mail attachments into report slots
//! - `EnergyReportParser`: turn the CSV attachment into a time-indexed table
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{normalize, CombinedTable};
//!
//! let mut combined = CombinedTable::from(normalize(&first)?);
//! combined.append(normalize(&second)?);
//! combined.write_csv(&target.join("combined.csv"))?;
//! ```

pub mod energy_csv;
pub mod fritz_mail;

pub use energy_csv::{normalize, CombinedTable, EnergyReportParser, NormalizedTable, TableRow};
pub use fritz_mail::{AttachmentClassifier, CandidateRecord};
