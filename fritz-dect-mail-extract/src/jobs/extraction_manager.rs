use crate::config::AppConfig;
use crate::helpers::file_writer;
use crate::integrations::{MailRecords, RealImapClient};
use extractors::{CombinedTable, EnergyReportParser};
use shared_types::{ExtractionError, MailRecord, ServerData};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub mails: usize,
    pub rows: usize,
    pub combined_path: PathBuf,
}

/// Drives one extraction run into a target folder.
pub struct ExtractionManager {
    target_folder: PathBuf,
    config: AppConfig,
    parser: EnergyReportParser,
}

impl ExtractionManager {
    /// Fails unless `target_folder` is an existing directory.
    pub fn new(target_folder: impl Into<PathBuf>, config: AppConfig) -> Result<Self, ExtractionError> {
        let target_folder = target_folder.into();
        if !target_folder.is_dir() {
            return Err(ExtractionError::NotADirectory(target_folder));
        }

        Ok(Self {
            target_folder,
            config,
            parser: EnergyReportParser::new(),
        })
    }

    pub fn run(&self, server_data: &ServerData) -> Result<ExtractionSummary, ExtractionError> {
        let client =
            RealImapClient::connect(server_data, self.config.imap.port, &self.config.imap.mailbox)?;
        let records = MailRecords::open(
            client,
            &self.config.extract.subject_marker,
            self.config.extract.classifier(),
        )?;

        self.extract(records)
    }

    /// Persists every record, then writes the combined table of all of them.
    ///
    /// The first error aborts the run. Files of records handled before it
    /// stay on disk; the combined table is not written.
    pub fn extract<I>(&self, records: I) -> Result<ExtractionSummary, ExtractionError>
    where
        I: IntoIterator<Item = Result<MailRecord, ExtractionError>>,
    {
        let mut combined: Option<CombinedTable> = None;
        let mut mails = 0;

        for record in records {
            let record = record?;
            let table = self.parser.normalize(&record)?;
            if table.is_empty() {
                tracing::warn!("Report of '{}' has no rows", record.subject);
            }

            combined = Some(match combined.take() {
                None => CombinedTable::from(table),
                Some(mut combined) => {
                    combined.append(table);
                    combined
                }
            });

            file_writer::persist(&record, &self.target_folder)?;
            mails += 1;
            tracing::info!("Extracted '{}'", record.subject);
        }

        let combined = combined.ok_or(ExtractionError::NoRecords)?;
        if combined.is_empty() {
            tracing::warn!("None of the {} reports contained rows", mails);
        }
        let combined_path = self
            .target_folder
            .join(&self.config.extract.combined_file_name);
        combined.write_csv(&combined_path)?;
        tracing::info!("Wrote '{}'", combined_path.display());

        Ok(ExtractionSummary {
            mails,
            rows: combined.len(),
            combined_path,
        })
    }
}

/// Extracts all report mails of the account into `target_folder`.
///
/// The folder is checked before any connection is made.
pub fn run(
    server_data: &ServerData,
    target_folder: &Path,
    config: AppConfig,
) -> Result<ExtractionSummary, ExtractionError> {
    ExtractionManager::new(target_folder, config)?.run(server_data)
}
