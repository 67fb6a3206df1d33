mod csv_parser;
mod date_parser;
mod table;

pub use date_parser::{parse_report_timestamp, subject_date};
pub use table::{CombinedTable, NormalizedTable, TableRow};

use csv_parser::{parse_decimal, CsvParser};
use shared_types::{ExtractionError, MailRecord};

/// Turns the CSV attachment of a report mail into a time-indexed table.
pub struct EnergyReportParser {
    csv_parser: CsvParser,
}

impl EnergyReportParser {
    pub fn new() -> Self {
        Self {
            csv_parser: CsvParser::new(),
        }
    }

    pub fn normalize(&self, record: &MailRecord) -> Result<NormalizedTable, ExtractionError> {
        self.parse(&record.data_csv.bytes, &record.subject)
    }

    /// `subject` anchors rows that only carry a time of day.
    pub fn parse(&self, content: &[u8], subject: &str) -> Result<NormalizedTable, ExtractionError> {
        let text = std::str::from_utf8(content)
            .map_err(|e| ExtractionError::Parse(format!("Report is not valid UTF-8: {}", e)))?;

        let raw = self.csv_parser.parse(text)?;
        let mut headers = raw.headers.into_iter();
        let index_name = headers.next().unwrap_or_default();
        let columns: Vec<String> = headers.collect();

        let mut rows = Vec::with_capacity(raw.rows.len());
        for (line, cells) in raw.rows.iter().enumerate() {
            let (timestamp_cell, value_cells) = cells
                .split_first()
                .ok_or_else(|| ExtractionError::Parse(format!("Empty row {}", line + 1)))?;

            let timestamp = parse_report_timestamp(timestamp_cell, subject)?;
            let values = value_cells
                .iter()
                .zip(&columns)
                .map(|(cell, column)| {
                    parse_decimal(cell).map_err(|e| {
                        ExtractionError::Parse(format!("Row {}, column '{}': {}", line + 1, column, e))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            rows.push(TableRow { timestamp, values });
        }

        Ok(NormalizedTable {
            index_name,
            columns,
            rows,
        })
    }
}

impl Default for EnergyReportParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes the report of one mail with the default parser.
pub fn normalize(record: &MailRecord) -> Result<NormalizedTable, ExtractionError> {
    EnergyReportParser::new().normalize(record)
}
