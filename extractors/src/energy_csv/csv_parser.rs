use csv::ReaderBuilder;
use shared_types::ExtractionError;

/// Header names and the string cells of the used columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub struct CsvParser {
    delimiter: u8,
    skip_lines: usize,
    used_columns: usize,
}

impl CsvParser {
    /// Reader for FRITZ!Box report exports: a title line, then a
    /// `;`-separated table whose first three columns are used.
    pub fn new() -> Self {
        Self {
            delimiter: b';',
            skip_lines: 1,
            used_columns: 3,
        }
    }

    pub fn parse(&self, content: &str) -> Result<RawTable, ExtractionError> {
        let table = skip_lines(content, self.skip_lines);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(table.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ExtractionError::Parse(e.to_string()))?
            .iter()
            .take(self.used_columns)
            .map(|h| h.to_string())
            .collect();

        if headers.len() < self.used_columns {
            return Err(ExtractionError::Parse(format!(
                "Expected at least {} columns, found {:?}",
                self.used_columns, headers
            )));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ExtractionError::Parse(e.to_string()))?;
            let mut row: Vec<String> = record
                .iter()
                .take(self.used_columns)
                .map(|field| field.to_string())
                .collect();
            row.resize(self.used_columns, String::new());
            rows.push(row);
        }

        Ok(RawTable { headers, rows })
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

fn skip_lines(content: &str, count: usize) -> &str {
    let mut rest = content;
    for _ in 0..count {
        rest = match rest.find('\n') {
            Some(pos) => &rest[pos + 1..],
            None => "",
        };
    }
    rest
}

/// Parses a cell written with a decimal comma. Empty cells are missing values.
pub fn parse_decimal(cell: &str) -> Result<Option<f64>, ExtractionError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map(Some)
        .map_err(|e| ExtractionError::Parse(format!("Invalid number '{}': {}", cell, e)))
}
