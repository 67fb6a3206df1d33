use chrono::NaiveDateTime;
use csv::WriterBuilder;
use shared_types::ExtractionError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub timestamp: NaiveDateTime,
    pub values: Vec<Option<f64>>,
}

/// Time-indexed rows of one report, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub index_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> Vec<String> {
        std::iter::once(self.index_name.clone())
            .chain(self.columns.iter().cloned())
            .collect()
    }
}

/// All report rows of a run, concatenated in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    table: NormalizedTable,
}

impl From<NormalizedTable> for CombinedTable {
    fn from(table: NormalizedTable) -> Self {
        Self { table }
    }
}

impl CombinedTable {
    /// Appends the rows of `other` after the existing ones.
    ///
    /// Columns are joined by name in first-seen order; cells of a column a
    /// report does not carry stay empty.
    pub fn append(&mut self, other: NormalizedTable) {
        let positions: Vec<usize> = other
            .columns
            .iter()
            .map(|column| self.column_position(column))
            .collect();

        let width = self.table.columns.len();
        for row in &mut self.table.rows {
            row.values.resize(width, None);
        }

        for row in other.rows {
            let mut values = vec![None; width];
            for (value, &position) in row.values.into_iter().zip(&positions) {
                values[position] = value;
            }
            self.table.rows.push(TableRow {
                timestamp: row.timestamp,
                values,
            });
        }
    }

    fn column_position(&mut self, column: &str) -> usize {
        match self.table.columns.iter().position(|c| c == column) {
            Some(position) => position,
            None => {
                self.table.columns.push(column.to_string());
                self.table.columns.len() - 1
            }
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.table.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.table.rows
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), ExtractionError> {
        let mut writer = WriterBuilder::new().from_writer(writer);

        writer.write_record(self.table.header()).map_err(csv_error)?;
        for row in &self.table.rows {
            let mut record = Vec::with_capacity(row.values.len() + 1);
            record.push(row.timestamp.format(OUTPUT_TIMESTAMP_FORMAT).to_string());
            record.extend(row.values.iter().map(|value| format_value(*value)));
            writer.write_record(&record).map_err(csv_error)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), ExtractionError> {
        let file = File::create(path)?;
        self.write_to(file)
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{:.1}", v),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn csv_error(err: csv::Error) -> ExtractionError {
    match err.into_kind() {
        csv::ErrorKind::Io(io) => ExtractionError::Io(io),
        other => ExtractionError::Parse(format!("{:?}", other)),
    }
}
