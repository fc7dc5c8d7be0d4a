//! CSV rendering of wide tables

use std::io::Write;
use std::path::Path;
use tracing::info;

use super::table::{WideTable, WideTableRow};
use crate::{Error, Result};

impl WideTable {
    /// Column header: the area column followed by every wide column
    pub fn header(&self, area_column: &str) -> Vec<String> {
        std::iter::once(area_column.to_string())
            .chain(self.brackets().wide_columns())
            .collect()
    }

    /// Render area rows plus the grand-total row
    pub fn write_csv<W: Write>(&self, writer: W, area_column: &str) -> Result<()> {
        self.write_rows(writer, area_column, self.all_rows())
    }

    /// Render area rows only, without the grand-total row
    pub fn write_csv_without_total<W: Write>(&self, writer: W, area_column: &str) -> Result<()> {
        self.write_rows(writer, area_column, self.rows().iter())
    }

    /// Render to an in-memory string
    pub fn to_csv_string(&self, area_column: &str) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer, area_column)?;
        String::from_utf8(buffer)
            .map_err(|e| Error::data_validation(format!("Export is not valid UTF-8: {}", e)))
    }

    /// Render to a file, replacing it if it exists
    pub fn write_csv_file(&self, path: &Path, area_column: &str) -> Result<()> {
        let file = std::fs::File::create(path).map_err(|e| {
            Error::io(format!("Failed to create export file {}", path.display()), e)
        })?;
        self.write_csv(std::io::BufWriter::new(file), area_column)?;
        info!("Wrote {} area rows to {}", self.rows().len(), path.display());
        Ok(())
    }

    fn write_rows<'a, W: Write>(
        &self,
        writer: W,
        area_column: &str,
        rows: impl Iterator<Item = &'a WideTableRow>,
    ) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(self.header(area_column))
            .map_err(write_error)?;

        for row in rows {
            let record = std::iter::once(row.label.clone())
                .chain(row.values().into_iter().map(|v| v.to_string()));
            csv_writer.write_record(record).map_err(write_error)?;
        }

        csv_writer
            .flush()
            .map_err(|e| Error::io("Failed to flush CSV output", e))?;
        Ok(())
    }
}

fn write_error(error: csv::Error) -> Error {
    Error::csv_parsing("export", "Failed to write CSV record", Some(error))
}
