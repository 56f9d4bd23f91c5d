//! Tabular input and its CSV export.
//!
//! The pipeline never looks inside a table: it asks for the column names (to
//! check bindings) and for a header-plus-rows CSV rendition, which becomes the
//! data artifact the generated script reads.

use crate::error::{RcatError, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Anything that can be exported as a delimited table.
pub trait TabularSource: Send + Sync {
    fn column_names(&self) -> Vec<String>;

    /// Write a header row followed by data rows, comma separated.
    fn write_csv(&self, out: &mut dyn Write) -> Result<()>;

    fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}

/// Named columns with rows of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table column-wise; all columns must have the same length.
    pub fn from_columns<I, K, V, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut values: Vec<Vec<String>> = Vec::new();
        for (name, column) in columns {
            names.push(name.into());
            values.push(column.into_iter().map(Into::into).collect());
        }

        let height = values.first().map(Vec::len).unwrap_or(0);
        if let Some((i, col)) = values.iter().enumerate().find(|(_, c)| c.len() != height) {
            return Err(RcatError::InvalidRequest(format!(
                "column '{}' has {} values, expected {}",
                names[i],
                col.len(),
                height
            )));
        }

        let rows = (0..height)
            .map(|r| values.iter().map(|col| col[r].clone()).collect())
            .collect();
        Ok(Self {
            columns: names,
            rows,
        })
    }

    /// Read a header-plus-rows CSV.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let columns = rdr
            .headers()
            .map_err(|e| RcatError::InvalidRequest(format!("invalid CSV header: {e}")))?
            .iter()
            .map(String::from)
            .collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record =
                record.map_err(|e| RcatError::InvalidRequest(format!("invalid CSV row: {e}")))?;
            rows.push(record.iter().map(String::from).collect());
        }
        Ok(Self { columns, rows })
    }

    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TabularSource for DataTable {
    fn column_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn write_csv(&self, out: &mut dyn Write) -> Result<()> {
        if self.columns.is_empty() {
            return Err(RcatError::Export("table has no columns".to_string()));
        }
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(&self.columns)
            .map_err(|e| RcatError::Export(e.to_string()))?;
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(RcatError::Export(format!(
                    "row {} has {} cells, header has {}",
                    i + 1,
                    row.len(),
                    self.columns.len()
                )));
            }
            wtr.write_record(row)
                .map_err(|e| RcatError::Export(e.to_string()))?;
        }
        wtr.flush()
            .map_err(|e| RcatError::Export(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_header_and_rows() {
        let table = DataTable::from_columns([
            ("color", vec!["red", "blue"]),
            ("gender", vec!["M", "F"]),
        ])
        .unwrap();
        let csv = String::from_utf8(table.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(csv, "color,gender\nred,M\nblue,F\n");
    }

    #[test]
    fn quotes_cells_that_need_it() {
        let mut table = DataTable::new(vec!["label".into(), "note".into()]);
        table.push_row(["a,b", "say \"hi\""]);
        let csv = String::from_utf8(table.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(csv, "label,note\n\"a,b\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = DataTable::from_columns([("a", vec!["1", "2"]), ("b", vec!["1"])]).unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn ragged_rows_fail_export() {
        let mut table = DataTable::new(vec!["a".into(), "b".into()]);
        table.push_row(["1"]);
        assert!(matches!(table.to_csv_bytes(), Err(RcatError::Export(_))));
    }

    #[test]
    fn empty_header_fails_export() {
        assert!(DataTable::default().to_csv_bytes().is_err());
    }

    #[test]
    fn reads_csv() {
        let table = DataTable::from_csv_reader("before,after\nYes,No\nNo,No\n".as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["before", "after"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], vec!["Yes", "No"]);
    }
}
