use std::collections::HashMap;

use crate::dataset::{PlayerRecord, PlayerTable};
use crate::error::{AnalysisError, AnalysisResult};

/// Code → column position, resolved once per table and shared by every stage that needs
/// to address a column (weights, profile columns, stat snapshots).
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    codes: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(codes: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(codes.len());
        for (idx, code) in codes.iter().enumerate() {
            positions.entry(code.clone()).or_insert(idx);
        }
        Self { codes, positions }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn code(&self, position: usize) -> Option<&str> {
        self.codes.get(position).map(String::as_str)
    }

    pub fn position(&self, code: &str) -> Option<usize> {
        self.positions.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.positions.contains_key(code)
    }

    /// Positions of the given codes in input order, skipping unknown codes and repeats.
    pub fn resolve_all<'c>(&self, codes: impl IntoIterator<Item = &'c str>) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::new();
        for code in codes {
            if let Some(pos) = self.position(code)
                && !out.contains(&pos)
            {
                out.push(pos);
            }
        }
        out
    }
}

/// Dense row-major view of a player subset over every numeric column of its table.
/// Missing cells are materialized as 0.
#[derive(Debug, Clone)]
pub struct FeatureMatrix<'a> {
    records: Vec<&'a PlayerRecord>,
    columns: &'a ColumnIndex,
    values: Vec<f64>,
}

impl<'a> FeatureMatrix<'a> {
    /// Players whose position cell exactly matches one of `positions`, in table order.
    pub fn for_positions(table: &'a PlayerTable, positions: &[String]) -> Self {
        let records = table
            .records()
            .iter()
            .filter(|r| positions.iter().any(|p| *p == r.position))
            .collect::<Vec<_>>();
        Self::from_records(table.columns(), records)
    }

    pub fn from_records(columns: &'a ColumnIndex, records: Vec<&'a PlayerRecord>) -> Self {
        let ncols = columns.len();
        let mut values = Vec::with_capacity(records.len() * ncols);
        for record in &records {
            values.extend((0..ncols).map(|c| record.value(c).unwrap_or(0.0)));
        }
        Self {
            records,
            columns,
            values,
        }
    }

    pub fn with_values(&self, values: Vec<f64>) -> AnalysisResult<Self> {
        let expected = self.nrows() * self.ncols();
        if values.len() != expected {
            return Err(AnalysisError::dimension_mismatch(expected, values.len()));
        }
        Ok(Self {
            records: self.records.clone(),
            columns: self.columns,
            values,
        })
    }

    pub fn nrows(&self) -> usize {
        self.records.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &'a ColumnIndex {
        self.columns
    }

    pub fn records(&self) -> &[&'a PlayerRecord] {
        &self.records
    }

    pub fn record(&self, row: usize) -> &'a PlayerRecord {
        self.records[row]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let ncols = self.ncols();
        &self.values[row * ncols..(row + 1) * ncols]
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.ncols() + col]
    }

    pub fn select(&self, row: usize, cols: &[usize]) -> Vec<f64> {
        let row = self.row(row);
        cols.iter().map(|&c| row[c]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PlayerTable {
        let csv = "Player,Pos,Squad,MP,Gls,xG\n\
                   A,FW,Arsenal,30,10,\n\
                   B,CB,Arsenal,25,1,0.4\n\
                   C,FW,Chelsea,12,4,3.1\n";
        PlayerTable::from_csv_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn filters_by_exact_position_and_zero_fills() {
        let table = table();
        let m = FeatureMatrix::for_positions(&table, &["FW".to_string()]);
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m.record(1).name, "C");

        let xg = m.columns().position("xG").unwrap();
        assert_eq!(m.value(0, xg), 0.0);
        assert_eq!(m.value(1, xg), 3.1);
    }

    #[test]
    fn resolve_all_skips_unknown_and_repeated_codes() {
        let index = ColumnIndex::new(vec!["MP".into(), "Gls".into(), "xG".into()]);
        let cols = index.resolve_all(["xG", "Ast", "Gls", "xG"]);
        assert_eq!(cols, vec![2, 1]);
    }

    #[test]
    fn with_values_checks_shape() {
        let table = table();
        let m = FeatureMatrix::for_positions(&table, &["FW".to_string()]);
        assert!(m.with_values(vec![0.0; 6]).is_ok());
        let err = m.with_values(vec![0.0; 5]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DimensionMismatch {
                expected: 6,
                actual: 5
            }
        ));
    }
}
