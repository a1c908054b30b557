//! Player table loading.
//!
//! The merged season CSVs carry a few identity columns (`Player`, `Pos`, `Squad`) and
//! a long tail of statistic columns. A column counts as numeric when every non-empty
//! cell in the whole file parses as a number; everything else is categorical and
//! ignored by the analysis.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};

use crate::error::{AnalysisError, AnalysisResult};
use crate::features::ColumnIndex;

pub const PLAYER_COLUMN: &str = "Player";
pub const POSITION_COLUMN: &str = "Pos";
pub const SQUAD_COLUMN: &str = "Squad";
pub const MATCHES_COLUMN: &str = "MP";

const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None"];

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub position: String,
    pub squad: String,
    pub matches_played: f64,
    values: Vec<Option<f64>>,
}

impl PlayerRecord {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        squad: impl Into<String>,
        matches_played: f64,
        values: Vec<Option<f64>>,
    ) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            squad: squad.into(),
            matches_played,
            values,
        }
    }

    pub fn value(&self, column: usize) -> Option<f64> {
        self.values.get(column).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

#[derive(Debug, Clone)]
pub struct PlayerTable {
    columns: ColumnIndex,
    records: Vec<PlayerRecord>,
}

impl PlayerTable {
    pub fn new(columns: Vec<String>, records: Vec<PlayerRecord>) -> AnalysisResult<Self> {
        for record in &records {
            if record.values.len() != columns.len() {
                return Err(AnalysisError::dimension_mismatch(
                    columns.len(),
                    record.values.len(),
                ));
            }
        }
        Ok(Self {
            columns: ColumnIndex::new(columns),
            records,
        })
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("open player csv {}", path.display()))?;
        Self::from_csv_reader(file).with_context(|| format!("load player csv {}", path.display()))
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = dedupe_headers(
            rdr.headers()
                .context("read csv header")?
                .iter()
                .map(|h| h.trim().to_string()),
        );

        let header_pos = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| anyhow!("missing required column {name}"))
        };
        let player_idx = header_pos(PLAYER_COLUMN)?;
        let pos_idx = header_pos(POSITION_COLUMN)?;
        let squad_idx = header_pos(SQUAD_COLUMN)?;
        let mp_idx = header_pos(MATCHES_COLUMN)?;

        let mut rows: Vec<csv::StringRecord> = Vec::new();
        for (line, row) in rdr.records().enumerate() {
            match row {
                Ok(row) => rows.push(row),
                Err(err) => warn!(line = line + 2, %err, "skipping malformed csv row"),
            }
        }

        let numeric: Vec<usize> = (0..headers.len())
            .filter(|&c| c != player_idx && c != pos_idx && c != squad_idx)
            .filter(|&c| rows.iter().all(|row| parse_cell(row.get(c).unwrap_or("")).is_ok()))
            .collect();
        debug!(
            rows = rows.len(),
            columns = headers.len(),
            numeric = numeric.len(),
            "parsed player csv"
        );

        let records = rows
            .iter()
            .map(|row| {
                let field = |idx: usize| row.get(idx).unwrap_or("").trim().to_string();
                let values = numeric
                    .iter()
                    .map(|&c| parse_cell(row.get(c).unwrap_or("")).ok().flatten())
                    .collect::<Vec<_>>();
                let matches_played = parse_cell(row.get(mp_idx).unwrap_or(""))
                    .ok()
                    .flatten()
                    .unwrap_or(0.0);
                PlayerRecord::new(
                    field(player_idx),
                    field(pos_idx),
                    field(squad_idx),
                    matches_played,
                    values,
                )
            })
            .collect::<Vec<_>>();

        let columns = numeric.iter().map(|&c| headers[c].clone()).collect();
        Ok(Self::new(columns, records)?)
    }

    pub fn columns(&self) -> &ColumnIndex {
        &self.columns
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stat(&self, record: &PlayerRecord, code: &str) -> Option<f64> {
        self.columns.position(code).and_then(|c| record.value(c))
    }
}

/// `Ok(None)` for a missing cell, `Err(())` for text that is not a number.
fn parse_cell(raw: &str) -> std::result::Result<Option<f64>, ()> {
    let s = raw.trim();
    if MISSING_MARKERS.contains(&s) {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Ok(None),
        Err(_) => Err(()),
    }
}

/// Repeated header names get `.1`, `.2`, ... suffixes so every column stays addressable.
fn dedupe_headers(headers: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .map(|h| {
            let count = seen.entry(h.clone()).or_insert(0);
            let out = if *count == 0 {
                h
            } else {
                format!("{h}.{count}")
            };
            *count += 1;
            out
        })
        .collect()
}
