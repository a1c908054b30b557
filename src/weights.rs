use tracing::debug;

use crate::features::ColumnIndex;

pub const EMPHASIZED_WEIGHT: f64 = 2.0;
pub const ROLE_WEIGHT: f64 = 1.0;
pub const IGNORED_WEIGHT: f64 = 0.0;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    values: Vec<f64>,
}

impl WeightVector {
    /// Emphasized codes get 2, other role codes 1, everything else 0. Emphasis applies
    /// even to codes outside the role; codes that are not numeric columns stay inert.
    pub fn build<'c>(
        columns: &ColumnIndex,
        role_codes: impl IntoIterator<Item = &'c str>,
        emphasized: impl IntoIterator<Item = &'c str>,
    ) -> Self {
        let mut values = vec![IGNORED_WEIGHT; columns.len()];
        for code in role_codes {
            if let Some(pos) = columns.position(code) {
                values[pos] = values[pos].max(ROLE_WEIGHT);
            }
        }
        for code in emphasized {
            match columns.position(code) {
                Some(pos) => values[pos] = EMPHASIZED_WEIGHT,
                None => debug!(code, "emphasized attribute is not a numeric column; ignored"),
            }
        }
        Self { values }
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: usize) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn select(&self, columns: &[usize]) -> Vec<f64> {
        columns.iter().map(|&c| self.values[c]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ColumnIndex {
        ColumnIndex::new(
            ["MP", "Gls", "SoT", "xG", "Ast"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    #[test]
    fn emphasis_beats_role_relevance() {
        let w = WeightVector::build(&index(), ["Gls", "SoT", "xG"], ["Gls"]);
        assert_eq!(w.as_slice(), &[0.0, 2.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn emphasis_outside_role_still_counts() {
        let w = WeightVector::build(&index(), ["Gls"], ["Ast"]);
        assert_eq!(w.as_slice(), &[0.0, 1.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn unknown_codes_are_inert() {
        let w = WeightVector::build(&index(), ["Gls", "CrsPA"], ["Save%2"]);
        assert_eq!(w.len(), 5);
        assert_eq!(w.as_slice(), &[0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn select_follows_given_order() {
        let w = WeightVector::build(&index(), ["Gls", "xG"], ["xG"]);
        assert_eq!(w.select(&[3, 1, 0]), vec![2.0, 1.0, 0.0]);
    }
}
