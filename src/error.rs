use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Role,
    Team,
    Attribute,
    Parameter,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InputField::Role => "role",
            InputField::Team => "team",
            InputField::Attribute => "attribute code",
            InputField::Parameter => "analysis parameter",
        };
        f.write_str(label)
    }
}

/// Failures surfaced by the analysis pipeline.
///
/// `InvalidInput` and `EmptyReferenceGroup` are recoverable and meant to be mapped to
/// caller-facing responses. `DimensionMismatch` means a vector and its weights went out
/// of alignment and is never expected on valid data.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid {field}: {value}")]
    InvalidInput { field: InputField, value: String },

    #[error("no data found for team: {team}")]
    EmptyReferenceGroup { team: String },

    #[error("dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl AnalysisError {
    pub fn invalid_input(field: InputField, value: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            value: value.into(),
        }
    }

    pub fn empty_reference_group(team: impl Into<String>) -> Self {
        Self::EmptyReferenceGroup { team: team.into() }
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EmptyReferenceGroup { .. })
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
