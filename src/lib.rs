//! Finds players whose statistics resemble a team's regulars at a given role.
//!
//! The pipeline filters a season table by role positions, builds a role-weighted
//! feature space, clusters the standardized players with DBSCAN over a precomputed
//! weighted distance matrix, and ranks players from other teams by their weighted
//! distance to the team's average profile. [`analysis::Analyzer`] is the entry point.

pub mod analysis;
pub mod cli;
pub mod clustering;
pub mod config;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod features;
pub mod profile;
pub mod ranking;
pub mod scaler;
pub mod synthetic;
pub mod weights;

pub use analysis::{AnalysisReport, AnalysisRequest, Analyzer};
pub use config::ScoutConfig;
pub use dataset::PlayerTable;
pub use error::AnalysisError;
