//! Request-level orchestration: validate, filter by role, weight, cluster, profile, rank.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::clustering::{ClusterAssignment, Dbscan};
use crate::config::{RoleDefinition, ScoutConfig};
use crate::dataset::PlayerTable;
use crate::distance::DistanceMatrix;
use crate::error::{AnalysisError, AnalysisResult, InputField};
use crate::features::FeatureMatrix;
use crate::profile::{ReferenceGroup, RoleProfile};
use crate::ranking::{RankedMatch, StatColumn, rank_similar};
use crate::scaler::standardize;
use crate::weights::WeightVector;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(rename = "position", alias = "role")]
    pub role: String,
    pub team: String,
    #[serde(rename = "specific_role_cols", alias = "emphasized", default)]
    pub emphasized: Vec<String>,
}

impl AnalysisRequest {
    pub fn new(role: impl Into<String>, team: impl Into<String>, emphasized: &[&str]) -> Self {
        Self {
            role: role.into(),
            team: team.into(),
            emphasized: emphasized.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMembership {
    pub player: String,
    pub team: String,
    pub cluster: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    #[serde(rename = "position")]
    pub role: String,
    pub team: String,
    #[serde(rename = "specific_role_cols")]
    pub emphasized: Vec<String>,
    #[serde(rename = "team_players")]
    pub reference_team_players: Vec<String>,
    #[serde(rename = "similar_players")]
    pub ranked_matches: Vec<RankedMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<Vec<ClusterMembership>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleClusters {
    pub role: String,
    pub players: usize,
    pub n_clusters: usize,
    pub sizes: Vec<usize>,
    pub noise: usize,
    pub memberships: Vec<ClusterMembership>,
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    config: ScoutConfig,
}

impl Analyzer {
    pub fn new(config: ScoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    /// Role, team and every emphasized code must come from the configuration tables.
    pub fn validate(&self, request: &AnalysisRequest) -> AnalysisResult<&RoleDefinition> {
        let role = self
            .config
            .role(&request.role)
            .ok_or_else(|| AnalysisError::invalid_input(InputField::Role, &request.role))?;
        if !self.config.has_team(&request.team) {
            return Err(AnalysisError::invalid_input(InputField::Team, &request.team));
        }
        if let Some(code) = request
            .emphasized
            .iter()
            .find(|code| !self.config.is_attribute_code(code))
        {
            return Err(AnalysisError::invalid_input(InputField::Attribute, code));
        }
        Ok(role)
    }

    pub fn analyze(
        &self,
        request: &AnalysisRequest,
        dataset: &PlayerTable,
    ) -> AnalysisResult<AnalysisReport> {
        let role = self.validate(request)?;
        let params = self.config.analysis;
        let span = info_span!("analyze", role = %request.role, team = %request.team);
        let _guard = span.enter();

        let matrix = FeatureMatrix::for_positions(dataset, &role.positions);
        let role_codes = self.role_codes(role);
        let weights = WeightVector::build(
            matrix.columns(),
            role_codes.iter().copied(),
            request.emphasized.iter().map(String::as_str),
        );
        debug!(players = matrix.nrows(), columns = matrix.ncols(), "filtered players for role");

        let group = ReferenceGroup::select(&matrix, &request.team, params.min_matches_played)?;

        let clusters = if params.compute_clusters {
            let assignment = self.cluster_matrix(&matrix, &weights)?;
            Some(memberships(&matrix, &assignment))
        } else {
            None
        };

        let relevant = matrix.columns().resolve_all(role_codes.iter().copied());
        let profile = RoleProfile::aggregate(&matrix, &group, &relevant)?;
        let snapshot = self.snapshot_columns(role, &matrix);
        let ranked_matches = rank_similar(
            &matrix,
            &profile,
            &weights,
            &request.team,
            &snapshot,
            params.top_k,
        )?;

        info!(
            players = matrix.nrows(),
            reference = group.rows().len(),
            matches = ranked_matches.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            role: request.role.clone(),
            team: request.team.clone(),
            emphasized: request.emphasized.clone(),
            reference_team_players: group.player_names(&matrix),
            ranked_matches,
            clusters,
        })
    }

    /// Only the clustering side of the pipeline, for inspecting how a role's players group.
    pub fn cluster_role(
        &self,
        role_name: &str,
        emphasized: &[String],
        dataset: &PlayerTable,
    ) -> AnalysisResult<RoleClusters> {
        let role = self
            .config
            .role(role_name)
            .ok_or_else(|| AnalysisError::invalid_input(InputField::Role, role_name))?;
        let matrix = FeatureMatrix::for_positions(dataset, &role.positions);
        let weights = WeightVector::build(
            matrix.columns(),
            self.role_codes(role),
            emphasized.iter().map(String::as_str),
        );
        let assignment = self.cluster_matrix(&matrix, &weights)?;
        Ok(RoleClusters {
            role: role.name.clone(),
            players: matrix.nrows(),
            n_clusters: assignment.n_clusters(),
            sizes: assignment.cluster_sizes(),
            noise: assignment.noise_count(),
            memberships: memberships(&matrix, &assignment),
        })
    }

    fn cluster_matrix(
        &self,
        matrix: &FeatureMatrix<'_>,
        weights: &WeightVector,
    ) -> AnalysisResult<ClusterAssignment> {
        let params = self.config.analysis;
        let dbscan = Dbscan::new(params.dbscan_eps, params.dbscan_min_samples)?;
        let scaled = standardize(matrix)?;
        let distances = DistanceMatrix::build(&scaled, weights)?;
        let assignment = dbscan.fit(&distances);
        debug!(
            clusters = assignment.n_clusters(),
            noise = assignment.noise_count(),
            "clustered players"
        );
        Ok(assignment)
    }

    fn role_codes<'c>(&'c self, role: &'c RoleDefinition) -> Vec<&'c str> {
        role.attributes
            .iter()
            .filter_map(|name| self.config.attribute_code(name))
            .collect()
    }

    fn snapshot_columns(&self, role: &RoleDefinition, matrix: &FeatureMatrix<'_>) -> Vec<StatColumn> {
        role.attributes
            .iter()
            .filter_map(|name| {
                let code = self.config.attribute_code(name)?;
                let column = matrix.columns().position(code)?;
                Some(StatColumn {
                    name: name.clone(),
                    column,
                })
            })
            .collect()
    }
}

fn memberships(matrix: &FeatureMatrix<'_>, assignment: &ClusterAssignment) -> Vec<ClusterMembership> {
    matrix
        .records()
        .iter()
        .zip(assignment.labels())
        .map(|(record, label)| ClusterMembership {
            player: record.name.clone(),
            team: record.squad.clone(),
            cluster: label.cluster_id(),
        })
        .collect()
}
