//! Lookup tables and tuning knobs for the scouting analysis.
//!
//! The tables (teams, attribute name → column code, role definitions) are plain data:
//! the built-in set ships in `assets/scout_config.json`, a replacement file can be
//! supplied at runtime, and a handful of numeric parameters can be overridden from the
//! environment.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

const BUILTIN_CONFIG_JSON: &str = include_str!("../assets/scout_config.json");

static BUILTIN: OnceCell<ScoutConfig> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    #[default]
    Outfield,
    Goalkeepers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub name: String,
    pub attributes: Vec<String>,
    pub positions: Vec<String>,
    #[serde(default)]
    pub dataset: DatasetKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetPaths {
    pub outfield: PathBuf,
    pub goalkeepers: PathBuf,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            outfield: PathBuf::from("Players Merged.csv"),
            goalkeepers: PathBuf::from("Players GK Merged.csv"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub dbscan_eps: f64,
    pub dbscan_min_samples: usize,
    /// Players need strictly more matches than this to join a reference group.
    pub min_matches_played: f64,
    pub top_k: usize,
    pub compute_clusters: bool,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            dbscan_eps: 2.0,
            dbscan_min_samples: 5,
            min_matches_played: 20.0,
            top_k: 5,
            compute_clusters: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    pub teams: Vec<String>,
    pub attributes: Vec<AttributeDefinition>,
    pub roles: Vec<RoleDefinition>,
    #[serde(default)]
    pub datasets: DatasetPaths,
    #[serde(default)]
    pub analysis: AnalysisParams,
}

impl ScoutConfig {
    pub fn builtin() -> Result<&'static ScoutConfig> {
        BUILTIN.get_or_try_init(|| {
            Self::from_json_str(BUILTIN_CONFIG_JSON).context("parse built-in scout config")
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: ScoutConfig = serde_json::from_str(raw).context("decode scout config json")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read scout config {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("load scout config {}", path.display()))
    }

    /// Config file from `path` (or `SCOUT_CONFIG`, or the built-in tables), then
    /// environment overrides on top.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let from_env = env::var("SCOUT_CONFIG")
            .ok()
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path)?,
            None => Self::builtin()?.clone(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `SCOUT_*` overrides read through `lookup`. Unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let params = &mut self.analysis;
        if let Some(k) = lookup("SCOUT_TOP_K").and_then(|val| val.trim().parse::<usize>().ok()) {
            params.top_k = k;
        }
        if let Some(eps) = lookup("SCOUT_DBSCAN_EPS").and_then(|val| val.trim().parse::<f64>().ok())
        {
            params.dbscan_eps = eps;
        }
        if let Some(n) = lookup("SCOUT_DBSCAN_MIN_SAMPLES")
            .and_then(|val| val.trim().parse::<usize>().ok())
        {
            params.dbscan_min_samples = n;
        }
        if let Some(mp) =
            lookup("SCOUT_MIN_MATCHES").and_then(|val| val.trim().parse::<f64>().ok())
        {
            params.min_matches_played = mp;
        }
        if let Some(flag) = lookup("SCOUT_CLUSTERS").and_then(|val| parse_flag(&val)) {
            params.compute_clusters = flag;
        }
        if let Some(path) = lookup("SCOUT_OUTFIELD_CSV").filter(|val| !val.trim().is_empty()) {
            self.datasets.outfield = PathBuf::from(path.trim());
        }
        if let Some(path) = lookup("SCOUT_GOALKEEPER_CSV").filter(|val| !val.trim().is_empty()) {
            self.datasets.goalkeepers = PathBuf::from(path.trim());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.roles.is_empty() {
            return Err(anyhow!("scout config defines no roles"));
        }
        let names: HashSet<&str> = self.attributes.iter().map(|a| a.name.as_str()).collect();
        for role in &self.roles {
            if role.positions.is_empty() {
                return Err(anyhow!("role {} has no positions", role.name));
            }
            for attr in &role.attributes {
                if !names.contains(attr.as_str()) {
                    return Err(anyhow!(
                        "role {} references unknown attribute {attr}",
                        role.name
                    ));
                }
            }
        }
        let params = &self.analysis;
        if !params.dbscan_eps.is_finite() || params.dbscan_eps < 0.0 {
            return Err(anyhow!("dbscan_eps must be finite and >= 0, got {}", params.dbscan_eps));
        }
        if params.dbscan_min_samples == 0 {
            return Err(anyhow!("dbscan_min_samples must be >= 1"));
        }
        if !params.min_matches_played.is_finite() {
            return Err(anyhow!("min_matches_played must be finite"));
        }
        if params.top_k == 0 {
            return Err(anyhow!("top_k must be >= 1"));
        }
        Ok(())
    }

    pub fn role(&self, name: &str) -> Option<&RoleDefinition> {
        self.roles.iter().find(|r| r.name == name)
    }

    pub fn has_team(&self, team: &str) -> bool {
        self.teams.iter().any(|t| t == team)
    }

    pub fn attribute_code(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.code.as_str())
    }

    pub fn is_attribute_code(&self, code: &str) -> bool {
        self.attributes.iter().any(|a| a.code == code)
    }

    pub fn dataset_path(&self, kind: DatasetKind) -> &Path {
        match kind {
            DatasetKind::Outfield => &self.datasets.outfield,
            DatasetKind::Goalkeepers => &self.datasets.goalkeepers,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn builtin_tables_are_complete() {
        let config = ScoutConfig::builtin().expect("built-in config should parse");
        assert_eq!(config.roles.len(), 7);
        assert_eq!(config.teams.len(), 96);
        assert!(config.has_team("Arsenal"));
        assert!(config.has_team("Paris S-G"));
        assert_eq!(config.attribute_code("Goals"), Some("Gls"));
        assert_eq!(config.attribute_code("Passes Completed (Launched)"), Some("Cmp%"));

        let forward = config.role("Forward").expect("forward role");
        assert_eq!(forward.positions, vec!["CF", "SS", "FW"]);
        assert_eq!(forward.dataset, DatasetKind::Outfield);
        let keeper = config.role("Goalkeeping").expect("goalkeeping role");
        assert_eq!(keeper.dataset, DatasetKind::Goalkeepers);
    }

    #[test]
    fn overrides_apply_and_ignore_garbage() {
        let mut config = ScoutConfig::builtin().unwrap().clone();
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SCOUT_TOP_K", "8"),
            ("SCOUT_DBSCAN_EPS", "not-a-number"),
            ("SCOUT_CLUSTERS", "off"),
            ("SCOUT_GOALKEEPER_CSV", " data/gk.csv "),
        ]);
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.analysis.top_k, 8);
        assert_eq!(config.analysis.dbscan_eps, 2.0);
        assert!(!config.analysis.compute_clusters);
        assert_eq!(
            config.dataset_path(DatasetKind::Goalkeepers),
            Path::new("data/gk.csv")
        );
    }

    #[test]
    fn rejects_roles_with_unknown_attributes() {
        let raw = r#"{
            "teams": ["Arsenal"],
            "attributes": [{"name": "Goals", "code": "Gls"}],
            "roles": [{"name": "Forward", "attributes": ["Goals", "Dribbles"], "positions": ["FW"]}]
        }"#;
        let err = ScoutConfig::from_json_str(raw).unwrap_err();
        assert!(err.to_string().contains("Dribbles"));
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let mut config = ScoutConfig::builtin().unwrap().clone();
        config.analysis.dbscan_min_samples = 0;
        assert!(config.validate().is_err());
    }
}
