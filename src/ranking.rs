use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::distance::weighted_euclidean;
use crate::error::AnalysisResult;
use crate::features::FeatureMatrix;
use crate::profile::RoleProfile;
use crate::weights::WeightVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub player: String,
    pub position: String,
    pub team: String,
    pub distance: f64,
    pub stats: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatColumn {
    pub name: String,
    pub column: usize,
}

/// Closest `top_k` players outside `exclude_team` to `profile`, measured on the raw
/// values of the profile's columns with the matching slice of `weights`.
/// Ties keep input order.
pub fn rank_similar(
    matrix: &FeatureMatrix<'_>,
    profile: &RoleProfile,
    weights: &WeightVector,
    exclude_team: &str,
    snapshot: &[StatColumn],
    top_k: usize,
) -> AnalysisResult<Vec<RankedMatch>> {
    let relevant_weights = weights.select(profile.columns());

    let mut scored: Vec<(usize, f64)> = Vec::new();
    for row in 0..matrix.nrows() {
        if matrix.record(row).squad == exclude_team {
            continue;
        }
        let candidate = matrix.select(row, profile.columns());
        let distance = weighted_euclidean(&candidate, profile.values(), &relevant_weights)?;
        scored.push((row, distance));
    }

    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.truncate(top_k);

    Ok(scored
        .into_iter()
        .map(|(row, distance)| {
            let record = matrix.record(row);
            RankedMatch {
                player: record.name.clone(),
                position: record.position.clone(),
                team: record.squad.clone(),
                distance,
                stats: snapshot
                    .iter()
                    .map(|s| (s.name.clone(), matrix.value(row, s.column)))
                    .collect(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PlayerTable;
    use crate::profile::ReferenceGroup;

    const CSV: &str = "Player,Pos,Squad,MP,Gls,xG,Ast\n\
                       Ref,FW,Arsenal,30,10,10,0\n\
                       Bench,FW,Arsenal,5,10,10,0\n\
                       Far,FW,Lens,30,0,0,9\n\
                       TieA,FW,Lyon,30,12,10,3\n\
                       Exact,FW,Nice,30,10,10,7\n\
                       TieB,FW,Metz,30,8,10,1\n";

    fn setup(table: &PlayerTable) -> (FeatureMatrix<'_>, RoleProfile) {
        let m = FeatureMatrix::for_positions(table, &["FW".to_string()]);
        let group = ReferenceGroup::select(&m, "Arsenal", 20.0).unwrap();
        let cols = m.columns().resolve_all(["Gls", "xG"]);
        let profile = RoleProfile::aggregate(&m, &group, &cols).unwrap();
        (m, profile)
    }

    #[test]
    fn ranks_ascending_excluding_reference_team() {
        let table = PlayerTable::from_csv_reader(CSV.as_bytes()).unwrap();
        let (m, profile) = setup(&table);
        let weights = WeightVector::build(m.columns(), ["Gls", "xG"], Vec::<&str>::new());
        let gls = m.columns().position("Gls").unwrap();
        let snapshot = vec![StatColumn {
            name: "Goals".to_string(),
            column: gls,
        }];

        let ranked = rank_similar(&m, &profile, &weights, "Arsenal", &snapshot, 5).unwrap();
        let names: Vec<&str> = ranked.iter().map(|r| r.player.as_str()).collect();
        // Ast carries no weight, so Exact is a perfect match; TieA/TieB keep input order.
        assert_eq!(names, vec!["Exact", "TieA", "TieB", "Far"]);
        assert_eq!(ranked[0].distance, 0.0);
        assert_eq!(ranked[1].distance, 2.0);
        assert_eq!(ranked[2].distance, 2.0);
        assert_eq!(ranked[0].stats.get("Goals"), Some(&10.0));
        assert!(ranked.iter().all(|r| r.team != "Arsenal"));
    }

    #[test]
    fn truncates_to_top_k_and_applies_emphasis() {
        let table = PlayerTable::from_csv_reader(CSV.as_bytes()).unwrap();
        let (m, profile) = setup(&table);
        let weights = WeightVector::build(m.columns(), ["Gls", "xG"], ["Gls"]);
        let ranked = rank_similar(&m, &profile, &weights, "Arsenal", &[], 2).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[1].player, "TieA");
        assert!((ranked[1].distance - 8.0f64.sqrt()).abs() < 1e-12);
        assert!(ranked[0].stats.is_empty());
    }
}
