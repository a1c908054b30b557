//! Seeded synthetic player tables for benchmarks, tests and offline demos.

use std::collections::HashSet;

use rand::Rng;

use crate::config::ScoutConfig;
use crate::dataset::{MATCHES_COLUMN, PlayerRecord, PlayerTable};
use crate::error::AnalysisResult;

const MISSING_RATE: f64 = 0.03;
const SEASON_MATCHES: u32 = 38;

/// `players_per_role` players for every role of the first `teams` configured teams.
///
/// Columns are `MP` followed by every distinct attribute code of the configuration.
/// Players score higher on their own role's attributes so role groups stay separable.
pub fn synthetic_table(
    config: &ScoutConfig,
    rng: &mut impl Rng,
    teams: usize,
    players_per_role: usize,
) -> AnalysisResult<PlayerTable> {
    let mut codes: Vec<String> = Vec::new();
    for attr in &config.attributes {
        if !codes.contains(&attr.code) {
            codes.push(attr.code.clone());
        }
    }

    let mut records = Vec::new();
    for team in config.teams.iter().take(teams) {
        for role in &config.roles {
            let favoured: HashSet<&str> = role
                .attributes
                .iter()
                .filter_map(|name| config.attribute_code(name))
                .collect();
            for idx in 0..players_per_role {
                let position = &role.positions[idx % role.positions.len()];
                let matches_played = f64::from(rng.gen_range(0..=SEASON_MATCHES));
                let mut values = Vec::with_capacity(codes.len() + 1);
                values.push(Some(matches_played));
                for code in &codes {
                    if rng.gen_bool(MISSING_RATE) {
                        values.push(None);
                        continue;
                    }
                    let base = if favoured.contains(code.as_str()) {
                        rng.gen_range(4.0..20.0)
                    } else {
                        rng.gen_range(0.0..6.0)
                    };
                    values.push(Some((base * 100.0_f64).round() / 100.0));
                }
                records.push(PlayerRecord::new(
                    format!("{team} {position} {}", idx + 1),
                    position.clone(),
                    team.clone(),
                    matches_played,
                    values,
                ));
            }
        }
    }

    let mut columns = Vec::with_capacity(codes.len() + 1);
    columns.push(MATCHES_COLUMN.to_string());
    columns.extend(codes);
    PlayerTable::new(columns, records)
}
