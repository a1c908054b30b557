use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;

use role_scout::cli::{arg_value, has_flag, init_tracing, split_codes};
use role_scout::synthetic::synthetic_table;
use role_scout::{Analyzer, PlayerTable, ScoutConfig};

const DEFAULT_SYNTHETIC_TEAMS: usize = 20;
const DEFAULT_SYNTHETIC_PLAYERS: usize = 3;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config_path = arg_value(&args, "--config").map(PathBuf::from);
    let config = ScoutConfig::resolve(config_path.as_deref())?;
    let role_name = arg_value(&args, "--role").context("missing --role")?;
    let emphasized = arg_value(&args, "--emphasize")
        .map(|raw| split_codes(&raw))
        .unwrap_or_default();

    let role = config
        .role(&role_name)
        .ok_or_else(|| anyhow!("unknown role {role_name}"))?;
    let table = if has_flag(&args, "--synthetic") || arg_value(&args, "--seed").is_some() {
        let seed = arg_value(&args, "--seed")
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(0);
        let mut rng = StdRng::seed_from_u64(seed);
        synthetic_table(
            &config,
            &mut rng,
            DEFAULT_SYNTHETIC_TEAMS,
            DEFAULT_SYNTHETIC_PLAYERS,
        )?
    } else {
        let path = arg_value(&args, "--data")
            .map(PathBuf::from)
            .unwrap_or_else(|| config.dataset_path(role.dataset).to_path_buf());
        PlayerTable::from_csv_path(&path)?
    };

    let analyzer = Analyzer::new(config.clone());
    let clusters = analyzer.cluster_role(&role_name, &emphasized, &table)?;

    println!("Role: {}", clusters.role);
    println!("Players: {}", clusters.players);
    println!("Clusters: {}", clusters.n_clusters);
    for (id, size) in clusters.sizes.iter().enumerate() {
        println!(" - cluster {id}: {size} players");
    }
    println!("Noise: {}", clusters.noise);
    if has_flag(&args, "--members") {
        for member in &clusters.memberships {
            let label = member
                .cluster
                .map(|id| id.to_string())
                .unwrap_or_else(|| "noise".to_string());
            println!("{label}\t{}\t{}", member.player, member.team);
        }
    }
    Ok(())
}
