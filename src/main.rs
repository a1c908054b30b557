use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use role_scout::cli::{arg_value, describe, has_flag, init_tracing, split_codes};
use role_scout::{AnalysisReport, AnalysisRequest, Analyzer, PlayerTable, ScoutConfig};

#[derive(Serialize)]
struct Output<'a> {
    generated_at: String,
    #[serde(flatten)]
    report: &'a AnalysisReport,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        print_usage();
        return Ok(());
    }

    let config_path = arg_value(&args, "--config").map(PathBuf::from);
    let mut config = ScoutConfig::resolve(config_path.as_deref())?;
    if has_flag(&args, "--no-clusters") {
        config.analysis.compute_clusters = false;
    }

    let request = AnalysisRequest {
        role: arg_value(&args, "--role").context("missing --role")?,
        team: arg_value(&args, "--team").context("missing --team")?,
        emphasized: arg_value(&args, "--emphasize")
            .map(|raw| split_codes(&raw))
            .unwrap_or_default(),
    };

    let analyzer = Analyzer::new(config);
    let role = analyzer.validate(&request).map_err(describe)?;
    let data_path = arg_value(&args, "--data")
        .map(PathBuf::from)
        .unwrap_or_else(|| analyzer.config().dataset_path(role.dataset).to_path_buf());

    let table = PlayerTable::from_csv_path(&data_path)?;
    info!(
        path = %data_path.display(),
        players = table.len(),
        columns = table.columns().len(),
        "loaded player table"
    );

    let report = analyzer.analyze(&request, &table).map_err(describe)?;
    let out = Output {
        generated_at: chrono::Utc::now().to_rfc3339(),
        report: &report,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serialize analysis report")?
    );
    Ok(())
}

fn print_usage() {
    println!("usage: role_scout --role <ROLE> --team <TEAM> [--emphasize Gls,SoT]");
    println!("                  [--data <CSV>] [--config <JSON>] [--no-clusters]");
    println!();
    println!("Without --data the role's dataset path from the config is used.");
    println!("Env: SCOUT_CONFIG, SCOUT_TOP_K, SCOUT_DBSCAN_EPS, SCOUT_DBSCAN_MIN_SAMPLES,");
    println!("     SCOUT_MIN_MATCHES, SCOUT_CLUSTERS, SCOUT_OUTFIELD_CSV, SCOUT_GOALKEEPER_CSV");
}
