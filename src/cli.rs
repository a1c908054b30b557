//! Shared bits of the command-line front ends: flag lookup, error wording and tracing setup.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use crate::error::AnalysisError;

/// Value of `--name=value` or `--name value`; blank values count as absent.
pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && !raw.trim().is_empty()
        {
            return Some(raw.trim().to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with("--")
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

/// `"Gls, SoT,,xG"` -> `["Gls", "SoT", "xG"]`.
pub fn split_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Prefixes an analysis failure with the response class a caller should report.
pub fn describe(err: AnalysisError) -> anyhow::Error {
    let kind = if err.is_invalid_input() {
        "bad request"
    } else if err.is_not_found() {
        "not found"
    } else {
        "internal error"
    };
    anyhow!("{kind}: {err}")
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins over `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputField;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn arg_value_accepts_both_forms() {
        let a = args(&["--role=Forward", "--team", "Aston Villa", "--data", "--no-clusters"]);
        assert_eq!(arg_value(&a, "--role").as_deref(), Some("Forward"));
        assert_eq!(arg_value(&a, "--team").as_deref(), Some("Aston Villa"));
        assert_eq!(arg_value(&a, "--data"), None);
        assert!(has_flag(&a, "--no-clusters"));
    }

    #[test]
    fn split_codes_drops_blanks() {
        assert_eq!(split_codes("Gls, SoT,,xG "), vec!["Gls", "SoT", "xG"]);
        assert!(split_codes("").is_empty());
    }

    #[test]
    fn describe_maps_each_error_kind() {
        let bad = describe(AnalysisError::invalid_input(InputField::Role, "Striker"));
        assert_eq!(bad.to_string(), "bad request: invalid role: Striker");

        let missing = describe(AnalysisError::empty_reference_group("Luton Town"));
        assert_eq!(missing.to_string(), "not found: no data found for team: Luton Town");

        let internal = describe(AnalysisError::dimension_mismatch(7, 6));
        assert_eq!(
            internal.to_string(),
            "internal error: dimension mismatch: expected 7, actual 6"
        );
    }
}
