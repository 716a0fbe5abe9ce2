use loan_finance_core::LoanPolicy;
use std::path::Path;
use tracing::debug;

use super::file;

/// Load the financing policy named by `--config`. YAML is chosen by the
/// `.yaml`/`.yml` extension, anything else is read as JSON. Missing fields
/// take their documented defaults.
pub fn load_policy(path: Option<&str>) -> Result<Option<LoanPolicy>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let is_yaml = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let policy: LoanPolicy = if is_yaml {
        file::read_yaml(path)?
    } else {
        file::read_json(path)?
    };
    policy
        .validate()
        .map_err(|e| format!("Invalid policy in '{path}': {e}"))?;

    debug!(path, terms = ?policy.allowed_terms, "loaded financing policy");
    Ok(Some(policy))
}
