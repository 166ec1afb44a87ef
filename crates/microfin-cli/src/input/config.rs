use microfin_core::commission::CommissionConfig;
use std::path::Path;

use crate::input::file;

/// Load a commission rate card from a JSON or YAML file, chosen by extension.
///
/// Returns `None` when no path is given so each command falls back to the
/// config embedded in its input, or the built-in table.
pub fn load_commission_config(
    path: Option<&str>,
) -> Result<Option<CommissionConfig>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        log::debug!("no --config given; using input or built-in rate card");
        return Ok(None);
    };

    let (canonical, contents) = file::read_text(path)?;
    let config: CommissionConfig = if is_yaml(&canonical) {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    config.validate()?;

    log::info!(
        "loaded {} commission tier(s) from {}",
        config.tiers.len(),
        canonical.display()
    );
    for warning in config.coverage_warnings() {
        log::warn!("{warning}");
    }
    Ok(Some(config))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
