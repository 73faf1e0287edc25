//! Application state: the split configuration resolved at startup.

use anyhow::{Context, Result};
use labelcut_core::{SplitConfig, TargetSize};

pub struct AppState {
    pub config: SplitConfig,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let preset = std::env::var("LABELCUT_PRESET").ok();
        let mut config = base_config(preset.as_deref())?;

        if let Ok(raw) = std::env::var("LABELCUT_MIN_TEXT_LEN") {
            config.min_text_len = raw
                .parse()
                .with_context(|| format!("invalid LABELCUT_MIN_TEXT_LEN: {}", raw))?;
        }

        let width = env_f64("LABELCUT_TARGET_WIDTH")?;
        let height = env_f64("LABELCUT_TARGET_HEIGHT")?;
        config.target = match (width, height) {
            (Some(width), Some(height)) => Some(TargetSize { width, height }),
            (None, None) => None,
            _ => anyhow::bail!(
                "LABELCUT_TARGET_WIDTH and LABELCUT_TARGET_HEIGHT must be set together"
            ),
        };

        if let Ok(raw) = std::env::var("LABELCUT_LABEL_KEYWORDS") {
            config.keywords.label = parse_keywords(&raw);
        }
        if let Ok(raw) = std::env::var("LABELCUT_INVOICE_KEYWORDS") {
            config.keywords.invoice = parse_keywords(&raw);
        }

        tracing::info!(
            "Resolved split configuration: min_text_len={}, target={:?}",
            config.min_text_len,
            config.target
        );

        Ok(Self { config })
    }
}

/// Named geometry preset selected by LABELCUT_PRESET. `thermal` targets
/// 4x6-class label stock; the default is the unscaled A4 half split.
fn base_config(preset: Option<&str>) -> Result<SplitConfig> {
    match preset {
        None | Some("default") => Ok(SplitConfig::default()),
        Some("thermal") => Ok(SplitConfig::thermal()),
        Some(other) => anyhow::bail!("unknown LABELCUT_PRESET: {}", other),
    }
}

fn env_f64(name: &str) -> Result<Option<f64>> {
    match std::env::var(name) {
        Ok(raw) => Ok(Some(
            raw.parse()
                .with_context(|| format!("invalid {}: {}", name, raw))?,
        )),
        Err(_) => Ok(None),
    }
}

/// Comma-separated keyword list, trimmed and lower-cased.
fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_trimmed_and_lowercased() {
        let parsed = parse_keywords(" Tax Invoice , DECLARATION ,, label ");
        assert_eq!(parsed, vec!["tax invoice", "declaration", "label"]);
    }

    #[test]
    fn empty_keyword_string_parses_to_nothing() {
        assert!(parse_keywords("").is_empty());
        assert!(parse_keywords(" , ,").is_empty());
    }

    #[test]
    fn thermal_preset_targets_label_stock() {
        let config = base_config(Some("thermal")).unwrap();
        assert_eq!(
            config.target,
            Some(TargetSize {
                width: 213.0,
                height: 354.0
            })
        );
    }

    #[test]
    fn default_preset_has_no_target() {
        assert_eq!(base_config(None).unwrap().target, None);
        assert_eq!(base_config(Some("default")).unwrap().target, None);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(base_config(Some("a4")).is_err());
    }
}
