//! Page-level countdown configuration.
//!
//! The embedded `static/countdown.json` provides the baseline; the mount
//! element may override it with `data-countdown-target` and
//! `data-countdown-title` attributes.

use countdown_core::{ConfigError, CountdownConfig, parse_target};

pub const MOUNT_ID: &str = "app";
pub const TARGET_ATTR: &str = "data-countdown-target";
pub const TITLE_ATTR: &str = "data-countdown-title";

const PAGE_CONFIG: &str = include_str!("../static/countdown.json");

#[derive(Debug, thiserror::Error)]
pub enum WebConfigError {
    #[error("embedded countdown.json: {0}")]
    Embedded(#[source] ConfigError),
    #[error("data-countdown-target: {0}")]
    Target(#[source] ConfigError),
    #[error("data-countdown-title must not be empty")]
    EmptyTitle,
}

/// Parse the configuration bundled with the page.
///
/// # Errors
///
/// Returns an error if the embedded JSON is malformed or invalid.
pub fn embedded_config() -> Result<CountdownConfig, WebConfigError> {
    CountdownConfig::from_json(PAGE_CONFIG).map_err(WebConfigError::Embedded)
}

/// Apply mount-element attribute overrides on top of `base`.
///
/// # Errors
///
/// Returns an error if an override is present but invalid.
pub fn apply_overrides(
    base: CountdownConfig,
    target: Option<&str>,
    title: Option<&str>,
) -> Result<CountdownConfig, WebConfigError> {
    let mut config = base;
    if let Some(raw) = target {
        config.target = parse_target(raw).map_err(WebConfigError::Target)?;
    }
    if let Some(raw) = title {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WebConfigError::EmptyTitle);
        }
        config.title = trimmed.to_string();
    }
    Ok(config)
}

/// Resolve the page configuration, logging and falling back to defaults on
/// any error so the countdown always renders.
#[must_use]
pub fn load_page_config(root: Option<&web_sys::Element>) -> CountdownConfig {
    let base = embedded_config().unwrap_or_else(|err| {
        log::error!("Failed to load countdown config: {err}");
        CountdownConfig::default()
    });
    let Some(root) = root else {
        return base;
    };
    let target = root.get_attribute(TARGET_ATTR);
    let title = root.get_attribute(TITLE_ATTR);
    apply_overrides(base.clone(), target.as_deref(), title.as_deref()).unwrap_or_else(|err| {
        log::error!("Ignoring countdown overrides: {err}");
        base
    })
}
