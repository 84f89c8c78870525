use std::{fs, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

/// Process-wide configuration, loaded once at start. The glyph lookup
/// table is a compile-time constant in the `glyph` crate and deliberately
/// not configurable here.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub endpoint_url: String,
    pub max_inputs: usize,
    pub encode_width: usize,
    pub reveal_hold_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: "http://localhost:3000/upload-binary".into(),
            max_inputs: 10,
            encode_width: 8,
            reveal_hold_ms: 3000,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn endpoint(&self) -> anyhow::Result<Url> {
        Url::parse(&self.endpoint_url)
            .with_context(|| format!("invalid endpoint url '{}'", self.endpoint_url))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn reveal_hold(&self) -> Duration {
        Duration::from_millis(self.reveal_hold_ms)
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("client.toml") {
        if let Ok(file_cfg) = toml::from_str::<toml::Table>(&raw) {
            apply_file_overrides(&mut settings, &file_cfg);
        }
    }

    if let Ok(v) = std::env::var("ENDPOINT_URL") {
        settings.endpoint_url = v;
    }
    if let Ok(v) = std::env::var("APP__ENDPOINT_URL") {
        settings.endpoint_url = v;
    }

    if let Ok(v) = std::env::var("APP__MAX_INPUTS") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_inputs = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__ENCODE_WIDTH") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.encode_width = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__REVEAL_HOLD_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.reveal_hold_ms = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

/// Out-of-range values (negative integers in particular) are ignored rather
/// than wrapped; the default stays in effect.
fn apply_file_overrides(settings: &mut Settings, file_cfg: &toml::Table) {
    if let Some(v) = file_cfg.get("endpoint_url").and_then(|v| v.as_str()) {
        settings.endpoint_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("max_inputs").and_then(|v| v.as_integer()) {
        if let Ok(parsed) = usize::try_from(v) {
            settings.max_inputs = parsed;
        }
    }
    if let Some(v) = file_cfg.get("encode_width").and_then(|v| v.as_integer()) {
        if let Ok(parsed) = usize::try_from(v) {
            settings.encode_width = parsed;
        }
    }
    if let Some(v) = file_cfg.get("reveal_hold_ms").and_then(|v| v.as_integer()) {
        if let Ok(parsed) = u64::try_from(v) {
            settings.reveal_hold_ms = parsed;
        }
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(|v| v.as_integer())
    {
        if let Ok(parsed) = u64::try_from(v) {
            settings.request_timeout_secs = parsed;
        }
    }
}
