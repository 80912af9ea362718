//! Lab settings
//!
//! Read-only configuration: which variant to run and how to spawn bouncers.
//! Loaded from LocalStorage (plus `?variant=` / `?seed=` query overrides) in
//! the browser, or from the JSON file named by `BOUNCE_LAB_SETTINGS` on native.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::BOUNCER_IMAGE;
use crate::sim::{SpawnConfig, Variant};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Lab settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Variant and spawn ranges
    #[serde(flatten)]
    pub spawn: SpawnConfig,
    /// Fixed seed; `None` picks one from the clock
    pub seed: Option<u64>,
    /// Sprite path relative to the working directory / page
    pub bouncer_image: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spawn: SpawnConfig::default(),
            seed: None,
            bouncer_image: BOUNCER_IMAGE.to_string(),
        }
    }
}

impl Settings {
    pub fn variant(&self) -> Variant {
        self.spawn.variant
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `variant=N` and `seed=N` pairs from a URL query string.
    /// Unknown keys and unparsable values are ignored.
    pub fn with_query(mut self, query: &str) -> Self {
        let query = query.trim_start_matches('?');
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "variant" => match Variant::parse(value) {
                    Some(variant) => self.spawn.variant = variant,
                    None => log::warn!("Ignoring unknown variant '{}'", value),
                },
                "seed" => match value.parse() {
                    Ok(seed) => self.seed = Some(seed),
                    Err(_) => log::warn!("Ignoring bad seed '{}'", value),
                },
                _ => {}
            }
        }
        self
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "bounce_lab_settings";

    /// Environment variable naming a settings file (native only)
    pub const ENV_VAR: &'static str = "BOUNCE_LAB_SETTINGS";

    /// Load settings from LocalStorage and the page query (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let storage = window
            .as_ref()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let mut settings = None;
        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(loaded) => {
                        log::info!("Loaded settings from LocalStorage");
                        settings = Some(loaded);
                    }
                    Err(err) => log::warn!("Stored settings ignored: {}", err),
                }
            }
        }
        let settings = settings.unwrap_or_else(|| {
            log::info!("Using default settings");
            Self::default()
        });

        let query = window
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        settings.with_query(&query)
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from the file named by `BOUNCE_LAB_SETTINGS`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_path(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(err) => {
                log::warn!("{} ({}), using defaults", err, path);
                Self::default()
            }
        }
    }
}
