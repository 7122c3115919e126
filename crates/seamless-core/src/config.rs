//! Editor configuration.

use crate::snap::SnapSettings;
use crate::storage::{DEFAULT_AUTOSAVE_DELAY_MS, STORAGE_KEY};
use crate::viewport::{MAX_SCALE, MIN_SCALE, Viewport, ZOOM_STEP};
use serde::{Deserialize, Serialize};

/// Offset applied to pasted and duplicated elements.
pub const PASTE_OFFSET: f64 = 20.0;

/// Pointer hit tolerance in scene units.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Tunables for an [`Editor`](crate::Editor). Missing fields in JSON take
/// their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub storage_key: String,
    pub autosave_delay_ms: u64,
    pub zoom_step: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub paste_offset: f64,
    /// Maximum undo depth; `None` keeps every step.
    pub history_limit: Option<usize>,
    pub snap: SnapSettings,
    pub hit_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            zoom_step: ZOOM_STEP,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            paste_offset: PASTE_OFFSET,
            history_limit: None,
            snap: SnapSettings::default(),
            hit_tolerance: HIT_TOLERANCE,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration, falling back to defaults when it is malformed.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid editor config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// A fresh viewport honouring the configured zoom limits.
    pub fn viewport(&self) -> Viewport {
        let (min_scale, max_scale) = if self.min_scale <= self.max_scale {
            (self.min_scale, self.max_scale)
        } else {
            (self.max_scale, self.min_scale)
        };
        Viewport {
            min_scale,
            max_scale,
            zoom_step: self.zoom_step,
            ..Viewport::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.storage_key, "seamless-design-elements");
        assert_eq!(config.autosave_delay_ms, 2000);
        assert!((config.zoom_step - 1.05).abs() < f64::EPSILON);
        assert!((config.paste_offset - 20.0).abs() < f64::EPSILON);
        assert!(config.history_limit.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"paste_offset": 10.0, "history_limit": 50}"#);
        assert!((config.paste_offset - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.history_limit, Some(50));
        assert_eq!(config.storage_key, STORAGE_KEY);
    }

    #[test]
    fn test_malformed_json_is_default() {
        assert_eq!(EditorConfig::from_json("{nope"), EditorConfig::default());
    }

    #[test]
    fn test_viewport_limits() {
        let config = EditorConfig {
            min_scale: 0.5,
            max_scale: 2.0,
            ..EditorConfig::default()
        };
        let viewport = config.viewport();
        assert!((viewport.min_scale - 0.5).abs() < f64::EPSILON);
        assert!((viewport.max_scale - 2.0).abs() < f64::EPSILON);
        assert!((viewport.scale - 1.0).abs() < f64::EPSILON);
    }
}
