//! Engine configuration
//!
//! Loaded from JSON by hosting tools; every field has a default so partial
//! documents are accepted.

use crate::{CacheConfig, FillerStyle, Result};
use serde::{Deserialize, Serialize};

/// Settings for [`crate::LayoutEngine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Layout memoization
    pub cache: CacheConfig,
    /// Pad incomplete trailing rows with filler tiles
    pub insert_fillers: bool,
    /// Style rotation for filler tiles
    pub filler_styles: Vec<FillerStyle>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            insert_fillers: true,
            filler_styles: FillerStyle::ROTATION.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Parse a config document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = CacheConfig::disabled();
        self
    }

    pub fn without_fillers(mut self) -> Self {
        self.insert_fillers = false;
        self
    }

    pub fn with_filler_styles(mut self, styles: Vec<FillerStyle>) -> Self {
        self.filler_styles = styles;
        self
    }
}
