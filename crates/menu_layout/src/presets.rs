//! Layout Preset Catalog
//!
//! A preset is a named grid configuration: how many columns each output
//! context gets, plus the style family the render backend keys its visuals
//! on. The catalog is built once and handed to the selection and packing
//! code by reference; nothing mutates it after construction.

use crate::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Output Context
// =============================================================================

/// Target surface a layout is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputContext {
    Mobile,
    Tablet,
    Desktop,
    Print,
}

impl OutputContext {
    /// Every context, narrowest first
    pub const ALL: [OutputContext; 4] = [
        OutputContext::Mobile,
        OutputContext::Tablet,
        OutputContext::Desktop,
        OutputContext::Print,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputContext::Mobile => "mobile",
            OutputContext::Tablet => "tablet",
            OutputContext::Desktop => "desktop",
            OutputContext::Print => "print",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OutputContext::Mobile => "Mobile",
            OutputContext::Tablet => "Tablet",
            OutputContext::Desktop => "Desktop",
            OutputContext::Print => "Print / PDF",
        }
    }

    /// Contexts where wide feature bands read poorly
    pub fn is_constrained(&self) -> bool {
        matches!(self, OutputContext::Mobile | OutputContext::Print)
    }
}

impl fmt::Display for OutputContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputContext {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile" => Ok(OutputContext::Mobile),
            "tablet" => Ok(OutputContext::Tablet),
            "desktop" => Ok(OutputContext::Desktop),
            "print" | "pdf" => Ok(OutputContext::Print),
            other => Err(format!(
                "unknown output context '{other}' (expected mobile, tablet, desktop or print)"
            )),
        }
    }
}

// =============================================================================
// Preset Family
// =============================================================================

/// Style category of a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetFamily {
    ImageForward,
    Dense,
    FeatureBand,
    Balanced,
    TextOnly,
}

impl PresetFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetFamily::ImageForward => "image-forward",
            PresetFamily::Dense => "dense",
            PresetFamily::FeatureBand => "feature-band",
            PresetFamily::Balanced => "balanced",
            PresetFamily::TextOnly => "text-only",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PresetFamily::ImageForward => "Image Forward",
            PresetFamily::Dense => "Dense",
            PresetFamily::FeatureBand => "Feature Band",
            PresetFamily::Balanced => "Balanced",
            PresetFamily::TextOnly => "Text Only",
        }
    }
}

impl fmt::Display for PresetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Column counts per output context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub columns: BTreeMap<OutputContext, usize>,
}

impl GridConfig {
    /// Build a config from mobile, tablet, desktop and print column counts
    pub fn new(mobile: usize, tablet: usize, desktop: usize, print: usize) -> Self {
        let columns = BTreeMap::from([
            (OutputContext::Mobile, mobile),
            (OutputContext::Tablet, tablet),
            (OutputContext::Desktop, desktop),
            (OutputContext::Print, print),
        ]);
        Self { columns }
    }

    /// Raw column count, if the context is configured
    pub fn get(&self, context: OutputContext) -> Option<usize> {
        self.columns.get(&context).copied()
    }
}

/// A named, reusable layout configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPreset {
    /// Unique key, e.g. "dense-catalog"
    pub id: String,
    /// Display label
    pub name: String,
    pub family: PresetFamily,
    #[serde(default)]
    pub description: String,
    pub grid_config: GridConfig,
}

impl LayoutPreset {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        family: PresetFamily,
        grid_config: GridConfig,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            family,
            description: String::new(),
            grid_config,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Column count for a context.
    ///
    /// A missing or zero count is a catalog mistake, not bad menu data, so
    /// it is reported as an error instead of being papered over.
    pub fn columns_for(&self, context: OutputContext) -> Result<usize> {
        match self.grid_config.get(context) {
            None => Err(LayoutError::MissingColumnCount {
                preset: self.id.clone(),
                context,
            }),
            Some(0) => Err(LayoutError::ZeroColumns {
                preset: self.id.clone(),
                context,
            }),
            Some(columns) => Ok(columns),
        }
    }

    /// Check that every context has a positive column count
    pub fn validate(&self) -> Result<()> {
        for context in OutputContext::ALL {
            self.columns_for(context)?;
        }
        Ok(())
    }
}

/// Preset ids shipped in the standard catalog
pub mod ids {
    pub const IMAGE_FORWARD: &str = "image-forward";
    pub const DENSE_CATALOG: &str = "dense-catalog";
    pub const FEATURE_BAND: &str = "feature-band";
    pub const BALANCED: &str = "balanced";
    pub const TEXT_ONLY: &str = "text-only";
}

// =============================================================================
// Catalog
// =============================================================================

/// Immutable registry of layout presets.
///
/// Iteration order is the registration order and is part of the ranking
/// tie-break, so it must stay stable.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetCatalog {
    presets: Vec<LayoutPreset>,
    fallback_index: usize,
}

impl PresetCatalog {
    /// The standard five presets
    pub fn standard() -> Self {
        let presets = vec![
            LayoutPreset::new(
                ids::IMAGE_FORWARD,
                "Image Forward",
                PresetFamily::ImageForward,
                GridConfig::new(1, 2, 3, 3),
            )
            .with_description("Large photo tiles for menus where most dishes have images"),
            LayoutPreset::new(
                ids::DENSE_CATALOG,
                "Dense Catalog",
                PresetFamily::Dense,
                GridConfig::new(2, 3, 4, 4),
            )
            .with_description("Compact tiles for long menus with short names"),
            LayoutPreset::new(
                ids::FEATURE_BAND,
                "Feature Band",
                PresetFamily::FeatureBand,
                GridConfig::new(1, 2, 3, 2),
            )
            .with_description("Wide hero bands for a short, photo-rich menu"),
            LayoutPreset::new(
                ids::BALANCED,
                "Balanced",
                PresetFamily::Balanced,
                GridConfig::new(2, 3, 4, 3),
            )
            .with_description("General purpose grid for mixed menus"),
            LayoutPreset::new(
                ids::TEXT_ONLY,
                "Text Only",
                PresetFamily::TextOnly,
                GridConfig::new(1, 2, 3, 1),
            )
            .with_description("Typographic list for menus without images"),
        ];

        // The standard set is fixed and well formed.
        let fallback_index = presets
            .iter()
            .position(|p| p.family == PresetFamily::Balanced)
            .unwrap_or(0);
        Self {
            presets,
            fallback_index,
        }
    }

    /// Build a catalog from custom presets.
    ///
    /// Ids must be unique, every preset must define a positive column count
    /// for every context, and at least one balanced preset must exist to act
    /// as the selection fallback.
    pub fn from_presets(presets: Vec<LayoutPreset>) -> Result<Self> {
        for (i, preset) in presets.iter().enumerate() {
            if presets[..i].iter().any(|p| p.id == preset.id) {
                return Err(LayoutError::InvalidCatalog(format!(
                    "duplicate preset id '{}'",
                    preset.id
                )));
            }
            preset.validate()?;
        }

        let fallback_index = presets
            .iter()
            .position(|p| p.family == PresetFamily::Balanced)
            .ok_or_else(|| {
                LayoutError::InvalidCatalog("catalog has no balanced preset".to_string())
            })?;

        Ok(Self {
            presets,
            fallback_index,
        })
    }

    /// Look up a preset by id
    pub fn get(&self, id: &str) -> Option<&LayoutPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Look up a preset by id, failing for unknown ids
    pub fn require(&self, id: &str) -> Result<&LayoutPreset> {
        self.get(id)
            .ok_or_else(|| LayoutError::UnknownPreset(id.to_string()))
    }

    /// The balanced preset used when nothing else stands out
    pub fn fallback(&self) -> &LayoutPreset {
        &self.presets[self.fallback_index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutPreset> {
        self.presets.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn by_family(&self, family: PresetFamily) -> Vec<&LayoutPreset> {
        self.presets.iter().filter(|p| p.family == family).collect()
    }

    /// Registration position, used for deterministic tie-breaking
    pub fn position(&self, id: &str) -> Option<usize> {
        self.presets.iter().position(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
