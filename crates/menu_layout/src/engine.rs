//! Layout pipeline
//!
//! [`LayoutEngine`] wires the pieces together the way API handlers use them:
//! analyze the menu, select a preset for the context, pack the grid (through
//! the cache), then pad rows with fillers. The engine is `Send + Sync`; the
//! cache sits behind a mutex and is bypassed if the lock is ever poisoned.

use crate::{
    analyze, explain_preset_selection, generate_grid_layout, insert_filler_tiles_with,
    select_layout_preset_with_context, should_recommend_manual_selection,
    validate_preset_selection, CacheStats, EngineConfig, GridLayout, LayoutCache, LayoutMenuData,
    LayoutPreset, MenuCharacteristics, OutputContext, PresetCatalog, Result,
};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Everything a caller needs after laying out a menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuLayoutResult {
    pub characteristics: MenuCharacteristics,
    /// Id of the preset the layout was built with
    pub preset_id: String,
    pub explanation: String,
    pub warnings: Vec<String>,
    pub manual_selection_recommended: bool,
    pub layout: GridLayout,
}

/// Menu layout engine with an owned preset catalog and layout cache
#[derive(Debug)]
pub struct LayoutEngine {
    catalog: PresetCatalog,
    config: EngineConfig,
    cache: Mutex<LayoutCache>,
}

impl LayoutEngine {
    /// Engine with the standard catalog and default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_catalog(PresetCatalog::standard(), config)
    }

    pub fn with_catalog(catalog: PresetCatalog, config: EngineConfig) -> Self {
        let cache = LayoutCache::with_config(config.cache.clone());
        Self {
            catalog,
            config,
            cache: Mutex::new(cache),
        }
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, menu: &LayoutMenuData) -> MenuCharacteristics {
        analyze(menu)
    }

    /// Preset for a menu in a context, context rules applied
    pub fn select_preset(&self, menu: &LayoutMenuData, context: OutputContext) -> &LayoutPreset {
        select_layout_preset_with_context(&self.catalog, &analyze(menu), context)
    }

    /// Lay out a menu with an explicitly chosen preset id.
    ///
    /// Fillers are inserted when the configuration asks for them.
    pub fn generate(
        &self,
        menu: &LayoutMenuData,
        preset_id: &str,
        context: OutputContext,
    ) -> Result<GridLayout> {
        menu.check()?;
        let preset = self.catalog.require(preset_id)?;
        let packed = self.pack(menu, preset, context)?;
        Ok(self.finish(packed))
    }

    /// Full pipeline: analyze, select, pack, fill
    pub fn layout_menu(
        &self,
        menu: &LayoutMenuData,
        context: OutputContext,
    ) -> Result<MenuLayoutResult> {
        menu.check()?;

        let characteristics = analyze(menu);
        let preset = select_layout_preset_with_context(&self.catalog, &characteristics, context);
        let layout = self.finish(self.pack(menu, preset, context)?);

        tracing::debug!(
            preset = %preset.id,
            context = %context,
            items = characteristics.total_items,
            tiles = layout.total_tiles,
            "menu laid out"
        );

        Ok(MenuLayoutResult {
            explanation: explain_preset_selection(preset, &characteristics),
            warnings: validate_preset_selection(preset, &characteristics),
            manual_selection_recommended: should_recommend_manual_selection(&characteristics),
            preset_id: preset.id.clone(),
            characteristics,
            layout,
        })
    }

    /// Drop every cached layout
    pub fn clear_cache(&self) {
        match self.cache.lock() {
            Ok(mut cache) => cache.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache
            .lock()
            .map(|cache| cache.stats().clone())
            .unwrap_or_default()
    }

    fn pack(
        &self,
        menu: &LayoutMenuData,
        preset: &LayoutPreset,
        context: OutputContext,
    ) -> Result<GridLayout> {
        match self.cache.lock() {
            Ok(mut cache) => cache.get_or_generate(menu, preset, context),
            Err(_) => {
                tracing::warn!("layout cache lock poisoned, generating without cache");
                generate_grid_layout(menu, preset, context)
            }
        }
    }

    fn finish(&self, layout: GridLayout) -> GridLayout {
        if self.config.insert_fillers {
            insert_filler_tiles_with(&layout, &self.config.filler_styles)
        } else {
            layout
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{count_filler_tiles, presets::ids, LayoutError, MenuItem, MenuSection};

    fn bistro() -> LayoutMenuData {
        let starters = (0..3)
            .map(|i| MenuItem::new(format!("Starter {i}"), 6.0).with_image(format!("s{i}.jpg")))
            .collect();
        let mains = (0..5)
            .map(|i| MenuItem::new(format!("Main {i}"), 14.0))
            .collect();
        LayoutMenuData::new(
            "Bistro",
            "EUR",
            vec![
                MenuSection::new("Starters", starters),
                MenuSection::new("Mains", mains),
            ],
        )
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LayoutEngine>();
    }

    #[test]
    fn test_layout_menu_pipeline() {
        let engine = LayoutEngine::new();
        let result = engine.layout_menu(&bistro(), OutputContext::Desktop).unwrap();

        // 3 of 8 items have images: mixed menu
        assert_eq!(result.preset_id, ids::BALANCED);
        assert_eq!(result.characteristics.total_items, 8);
        assert!(result.explanation.contains("8 items"));
        assert!(result.warnings.is_empty());
        assert!(result.layout.is_valid());
        assert_eq!(count_filler_tiles(&result.layout), 4);
        assert_eq!(result.layout.total_tiles, 12);
    }

    #[test]
    fn test_generate_with_explicit_preset() {
        let engine = LayoutEngine::new();
        let layout = engine
            .generate(&bistro(), ids::TEXT_ONLY, OutputContext::Mobile)
            .unwrap();
        assert_eq!(layout.preset.id, ids::TEXT_ONLY);
        assert_eq!(layout.columns(), 1);
        assert_eq!(count_filler_tiles(&layout), 0);

        let err = engine
            .generate(&bistro(), "poster", OutputContext::Mobile)
            .unwrap_err();
        assert!(matches!(err, LayoutError::UnknownPreset(_)));
    }

    #[test]
    fn test_cache_is_used_and_clearable() {
        let engine = LayoutEngine::new();
        let menu = bistro();

        let first = engine.layout_menu(&menu, OutputContext::Tablet).unwrap();
        let second = engine.layout_menu(&menu, OutputContext::Tablet).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.cache_stats().hits, 1);

        engine.clear_cache();
        let third = engine.layout_menu(&menu, OutputContext::Tablet).unwrap();
        assert_eq!(third, first);
        assert_eq!(engine.cache_stats().full_clears, 1);
        assert_eq!(engine.cache_stats().hits, 1);
    }

    #[test]
    fn test_without_fillers() {
        let engine = LayoutEngine::with_config(EngineConfig::default().without_fillers());
        let result = engine.layout_menu(&bistro(), OutputContext::Desktop).unwrap();
        assert_eq!(result.layout.total_tiles, 8);
        assert_eq!(count_filler_tiles(&result.layout), 0);
    }

    #[test]
    fn test_empty_menu() {
        let engine = LayoutEngine::new();
        let result = engine
            .layout_menu(&LayoutMenuData::empty(), OutputContext::Print)
            .unwrap();
        assert_eq!(result.preset_id, ids::BALANCED);
        assert!(result.layout.sections.is_empty());
        assert_eq!(result.layout.total_tiles, 0);
        assert!(result.layout.validate().is_empty());
    }

    #[test]
    fn test_rejects_non_finite_prices() {
        let engine = LayoutEngine::new();
        let mut menu = bistro();
        menu.sections[0].items[0].price = f64::INFINITY;
        assert!(matches!(
            engine.layout_menu(&menu, OutputContext::Desktop),
            Err(LayoutError::InvalidMenuData(_))
        ));
    }

    #[test]
    fn test_select_preset_context_downgrade() {
        let engine = LayoutEngine::new();
        let items = (0..13)
            .map(|i| MenuItem::new(format!("Plate {i}"), 20.0).with_image("p.jpg"))
            .collect();
        let menu = LayoutMenuData::new("Tasting", "USD", vec![MenuSection::new("Menu", items)]);

        assert_eq!(engine.select_preset(&menu, OutputContext::Desktop).id, ids::FEATURE_BAND);
        assert_eq!(engine.select_preset(&menu, OutputContext::Print).id, ids::BALANCED);
    }
}
