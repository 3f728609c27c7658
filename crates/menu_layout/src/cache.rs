//! Grid layout cache
//!
//! Memoizes `generate_grid_layout` results keyed by a content hash of the
//! menu, the preset (id and column map), and the output context.
//!
//! # Features
//!
//! - **LRU eviction policy**: evicts least-recently-used entries once the
//!   cache reaches its size limit
//! - **Collision safety**: entries keep their full inputs and a lookup only
//!   hits when those compare equal, so two different menus can never share a
//!   result even if their hashes collide
//! - **Explicit ownership**: the caller owns the cache; `clear` drops every
//!   entry so later lookups regenerate
//! - **Statistics tracking**: hit/miss/eviction counters

use crate::{generate_grid_layout, GridLayout, LayoutMenuData, LayoutPreset, OutputContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};

/// Configuration for the layout cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    /// Whether lookups and stores happen at all
    pub enabled: bool,
    /// Maximum number of cached layouts
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 256,
        }
    }
}

impl CacheConfig {
    /// Create a cache config with the given entry limit
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            enabled: true,
            max_entries,
        }
    }

    /// A config that never stores anything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Cache key derived from the layout inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCacheKey {
    /// Hash of the menu content
    pub menu_hash: u64,
    /// Hash of the preset id and column map
    pub preset_hash: u64,
    pub context: OutputContext,
}

impl GridCacheKey {
    pub fn new(menu: &LayoutMenuData, preset: &LayoutPreset, context: OutputContext) -> Self {
        Self {
            menu_hash: hash_menu_data(menu),
            preset_hash: hash_preset(preset),
            context,
        }
    }
}

/// A cached layout together with the inputs that produced it
#[derive(Debug, Clone)]
struct CachedGridLayout {
    menu: LayoutMenuData,
    preset: LayoutPreset,
    layout: GridLayout,
}

impl CachedGridLayout {
    fn matches(&self, menu: &LayoutMenuData, preset: &LayoutPreset) -> bool {
        self.preset == *preset && self.menu == *menu
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Lookups whose hash matched but whose inputs did not
    pub collisions: u64,
    /// Entries dropped because of the size limit
    pub evictions: u64,
    /// Entries dropped by targeted invalidation
    pub invalidations: u64,
    /// Number of full cache clears
    pub full_clears: u64,
}

impl CacheStats {
    /// Hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Caller-owned memoization of generated grid layouts
#[derive(Debug)]
pub struct LayoutCache {
    entries: HashMap<GridCacheKey, CachedGridLayout>,
    /// LRU order (front = most recently used)
    lru: VecDeque<GridCacheKey>,
    config: CacheConfig,
    stats: CacheStats,
}

impl LayoutCache {
    /// Create a new empty cache with default configuration
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a new cache with custom configuration
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            config,
            stats: CacheStats::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Update the configuration, evicting down to the new limit
    pub fn set_config(&mut self, config: CacheConfig) {
        self.config = config;
        if !self.config.enabled {
            self.entries.clear();
            self.lru.clear();
        }
        self.enforce_limit();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Look up a cached layout
    pub fn get(
        &mut self,
        menu: &LayoutMenuData,
        preset: &LayoutPreset,
        context: OutputContext,
    ) -> Option<&GridLayout> {
        if !self.config.enabled {
            return None;
        }

        let key = GridCacheKey::new(menu, preset, context);
        let hit = match self.entries.get(&key) {
            Some(cached) if cached.matches(menu, preset) => true,
            Some(_) => {
                self.stats.collisions += 1;
                false
            }
            None => false,
        };

        if hit {
            self.stats.hits += 1;
            self.touch(key);
            tracing::trace!(preset = %preset.id, context = %context, "layout cache hit");
            self.entries.get(&key).map(|c| &c.layout)
        } else {
            self.stats.misses += 1;
            tracing::trace!(preset = %preset.id, context = %context, "layout cache miss");
            None
        }
    }

    /// Store a layout. A colliding entry for different inputs is replaced.
    pub fn insert(
        &mut self,
        menu: &LayoutMenuData,
        preset: &LayoutPreset,
        context: OutputContext,
        layout: GridLayout,
    ) {
        if !self.config.enabled {
            return;
        }

        let key = GridCacheKey::new(menu, preset, context);
        let cached = CachedGridLayout {
            menu: menu.clone(),
            preset: preset.clone(),
            layout,
        };

        if self.entries.insert(key, cached).is_some() {
            self.touch(key);
        } else {
            self.lru.push_front(key);
        }

        self.enforce_limit();
    }

    /// Return the cached layout, generating and storing it on a miss
    pub fn get_or_generate(
        &mut self,
        menu: &LayoutMenuData,
        preset: &LayoutPreset,
        context: OutputContext,
    ) -> Result<GridLayout> {
        if let Some(layout) = self.get(menu, preset, context) {
            return Ok(layout.clone());
        }

        let layout = generate_grid_layout(menu, preset, context)?;
        self.insert(menu, preset, context, layout.clone());
        Ok(layout)
    }

    /// Drop every entry generated with the given preset id
    pub fn invalidate_preset(&mut self, preset_id: &str) -> usize {
        let stale: Vec<GridCacheKey> = self
            .entries
            .iter()
            .filter(|(_, cached)| cached.preset.id == preset_id)
            .map(|(key, _)| *key)
            .collect();

        for key in &stale {
            self.entries.remove(key);
            self.lru.retain(|k| k != key);
            self.stats.invalidations += 1;
        }
        stale.len()
    }

    /// Drop all cached layouts
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.full_clears += 1;
    }

    /// Move a key to the front of the LRU queue
    fn touch(&mut self, key: GridCacheKey) {
        self.lru.retain(|k| *k != key);
        self.lru.push_front(key);
    }

    /// Enforce the size limit using LRU eviction
    fn enforce_limit(&mut self) {
        while self.entries.len() > self.config.max_entries {
            if let Some(key) = self.lru.pop_back() {
                if self.entries.remove(&key).is_some() {
                    self.stats.evictions += 1;
                }
            } else {
                break;
            }
        }
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

// === Hashing Utilities ===

/// Compute a content hash for menu data
pub fn hash_menu_data(menu: &LayoutMenuData) -> u64 {
    let mut hasher = DefaultHasher::new();

    menu.metadata.title.hash(&mut hasher);
    menu.metadata.currency.hash(&mut hasher);
    menu.sections.len().hash(&mut hasher);
    for section in &menu.sections {
        section.name.hash(&mut hasher);
        section.items.len().hash(&mut hasher);
        for item in &section.items {
            item.name.hash(&mut hasher);
            item.price.to_bits().hash(&mut hasher);
            item.description.hash(&mut hasher);
            item.image_ref.hash(&mut hasher);
            item.featured.hash(&mut hasher);
        }
    }

    hasher.finish()
}

/// Compute a hash for the parts of a preset that affect packing
pub fn hash_preset(preset: &LayoutPreset) -> u64 {
    let mut hasher = DefaultHasher::new();
    preset.id.hash(&mut hasher);
    preset.grid_config.hash(&mut hasher);
    hasher.finish()
}
