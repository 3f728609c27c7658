//! Menu Layout Engine - preset selection, grid packing, and filler tiles
//!
//! This crate turns restaurant menu content into tile placements for a
//! render backend. It never renders anything itself.
//!
//! ```text
//! LayoutMenuData -> analyze -> MenuCharacteristics
//!                -> select_layout_preset_with_context (PresetCatalog)
//!                -> generate_grid_layout -> insert_filler_tiles -> GridLayout
//! ```

mod cache;
mod characteristics;
mod config;
mod diagram;
mod engine;
mod error;
mod filler;
mod grid;
mod menu;
pub mod presets;
mod selector;

pub use cache::*;
pub use characteristics::*;
pub use config::*;
pub use diagram::*;
pub use engine::*;
pub use error::*;
pub use filler::*;
pub use grid::*;
pub use menu::*;
pub use presets::{GridConfig, LayoutPreset, OutputContext, PresetCatalog, PresetFamily};
pub use selector::*;
