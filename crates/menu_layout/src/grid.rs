//! Grid Packing Engine
//!
//! Packs menu items into a fixed-column grid. Sections are laid out in menu
//! order, each starting at column 0 of the row after the previous section's
//! last row, and items flow left to right, wrapping every `columns` items.
//!
//! Generation is a pure function of `(menu, preset, context)`; memoization
//! lives in [`crate::LayoutCache`] and never inside this module.

use crate::{FillerStyle, LayoutMenuData, LayoutPreset, MenuItem, OutputContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

// =============================================================================
// Tiles
// =============================================================================

/// Number of grid cells a tile covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSpan {
    pub columns: usize,
    pub rows: usize,
}

impl Default for TileSpan {
    fn default() -> Self {
        Self {
            columns: 1,
            rows: 1,
        }
    }
}

/// What a tile shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TileContent {
    /// A menu item, referenced by its position in the menu data
    #[serde(rename_all = "camelCase")]
    Item {
        section_index: usize,
        item_index: usize,
    },
    /// Decorative placeholder completing a row
    Filler { style: FillerStyle },
}

/// One placed grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub row: usize,
    /// Zero-based column, always below the context's column count
    pub column: usize,
    #[serde(default)]
    pub span: TileSpan,
    #[serde(flatten)]
    pub content: TileContent,
}

impl Tile {
    /// An item tile with the default 1x1 span
    pub fn item(row: usize, column: usize, section_index: usize, item_index: usize) -> Self {
        Self {
            row,
            column,
            span: TileSpan::default(),
            content: TileContent::Item {
                section_index,
                item_index,
            },
        }
    }

    /// A filler tile with the default 1x1 span
    pub fn filler(row: usize, column: usize, style: FillerStyle) -> Self {
        Self {
            row,
            column,
            span: TileSpan::default(),
            content: TileContent::Filler { style },
        }
    }

    pub fn is_item(&self) -> bool {
        matches!(self.content, TileContent::Item { .. })
    }

    pub fn is_filler(&self) -> bool {
        matches!(self.content, TileContent::Filler { .. })
    }

    pub fn filler_style(&self) -> Option<FillerStyle> {
        match self.content {
            TileContent::Filler { style } => Some(style),
            TileContent::Item { .. } => None,
        }
    }

    pub fn position(&self) -> TilePosition {
        TilePosition {
            row: self.row,
            column: self.column,
        }
    }

    /// Exclusive `(row, column)` corner past the cells this tile covers.
    ///
    /// `None` when the span runs past `usize`, which only happens for tiles
    /// read from malformed input.
    pub fn end(&self) -> Option<(usize, usize)> {
        let row = self.row.checked_add(self.span.rows.max(1))?;
        let column = self.column.checked_add(self.span.columns.max(1))?;
        Some((row, column))
    }
}

/// A `(row, column)` grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilePosition {
    pub row: usize,
    pub column: usize,
}

// =============================================================================
// Sections and Layout
// =============================================================================

/// Inclusive row range owned by a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

/// The tiles of one menu section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSection {
    pub name: String,
    /// First row owned by this section
    pub start_row: usize,
    pub tiles: Vec<Tile>,
}

impl GridSection {
    pub fn item_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_item())
    }

    pub fn filler_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_filler())
    }

    pub fn item_count(&self) -> usize {
        self.item_tiles().count()
    }

    /// Rows spanned by the section's tiles.
    ///
    /// A section without tiles owns no rows; its range collapses to
    /// `start_row..=start_row` and [`GridSection::row_count`] reports 0.
    pub fn row_range(&self) -> RowRange {
        let end = self
            .tiles
            .iter()
            .map(|t| t.row.saturating_add(t.span.rows.max(1) - 1))
            .max()
            .unwrap_or(self.start_row);
        RowRange {
            start: self.start_row,
            end: end.max(self.start_row),
        }
    }

    pub fn row_count(&self) -> usize {
        if self.tiles.is_empty() {
            0
        } else {
            let range = self.row_range();
            (range.end - range.start).saturating_add(1)
        }
    }

    /// Last row holding an item, if any
    pub fn last_item_row(&self) -> Option<usize> {
        self.item_tiles().map(|t| t.row).max()
    }
}

/// Grid size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDimensions {
    pub columns: usize,
    pub rows: usize,
}

/// Summary numbers for a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStatistics {
    pub total_sections: usize,
    pub total_tiles: usize,
    pub total_rows: usize,
    pub total_columns: usize,
    pub average_tiles_per_section: f64,
    /// Percentage (0-100) of grid cells holding a tile
    pub grid_utilization: f64,
}

/// A packed menu grid ready for a render backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub preset: LayoutPreset,
    pub context: OutputContext,
    pub sections: Vec<GridSection>,
    /// Tiles across all sections, fillers included
    pub total_tiles: usize,
}

impl GridLayout {
    /// Column count for the layout's context, 0 if the preset lacks one
    pub fn columns(&self) -> usize {
        self.preset.grid_config.get(self.context).unwrap_or(0)
    }

    /// Every tile in section order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.sections.iter().flat_map(|s| s.tiles.iter())
    }

    pub fn tiles_at_row(&self, row: usize) -> Vec<&Tile> {
        self.tiles().filter(|t| t.row == row).collect()
    }

    pub fn tiles_at_column(&self, column: usize) -> Vec<&Tile> {
        self.tiles().filter(|t| t.column == column).collect()
    }

    pub fn tile_at(&self, row: usize, column: usize) -> Option<&Tile> {
        self.tiles().find(|t| t.row == row && t.column == column)
    }

    pub fn is_position_occupied(&self, row: usize, column: usize) -> bool {
        self.tile_at(row, column).is_some()
    }

    pub fn section_by_name(&self, name: &str) -> Option<&GridSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Resolve an item tile to the menu item it was generated from
    pub fn resolve_item<'a>(&self, menu: &'a LayoutMenuData, tile: &Tile) -> Option<&'a MenuItem> {
        match tile.content {
            TileContent::Item {
                section_index,
                item_index,
            } => menu.item(section_index, item_index),
            TileContent::Filler { .. } => None,
        }
    }

    /// Columns of the context and rows up to the highest occupied one
    pub fn dimensions(&self) -> GridDimensions {
        let rows = self
            .tiles()
            .map(|t| t.row.saturating_add(t.span.rows.max(1)))
            .max()
            .unwrap_or(0);
        GridDimensions {
            columns: self.columns(),
            rows,
        }
    }

    /// Structural problems in the layout. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let columns = match self.preset.columns_for(self.context) {
            Ok(columns) => columns,
            Err(e) => {
                errors.push(e.to_string());
                return errors;
            }
        };

        // Any overlap between two tiles begins on one of their start rows,
        // so only those rows are walked, whatever the spans claim.
        let start_rows: BTreeSet<usize> = self.tiles().map(|t| t.row).collect();

        let mut occupied: HashSet<(usize, usize)> = HashSet::new();
        for section in &self.sections {
            for tile in &section.tiles {
                if tile.row < section.start_row {
                    errors.push(format!(
                        "Tile at ({}, {}) sits above the start row {} of section '{}'",
                        tile.row, tile.column, section.start_row, section.name
                    ));
                }
                let Some((row_end, column_end)) = tile.end() else {
                    errors.push(format!(
                        "Tile at ({}, {}) in section '{}' spans past the end of the grid",
                        tile.row, tile.column, section.name
                    ));
                    continue;
                };
                if column_end > columns {
                    errors.push(format!(
                        "Tile at ({}, {}) in section '{}' is outside the {}-column grid",
                        tile.row, tile.column, section.name, columns
                    ));
                    continue;
                }
                for &row in start_rows.range(tile.row..row_end) {
                    for column in tile.column..column_end {
                        if !occupied.insert((row, column)) {
                            errors.push(format!(
                                "Position ({row}, {column}) is occupied by more than one tile"
                            ));
                        }
                    }
                }
            }
        }

        let counted = self.tiles().count();
        if counted != self.total_tiles {
            errors.push(format!(
                "totalTiles is {} but the layout holds {} tiles",
                self.total_tiles, counted
            ));
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn statistics(&self) -> LayoutStatistics {
        let dims = self.dimensions();
        let total_sections = self.sections.len();
        let cells = dims.rows.saturating_mul(dims.columns);

        let average_tiles_per_section = if total_sections == 0 {
            0.0
        } else {
            self.total_tiles as f64 / total_sections as f64
        };
        let grid_utilization = if cells == 0 {
            0.0
        } else {
            (100.0 * self.total_tiles as f64 / cells as f64).clamp(0.0, 100.0)
        };

        LayoutStatistics {
            total_sections,
            total_tiles: self.total_tiles,
            total_rows: dims.rows,
            total_columns: dims.columns,
            average_tiles_per_section,
            grid_utilization,
        }
    }

    /// Recount `total_tiles` after sections were edited
    pub(crate) fn recount(&mut self) {
        self.total_tiles = self.sections.iter().map(|s| s.tiles.len()).sum();
    }
}

// =============================================================================
// Row Arithmetic
// =============================================================================
//
// A zero column count is treated as "no grid": no rows, no empty cells.

/// Rows needed for `item_count` items, `ceil(item_count / columns)`
pub fn calculate_rows_needed(item_count: usize, columns: usize) -> usize {
    if columns == 0 {
        0
    } else {
        item_count.div_ceil(columns)
    }
}

/// Unoccupied cells in the last row
pub fn calculate_empty_cells(item_count: usize, columns: usize) -> usize {
    if columns == 0 {
        0
    } else {
        (columns - item_count % columns) % columns
    }
}

/// True when the last row has fewer than `columns` items
pub fn has_incomplete_last_row(item_count: usize, columns: usize) -> bool {
    columns > 0 && item_count > 0 && item_count % columns != 0
}

/// Position of the final item of a run starting at `start_row`
pub fn get_last_tile_position(
    item_count: usize,
    columns: usize,
    start_row: usize,
) -> Option<TilePosition> {
    if item_count == 0 || columns == 0 {
        return None;
    }
    let last = item_count - 1;
    Some(TilePosition {
        row: start_row + last / columns,
        column: last % columns,
    })
}

// =============================================================================
// Generation
// =============================================================================

/// Pack a menu into a grid for one preset and context.
///
/// Fails only when the preset has no usable column count for the context.
pub fn generate_grid_layout(
    menu: &LayoutMenuData,
    preset: &LayoutPreset,
    context: OutputContext,
) -> Result<GridLayout> {
    let columns = preset.columns_for(context)?;

    let mut sections = Vec::with_capacity(menu.sections.len());
    let mut next_row = 0usize;

    for (section_index, section) in menu.sections.iter().enumerate() {
        let start_row = next_row;
        let tiles: Vec<Tile> = (0..section.items.len())
            .map(|item_index| {
                Tile::item(
                    start_row + item_index / columns,
                    item_index % columns,
                    section_index,
                    item_index,
                )
            })
            .collect();

        next_row = start_row + calculate_rows_needed(tiles.len(), columns);
        sections.push(GridSection {
            name: section.name.clone(),
            start_row,
            tiles,
        });
    }

    let mut layout = GridLayout {
        preset: preset.clone(),
        context,
        sections,
        total_tiles: 0,
    };
    layout.recount();

    tracing::debug!(
        preset = %preset.id,
        context = %context,
        columns,
        sections = layout.sections.len(),
        tiles = layout.total_tiles,
        rows = next_row,
        "grid layout generated"
    );

    Ok(layout)
}
