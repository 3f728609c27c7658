//! Filler Tile Inserter
//!
//! Pads the ragged last row of each section with decorative filler tiles so
//! every row renders full width. Insertion and removal return new layouts;
//! the input is never modified.

use crate::{calculate_empty_cells, has_incomplete_last_row, GridLayout, Tile};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Visual treatment of a filler tile. Carries no layout meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillerStyle {
    Pattern,
    Icon,
    Gradient,
    Texture,
}

impl FillerStyle {
    /// Default rotation order
    pub const ROTATION: [FillerStyle; 4] = [
        FillerStyle::Pattern,
        FillerStyle::Icon,
        FillerStyle::Gradient,
        FillerStyle::Texture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FillerStyle::Pattern => "pattern",
            FillerStyle::Icon => "icon",
            FillerStyle::Gradient => "gradient",
            FillerStyle::Texture => "texture",
        }
    }
}

/// Summary of the fillers in a layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillerStatistics {
    pub total_fillers: usize,
    pub fillers_by_style: BTreeMap<FillerStyle, usize>,
    pub sections_with_fillers: usize,
    /// Percentage (0-100) of all tiles that are fillers
    pub filler_ratio: f64,
}

/// Insert fillers using the default style rotation
pub fn insert_filler_tiles(layout: &GridLayout) -> GridLayout {
    insert_filler_tiles_with(layout, &FillerStyle::ROTATION)
}

/// Insert fillers, picking styles from `styles` by section and column.
///
/// Columns already holding a tile in the last row are skipped, so running
/// this on a layout that already has its fillers changes nothing.
pub fn insert_filler_tiles_with(layout: &GridLayout, styles: &[FillerStyle]) -> GridLayout {
    let styles = if styles.is_empty() {
        &FillerStyle::ROTATION[..]
    } else {
        styles
    };

    let mut filled = layout.clone();
    let columns = layout.columns();
    if columns == 0 {
        return filled;
    }

    for (section_index, section) in filled.sections.iter_mut().enumerate() {
        if !has_incomplete_last_row(section.item_count(), columns) {
            continue;
        }
        let Some(last_row) = section.last_item_row() else {
            continue;
        };

        let taken: HashSet<usize> = section
            .tiles
            .iter()
            .filter(|t| t.row == last_row)
            .map(|t| t.column)
            .collect();

        for column in (0..columns).filter(|c| !taken.contains(c)) {
            let style = styles[(section_index + column) % styles.len()];
            section.tiles.push(Tile::filler(last_row, column, style));
        }
    }

    filled.recount();

    tracing::debug!(
        preset = %filled.preset.id,
        added = filled.total_tiles.saturating_sub(layout.total_tiles),
        total = filled.total_tiles,
        "filler tiles inserted"
    );

    filled
}

/// Strip every filler, restoring the item-only layout
pub fn remove_filler_tiles(layout: &GridLayout) -> GridLayout {
    let mut stripped = layout.clone();
    for section in &mut stripped.sections {
        section.tiles.retain(|t| t.is_item());
    }
    stripped.recount();
    stripped
}

pub fn get_filler_tiles(layout: &GridLayout) -> Vec<&Tile> {
    layout.tiles().filter(|t| t.is_filler()).collect()
}

pub fn count_filler_tiles(layout: &GridLayout) -> usize {
    layout.tiles().filter(|t| t.is_filler()).count()
}

/// Fillers of one section; empty for unknown section names
pub fn get_filler_tiles_in_section<'a>(
    layout: &'a GridLayout,
    section_name: &str,
) -> Vec<&'a Tile> {
    layout
        .section_by_name(section_name)
        .map(|s| s.filler_tiles().collect())
        .unwrap_or_default()
}

pub fn has_filler_tiles(layout: &GridLayout) -> bool {
    layout.tiles().any(|t| t.is_filler())
}

/// Problems with filler placement. Empty means valid.
pub fn validate_filler_tiles(layout: &GridLayout) -> Vec<String> {
    let mut errors = Vec::new();

    let columns = match layout.preset.columns_for(layout.context) {
        Ok(columns) => columns,
        Err(e) => {
            errors.push(e.to_string());
            return errors;
        }
    };

    // Items first, so a filler listed ahead of the item it covers still collides
    let mut occupied: HashSet<(usize, usize)> = layout
        .tiles()
        .filter(|t| t.is_item())
        .map(|t| (t.row, t.column))
        .collect();

    for section in &layout.sections {
        let last_row = section.last_item_row();

        for tile in section.filler_tiles() {
            if !occupied.insert((tile.row, tile.column)) {
                errors.push(format!(
                    "Filler tile at ({}, {}) in section '{}' overlaps another tile",
                    tile.row, tile.column, section.name
                ));
            }
            if tile.column >= columns {
                errors.push(format!(
                    "Filler tile at ({}, {}) in section '{}' is outside the {}-column grid",
                    tile.row, tile.column, section.name, columns
                ));
            }
            match last_row {
                None => errors.push(format!(
                    "Filler tile at ({}, {}) in section '{}' which has no items",
                    tile.row, tile.column, section.name
                )),
                Some(last) if tile.row != last => errors.push(format!(
                    "Filler tile at ({}, {}) in section '{}' is not in the last row ({})",
                    tile.row, tile.column, section.name, last
                )),
                Some(_) => {}
            }
        }

        let item_count = section.item_count();
        if let Some(last) = last_row {
            if has_incomplete_last_row(item_count, columns) {
                let expected = calculate_empty_cells(item_count, columns);
                let found = section
                    .filler_tiles()
                    .filter(|t| t.row == last && t.column < columns)
                    .count();
                if found != expected {
                    errors.push(format!(
                        "Section '{}' needs {} filler tiles in row {} but has {}",
                        section.name, expected, last, found
                    ));
                }
            }
        }
    }

    errors
}

pub fn are_filler_tiles_valid(layout: &GridLayout) -> bool {
    validate_filler_tiles(layout).is_empty()
}

pub fn calculate_filler_statistics(layout: &GridLayout) -> FillerStatistics {
    let mut fillers_by_style = BTreeMap::new();
    let mut total_fillers = 0;

    for style in layout.tiles().filter_map(Tile::filler_style) {
        *fillers_by_style.entry(style).or_insert(0) += 1;
        total_fillers += 1;
    }

    let sections_with_fillers = layout
        .sections
        .iter()
        .filter(|s| s.filler_tiles().next().is_some())
        .count();

    let total_tiles = layout.tiles().count();
    let filler_ratio = if total_tiles == 0 {
        0.0
    } else {
        100.0 * total_fillers as f64 / total_tiles as f64
    };

    FillerStatistics {
        total_fillers,
        fillers_by_style,
        sections_with_fillers,
        filler_ratio,
    }
}
