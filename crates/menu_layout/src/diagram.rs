//! Plain-text grid diagrams for debugging and the layout lab

use crate::{GridLayout, TileContent};
use std::collections::BTreeSet;
use std::fmt::Write;

const EMPTY_CELL: &str = "[  ]";
const FILLER_CELL: &str = "[~~]";

/// Draw a layout as text, one line per row.
///
/// Item cells show the item's 1-based number within its section, filler
/// cells `[~~]`, empty cells `[  ]`. Each section is introduced by a header
/// line and lists only the rows where its tiles start.
pub fn render_grid_diagram(layout: &GridLayout) -> String {
    let columns = layout.columns();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} ({}, {} columns, {} tiles)",
        layout.preset.id, layout.context, columns, layout.total_tiles
    );

    for section in &layout.sections {
        let _ = writeln!(out, "-- {}", section.name);
        let rows: BTreeSet<usize> = section.tiles.iter().map(|t| t.row).collect();
        for row in rows {
            let _ = write!(out, "{row:>4} |");
            for column in 0..columns {
                let tile = section
                    .tiles
                    .iter()
                    .find(|t| t.row == row && t.column == column);
                match tile.map(|t| t.content) {
                    Some(TileContent::Item { item_index, .. }) => {
                        let _ = write!(out, "[{:>2}]", item_index + 1);
                    }
                    Some(TileContent::Filler { .. }) => out.push_str(FILLER_CELL),
                    None => out.push_str(EMPTY_CELL),
                }
            }
            out.push('\n');
        }
    }

    out
}
