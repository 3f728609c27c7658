//! Menu characteristics used to score presets

use crate::LayoutMenuData;
use serde::{Deserialize, Serialize};

/// Numeric summary of a menu, recomputed on every call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCharacteristics {
    pub section_count: usize,
    pub total_items: usize,
    pub avg_items_per_section: f64,
    /// Mean item name length in characters
    pub avg_name_length: f64,
    /// Percentage (0-100) of items with an image
    pub image_ratio: f64,
    pub has_descriptions: bool,
}

impl MenuCharacteristics {
    /// True when the menu has no items at all
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

/// Reduce a menu to its characteristics.
///
/// Every ratio is defined as 0 when its denominator is 0, so an empty menu
/// yields an all-zero summary.
pub fn analyze(menu: &LayoutMenuData) -> MenuCharacteristics {
    let section_count = menu.sections.len();

    let mut total_items = 0usize;
    let mut name_chars = 0usize;
    let mut with_images = 0usize;
    let mut has_descriptions = false;

    for item in menu.items() {
        total_items += 1;
        name_chars += item.name_length();
        if item.has_image() {
            with_images += 1;
        }
        has_descriptions |= item.has_description();
    }

    let avg_items_per_section = ratio(total_items, section_count);
    let avg_name_length = ratio(name_chars, total_items);
    let image_ratio = 100.0 * ratio(with_images, total_items);

    MenuCharacteristics {
        section_count,
        total_items,
        avg_items_per_section,
        avg_name_length,
        image_ratio,
        has_descriptions,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
