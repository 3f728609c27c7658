//! Menu content consumed by the layout engine
//!
//! These types are the plain input handed over by API handlers after they
//! have parsed a restaurant's menu. The engine never mutates them; tiles
//! refer back to items by `(section_index, item_index)`.

use crate::{LayoutError, Result};
use serde::{Deserialize, Serialize};

/// A single dish or drink on the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Display name
    pub name: String,
    /// Price in the menu's currency (opaque to the engine)
    pub price: f64,
    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional reference to the item's image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// Whether the item is highlighted by the restaurant
    #[serde(default)]
    pub featured: bool,
}

impl MenuItem {
    /// Create a plain item with no description or image
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            description: None,
            image_ref: None,
            featured: false,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an image reference
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Mark the item as featured
    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    /// True if the item carries a non-empty image reference
    pub fn has_image(&self) -> bool {
        self.image_ref
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
    }

    /// True if the item carries a non-empty description
    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }

    /// Length of the name in characters (not bytes)
    pub fn name_length(&self) -> usize {
        self.name.chars().count()
    }
}

/// An ordered group of items such as "Starters" or "Mains"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl MenuSection {
    pub fn new(name: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Menu-level metadata carried through untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuMetadata {
    #[serde(default)]
    pub title: String,
    /// ISO currency code; the engine does not interpret it
    #[serde(default)]
    pub currency: String,
}

/// The complete input to the analyzer and the packing engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMenuData {
    #[serde(default)]
    pub metadata: MenuMetadata,
    #[serde(default)]
    pub sections: Vec<MenuSection>,
}

impl LayoutMenuData {
    /// Create menu data from a title, currency and sections
    pub fn new(
        title: impl Into<String>,
        currency: impl Into<String>,
        sections: Vec<MenuSection>,
    ) -> Self {
        Self {
            metadata: MenuMetadata {
                title: title.into(),
                currency: currency.into(),
            },
            sections,
        }
    }

    /// An empty menu with no sections
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse menu data from JSON and check it is usable for layout
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json)?;
        data.check()?;
        Ok(data)
    }

    /// Reject data that cannot be hashed or compared reliably
    pub fn check(&self) -> Result<()> {
        for section in &self.sections {
            for item in &section.items {
                if !item.price.is_finite() {
                    return Err(LayoutError::InvalidMenuData(format!(
                        "item '{}' in section '{}' has a non-finite price",
                        item.name, section.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total number of items across all sections
    pub fn total_items(&self) -> usize {
        self.sections.iter().map(MenuSection::item_count).sum()
    }

    /// Iterate over every item in placement order
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    /// Look up an item by section and item index
    pub fn item(&self, section_index: usize, item_index: usize) -> Option<&MenuItem> {
        self.sections
            .get(section_index)
            .and_then(|s| s.items.get(item_index))
    }
}
