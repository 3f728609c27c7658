//! Error types for the menu layout engine

use crate::OutputContext;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Unknown layout preset: {0}")]
    UnknownPreset(String),

    #[error("Preset '{preset}' has no column count for context '{context}'")]
    MissingColumnCount {
        preset: String,
        context: OutputContext,
    },

    #[error("Preset '{preset}' declares zero columns for context '{context}'")]
    ZeroColumns {
        preset: String,
        context: OutputContext,
    },

    #[error("Invalid preset catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid menu data: {0}")]
    InvalidMenuData(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
