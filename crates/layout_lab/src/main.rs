//! Layout Lab - preview menu layouts from the command line
//!
//! Reads a menu JSON file, runs the layout pipeline for an output context,
//! and prints the resulting grid as JSON or as a text diagram.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use menu_layout::{
    analyze, explain_preset_selection, render_grid_diagram, should_recommend_manual_selection,
    validate_preset_selection, EngineConfig, LayoutEngine, LayoutMenuData, OutputContext,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Layout Lab - preview menu grid layouts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a menu JSON file
    #[arg(value_name = "MENU", required_unless_present = "list_presets")]
    menu_path: Option<PathBuf>,

    /// Output context: mobile, tablet, desktop, print
    #[arg(short, long, default_value = "desktop")]
    context: OutputContext,

    /// Use this preset instead of automatic selection
    #[arg(short, long, value_name = "ID")]
    preset: Option<String>,

    /// Engine configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Skip filler tile insertion
    #[arg(long)]
    no_fillers: bool,

    /// List the preset catalog and exit
    #[arg(long)]
    list_presets: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Diagram,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if cli.no_fillers {
        config = config.without_fillers();
    }
    let engine = LayoutEngine::with_config(config);

    if cli.list_presets {
        for preset in engine.catalog().iter() {
            println!(
                "{:<14} {:<14} {}",
                preset.id,
                preset.family.as_str(),
                preset.description
            );
        }
        return Ok(());
    }

    let menu_path = cli.menu_path.as_deref().context("no menu file given")?;
    let menu = load_menu(menu_path)?;
    tracing::info!(
        title = %menu.metadata.title,
        sections = menu.sections.len(),
        context = %cli.context,
        "laying out menu"
    );

    match &cli.preset {
        Some(preset_id) => {
            let layout = engine
                .generate(&menu, preset_id, cli.context)
                .with_context(|| format!("failed to lay out with preset '{preset_id}'"))?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&layout)?),
                Format::Diagram => {
                    let characteristics = analyze(&menu);
                    print!("{}", render_grid_diagram(&layout));
                    println!();
                    println!("{}", explain_preset_selection(&layout.preset, &characteristics));
                    print_warnings(&validate_preset_selection(&layout.preset, &characteristics));
                    if should_recommend_manual_selection(&characteristics) {
                        println!("note: this menu is a candidate for manual preset review");
                    }
                }
            }
        }
        None => {
            let result = engine
                .layout_menu(&menu, cli.context)
                .context("failed to lay out menu")?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                Format::Diagram => {
                    print!("{}", render_grid_diagram(&result.layout));
                    println!();
                    println!("{}", result.explanation);
                    print_warnings(&result.warnings);
                    if result.manual_selection_recommended {
                        println!("note: this menu is a candidate for manual preset review");
                    }
                }
            }
        }
    }

    Ok(())
}

fn load_menu(path: &Path) -> Result<LayoutMenuData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read menu file {}", path.display()))?;
    LayoutMenuData::from_json(&content)
        .with_context(|| format!("failed to parse menu file {}", path.display()))
}

/// Read an engine config; a file that does not parse falls back to defaults.
fn load_config(path: &Path) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    Ok(parse_config(&content))
}

fn parse_config(content: &str) -> EngineConfig {
    match EngineConfig::from_json(content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to parse config file, using defaults: {}", e);
            EngineConfig::default()
        }
    }
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("warning: {warning}");
    }
}
