//! Property tests for grid packing, filler insertion, and preset selection

use menu_layout::{
    analyze, calculate_empty_cells, count_filler_tiles, generate_grid_layout,
    get_last_tile_position, insert_filler_tiles, rank_presets, remove_filler_tiles,
    score_preset, select_layout_preset, validate_filler_tiles, LayoutMenuData, MenuItem,
    MenuSection, OutputContext, PresetCatalog,
};
use proptest::prelude::*;
use proptest::test_runner::Config;
use std::collections::HashSet;

fn item_strategy() -> impl Strategy<Value = MenuItem> {
    (
        "[A-Za-z ]{1,40}",
        0.0f64..500.0,
        proptest::option::of("[a-z ]{0,30}"),
        proptest::option::of("[a-z]{1,12}\\.jpg"),
        any::<bool>(),
    )
        .prop_map(|(name, price, description, image_ref, featured)| MenuItem {
            name,
            price,
            description,
            image_ref,
            featured,
        })
}

fn menu_strategy() -> impl Strategy<Value = LayoutMenuData> {
    proptest::collection::vec(
        ("[A-Z][a-z]{2,10}", proptest::collection::vec(item_strategy(), 0..14)),
        0..6,
    )
    .prop_map(|sections| {
        let sections = sections
            .into_iter()
            .map(|(name, items)| MenuSection::new(name, items))
            .collect();
        LayoutMenuData::new("Generated", "USD", sections)
    })
}

fn context_strategy() -> impl Strategy<Value = OutputContext> {
    prop::sample::select(OutputContext::ALL.to_vec())
}

fn preset_index_strategy() -> impl Strategy<Value = usize> {
    0usize..PresetCatalog::standard().len()
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn generation_is_deterministic(
        menu in menu_strategy(),
        context in context_strategy(),
        preset_index in preset_index_strategy(),
    ) {
        let catalog = PresetCatalog::standard();
        let preset = catalog.iter().nth(preset_index).unwrap();
        let first = generate_grid_layout(&menu, preset, context).unwrap();
        let second = generate_grid_layout(&menu, preset, context).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn tiles_never_overlap_and_stay_in_bounds(
        menu in menu_strategy(),
        context in context_strategy(),
        preset_index in preset_index_strategy(),
    ) {
        let catalog = PresetCatalog::standard();
        let preset = catalog.iter().nth(preset_index).unwrap();
        let columns = preset.columns_for(context).unwrap();

        for layout in [
            generate_grid_layout(&menu, preset, context).unwrap(),
            insert_filler_tiles(&generate_grid_layout(&menu, preset, context).unwrap()),
        ] {
            let mut seen = HashSet::new();
            for tile in layout.tiles() {
                prop_assert!(tile.column < columns);
                prop_assert!(seen.insert((tile.row, tile.column)));
            }
            prop_assert!(layout.validate().is_empty());
        }
    }

    #[test]
    fn sections_follow_packing_rules(
        menu in menu_strategy(),
        context in context_strategy(),
    ) {
        let catalog = PresetCatalog::standard();
        let preset = catalog.fallback();
        let columns = preset.columns_for(context).unwrap();
        let layout = generate_grid_layout(&menu, preset, context).unwrap();

        prop_assert_eq!(layout.total_tiles, menu.total_items());

        let mut previous_last_row: Option<usize> = None;
        for (section, source) in layout.sections.iter().zip(&menu.sections) {
            prop_assert_eq!(section.tiles.len(), source.items.len());
            if section.tiles.is_empty() {
                continue;
            }
            if let Some(prev) = previous_last_row {
                prop_assert!(section.start_row > prev);
            }
            for (i, tile) in section.tiles.iter().enumerate() {
                prop_assert_eq!(tile.row, section.start_row + i / columns);
                prop_assert_eq!(tile.column, i % columns);
            }
            let last =
                get_last_tile_position(section.tiles.len(), columns, section.start_row).unwrap();
            let tail = section.tiles.last().unwrap();
            prop_assert_eq!((tail.row, tail.column), (last.row, last.column));
            previous_last_row = Some(section.row_range().end);
        }
    }

    #[test]
    fn fillers_complete_every_last_row(
        menu in menu_strategy(),
        context in context_strategy(),
        preset_index in preset_index_strategy(),
    ) {
        let catalog = PresetCatalog::standard();
        let preset = catalog.iter().nth(preset_index).unwrap();
        let columns = preset.columns_for(context).unwrap();
        let layout = generate_grid_layout(&menu, preset, context).unwrap();
        let filled = insert_filler_tiles(&layout);

        let expected: usize = layout
            .sections
            .iter()
            .map(|s| calculate_empty_cells(s.tiles.len(), columns))
            .sum();
        prop_assert_eq!(count_filler_tiles(&filled), expected);
        prop_assert_eq!(filled.total_tiles, layout.total_tiles + expected);
        prop_assert!(validate_filler_tiles(&filled).is_empty());

        for section in &filled.sections {
            if let Some(last) = section.last_item_row() {
                let in_last_row = section.tiles.iter().filter(|t| t.row == last).count();
                prop_assert_eq!(in_last_row, columns);
            }
        }
    }

    #[test]
    fn remove_undoes_insert(
        menu in menu_strategy(),
        context in context_strategy(),
        preset_index in preset_index_strategy(),
    ) {
        let catalog = PresetCatalog::standard();
        let preset = catalog.iter().nth(preset_index).unwrap();
        let layout = generate_grid_layout(&menu, preset, context).unwrap();
        let restored = remove_filler_tiles(&insert_filler_tiles(&layout));
        prop_assert_eq!(restored.total_tiles, layout.total_tiles);
        prop_assert_eq!(restored, layout);
    }

    #[test]
    fn scoring_is_bounded_and_deterministic(menu in menu_strategy()) {
        let catalog = PresetCatalog::standard();
        let characteristics = analyze(&menu);
        let again = analyze(&menu);
        prop_assert_eq!(&characteristics, &again);

        for preset in catalog.iter() {
            let score = score_preset(preset, &characteristics);
            prop_assert!((0.0..=100.0).contains(&score));
            prop_assert_eq!(score.to_bits(), score_preset(preset, &characteristics).to_bits());
        }

        let ranked = rank_presets(&catalog, &characteristics);
        prop_assert_eq!(ranked.len(), catalog.len());
        prop_assert_eq!(
            ranked[0].preset.id.as_str(),
            select_layout_preset(&catalog, &characteristics, OutputContext::Desktop).id.as_str()
        );
    }

    #[test]
    fn characteristics_stay_in_range(menu in menu_strategy()) {
        let c = analyze(&menu);
        prop_assert!((0.0..=100.0).contains(&c.image_ratio));
        prop_assert_eq!(c.total_items, menu.total_items());
        prop_assert_eq!(c.section_count, menu.sections.len());
        if c.total_items == 0 {
            prop_assert_eq!(c.avg_name_length, 0.0);
        }
    }
}
