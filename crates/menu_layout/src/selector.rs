//! Layout Selection Engine
//!
//! Scores every preset in a catalog against a menu's characteristics and
//! picks the best one. Scoring works on the preset's family, so a custom
//! catalog with several presets of one family ranks them by registration
//! order.
//!
//! The thresholds below are hand-tuned policy. Each one is compared with a
//! strict `<` or `>` (feature-band's image floor being the one inclusive
//! bound), and boundary values are asserted on directly by the tests.

use crate::{LayoutPreset, MenuCharacteristics, OutputContext, PresetCatalog, PresetFamily};
use serde::Serialize;
use std::cmp::Ordering;

// =============================================================================
// Policy Constants
// =============================================================================

/// Image-forward wins when the image ratio is strictly above this
pub const IMAGE_HEAVY_RATIO: f64 = 70.0;
/// Dense catalog wins when the image ratio is strictly below this
pub const LOW_IMAGE_RATIO: f64 = 20.0;
/// "Many items" means strictly more than this
pub const MANY_ITEMS: usize = 50;
/// "Few items" means strictly fewer than this
pub const FEW_ITEMS: usize = 15;
/// Feature bands need at least this image ratio
pub const FEATURE_BAND_MIN_RATIO: f64 = 50.0;
/// Average name length strictly below this counts as short
pub const SHORT_NAME_LENGTH: f64 = 20.0;
/// Average name length strictly above this is too long for dense tiles
pub const LONG_NAME_LENGTH: f64 = 30.0;
/// Feature bands are swapped for balanced on mobile/print from this many items
pub const FEATURE_BAND_DOWNGRADE_ITEMS: usize = 13;
/// Image-forward chosen below this ratio earns a warning
pub const IMAGE_FORWARD_WARN_RATIO: f64 = 50.0;
/// Feature band chosen above this many items earns a warning
pub const FEATURE_BAND_WARN_ITEMS: usize = 20;

/// Menus smaller than this are worth a manual look
pub const MANUAL_SMALL_MENU: usize = 5;
/// Menus larger than this are worth a manual look
pub const MANUAL_LARGE_MENU: usize = 100;
/// Names longer than this on average are worth a manual look
pub const MANUAL_LONG_NAME_LENGTH: f64 = 50.0;
/// Image ratios where two presets compete closely
pub const AMBIGUOUS_RATIO_BANDS: [(f64, f64); 2] = [(20.0, 30.0), (70.0, 80.0)];

/// Score given to every preset when there is nothing to judge
const NEUTRAL_SCORE: f64 = 50.0;

// =============================================================================
// Predicates
// =============================================================================

fn is_image_heavy(c: &MenuCharacteristics) -> bool {
    c.image_ratio > IMAGE_HEAVY_RATIO
}

fn is_low_image(c: &MenuCharacteristics) -> bool {
    c.total_items > 0 && c.image_ratio < LOW_IMAGE_RATIO
}

fn is_many_short(c: &MenuCharacteristics) -> bool {
    c.total_items > MANY_ITEMS && c.avg_name_length < SHORT_NAME_LENGTH
}

fn is_few_items(c: &MenuCharacteristics) -> bool {
    c.total_items > 0 && c.total_items < FEW_ITEMS
}

fn is_feature_candidate(c: &MenuCharacteristics) -> bool {
    is_few_items(c) && c.image_ratio >= FEATURE_BAND_MIN_RATIO
}

fn is_text_only(c: &MenuCharacteristics) -> bool {
    c.total_items > 0 && c.image_ratio == 0.0
}

fn is_mixed_imagery(c: &MenuCharacteristics) -> bool {
    (LOW_IMAGE_RATIO..=IMAGE_HEAVY_RATIO).contains(&c.image_ratio)
}

fn is_mid_sized(c: &MenuCharacteristics) -> bool {
    (FEW_ITEMS..=MANY_ITEMS).contains(&c.total_items)
}

// =============================================================================
// Scoring
// =============================================================================

/// Score a preset against a menu, in `[0, 100]`
pub fn score_preset(preset: &LayoutPreset, c: &MenuCharacteristics) -> f64 {
    if c.is_empty() {
        return NEUTRAL_SCORE;
    }

    let raw = match preset.family {
        PresetFamily::ImageForward => {
            if is_image_heavy(c) {
                80.0 + (c.image_ratio - IMAGE_HEAVY_RATIO) / 3.0
            } else {
                c.image_ratio * 0.6
            }
        }
        PresetFamily::TextOnly => {
            if is_text_only(c) {
                if c.has_descriptions {
                    95.0
                } else {
                    90.0
                }
            } else {
                50.0 - 2.0 * c.image_ratio
            }
        }
        PresetFamily::Dense => match (is_low_image(c), is_many_short(c)) {
            (true, true) => 88.0,
            (true, false) | (false, true) => 78.0,
            (false, false) if c.avg_name_length > LONG_NAME_LENGTH => 25.0,
            (false, false) => 35.0,
        },
        PresetFamily::FeatureBand => {
            if is_feature_candidate(c) {
                92.0
            } else if is_few_items(c) {
                55.0
            } else {
                30.0
            }
        }
        PresetFamily::Balanced => {
            let mut score = 65.0;
            if is_mixed_imagery(c) {
                score += 10.0;
            }
            if is_mid_sized(c) {
                score += 5.0;
            }
            score
        }
    };

    raw.clamp(0.0, 100.0)
}

/// A preset paired with its score
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPreset<'a> {
    pub preset: &'a LayoutPreset,
    pub score: f64,
}

/// Rank every preset in the catalog, best first.
///
/// Ties go to the catalog's balanced fallback, then to registration order.
pub fn rank_presets<'a>(
    catalog: &'a PresetCatalog,
    c: &MenuCharacteristics,
) -> Vec<RankedPreset<'a>> {
    let fallback_id = catalog.fallback().id.as_str();
    let mut ranked: Vec<RankedPreset<'a>> = catalog
        .iter()
        .map(|preset| RankedPreset {
            preset,
            score: score_preset(preset, c),
        })
        .collect();

    // sort_by is stable, so equal entries keep catalog order
    ranked.sort_by(|a, b| {
        b.score.total_cmp(&a.score).then_with(|| {
            match (a.preset.id == fallback_id, b.preset.id == fallback_id) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            }
        })
    });
    ranked
}

// =============================================================================
// Selection
// =============================================================================

/// Pick the top-ranked preset.
///
/// The context is accepted for call-site symmetry but does not influence the
/// result; use [`select_layout_preset_with_context`] for context rules.
pub fn select_layout_preset<'a>(
    catalog: &'a PresetCatalog,
    c: &MenuCharacteristics,
    _context: OutputContext,
) -> &'a LayoutPreset {
    rank_presets(catalog, c)
        .first()
        .map(|r| r.preset)
        .unwrap_or_else(|| catalog.fallback())
}

/// Pick the top-ranked preset, then apply context rules.
///
/// Feature bands do not fit narrow screens or printed pages once the menu is
/// no longer short, so on mobile and print they fall back to balanced.
pub fn select_layout_preset_with_context<'a>(
    catalog: &'a PresetCatalog,
    c: &MenuCharacteristics,
    context: OutputContext,
) -> &'a LayoutPreset {
    let selected = select_layout_preset(catalog, c, context);

    if selected.family == PresetFamily::FeatureBand
        && c.total_items >= FEATURE_BAND_DOWNGRADE_ITEMS
        && context.is_constrained()
    {
        let fallback = catalog.fallback();
        tracing::debug!(
            from = %selected.id,
            to = %fallback.id,
            context = %context,
            total_items = c.total_items,
            "feature band downgraded for context"
        );
        return fallback;
    }

    selected
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Human-readable reason for a preset choice
pub fn explain_preset_selection(preset: &LayoutPreset, c: &MenuCharacteristics) -> String {
    let reason = match preset.family {
        PresetFamily::ImageForward => format!(
            "{:.0}% of items have images, so photos lead the layout",
            c.image_ratio
        ),
        PresetFamily::TextOnly if c.image_ratio > 0.0 => format!(
            "a typographic list was requested, hiding the images on {:.0}% of the {} items",
            c.image_ratio, c.total_items
        ),
        PresetFamily::TextOnly => format!(
            "none of the {} items have images ({:.0}% image ratio)",
            c.total_items, c.image_ratio
        ),
        PresetFamily::Dense => {
            let mut parts = Vec::new();
            if is_low_image(c) {
                parts.push(format!("only {:.0}% of items have images", c.image_ratio));
            }
            if is_many_short(c) {
                parts.push(format!(
                    "{} items with short names (average {:.1} characters)",
                    c.total_items, c.avg_name_length
                ));
            }
            if parts.is_empty() {
                parts.push(format!(
                    "{} items at {:.0}% image ratio fit compact tiles",
                    c.total_items, c.image_ratio
                ));
            }
            parts.join(" and ")
        }
        PresetFamily::FeatureBand => format!(
            "a short menu of {} items with {:.0}% image coverage suits wide feature bands",
            c.total_items, c.image_ratio
        ),
        PresetFamily::Balanced => {
            if c.is_empty() {
                "the menu has no items yet, so the general purpose grid is used".to_string()
            } else {
                format!(
                    "mixed characteristics: {} items across {} sections, {:.0}% with images, \
                     average name length {:.1} characters",
                    c.total_items, c.section_count, c.image_ratio, c.avg_name_length
                )
            }
        }
    };

    format!("{} layout selected because {}", preset.name, reason)
}

/// Warnings for a preset that does not suit the menu. Empty means no concerns.
pub fn validate_preset_selection(preset: &LayoutPreset, c: &MenuCharacteristics) -> Vec<String> {
    let mut warnings = Vec::new();

    match preset.family {
        PresetFamily::ImageForward if c.image_ratio < IMAGE_FORWARD_WARN_RATIO => {
            warnings.push(format!(
                "{} is image-forward but only {:.0}% of items have images",
                preset.name, c.image_ratio
            ));
        }
        PresetFamily::TextOnly if c.image_ratio > 0.0 => {
            warnings.push(format!(
                "{} hides images but {:.0}% of items have one",
                preset.name, c.image_ratio
            ));
        }
        PresetFamily::FeatureBand if c.total_items > FEATURE_BAND_WARN_ITEMS => {
            warnings.push(format!(
                "{} works best with few items but the menu has {}",
                preset.name, c.total_items
            ));
        }
        PresetFamily::Dense if c.avg_name_length > LONG_NAME_LENGTH => {
            warnings.push(format!(
                "{} uses compact tiles but names average {:.1} characters",
                preset.name, c.avg_name_length
            ));
        }
        _ => {}
    }

    if c.is_empty() {
        warnings.push("menu has no items to lay out".to_string());
    }

    warnings
}

/// True when the menu sits at the edge of what the heuristic handles well
pub fn should_recommend_manual_selection(c: &MenuCharacteristics) -> bool {
    let tiny = c.total_items < MANUAL_SMALL_MENU;
    let huge = c.total_items > MANUAL_LARGE_MENU;
    let ambiguous = AMBIGUOUS_RATIO_BANDS
        .iter()
        .any(|&(low, high)| (low..=high).contains(&c.image_ratio));
    let long_names = c.avg_name_length > MANUAL_LONG_NAME_LENGTH;

    tiny || huge || ambiguous || long_names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::ids;

    fn chars(total_items: usize, image_ratio: f64, avg_name_length: f64) -> MenuCharacteristics {
        let section_count = if total_items == 0 { 0 } else { 3 };
        MenuCharacteristics {
            section_count,
            total_items,
            avg_items_per_section: if section_count == 0 {
                0.0
            } else {
                total_items as f64 / section_count as f64
            },
            avg_name_length,
            image_ratio,
            has_descriptions: false,
        }
    }

    fn select(c: &MenuCharacteristics) -> String {
        let catalog = PresetCatalog::standard();
        select_layout_preset(&catalog, c, OutputContext::Desktop).id.clone()
    }

    fn score(id: &str, c: &MenuCharacteristics) -> f64 {
        let catalog = PresetCatalog::standard();
        score_preset(catalog.get(id).unwrap(), c)
    }

    #[test]
    fn test_image_heavy_selects_image_forward() {
        let c = chars(30, 85.0, 12.0);
        assert!(score(ids::IMAGE_FORWARD, &c) > 70.0);
        assert_eq!(select(&c), ids::IMAGE_FORWARD);
    }

    #[test]
    fn test_no_images_selects_text_only() {
        let c = chars(30, 0.0, 12.0);
        assert!(score(ids::TEXT_ONLY, &c) > 80.0);
        assert_eq!(select(&c), ids::TEXT_ONLY);

        let many = chars(80, 0.0, 10.0);
        assert_eq!(select(&many), ids::TEXT_ONLY);
    }

    #[test]
    fn test_low_images_selects_dense() {
        let c = chars(30, 10.0, 25.0);
        assert!(score(ids::DENSE_CATALOG, &c) > 70.0);
        assert_eq!(select(&c), ids::DENSE_CATALOG);
    }

    #[test]
    fn test_many_short_items_selects_dense() {
        let c = chars(60, 45.0, 12.0);
        assert!(score(ids::DENSE_CATALOG, &c) > 70.0);
        assert_eq!(select(&c), ids::DENSE_CATALOG);
    }

    #[test]
    fn test_few_image_rich_items_select_feature_band() {
        let c = chars(8, 60.0, 15.0);
        assert!(score(ids::FEATURE_BAND, &c) > 70.0);
        assert_eq!(select(&c), ids::FEATURE_BAND);
    }

    #[test]
    fn test_mixed_menu_selects_balanced() {
        let c = chars(30, 45.0, 18.0);
        let s = score(ids::BALANCED, &c);
        assert!((60.0..=90.0).contains(&s));
        assert_eq!(select(&c), ids::BALANCED);
    }

    #[test]
    fn test_boundary_image_ratio_70_is_not_image_forward() {
        let c = chars(30, 70.0, 15.0);
        assert!(score(ids::IMAGE_FORWARD, &c) <= 70.0);
        assert_ne!(select(&c), ids::IMAGE_FORWARD);
    }

    #[test]
    fn test_boundary_image_ratio_20_is_not_dense() {
        let c = chars(30, 20.0, 15.0);
        assert!(score(ids::DENSE_CATALOG, &c) <= 70.0);
        assert_ne!(select(&c), ids::DENSE_CATALOG);
    }

    #[test]
    fn test_boundary_50_items_is_not_many() {
        let c = chars(50, 40.0, 10.0);
        assert!(score(ids::DENSE_CATALOG, &c) <= 70.0);
        assert_ne!(select(&c), ids::DENSE_CATALOG);

        let c = chars(51, 40.0, 10.0);
        assert_eq!(select(&c), ids::DENSE_CATALOG);
    }

    #[test]
    fn test_boundary_15_items_is_not_few() {
        let c = chars(15, 60.0, 10.0);
        assert!(score(ids::FEATURE_BAND, &c) <= 70.0);
        assert_ne!(select(&c), ids::FEATURE_BAND);

        let c = chars(14, 60.0, 10.0);
        assert_eq!(select(&c), ids::FEATURE_BAND);
    }

    #[test]
    fn test_scores_are_clamped() {
        let catalog = PresetCatalog::standard();
        for c in [
            chars(1, 100.0, 500.0),
            chars(10_000, 0.0, 0.0),
            chars(3, 100.0, 1.0),
            chars(40, 55.5, 22.0),
        ] {
            for preset in catalog.iter() {
                let s = score_preset(preset, &c);
                assert!((0.0..=100.0).contains(&s), "{} scored {}", preset.id, s);
            }
        }
    }

    #[test]
    fn test_rank_includes_all_presets_descending() {
        let catalog = PresetCatalog::standard();
        let ranked = rank_presets(&catalog, &chars(25, 35.0, 14.0));
        assert_eq!(ranked.len(), catalog.len());
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_empty_menu_falls_back_to_balanced() {
        let catalog = PresetCatalog::standard();
        let empty = MenuCharacteristics::default();
        let ranked = rank_presets(&catalog, &empty);
        assert!(ranked.iter().all(|r| r.score == ranked[0].score));
        assert_eq!(ranked[0].preset.id, ids::BALANCED);

        for context in OutputContext::ALL {
            assert_eq!(
                select_layout_preset_with_context(&catalog, &empty, context).id,
                ids::BALANCED
            );
        }
    }

    #[test]
    fn test_feature_band_downgrade_by_context() {
        let catalog = PresetCatalog::standard();
        let c = chars(13, 60.0, 12.0);
        assert_eq!(select(&c), ids::FEATURE_BAND);

        let pick = |context| select_layout_preset_with_context(&catalog, &c, context).id.clone();
        assert_eq!(pick(OutputContext::Desktop), ids::FEATURE_BAND);
        assert_eq!(pick(OutputContext::Tablet), ids::FEATURE_BAND);
        assert_eq!(pick(OutputContext::Print), ids::BALANCED);
        assert_eq!(pick(OutputContext::Mobile), ids::BALANCED);

        // The plain entry point never downgrades
        assert_eq!(
            select_layout_preset(&catalog, &c, OutputContext::Print).id,
            ids::FEATURE_BAND
        );
    }

    #[test]
    fn test_feature_band_kept_for_very_short_menus() {
        let catalog = PresetCatalog::standard();
        let c = chars(12, 60.0, 12.0);
        for context in OutputContext::ALL {
            assert_eq!(
                select_layout_preset_with_context(&catalog, &c, context).id,
                ids::FEATURE_BAND
            );
        }
    }

    #[test]
    fn test_explanation_mentions_numbers() {
        let catalog = PresetCatalog::standard();

        let c = chars(30, 85.0, 12.0);
        let text = explain_preset_selection(catalog.get(ids::IMAGE_FORWARD).unwrap(), &c);
        assert!(text.contains("85%"), "{text}");

        let c = chars(60, 45.0, 12.0);
        let text = explain_preset_selection(catalog.get(ids::DENSE_CATALOG).unwrap(), &c);
        assert!(text.contains("60 items"), "{text}");
        assert!(text.contains("12.0"), "{text}");

        let c = chars(8, 60.0, 12.0);
        let text = explain_preset_selection(catalog.get(ids::FEATURE_BAND).unwrap(), &c);
        assert!(text.contains("8 items") && text.contains("60%"), "{text}");
    }

    #[test]
    fn test_text_only_explanation_follows_image_ratio() {
        let catalog = PresetCatalog::standard();
        let text_only = catalog.get(ids::TEXT_ONLY).unwrap();

        let text = explain_preset_selection(text_only, &chars(20, 0.0, 12.0));
        assert!(text.contains("none of the 20 items"), "{text}");

        let text = explain_preset_selection(text_only, &chars(20, 40.0, 12.0));
        assert!(!text.contains("none of"), "{text}");
        assert!(text.contains("40%") && text.contains("20 items"), "{text}");
    }

    #[test]
    fn test_validate_selection_warnings() {
        let catalog = PresetCatalog::standard();
        let warns = |id: &str, c: MenuCharacteristics| {
            !validate_preset_selection(catalog.get(id).unwrap(), &c).is_empty()
        };

        assert!(warns(ids::IMAGE_FORWARD, chars(30, 10.0, 12.0)));
        assert!(!warns(ids::IMAGE_FORWARD, chars(30, 90.0, 12.0)));

        assert!(warns(ids::TEXT_ONLY, chars(30, 5.0, 12.0)));
        assert!(!warns(ids::TEXT_ONLY, chars(30, 0.0, 12.0)));

        assert!(warns(ids::FEATURE_BAND, chars(40, 60.0, 12.0)));
        assert!(!warns(ids::FEATURE_BAND, chars(8, 60.0, 12.0)));

        assert!(warns(ids::DENSE_CATALOG, chars(60, 10.0, 42.0)));
        assert!(!warns(ids::DENSE_CATALOG, chars(60, 10.0, 12.0)));

        assert!(!warns(ids::BALANCED, chars(30, 45.0, 18.0)));
    }

    #[test]
    fn test_manual_selection_recommendation() {
        assert!(should_recommend_manual_selection(&chars(3, 45.0, 15.0)));
        assert!(should_recommend_manual_selection(&chars(150, 45.0, 15.0)));
        assert!(should_recommend_manual_selection(&chars(40, 25.0, 15.0)));
        assert!(should_recommend_manual_selection(&chars(40, 75.0, 15.0)));
        assert!(should_recommend_manual_selection(&chars(40, 45.0, 60.0)));

        // Typical mid-range menus
        assert!(!should_recommend_manual_selection(&chars(40, 45.0, 15.0)));
        assert!(!should_recommend_manual_selection(&chars(20, 60.0, 20.0)));
        assert!(!should_recommend_manual_selection(&chars(80, 10.0, 25.0)));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let catalog = PresetCatalog::standard();
        let c = chars(27, 33.3, 17.2);
        let first = rank_presets(&catalog, &c);
        for _ in 0..10 {
            assert_eq!(rank_presets(&catalog, &c), first);
        }
    }
}
