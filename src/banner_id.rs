// ABOUTME: Banner id derivation for the campaign editor
// ABOUTME: Computes default slide identifiers from the placement context and slide index

use crate::model::{Category, PlacementContext, PlacementType, Slide};

fn position_or_zero(position: &str) -> &str {
    let position = position.trim();
    if position.is_empty() { "0" } else { position }
}

fn carousel_suffix(placement_type: PlacementType, index: usize) -> String {
    match placement_type {
        PlacementType::Carousel => format!("_{}", index),
        PlacementType::Single => String::new(),
    }
}

/// Default banner id for the slide at `index`:
/// `{category}_{pageId}_{position}` plus `_{index}` for carousels.
///
/// An unresolved page id leaves an empty segment (`luxury__0_0`) until the
/// user fills it in.
pub fn default_banner_id(ctx: &PlacementContext, index: usize) -> String {
    format!(
        "{}_{}_{}{}",
        ctx.category,
        ctx.resolved_page_id(),
        position_or_zero(&ctx.position),
        carousel_suffix(ctx.placement_type, index)
    )
}

/// Id used right after a category switch, when the page id has been reset:
/// the page segment is dropped entirely (`fashion_0_0`).
pub fn category_reset_banner_id(
    category: Category,
    position: &str,
    placement_type: PlacementType,
    index: usize,
) -> String {
    format!(
        "{}_{}{}",
        category,
        position_or_zero(position),
        carousel_suffix(placement_type, index)
    )
}

/// Overwrite every slide's banner id with its default for its current index
pub fn regenerate_all(ctx: &PlacementContext, slides: &mut [Slide]) {
    for (index, slide) in slides.iter_mut().enumerate() {
        slide.banner_id = default_banner_id(ctx, index);
    }
}
