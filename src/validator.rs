// ABOUTME: Validation rules for the campaign editor
// ABOUTME: Field-level predicates, cross-slide checks and the export readiness gate

use crate::config::{LinkPolicy, OTHER_PAGE_ID};
use crate::errors::{CampaignError, ExportBlocker, Result};
use crate::model::{PlacementContext, PlacementType, Slide};
use url::Url;

/// True iff `s` parses as an absolute URL with a scheme and an authority.
pub fn is_valid_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => !url.cannot_be_a_base() && url.has_host(),
        Err(_) => false,
    }
}

/// True iff a slide other than `index` already uses `candidate` (trimmed).
/// An empty candidate never collides.
pub fn has_duplicate_banner_id(slides: &[Slide], index: usize, candidate: &str) -> bool {
    let candidate = candidate.trim();
    !candidate.is_empty()
        && slides
            .iter()
            .enumerate()
            .any(|(other, slide)| other != index && slide.banner_id.trim() == candidate)
}

/// True iff any two slides share a non-empty banner id
pub fn has_duplicate_banner_ids(slides: &[Slide]) -> bool {
    slides
        .iter()
        .enumerate()
        .any(|(index, slide)| has_duplicate_banner_id(slides, index, &slide.banner_id))
}

/// Non-blocking warning: the image's own ratio differs from the target ratio.
pub fn has_mismatched_aspect_ratio(slide: &Slide) -> bool {
    slide.display_aspect_ratio != slide.aspect_ratio
}

/// Non-blocking warning: the images of a carousel do not share one ratio.
pub fn has_inconsistent_aspect_ratios(slides: &[Slide]) -> bool {
    match slides.split_first() {
        Some((first, rest)) if !rest.is_empty() => rest
            .iter()
            .any(|slide| slide.display_aspect_ratio != first.display_aspect_ratio),
        _ => false,
    }
}

/// Parse the position field as a non-negative integer
pub fn validate_position(position: &str) -> Result<u64> {
    let position = position.trim();
    if position.is_empty() {
        return Err(CampaignError::MissingField("Position"));
    }
    let value = position
        .parse::<i64>()
        .map_err(|_| CampaignError::InvalidPosition("Position must be a number".to_string()))?;
    if value < 0 {
        return Err(CampaignError::InvalidPosition(
            "Position cannot be negative".to_string(),
        ));
    }
    Ok(value as u64)
}

/// Inline error text for the position input
pub fn position_error(position: &str) -> Option<String> {
    validate_position(position).err().map(|e| e.to_string())
}

/// Inline error text for the page id inputs.
///
/// Selecting `other` is not an error by itself; the custom id is checked
/// once the user has typed into it.
pub fn page_id_error(ctx: &PlacementContext) -> Option<String> {
    let missing = if ctx.page_id == OTHER_PAGE_ID {
        !ctx.custom_page_id.is_empty() && ctx.custom_page_id.trim().is_empty()
    } else {
        ctx.page_id.is_empty()
    };
    missing.then(|| CampaignError::MissingField("Page ID").to_string())
}

/// Inline error text for the "new image" URL input
pub fn image_url_error(url: &str) -> Option<String> {
    (!url.is_empty() && !is_valid_url(url)).then(|| "Please enter a valid URL".to_string())
}

/// Inline error text for one slide's link
pub fn link_error(slide: &Slide, policy: LinkPolicy) -> Option<String> {
    let link = slide.link.trim();
    if link.is_empty() {
        return match policy {
            LinkPolicy::Required => Some("Redirection link is required".to_string()),
            LinkPolicy::Optional => None,
        };
    }
    (!is_valid_url(link)).then(|| "Please enter a valid URL".to_string())
}

/// First reason, in priority order, that blocks export. `None` means ready.
pub fn export_blocker(
    ctx: &PlacementContext,
    slides: &[Slide],
    policy: LinkPolicy,
) -> Option<ExportBlocker> {
    if slides.iter().any(|slide| slide.banner_id.trim().is_empty()) {
        return Some(ExportBlocker::MissingBannerIds);
    }
    if has_duplicate_banner_ids(slides) {
        return Some(ExportBlocker::DuplicateBannerIds);
    }
    if policy == LinkPolicy::Required && slides.iter().any(|slide| slide.link.trim().is_empty()) {
        return Some(ExportBlocker::MissingLinks);
    }
    if slides.iter().any(|slide| link_error(slide, policy).is_some()) {
        return Some(ExportBlocker::InvalidLinks);
    }
    if slides
        .iter()
        .any(|slide| slide.url.is_empty() || !is_valid_url(&slide.url))
    {
        return Some(ExportBlocker::InvalidImageUrls);
    }
    if slides.is_empty() {
        return Some(ExportBlocker::NoSlides);
    }
    if ctx.placement_type == PlacementType::Single && slides.len() > 1 {
        return Some(ExportBlocker::SingleWithManySlides);
    }
    match validate_position(&ctx.position) {
        Err(CampaignError::MissingField(_)) => return Some(ExportBlocker::MissingPosition),
        Err(_) => return Some(ExportBlocker::InvalidPosition),
        Ok(_) => {}
    }
    if ctx.resolved_page_id().is_empty() {
        return Some(ExportBlocker::MissingPageId);
    }
    if ctx.page_id != OTHER_PAGE_ID && !ctx.has_listed_page_id() {
        return Some(ExportBlocker::UnknownPageId);
    }
    None
}

/// Blocking gate for the export action
pub fn is_export_ready(ctx: &PlacementContext, slides: &[Slide], policy: LinkPolicy) -> bool {
    export_blocker(ctx, slides, policy).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(url: &str, banner_id: &str) -> Slide {
        let mut slide = Slide::new(url, "3:1", "3:1");
        slide.banner_id = banner_id.to_string();
        slide.link = "https://shop.example.com/sale".to_string();
        slide
    }

    fn ready_context() -> PlacementContext {
        let mut ctx = PlacementContext::new("3:1");
        ctx.position = "1".to_string();
        ctx.page_id = "men-home-page".to_string();
        ctx
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com/a.png"));
        assert!(is_valid_url("http://localhost:8080/x"));
        assert!(!is_valid_url("example.com/a.png"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_duplicate_banner_id_is_trimmed_and_ignores_self() {
        let slides = vec![slide("https://a.com/1.png", "same"), slide("https://a.com/2.png", "other")];
        assert!(has_duplicate_banner_id(&slides, 1, " same "));
        assert!(!has_duplicate_banner_id(&slides, 0, "same"));
        assert!(!has_duplicate_banner_id(&slides, 1, "   "));
    }

    #[test]
    fn test_aspect_ratio_warnings() {
        let mut a = slide("https://a.com/1.png", "a");
        let b = slide("https://a.com/2.png", "b");
        assert!(!has_mismatched_aspect_ratio(&a));
        assert!(!has_inconsistent_aspect_ratios(&[a.clone(), b.clone()]));

        a.display_aspect_ratio = "16:9".to_string();
        assert!(has_mismatched_aspect_ratio(&a));
        assert!(has_inconsistent_aspect_ratios(&[a.clone(), b]));
        assert!(!has_inconsistent_aspect_ratios(&[a]));
    }

    #[test]
    fn test_position_errors() {
        assert_eq!(position_error("").as_deref(), Some("Position is required"));
        assert_eq!(position_error("abc").as_deref(), Some("Position must be a number"));
        assert_eq!(position_error("-2").as_deref(), Some("Position cannot be negative"));
        assert_eq!(position_error(" 3 "), None);
        assert_eq!(validate_position("3").unwrap(), 3);
    }

    #[test]
    fn test_page_id_error() {
        let mut ctx = PlacementContext::new("3:1");
        assert_eq!(page_id_error(&ctx).as_deref(), Some("Page ID is required"));
        ctx.page_id = "other".to_string();
        assert_eq!(page_id_error(&ctx), None);
        ctx.custom_page_id = "  ".to_string();
        assert!(page_id_error(&ctx).is_some());
        ctx.custom_page_id = "promo".to_string();
        assert_eq!(page_id_error(&ctx), None);
    }

    #[test]
    fn test_export_ready() {
        let ctx = ready_context();
        let slides = vec![slide("https://a.com/1.png", "a"), slide("https://a.com/2.png", "b")];
        assert!(is_export_ready(&ctx, &slides, LinkPolicy::Required));
    }

    #[test]
    fn test_export_blocker_priority() {
        let ctx = PlacementContext::new("3:1");
        let mut slides = vec![slide("bad", ""), slide("https://a.com/2.png", "b")];
        slides[1].link = String::new();

        // Missing ids win over everything else
        assert_eq!(
            export_blocker(&ctx, &slides, LinkPolicy::Required),
            Some(ExportBlocker::MissingBannerIds)
        );

        slides[0].banner_id = "b".to_string();
        assert_eq!(
            export_blocker(&ctx, &slides, LinkPolicy::Required),
            Some(ExportBlocker::DuplicateBannerIds)
        );

        slides[0].banner_id = "a".to_string();
        assert_eq!(
            export_blocker(&ctx, &slides, LinkPolicy::Required),
            Some(ExportBlocker::MissingLinks)
        );
        assert_eq!(
            export_blocker(&ctx, &slides, LinkPolicy::Optional),
            Some(ExportBlocker::InvalidImageUrls)
        );

        slides[1].link = "nope".to_string();
        assert_eq!(
            export_blocker(&ctx, &slides, LinkPolicy::Optional),
            Some(ExportBlocker::InvalidLinks)
        );

        slides[1].link = "https://shop.example.com".to_string();
        slides[0].url = "https://a.com/1.png".to_string();
        assert_eq!(
            export_blocker(&ctx, &slides, LinkPolicy::Required),
            Some(ExportBlocker::MissingPosition)
        );
    }

    #[test]
    fn test_export_blocked_without_slides_or_page() {
        let mut ctx = ready_context();
        assert_eq!(
            export_blocker(&ctx, &[], LinkPolicy::Required),
            Some(ExportBlocker::NoSlides)
        );

        let slides = vec![slide("https://a.com/1.png", "a")];
        ctx.page_id = "other".to_string();
        assert_eq!(
            export_blocker(&ctx, &slides, LinkPolicy::Required),
            Some(ExportBlocker::MissingPageId)
        );

        ctx.page_id = "men-home-page".to_string();
        ctx.position = "-1".to_string();
        assert_eq!(
            export_blocker(&ctx, &slides, LinkPolicy::Required),
            Some(ExportBlocker::InvalidPosition)
        );
    }

    #[test]
    fn test_single_placement_blocks_extra_slides() {
        let mut ctx = ready_context();
        ctx.placement_type = PlacementType::Single;
        let slides = vec![slide("https://a.com/1.png", "a"), slide("https://a.com/2.png", "b")];
        assert_eq!(
            export_blocker(&ctx, &slides, LinkPolicy::Required),
            Some(ExportBlocker::SingleWithManySlides)
        );
        assert!(is_export_ready(&ctx, &slides[..1], LinkPolicy::Required));
    }

    #[test]
    fn test_page_id_outside_category_blocks_export() {
        let mut ctx = ready_context();
        let slides = vec![slide("https://a.com/1.png", "a")];
        ctx.page_id = "men-homepage".to_string();
        assert_eq!(
            export_blocker(&ctx, &slides, LinkPolicy::Required),
            Some(ExportBlocker::UnknownPageId)
        );
        ctx.category = crate::model::Category::Fashion;
        assert!(is_export_ready(&ctx, &slides, LinkPolicy::Required));
    }

    #[test]
    fn test_image_url_error() {
        assert_eq!(image_url_error(""), None);
        assert_eq!(image_url_error("https://cdn.example.com/a.png"), None);
        assert_eq!(
            image_url_error("cdn.example.com/a.png").as_deref(),
            Some("Please enter a valid URL")
        );
    }

    #[test]
    fn test_equal_ids_block_export() {
        let ctx = ready_context();
        let slides = vec![
            slide("https://a.com/1.png", "same-id"),
            slide("https://a.com/2.png", "same-id"),
        ];
        assert!(!is_export_ready(&ctx, &slides, LinkPolicy::Optional));
    }
}
