// ABOUTME: JSON export and import for the campaign editor
// ABOUTME: Converts editor state to the campaign document and back, tolerating double-encoded input

use crate::config::{LinkPolicy, OTHER_PAGE_ID};
use crate::errors::{CampaignError, Result};
use crate::model::{Category, PlacementContext, PlacementType, Slide};
use crate::probe::{probe_display_ratio, CancelToken, ImageProbe};
use crate::validator::{export_blocker, validate_position};
use futures::future::try_join_all;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Exported campaign document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignConfig {
    #[serde(rename = "type")]
    pub placement_type: PlacementType,
    pub position: u64,
    pub page_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    pub aspect_ratio: String,
    pub content: Vec<ContentEntry>,
}

/// One slide as it appears in the document. Ratios are not carried per slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub banner_id: String,
}

impl From<&Slide> for ContentEntry {
    fn from(slide: &Slide) -> Self {
        Self {
            url: slide.url.clone(),
            caption: slide.caption.clone(),
            link: slide.link.clone(),
            banner_id: slide.banner_id.clone(),
        }
    }
}

impl CampaignConfig {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented form for display
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the export document. Refused with the first failing readiness check.
pub fn export(ctx: &PlacementContext, slides: &[Slide], policy: LinkPolicy) -> Result<CampaignConfig> {
    if let Some(blocker) = export_blocker(ctx, slides, policy) {
        return Err(CampaignError::ExportBlocked(blocker));
    }

    let document = CampaignConfig {
        placement_type: ctx.placement_type,
        position: validate_position(&ctx.position)?,
        page_id: ctx.resolved_page_id().to_string(),
        priority: ctx.priority,
        aspect_ratio: ctx.selected_aspect_ratio.clone(),
        content: slides.iter().map(ContentEntry::from).collect(),
    };
    info!(
        "Exported {} campaign with {} slides",
        document.placement_type,
        document.content.len()
    );
    Ok(document)
}

/// Raw text decoded twice: a JSON string literal holding the document.
fn decode_double(raw: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::String(inner) => serde_json::from_str(&inner).ok(),
        _ => None,
    }
}

/// Raw text decoded once.
fn decode_plain(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

/// A single placement holds at most one image.
fn check_placement_shape(document: &CampaignConfig) -> Result<()> {
    if document.placement_type == PlacementType::Single && document.content.len() > 1 {
        return Err(CampaignError::InvalidFormat(format!(
            "a single placement holds one image, found {}",
            document.content.len()
        )));
    }
    Ok(())
}

/// Parse a document that may be plain JSON or a JSON-encoded JSON string.
///
/// Decoders are tried in order; the first one yielding an object wins.
pub fn parse_document(raw: &str) -> Result<CampaignConfig> {
    let decoders: [fn(&str) -> Option<Value>; 2] = [decode_double, decode_plain];
    let value = decoders
        .iter()
        .find_map(|decode| decode(raw).filter(Value::is_object))
        .ok_or_else(|| CampaignError::InvalidFormat("payload is not a JSON document".to_string()))?;

    if !value.get("content").map_or(false, Value::is_array) {
        return Err(CampaignError::InvalidFormat(
            "content must be an array".to_string(),
        ));
    }

    let document: CampaignConfig =
        serde_json::from_value(value).map_err(|e| CampaignError::InvalidFormat(e.to_string()))?;
    check_placement_shape(&document)?;
    Ok(document)
}

/// Category for an imported document: the page id's own list first, then the
/// banner id prefix of the first slide, then the default.
fn infer_category(document: &CampaignConfig) -> Category {
    if let Some(category) = Category::owning(&document.page_id) {
        return category;
    }
    document
        .content
        .first()
        .and_then(|entry| entry.banner_id.split('_').next())
        .and_then(|prefix| prefix.parse().ok())
        .unwrap_or_default()
}

/// Rebuild the editor context and slides from a parsed document.
///
/// `display_ratios` holds the re-measured ratio of each entry, in order.
/// Every slide takes the document-level target ratio.
pub fn into_editor_parts(
    document: CampaignConfig,
    display_ratios: Vec<String>,
) -> Result<(PlacementContext, Vec<Slide>)> {
    check_placement_shape(&document)?;
    if display_ratios.len() != document.content.len() {
        return Err(CampaignError::InvalidFormat(format!(
            "expected {} measured images, got {}",
            document.content.len(),
            display_ratios.len()
        )));
    }

    let category = infer_category(&document);
    let known = category.page_ids().contains(&document.page_id.as_str());
    let (page_id, custom_page_id) = if known {
        (document.page_id.clone(), String::new())
    } else {
        (OTHER_PAGE_ID.to_string(), document.page_id.clone())
    };

    let context = PlacementContext {
        placement_type: document.placement_type,
        position: document.position.to_string(),
        category,
        page_id,
        custom_page_id,
        selected_aspect_ratio: document.aspect_ratio.clone(),
        priority: document.priority,
    };

    let slides = document
        .content
        .into_iter()
        .zip(display_ratios)
        .map(|(entry, display_aspect_ratio)| Slide {
            url: entry.url,
            caption: entry.caption,
            link: entry.link,
            aspect_ratio: document.aspect_ratio.clone(),
            display_aspect_ratio,
            banner_id: entry.banner_id,
        })
        .collect();

    Ok((context, slides))
}

/// Parse `raw`, re-probe every image concurrently and rebuild the editor
/// parts. Nothing is returned unless every probe succeeds.
pub async fn import<P: ImageProbe>(
    raw: &str,
    probe: &P,
    limit: Duration,
    cancel: &CancelToken,
) -> Result<(PlacementContext, Vec<Slide>)> {
    let document = parse_document(raw)?;
    debug!("Parsed campaign with {} entries", document.content.len());

    let ratios = try_join_all(
        document
            .content
            .iter()
            .map(|entry| probe_display_ratio(probe, &entry.url, limit, cancel)),
    )
    .await?;

    into_editor_parts(document, ratios)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{"type":"carousel","position":2,"pageId":"men-home-page","aspectRatio":"3:1","content":[{"url":"https://cdn.example.com/a.png","caption":"A","link":"https://shop.example.com/a","bannerId":"luxury_men-home-page_2_0"}]}"#;

    #[test]
    fn test_parse_plain_document() {
        let document = parse_document(DOCUMENT).unwrap();
        assert_eq!(document.placement_type, PlacementType::Carousel);
        assert_eq!(document.position, 2);
        assert_eq!(document.priority, None);
        assert_eq!(document.content[0].banner_id, "luxury_men-home-page_2_0");
    }

    #[test]
    fn test_parse_double_encoded_document() {
        let encoded = serde_json::to_string(DOCUMENT).unwrap();
        assert!(encoded.starts_with('"'));
        assert_eq!(parse_document(&encoded).unwrap(), parse_document(DOCUMENT).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage_and_non_array_content() {
        for raw in [
            "not json",
            "\"not json either\"",
            "[1,2,3]",
            r#"{"type":"single","position":1,"pageId":"x","aspectRatio":"3:1","content":{}}"#,
            r#"{"type":"single","position":1,"pageId":"x","aspectRatio":"3:1"}"#,
        ] {
            let err = parse_document(raw).unwrap_err();
            assert!(matches!(err, CampaignError::InvalidFormat(_)), "{}", raw);
        }
    }

    #[test]
    fn test_export_omits_unset_priority_and_ratios() {
        let mut ctx = PlacementContext::new("5:1");
        ctx.position = "4".to_string();
        ctx.page_id = "other".to_string();
        ctx.custom_page_id = " promo ".to_string();
        let mut slide = Slide::new("https://cdn.example.com/a.png", "5:1", "16:9");
        slide.banner_id = "luxury_promo_4_0".to_string();
        slide.link = "https://shop.example.com".to_string();

        let json = export(&ctx, &[slide.clone()], LinkPolicy::Required)
            .unwrap()
            .to_json()
            .unwrap();
        assert!(!json.contains("priority"));
        assert!(!json.contains("displayAspectRatio"));
        assert!(json.contains(r#""pageId":"promo""#));
        assert!(json.contains(r#""aspectRatio":"5:1""#));
        assert!(json.contains(r#""position":4"#));

        ctx.priority = Some(3);
        let json = export(&ctx, &[slide], LinkPolicy::Required)
            .unwrap()
            .to_json()
            .unwrap();
        assert!(json.contains(r#""priority":3"#));
    }

    #[test]
    fn test_export_blocked_reports_reason() {
        let ctx = PlacementContext::new("3:1");
        let err = export(&ctx, &[], LinkPolicy::Required).unwrap_err();
        assert_eq!(err.to_string(), "Please add at least one image before exporting");
    }

    #[test]
    fn test_into_editor_parts_forces_document_ratio() {
        let document = parse_document(
            r#"{"type":"carousel","position":0,"pageId":"spring-sale","priority":1,"aspectRatio":"5:1","content":[{"url":"https://a.com/1.png","bannerId":"fashion_spring-sale_0_0"}]}"#,
        )
        .unwrap();
        let (ctx, slides) = into_editor_parts(document, vec!["3:1".to_string()]).unwrap();
        assert_eq!(ctx.category, Category::Fashion);
        assert_eq!(ctx.page_id, "other");
        assert_eq!(ctx.custom_page_id, "spring-sale");
        assert_eq!(ctx.priority, Some(1));
        assert_eq!(slides[0].aspect_ratio, "5:1");
        assert_eq!(slides[0].display_aspect_ratio, "3:1");
        assert_eq!(slides[0].link, "");
    }

    #[test]
    fn test_single_document_with_many_entries_is_rejected() {
        let raw = r#"{"type":"single","position":1,"pageId":"indiluxe","aspectRatio":"3:1","content":[{"url":"https://a.com/1.png"},{"url":"https://a.com/2.png"}]}"#;
        let err = parse_document(raw).unwrap_err();
        assert!(matches!(err, CampaignError::InvalidFormat(_)));
        assert!(err.to_string().contains("found 2"));

        let mut document = parse_document(DOCUMENT).unwrap();
        document.placement_type = PlacementType::Single;
        document.content.push(document.content[0].clone());
        let ratios = vec!["3:1".to_string(), "3:1".to_string()];
        assert!(matches!(
            into_editor_parts(document, ratios),
            Err(CampaignError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_into_editor_parts_requires_every_ratio() {
        let document = parse_document(DOCUMENT).unwrap();
        assert!(into_editor_parts(document, Vec::new()).is_err());
    }
}
