// ABOUTME: Data model for the campaign editor
// ABOUTME: Slides, placement context and the enumerated placement options

use crate::config::{FASHION_PAGE_IDS, LUXURY_PAGE_IDS, OTHER_PAGE_ID};
use crate::errors::{CampaignError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the placement renders its slides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementType {
    /// One fixed slide.
    Single,
    /// Ordered rotation of slides.
    #[default]
    Carousel,
}

impl PlacementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementType::Single => "single",
            PlacementType::Carousel => "carousel",
        }
    }
}

impl fmt::Display for PlacementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementType {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(PlacementType::Single),
            "carousel" => Ok(PlacementType::Carousel),
            other => Err(CampaignError::InvalidFormat(format!(
                "Unknown placement type: {}",
                other
            ))),
        }
    }
}

/// App the placement belongs to. Each category has its own page id list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Luxury,
    Fashion,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Luxury => "luxury",
            Category::Fashion => "fashion",
        }
    }

    /// Enumerated page ids for this category (the `other` sentinel excluded)
    pub fn page_ids(&self) -> &'static [&'static str] {
        match self {
            Category::Luxury => LUXURY_PAGE_IDS,
            Category::Fashion => FASHION_PAGE_IDS,
        }
    }

    /// Find the category whose option list contains `page_id`
    pub fn owning(page_id: &str) -> Option<Category> {
        [Category::Luxury, Category::Fashion]
            .into_iter()
            .find(|category| category.page_ids().contains(&page_id))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "luxury" => Ok(Category::Luxury),
            "fashion" => Ok(Category::Fashion),
            other => Err(CampaignError::InvalidFormat(format!(
                "Unknown category: {}",
                other
            ))),
        }
    }
}

/// One image entry of a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    pub url: String,
    pub caption: String,
    pub link: String,
    /// Target ratio chosen for the placement.
    pub aspect_ratio: String,
    /// Ratio measured from the image's pixel dimensions.
    pub display_aspect_ratio: String,
    pub banner_id: String,
}

impl Slide {
    pub fn new(url: &str, aspect_ratio: &str, display_aspect_ratio: &str) -> Self {
        Self {
            url: url.to_string(),
            caption: String::new(),
            link: String::new(),
            aspect_ratio: aspect_ratio.to_string(),
            display_aspect_ratio: display_aspect_ratio.to_string(),
            banner_id: String::new(),
        }
    }
}

/// Editable fields of a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideField {
    Caption,
    Link,
    BannerId,
}

/// Page-level fields shared by every slide.
///
/// `position` and `custom_page_id` are kept as raw text so that typing is
/// never blocked; they are validated on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementContext {
    pub placement_type: PlacementType,
    pub position: String,
    pub category: Category,
    pub page_id: String,
    pub custom_page_id: String,
    pub selected_aspect_ratio: String,
    pub priority: Option<u32>,
}

impl PlacementContext {
    pub fn new(selected_aspect_ratio: &str) -> Self {
        Self {
            placement_type: PlacementType::default(),
            position: String::new(),
            category: Category::default(),
            page_id: String::new(),
            custom_page_id: String::new(),
            selected_aspect_ratio: selected_aspect_ratio.to_string(),
            priority: None,
        }
    }

    /// Page id that ends up in the export: the trimmed custom id when the
    /// sentinel `other` is selected, otherwise the enumerated value.
    pub fn resolved_page_id(&self) -> &str {
        if self.page_id == OTHER_PAGE_ID {
            self.custom_page_id.trim()
        } else {
            &self.page_id
        }
    }

    /// True iff the selected page id belongs to the current category's list
    pub fn has_listed_page_id(&self) -> bool {
        self.category.page_ids().contains(&self.page_id.as_str())
    }
}

/// Parse priority text; empty input means "not set".
pub fn parse_priority(value: &str) -> Result<Option<u32>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<u32>().map(Some).map_err(|_| {
        CampaignError::InvalidFormat(format!("Priority must be a non-negative number: {}", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_page_id_uses_custom_value_for_other() {
        let mut ctx = PlacementContext::new("3:1");
        ctx.page_id = "other".to_string();
        ctx.custom_page_id = "  spring-sale  ".to_string();
        assert_eq!(ctx.resolved_page_id(), "spring-sale");

        ctx.page_id = "men-home-page".to_string();
        assert_eq!(ctx.resolved_page_id(), "men-home-page");
    }

    #[test]
    fn test_category_owning_page_id() {
        assert_eq!(Category::owning("indiluxe"), Some(Category::Luxury));
        assert_eq!(Category::owning("kids-homepage"), Some(Category::Fashion));
        assert_eq!(Category::owning("somewhere-else"), None);
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority("").unwrap(), None);
        assert_eq!(parse_priority(" 4 ").unwrap(), Some(4));
        assert!(parse_priority("-1").is_err());
    }
}
