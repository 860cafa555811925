// ABOUTME: Editor state and slide list operations for the campaign editor
// ABOUTME: Pure reducers that return a new state for every insert, remove, reorder or context change

use crate::banner_id::{category_reset_banner_id, regenerate_all};
use crate::config::OTHER_PAGE_ID;
use crate::errors::{CampaignError, Result};
use crate::model::{Category, PlacementContext, PlacementType, Slide, SlideField};
use crate::validator::{has_duplicate_banner_id, is_valid_url, validate_position};
use log::debug;

/// Snapshot of one editing session: the placement context plus the ordered
/// slides. Every operation returns a new snapshot and leaves `self` as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    context: PlacementContext,
    slides: Vec<Slide>,
}

impl EditorState {
    pub fn new(selected_aspect_ratio: &str) -> Self {
        Self {
            context: PlacementContext::new(selected_aspect_ratio),
            slides: Vec::new(),
        }
    }

    /// Build a state from already-derived parts, e.g. after an import
    pub fn from_parts(context: PlacementContext, slides: Vec<Slide>) -> Self {
        Self { context, slides }
    }

    pub fn context(&self) -> &PlacementContext {
        &self.context
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.slides.len() {
            return Err(CampaignError::IndexOutOfRange {
                index,
                len: self.slides.len(),
            });
        }
        Ok(())
    }

    fn with_regenerated(mut self) -> Self {
        regenerate_all(&self.context, &mut self.slides);
        self
    }

    /// Checks run before any image probing: the URL must be absolute and not
    /// already part of the list.
    pub fn check_addable(&self, url: &str) -> Result<()> {
        let url = url.trim();
        if !is_valid_url(url) {
            return Err(CampaignError::InvalidUrl(url.to_string()));
        }
        if self.slides.iter().any(|slide| slide.url == url) {
            return Err(CampaignError::DuplicateImage(url.to_string()));
        }
        Ok(())
    }

    /// Insert a verified image.
    ///
    /// The URL is trimmed first. Under `single` the list is replaced by the new slide. Under `carousel`
    /// the slide goes to `index` (past-the-end appends) or to the end when no
    /// index is given. All banner ids are regenerated afterwards.
    pub fn insert_slide(
        &self,
        url: &str,
        index: Option<usize>,
        display_aspect_ratio: &str,
    ) -> Result<Self> {
        let url = url.trim();
        self.check_addable(url)?;

        let slide = Slide::new(url, &self.context.selected_aspect_ratio, display_aspect_ratio);
        let mut next = self.clone();
        match next.context.placement_type {
            PlacementType::Single => {
                next.slides.clear();
                next.slides.push(slide);
            }
            PlacementType::Carousel => {
                let at = index.unwrap_or(next.slides.len()).min(next.slides.len());
                debug!("Inserting slide {} at index {}", url, at);
                next.slides.insert(at, slide);
            }
        }
        Ok(next.with_regenerated())
    }

    /// Delete the slide at `index` and re-derive ids for the shifted slides
    pub fn remove(&self, index: usize) -> Result<Self> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.slides.remove(index);
        Ok(next.with_regenerated())
    }

    /// Move the slide at `from` to `to`. Equal indices are a no-op.
    pub fn reorder(&self, from: usize, to: usize) -> Result<Self> {
        self.check_index(from)?;
        if from == to {
            return Ok(self.clone());
        }
        let mut next = self.clone();
        let slide = next.slides.remove(from);
        let to = to.min(next.slides.len());
        next.slides.insert(to, slide);
        Ok(next.with_regenerated())
    }

    /// Write one editable field of a slide.
    ///
    /// For `BannerId` the returned flag reports whether the value collides
    /// with another slide's id; the write happens either way.
    pub fn update_field(&self, index: usize, field: SlideField, value: &str) -> Result<(Self, bool)> {
        self.check_index(index)?;
        let mut next = self.clone();
        let mut collides = false;
        let slide = &mut next.slides[index];
        match field {
            SlideField::Caption => slide.caption = value.to_string(),
            SlideField::Link => slide.link = value.to_string(),
            SlideField::BannerId => {
                collides = has_duplicate_banner_id(&self.slides, index, value);
                slide.banner_id = value.to_string();
            }
        }
        Ok((next, collides))
    }

    /// Recompute every slide's default banner id from the current context,
    /// overwriting manual edits.
    pub fn regenerate_defaults(&self) -> Self {
        self.clone().with_regenerated()
    }

    /// Change the placement type. Slides are left untouched.
    pub fn set_type(&self, placement_type: PlacementType) -> Self {
        let mut next = self.clone();
        next.context.placement_type = placement_type;
        next
    }

    /// Store the raw position text; ids follow only once it is a valid
    /// non-negative integer. Returns the inline error, if any.
    pub fn set_position(&self, position: &str) -> (Self, Option<CampaignError>) {
        let mut next = self.clone();
        next.context.position = position.to_string();
        match validate_position(position) {
            Ok(_) => (next.with_regenerated(), None),
            Err(e) => (next, Some(e)),
        }
    }

    /// Switch the app category. This resets the page id, custom page id and
    /// position, and ids fall back to `{category}_{position}[_index]`.
    pub fn set_category(&self, category: Category) -> Self {
        let mut next = self.clone();
        next.context.category = category;
        next.context.page_id.clear();
        next.context.custom_page_id.clear();
        next.context.position.clear();

        let ctx = &next.context;
        for (index, slide) in next.slides.iter_mut().enumerate() {
            slide.banner_id =
                category_reset_banner_id(ctx.category, &ctx.position, ctx.placement_type, index);
        }
        next
    }

    /// Select a page id. `other` waits for the custom id; an empty value or
    /// one outside the category's list is an inline error and leaves ids as
    /// they were. A listed value regenerates ids.
    pub fn set_page_id(&self, page_id: &str) -> (Self, Option<CampaignError>) {
        let mut next = self.clone();
        next.context.page_id = page_id.to_string();
        if page_id == OTHER_PAGE_ID {
            (next, None)
        } else if page_id.is_empty() {
            (next, Some(CampaignError::MissingField("Page ID")))
        } else if !next.context.has_listed_page_id() {
            let error = CampaignError::UnknownPageId {
                page_id: page_id.to_string(),
                category: next.context.category.to_string(),
            };
            (next, Some(error))
        } else {
            (next.with_regenerated(), None)
        }
    }

    /// Edit the free-text page id used with the `other` sentinel
    pub fn set_custom_page_id(&self, custom_page_id: &str) -> (Self, Option<CampaignError>) {
        let mut next = self.clone();
        next.context.custom_page_id = custom_page_id.to_string();
        if custom_page_id.trim().is_empty() {
            (next, Some(CampaignError::MissingField("Page ID")))
        } else {
            (next.with_regenerated(), None)
        }
    }

    /// Select the target ratio; every slide takes it over.
    pub fn set_aspect_ratio(&self, aspect_ratio: &str) -> Self {
        let mut next = self.clone();
        next.context.selected_aspect_ratio = aspect_ratio.to_string();
        for slide in &mut next.slides {
            slide.aspect_ratio = aspect_ratio.to_string();
        }
        next
    }

    pub fn set_priority(&self, priority: Option<u32>) -> Self {
        let mut next = self.clone();
        next.context.priority = priority;
        next
    }
}
