// ABOUTME: Editing session for the campaign editor
// ABOUTME: Owns the current state, the busy flag and the image probe, and runs async add/import

use crate::config::EditorConfig;
use crate::errors::{CampaignError, Result};
use crate::model::{Category, PlacementType, SlideField};
use crate::probe::{probe_display_ratio, CancelToken, ImageProbe};
use crate::serializer::{self, CampaignConfig};
use crate::state::EditorState;
use crate::store::{CampaignStore, PersistedList};
use log::{info, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Holds the busy flag for the lifetime of one add or import
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CampaignError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One single-user editing session.
///
/// Synchronous operations replace the state through the pure reducers in
/// [`EditorState`]. `add_image` and `import` suspend on image probes and
/// only commit once every probe has finished.
pub struct Editor<P: ImageProbe> {
    state: Mutex<EditorState>,
    busy: AtomicBool,
    probe: P,
    config: EditorConfig,
}

impl<P: ImageProbe> Editor<P> {
    pub fn new(probe: P, config: EditorConfig) -> Self {
        let state = EditorState::new(&config.default_aspect_ratio);
        Self {
            state: Mutex::new(state),
            busy: AtomicBool::new(false),
            probe,
            config,
        }
    }

    /// Current snapshot
    pub fn state(&self) -> EditorState {
        self.state.lock().clone()
    }

    /// True while an add or import is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    fn apply<T>(&self, reduce: impl FnOnce(&EditorState) -> Result<(EditorState, T)>) -> Result<T> {
        let mut state = self.state.lock();
        let (next, out) = reduce(&*state)?;
        *state = next;
        Ok(out)
    }

    /// Verify, measure and insert an image.
    ///
    /// The list is unchanged on every failure path.
    pub async fn add_image(&self, url: &str, index: Option<usize>, cancel: &CancelToken) -> Result<()> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        let url = url.trim();

        self.state.lock().check_addable(url)?;

        let display_ratio =
            probe_display_ratio(&self.probe, url, self.config.probe_timeout, cancel)
                .await
                .map_err(|e| {
                    warn!("Could not add image {}: {}", url, e);
                    e
                })?;

        self.apply(|state| Ok((state.insert_slide(url, index, &display_ratio)?, ())))?;
        info!("Image added successfully: {}", url);
        Ok(())
    }

    /// Replace the session with an imported document. All-or-nothing.
    pub async fn import(&self, raw: &str, cancel: &CancelToken) -> Result<()> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        let (context, slides) =
            serializer::import(raw, &self.probe, self.config.probe_timeout, cancel).await?;
        info!("Imported campaign with {} slides", slides.len());
        *self.state.lock() = EditorState::from_parts(context, slides);
        Ok(())
    }

    pub fn export(&self) -> Result<CampaignConfig> {
        let state = self.state.lock();
        serializer::export(state.context(), state.slides(), self.config.link_policy)
    }

    /// Export and append the document to the named campaign store
    pub fn export_and_save<B: PersistedList>(
        &self,
        name: &str,
        store: &mut CampaignStore<B>,
    ) -> Result<CampaignConfig> {
        let document = self.export()?;
        store.append(name, &document.to_json()?)?;
        Ok(document)
    }

    pub fn remove(&self, index: usize) -> Result<()> {
        self.apply(|state| Ok((state.remove(index)?, ())))
    }

    pub fn reorder(&self, from: usize, to: usize) -> Result<()> {
        self.apply(|state| Ok((state.reorder(from, to)?, ())))
    }

    /// Returns whether a banner id edit collides with another slide
    pub fn update_field(&self, index: usize, field: SlideField, value: &str) -> Result<bool> {
        self.apply(|state| state.update_field(index, field, value))
    }

    pub fn regenerate_defaults(&self) {
        let mut state = self.state.lock();
        *state = state.regenerate_defaults();
    }

    pub fn set_type(&self, placement_type: PlacementType) {
        let mut state = self.state.lock();
        *state = state.set_type(placement_type);
    }

    pub fn set_category(&self, category: Category) {
        let mut state = self.state.lock();
        *state = state.set_category(category);
    }

    pub fn set_aspect_ratio(&self, aspect_ratio: &str) {
        let mut state = self.state.lock();
        *state = state.set_aspect_ratio(aspect_ratio);
    }

    pub fn set_priority(&self, priority: Option<u32>) {
        let mut state = self.state.lock();
        *state = state.set_priority(priority);
    }

    /// Returns the inline error for the new value, if any
    pub fn set_position(&self, position: &str) -> Option<CampaignError> {
        let mut state = self.state.lock();
        let (next, error) = state.set_position(position);
        *state = next;
        error
    }

    pub fn set_page_id(&self, page_id: &str) -> Option<CampaignError> {
        let mut state = self.state.lock();
        let (next, error) = state.set_page_id(page_id);
        *state = next;
        error
    }

    pub fn set_custom_page_id(&self, custom_page_id: &str) -> Option<CampaignError> {
        let mut state = self.state.lock();
        let (next, error) = state.set_custom_page_id(custom_page_id);
        *state = next;
        error
    }
}
