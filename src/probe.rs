// ABOUTME: Image probing for the campaign editor
// ABOUTME: Verifies that remote images load and measures their pixel dimensions

use crate::errors::{CampaignError, Result};
use crate::ratio::reduce_ratio;
use image::io::Reader as ImageReader;
use log::{debug, info, warn};
use parking_lot::Mutex;
use reqwest::Client;
use std::collections::HashMap;
use std::future::Future;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Pixel dimensions of a measured image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Returns `None` for degenerate (zero-sized) images.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn aspect_ratio(&self) -> String {
        reduce_ratio(self.width, self.height)
    }
}

/// External collaborator that loads and measures images.
///
/// `measure` is only called after `verify_load` has returned `true`.
#[allow(async_fn_in_trait)]
pub trait ImageProbe {
    /// Whether the image at `url` loads at all
    async fn verify_load(&self, url: &str) -> Result<bool>;

    /// Pixel dimensions of the image at `url`
    async fn measure(&self, url: &str) -> Result<Dimensions>;
}

/// Shared flag that aborts an add or import between probe steps.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(CampaignError::Cancelled);
        }
        Ok(())
    }
}

async fn with_timeout<T>(limit: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| CampaignError::ProbeTimeout(limit.as_millis() as u64))?
}

fn into_verification_error(err: CampaignError) -> CampaignError {
    match err {
        CampaignError::Cancelled
        | CampaignError::ProbeTimeout(_)
        | CampaignError::LoadFailed(_)
        | CampaignError::VerificationError { .. } => err,
        other => CampaignError::VerificationError {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

/// Verify then measure one image and return its reduced display ratio.
///
/// Each step is bounded by `limit`; cancellation is checked around them.
pub async fn probe_display_ratio<P: ImageProbe>(
    probe: &P,
    url: &str,
    limit: Duration,
    cancel: &CancelToken,
) -> Result<String> {
    cancel.check()?;
    let loadable = with_timeout(limit, probe.verify_load(url))
        .await
        .map_err(into_verification_error)?;
    if !loadable {
        return Err(CampaignError::LoadFailed(url.to_string()));
    }

    cancel.check()?;
    let dimensions = with_timeout(limit, probe.measure(url))
        .await
        .map_err(into_verification_error)?;
    cancel.check()?;

    let ratio = dimensions.aspect_ratio();
    debug!(
        "Measured {}: {}x{} ({})",
        url, dimensions.width, dimensions.height, ratio
    );
    Ok(ratio)
}

/// Probe that fetches images over HTTP(S).
///
/// The body downloaded by `verify_load` is kept until the following
/// `measure` of the same URL, so each image is fetched once per add.
pub struct HttpImageProbe {
    client: Client,
    loaded: Mutex<HashMap<String, Vec<u8>>>,
}

impl HttpImageProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CampaignError::FetchError)?;
        Ok(Self {
            client,
            loaded: Mutex::new(HashMap::new()),
        })
    }

    /// Body of a successful response, `None` for a non-success status
    async fn fetch(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            warn!("Image request for {} returned {}", url, response.status());
            return Ok(None);
        }
        Ok(Some(response.bytes().await?.to_vec()))
    }
}

impl ImageProbe for HttpImageProbe {
    async fn verify_load(&self, url: &str) -> Result<bool> {
        info!("Verifying image: {}", url);
        match self.fetch(url).await {
            Ok(Some(bytes)) => {
                if image::guess_format(&bytes).is_err() {
                    return Ok(false);
                }
                self.loaded.lock().insert(url.to_string(), bytes);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                // Network failures count as "did not load", like a broken <img>
                warn!("Failed to load image {}: {}", url, e);
                Ok(false)
            }
        }
    }

    async fn measure(&self, url: &str) -> Result<Dimensions> {
        info!("Measuring image: {}", url);
        let cached = self.loaded.lock().remove(url);
        let bytes = match cached {
            Some(bytes) => bytes,
            None => self
                .fetch(url)
                .await?
                .ok_or_else(|| CampaignError::LoadFailed(url.to_string()))?,
        };
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Dimensions::new(width, height).ok_or_else(|| CampaignError::LoadFailed(url.to_string()))
    }
}
