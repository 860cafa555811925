// ABOUTME: Error types for the campaign editor
// ABOUTME: Provides structured error handling for editing, probing, import and export

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Please enter a valid URL: {0}")]
    InvalidUrl(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0}")]
    InvalidPosition(String),

    #[error("{page_id} is not a {category} page; select \"other\" to use a custom page ID")]
    UnknownPageId { page_id: String, category: String },

    #[error("This image has already been added: {0}")]
    DuplicateImage(String),

    #[error("Image failed to load. Please check the URL: {0}")]
    LoadFailed(String),

    #[error("Failed to verify image: {message}")]
    VerificationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Image probe timed out after {0} ms")]
    ProbeTimeout(u64),

    #[error("Invalid campaign format: {0}")]
    InvalidFormat(String),

    #[error("{0}")]
    ExportBlocked(ExportBlocker),

    #[error("Slide index {index} is out of range for {len} slides")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Another image operation is still in progress")]
    Busy,

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Campaign store error: {0}")]
    StoreError(String),

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Failed to decode image: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

/// Broad classes used by callers to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Field-level problem shown inline next to the input.
    Input,
    /// Duplicate image or duplicate banner id.
    Conflict,
    /// Image could not be loaded or measured.
    Load,
    /// Import payload rejected.
    Parse,
    /// Export refused until the configuration is fixed.
    ExportBlocked,
    /// Session-level refusal (busy, cancelled, bad index).
    Session,
    /// IO, store and other unexpected failures.
    Internal,
}

impl CampaignError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CampaignError::InvalidUrl(_)
            | CampaignError::MissingField(_)
            | CampaignError::InvalidPosition(_)
            | CampaignError::UnknownPageId { .. } => ErrorKind::Input,
            CampaignError::DuplicateImage(_) => ErrorKind::Conflict,
            CampaignError::LoadFailed(_)
            | CampaignError::VerificationError { .. }
            | CampaignError::ProbeTimeout(_)
            | CampaignError::FetchError(_)
            | CampaignError::ImageError(_) => ErrorKind::Load,
            CampaignError::InvalidFormat(_) | CampaignError::JsonError(_) => ErrorKind::Parse,
            CampaignError::ExportBlocked(ExportBlocker::DuplicateBannerIds) => ErrorKind::Conflict,
            CampaignError::ExportBlocked(_) => ErrorKind::ExportBlocked,
            CampaignError::IndexOutOfRange { .. } | CampaignError::Busy | CampaignError::Cancelled => {
                ErrorKind::Session
            }
            CampaignError::StoreError(_)
            | CampaignError::FileReadError(_)
            | CampaignError::UnknownError(_) => ErrorKind::Internal,
        }
    }
}

/// First failing reason that keeps a campaign from being exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportBlocker {
    MissingBannerIds,
    DuplicateBannerIds,
    MissingLinks,
    InvalidLinks,
    InvalidImageUrls,
    NoSlides,
    SingleWithManySlides,
    MissingPosition,
    InvalidPosition,
    MissingPageId,
    UnknownPageId,
}

impl fmt::Display for ExportBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ExportBlocker::MissingBannerIds => "Please add Banner IDs to all images before exporting",
            ExportBlocker::DuplicateBannerIds => "Each image must have a unique Banner ID",
            ExportBlocker::MissingLinks => {
                "Please add redirection links to all images before exporting"
            }
            ExportBlocker::InvalidLinks => "Please ensure all redirection links are valid URLs",
            ExportBlocker::InvalidImageUrls => "Please ensure all image URLs are valid",
            ExportBlocker::NoSlides => "Please add at least one image before exporting",
            ExportBlocker::SingleWithManySlides => "A single placement can only hold one image",
            ExportBlocker::MissingPosition => "Please enter a position number",
            ExportBlocker::InvalidPosition => "Position must be a valid non-negative number",
            ExportBlocker::MissingPageId => "Please enter a page ID",
            ExportBlocker::UnknownPageId => "Please select a page ID listed for the chosen category",
        };
        f.write_str(message)
    }
}

// Implement conversion from anyhow::Error to our CampaignError
impl From<anyhow::Error> for CampaignError {
    fn from(err: anyhow::Error) -> Self {
        CampaignError::UnknownError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CampaignError>;
