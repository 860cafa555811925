// ABOUTME: Library module for the campaign-editor program.
// ABOUTME: Contains the slide list engine, validation, banner ids and JSON import/export.

// Reexport modules
pub mod banner_id;
pub mod config;
pub mod editor;
pub mod errors;
pub mod model;
pub mod probe;
pub mod ratio;
pub mod serializer;
pub mod state;
pub mod store;
pub mod validator;

// Reexport common types and functions
pub use banner_id::default_banner_id;
pub use config::{Config, EditorConfig, LinkPolicy};
pub use editor::Editor;
pub use errors::{CampaignError, ErrorKind, ExportBlocker, Result};
pub use model::{Category, PlacementContext, PlacementType, Slide, SlideField};
pub use probe::{CancelToken, Dimensions, HttpImageProbe, ImageProbe};
pub use ratio::reduce_ratio;
pub use serializer::{CampaignConfig, ContentEntry};
pub use state::EditorState;
pub use store::{CampaignStore, JsonFileList, MemoryList, PersistedList, SavedCampaign};
