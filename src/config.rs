// ABOUTME: Configuration module for the campaign editor
// ABOUTME: Provides static option lists, settings and environment variable handling

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Page ids offered for the luxury app.
pub const LUXURY_PAGE_IDS: &[&str] = &[
    "men-home-page",
    "women-home-page",
    "the-watch-store",
    "beauty-home-page",
    "handbags-store",
    "footwear-store",
    "indiluxe",
    "lifestyle-home-page",
    "kids-clp",
    "the-collective",
];

/// Page ids offered for the fashion app.
pub const FASHION_PAGE_IDS: &[&str] = &[
    "beauty-homepage",
    "women-homepage",
    "footwear-homepage",
    "men-homepage",
    "westside/c-mbh11a00004",
    "home-homepage",
    "accessories-homepage",
    "kids-homepage",
];

/// Target aspect ratios a placement can be rendered at.
pub const ASPECT_RATIO_OPTIONS: &[&str] = &["3:1", "5:1"];

/// Sentinel page id that switches to the free-text custom page id.
pub const OTHER_PAGE_ID: &str = "other";

const DEFAULT_TIMEOUT_MS: u64 = 30000;
const DEFAULT_STORE_PATH: &str = "campaigns.json";

/// Whether every slide must carry a redirect link before export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPolicy {
    /// Every slide needs a non-empty, valid link.
    Required,
    /// Links may be empty; a non-empty link must still be valid.
    Optional,
}

/// Settings for one editing session
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub probe_timeout: Duration,
    pub link_policy: LinkPolicy,
    pub default_aspect_ratio: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            link_policy: LinkPolicy::Required,
            default_aspect_ratio: ASPECT_RATIO_OPTIONS[0].to_string(),
        }
    }
}

/// Global configuration for the application
pub struct Config {
    pub store_path: PathBuf,
    pub probe_timeout_ms: u64,
    pub link_policy: LinkPolicy,
    pub default_aspect_ratio: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            probe_timeout_ms: DEFAULT_TIMEOUT_MS, // 30 seconds
            link_policy: LinkPolicy::Required,
            default_aspect_ratio: ASPECT_RATIO_OPTIONS[0].to_string(),
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let store_path = env::var("CAMPAIGN_STORE_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
        let probe_timeout_ms = env::var("PROBE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let link_policy = env::var("REQUIRE_LINKS")
            .ok()
            .map(|s| {
                if s.to_lowercase() == "false" {
                    LinkPolicy::Optional
                } else {
                    LinkPolicy::Required
                }
            })
            .unwrap_or(LinkPolicy::Required);

        // Only accept ratios the placement can actually render at
        let default_aspect_ratio = env::var("DEFAULT_ASPECT_RATIO")
            .ok()
            .filter(|s| ASPECT_RATIO_OPTIONS.contains(&s.as_str()))
            .unwrap_or_else(|| ASPECT_RATIO_OPTIONS[0].to_string());

        Self {
            store_path,
            probe_timeout_ms,
            link_policy,
            default_aspect_ratio,
        }
    }

    /// Get an editor configuration with defaults from this config
    pub fn editor_config(&self, timeout_ms: Option<u64>) -> EditorConfig {
        EditorConfig {
            probe_timeout: Duration::from_millis(timeout_ms.unwrap_or(self.probe_timeout_ms)),
            link_policy: self.link_policy,
            default_aspect_ratio: self.default_aspect_ratio.clone(),
        }
    }
}
