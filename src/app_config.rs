use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration module
/// This module handles the library configuration including loading,
/// validating and saving configuration settings.
/// Represents the full pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Translation backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Batch translation settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Translation cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Document parsing settings
    #[serde(default)]
    pub parse: ParseConfig,

    /// Layout rendering settings
    #[serde(default)]
    pub render: RenderConfig,
}

/// Layout preservation mode for rendered output
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Translations appended as new blocks after each original (flow documents)
    #[default]
    Inline,
    /// Translations placed over the original text position (page documents)
    Overlay,
    /// Original and translation on mirrored halves of a doubled-width page
    SideBySide,
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Inline => "inline",
            Self::Overlay => "overlay",
            Self::SideBySide => "side_by_side",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for LayoutMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "overlay" => Ok(Self::Overlay),
            "side_by_side" | "side-by-side" => Ok(Self::SideBySide),
            _ => Err(anyhow!("Invalid layout mode: {}", s)),
        }
    }
}

/// Translation backend (model server) configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    /// Base URL of the model server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Read timeout in seconds
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Number of attempts per request before smart retry kicks in
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Base backoff in seconds, multiplied by the attempt number
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: f64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            attempts: default_attempts(),
            backoff_base_secs: default_backoff_base_secs(),
        }
    }
}

/// Character-based batching configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    /// Requested character ceiling per batched model call
    #[serde(default = "default_max_batch_chars")]
    pub max_batch_chars: usize,

    /// Lower bound the requested ceiling is clamped to
    #[serde(default = "default_min_batch_chars_bound")]
    pub min_batch_chars_bound: usize,

    /// Upper bound the requested ceiling is clamped to
    #[serde(default = "default_max_batch_chars_bound")]
    pub max_batch_chars_bound: usize,

    /// Fraction of segment markers that must be recovered to accept a
    /// partial batch response. Empirically chosen; kept configurable.
    #[serde(default = "default_partial_accept_ratio")]
    pub partial_accept_ratio: f64,

    /// Maximum characters per chunk when a capacity error forces splitting
    #[serde(default = "default_chunk_max_chars")]
    pub chunk_max_chars: usize,

    /// Escalating wait times in seconds for transient-error retries
    #[serde(default = "default_retry_waits_secs")]
    pub retry_waits_secs: Vec<u64>,
}

impl BatchConfig {
    /// The effective character ceiling, clamped to the configured bounds.
    pub fn effective_max_batch_chars(&self) -> usize {
        self.max_batch_chars
            .clamp(self.min_batch_chars_bound, self.max_batch_chars_bound)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_chars: default_max_batch_chars(),
            min_batch_chars_bound: default_min_batch_chars_bound(),
            max_batch_chars_bound: default_max_batch_chars_bound(),
            partial_accept_ratio: default_partial_accept_ratio(),
            chunk_max_chars: default_chunk_max_chars(),
            retry_waits_secs: default_retry_waits_secs(),
        }
    }
}

/// Translation cache configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Database file path; None selects the per-user default location
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Maximum number of cached entries before eviction runs
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,

    /// Number of oldest entries removed per eviction pass
    #[serde(default = "default_cache_cleanup_batch")]
    pub cleanup_batch: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            max_entries: default_cache_max_entries(),
            cleanup_batch: default_cache_cleanup_batch(),
        }
    }
}

/// Document parsing and validation configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ParseConfig {
    /// Maximum number of translatable segments per document
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,

    /// Maximum total text length per document, in characters
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Mark header/footer elements as non-translatable
    #[serde(default)]
    pub skip_header_footer: bool,

    /// Page-edge margin in points for header/footer detection
    #[serde(default = "default_header_footer_margin_pt")]
    pub header_footer_margin_pt: f64,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_segments: default_max_segments(),
            max_text_length: default_max_text_length(),
            skip_header_footer: false,
            header_footer_margin_pt: default_header_footer_margin_pt(),
        }
    }
}

/// Layout rendering configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Layout preservation mode
    #[serde(default)]
    pub layout_mode: LayoutMode,

    /// Draw a mask over the original text in overlay mode
    #[serde(default = "default_true")]
    pub draw_mask: bool,

    /// Inward shrink in points applied to redaction rectangles so adjacent
    /// table borders survive the mask
    #[serde(default = "default_mask_margin_pt")]
    pub mask_margin_pt: f64,

    /// Render a visible placeholder where no translation resolved
    #[serde(default = "default_true")]
    pub show_missing_placeholder: bool,

    /// Prefix used for the missing-translation placeholder
    #[serde(default = "default_missing_placeholder")]
    pub missing_placeholder: String,

    /// Font size in points for inline-mode inserted blocks
    #[serde(default = "default_insert_font_size_pt")]
    pub insert_font_size_pt: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::default(),
            draw_mask: true,
            mask_margin_pt: default_mask_margin_pt(),
            show_missing_placeholder: true,
            missing_placeholder: default_missing_placeholder(),
            insert_font_size_pt: default_insert_font_size_pt(),
        }
    }
}

/// Per-language font sizing profile for shrink-to-fit placement.
///
/// Glyph aspect ratios differ sharply across scripts, so CJK, Thai, Arabic,
/// Hebrew and Vietnamese carry their own bounds. The values are empirically
/// chosen; they are configuration, not derived constants.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct FontSizeProfile {
    /// Starting (maximum) font size in points
    pub max_size_pt: f64,
    /// Smallest font size the fitting loop may reach
    pub min_size_pt: f64,
    /// Fraction of the box height usable for glyphs
    pub height_ratio: f64,
    /// Multiplier applied per fitting iteration
    pub shrink_factor: f64,
}

impl Default for FontSizeProfile {
    fn default() -> Self {
        Self {
            max_size_pt: 11.0,
            min_size_pt: 4.0,
            height_ratio: 0.75,
            shrink_factor: 0.88,
        }
    }
}

/// Look up the font sizing profile for a target language code.
pub fn font_profile_for(lang_code: &str) -> FontSizeProfile {
    match lang_code.to_lowercase().as_str() {
        "zh-tw" | "zh-cn" | "ja" | "ko" => FontSizeProfile {
            max_size_pt: 12.0,
            min_size_pt: 6.0,
            height_ratio: 0.70,
            shrink_factor: 0.85,
        },
        "th" => FontSizeProfile {
            max_size_pt: 11.0,
            min_size_pt: 5.0,
            height_ratio: 0.72,
            shrink_factor: 0.88,
        },
        "ar" | "he" => FontSizeProfile {
            max_size_pt: 13.0,
            min_size_pt: 6.0,
            height_ratio: 0.65,
            shrink_factor: 0.88,
        },
        "vi" => FontSizeProfile {
            max_size_pt: 11.0,
            min_size_pt: 5.0,
            height_ratio: 0.73,
            shrink_factor: 0.88,
        },
        _ => FontSizeProfile::default(),
    }
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "translategemma:12b".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    180
}

fn default_attempts() -> u32 {
    3
}

fn default_backoff_base_secs() -> f64 {
    1.6
}

fn default_max_batch_chars() -> usize {
    80_000
}

fn default_min_batch_chars_bound() -> usize {
    10_000
}

fn default_max_batch_chars_bound() -> usize {
    100_000
}

fn default_partial_accept_ratio() -> f64 {
    0.8
}

fn default_chunk_max_chars() -> usize {
    1_500
}

fn default_retry_waits_secs() -> Vec<u64> {
    vec![5, 10, 20]
}

fn default_cache_max_entries() -> usize {
    50_000
}

fn default_cache_cleanup_batch() -> usize {
    5_000
}

fn default_max_segments() -> usize {
    10_000
}

fn default_max_text_length() -> usize {
    100_000
}

fn default_header_footer_margin_pt() -> f64 {
    50.0
}

fn default_mask_margin_pt() -> f64 {
    0.5
}

fn default_missing_placeholder() -> String {
    "[Untranslated]".to_string()
}

fn default_insert_font_size_pt() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}
