//! Pipeline configuration.

use std::path::PathBuf;

use crate::title::DEFAULT_TITLE_SELECTOR;

/// What to do when the minification pass rejects a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinifyErrors {
    /// Fail the file at the minify stage.
    #[default]
    Fail,
    /// Log a warning and write the unminified rendering instead.
    PassThrough,
}

/// Configuration for a [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory outputs are placed under. Empty means next to each input.
    pub output_dir: PathBuf,
    /// Flank en and em dashes with hair spaces before parsing.
    pub hair_spaces: bool,
    /// Selector for the title heading (default `h1`).
    pub title_selector: String,
    pub minify_errors: MinifyErrors,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_hair_spaces(mut self, enabled: bool) -> Self {
        self.hair_spaces = enabled;
        self
    }

    pub fn with_title_selector(mut self, selector: impl Into<String>) -> Self {
        self.title_selector = selector.into();
        self
    }

    pub fn with_minify_errors(mut self, policy: MinifyErrors) -> Self {
        self.minify_errors = policy;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::new(),
            hair_spaces: false,
            title_selector: DEFAULT_TITLE_SELECTOR.to_string(),
            minify_errors: MinifyErrors::Fail,
        }
    }
}
