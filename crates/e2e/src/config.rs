//! Quotecheck configuration

use quotecheck_common::TraceMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{E2eError, E2eResult};
use crate::playwright::{Browser, PlaywrightConfig};

/// Top-level configuration, usually read from `quotecheck.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotecheckConfig {
    /// Directory holding scenario YAML files
    pub scenarios_dir: PathBuf,

    /// Directory the suite result is written to
    pub output_dir: PathBuf,

    /// Promote field update and onChange events to info level
    pub logging_on: bool,

    /// Rule trace configuration
    pub trace: TraceConfig,

    /// Browser configuration
    pub playwright: BrowserConfig,
}

impl Default for QuotecheckConfig {
    fn default() -> Self {
        Self {
            scenarios_dir: PathBuf::from("scenarios"),
            output_dir: PathBuf::from("test-results"),
            logging_on: false,
            trace: TraceConfig::default(),
            playwright: BrowserConfig::default(),
        }
    }
}

/// Rule trace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub mode: TraceMode,

    /// JSON Lines file rule firings are appended to
    pub path: PathBuf,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            mode: TraceMode::Deferred,
            path: PathBuf::from("business_rule_trace.jsonl"),
        }
    }
}

/// Browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Application under test
    pub base_url: String,
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Per-action timeout handed to Playwright
    pub timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            timeout_ms: 30_000,
        }
    }
}

impl QuotecheckConfig {
    /// Load configuration from file, falling back to defaults when it does
    /// not exist
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> E2eResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| E2eError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Where the suite result JSON goes
    pub fn results_path(&self) -> PathBuf {
        self.output_dir.join("scenario-results.json")
    }

    pub fn playwright_config(&self) -> PlaywrightConfig {
        PlaywrightConfig {
            base_url: self.playwright.base_url.clone(),
            browser: self.playwright.browser,
            headless: self.playwright.headless,
            viewport_width: self.playwright.viewport_width,
            viewport_height: self.playwright.viewport_height,
            timeout_ms: self.playwright.timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuotecheckConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.trace.mode, TraceMode::Deferred);
        assert_eq!(config.trace.path, PathBuf::from("business_rule_trace.jsonl"));
        assert_eq!(config.results_path(), PathBuf::from("test-results/scenario-results.json"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotecheck.toml");
        std::fs::write(
            &path,
            "logging_on = true\n\n[trace]\nmode = \"immediate\"\n\n[playwright]\nbrowser = \"firefox\"\n",
        )
        .unwrap();

        let config = QuotecheckConfig::load(&path).unwrap();
        assert!(config.logging_on);
        assert_eq!(config.trace.mode, TraceMode::Immediate);
        assert!(matches!(config.playwright.browser, Browser::Firefox));
        assert_eq!(config.playwright.viewport_width, 1280);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quotecheck.toml");
        let mut config = QuotecheckConfig::default();
        config.playwright.base_url = "http://quotes.test".to_string();
        config.save(&path).unwrap();

        let loaded = QuotecheckConfig::load(&path).unwrap();
        assert_eq!(loaded.playwright.base_url, "http://quotes.test");
    }

    #[test]
    fn test_bad_mode_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotecheck.toml");
        std::fs::write(&path, "[trace]\nmode = \"sometimes\"\n").unwrap();
        assert!(matches!(QuotecheckConfig::load(&path), Err(E2eError::Toml(_))));
    }
}
