use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub content: ContentConfig,
    #[serde(default)]
    pub vocab: VocabConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub enhance: EnhanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_include_globs() -> Vec<String> {
    vec![
        "**/*.md".to_string(),
        "**/*.mdx".to_string(),
        "**/*.yaml".to_string(),
        "**/*.yml".to_string(),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct VocabConfig {
    #[serde(default = "default_vocab_dir")]
    pub dir: PathBuf,
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            dir: default_vocab_dir(),
        }
    }
}

fn default_vocab_dir() -> PathBuf {
    PathBuf::from("vocab")
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(".cache/codex.db")
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            report_path: default_report_path(),
        }
    }
}

fn default_index_path() -> PathBuf {
    PathBuf::from("codex-index.json")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("codex-report.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_phrase_ngram")]
    pub phrase_ngram: usize,
    /// Documents an unknown term must appear in before it is suggested as
    /// a vocabulary addition.
    #[serde(default = "default_suggestion_min_docs")]
    pub suggestion_min_docs: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            phrase_ngram: default_phrase_ngram(),
            suggestion_min_docs: default_suggestion_min_docs(),
        }
    }
}

fn default_phrase_ngram() -> usize {
    2
}
fn default_suggestion_min_docs() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnhanceConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            model: None,
            max_retries: 5,
            timeout_secs: 30,
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

impl EnhanceConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate analysis
    if config.analysis.phrase_ngram == 0 {
        anyhow::bail!("analysis.phrase_ngram must be > 0");
    }
    if config.analysis.suggestion_min_docs == 0 {
        anyhow::bail!("analysis.suggestion_min_docs must be > 0");
    }

    // Validate content
    if config.content.include_globs.is_empty() {
        anyhow::bail!("content.include_globs must not be empty");
    }

    // Validate enhance
    if config.enhance.is_enabled() && config.enhance.model.is_none() {
        anyhow::bail!(
            "enhance.model must be specified when provider is '{}'",
            config.enhance.provider
        );
    }

    match config.enhance.provider.as_str() {
        "disabled" | "openai" => {}
        other => anyhow::bail!(
            "Unknown enhance provider: '{}'. Must be disabled or openai.",
            other
        ),
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cdx.toml");
        fs::write(&path, contents).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let (_tmp, path) = write_config("[content]\nroot = \"docs\"\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.vocab.dir, PathBuf::from("vocab"));
        assert_eq!(config.cache.path, PathBuf::from(".cache/codex.db"));
        assert_eq!(config.analysis.phrase_ngram, 2);
        assert!(!config.enhance.is_enabled());
        assert!(config
            .content
            .include_globs
            .contains(&"**/*.md".to_string()));
    }

    #[test]
    fn test_enhance_requires_model() {
        let (_tmp, path) = write_config(
            "[content]\nroot = \"docs\"\n[enhance]\nprovider = \"openai\"\n",
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let (_tmp, path) = write_config(
            "[content]\nroot = \"docs\"\n[enhance]\nprovider = \"other\"\nmodel = \"m\"\n",
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_zero_ngram_rejected() {
        let (_tmp, path) = write_config(
            "[content]\nroot = \"docs\"\n[analysis]\nphrase_ngram = 0\n",
        );
        assert!(load_config(&path).is_err());
    }
}
