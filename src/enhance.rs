//! Optional AI enhancement of document metadata.
//!
//! Sends a document to a chat-completions endpoint and asks for metadata
//! suggestions: better titles and summaries, additional tags, a difficulty
//! recommendation. The indexer produces a complete result without this
//! module; `cdx enhance` is a separate, explicitly-invoked command.
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::classify::classify_with_meta;
use crate::config::{Config, EnhanceConfig};
use crate::extract::parse_document;
use crate::keywords::{extract_keywords, extract_phrases, DEFAULT_KEYWORD_LIMIT};
use crate::models::{Analysis, Enhancement};
use crate::vocab::Vocabulary;

const MAX_CONTENT_CHARS: usize = 6000;

/// Run the enhance command for a single document: analyze it locally with
/// the frequency heuristic, send document and analysis to the provider,
/// and print the suggestions as JSON.
pub async fn run_enhance(config: &Config, path: &Path) -> Result<()> {
    if !config.enhance.is_enabled() {
        bail!("enhance.provider is disabled; set it in the config to use this command");
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = parse_document(path, &content)?;

    let mut vocab = Vocabulary::new(&config.vocab.dir);
    vocab.load_all();

    let text = format!(
        "{}\n{}\n{}",
        doc.meta.title.as_deref().unwrap_or_default(),
        doc.meta.summary.as_deref().unwrap_or_default(),
        doc.body
    );
    let analysis = Analysis {
        keywords: extract_keywords(&text, DEFAULT_KEYWORD_LIMIT, &vocab)
            .into_iter()
            .map(|k| k.original)
            .collect(),
        phrases: extract_phrases(&text, config.analysis.phrase_ngram, &vocab),
        categories: classify_with_meta(&vocab, &text, Some(&doc.meta)),
    };

    let enhancement = enhance_document(&config.enhance, &content, &analysis).await?;
    println!("{}", serde_json::to_string_pretty(&enhancement)?);
    Ok(())
}

/// Request enhancement suggestions for a document. Requires the
/// `OPENAI_API_KEY` environment variable when the provider is `openai`.
pub async fn enhance_document(
    config: &EnhanceConfig,
    content: &str,
    analysis: &Analysis,
) -> Result<Enhancement> {
    match config.provider.as_str() {
        "openai" => enhance_openai(config, content, analysis).await,
        "disabled" => bail!("Enhance provider is disabled"),
        other => bail!("Unknown enhance provider: {}", other),
    }
}

async fn enhance_openai(
    config: &EnhanceConfig,
    content: &str,
    analysis: &Analysis,
) -> Result<Enhancement> {
    let api_key =
        std::env::var("OPENAI_API_KEY").map_err(|_| anyhow::anyhow!("OPENAI_API_KEY not set"))?;

    let model = config
        .model
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("enhance.model required"))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let excerpt = truncate_chars(content, MAX_CONTENT_CHARS);
    let prompt = build_prompt(&excerpt, analysis)?;

    let body = serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "system",
                "content": "You review knowledge-base documents and suggest metadata \
                            improvements. Respond with a single JSON object containing \
                            \"suggestions\" (array), \"autoTags\" (array of strings), and \
                            \"suggestedDifficulty\" (string or null)."
            },
            { "role": "user", "content": prompt }
        ],
    });

    let mut last_err = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            // Exponential backoff: 1s, 2s, 4s, 8s, ...
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tokio::time::sleep(delay).await;
        }

        let resp = client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await;

        match resp {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    let json: serde_json::Value = response.json().await?;
                    return parse_enhancement_response(&json);
                }

                // Rate limited or server error — retry
                if status.as_u16() == 429 || status.is_server_error() {
                    let body_text = response.text().await.unwrap_or_default();
                    last_err = Some(anyhow::anyhow!("API error {}: {}", status, body_text));
                    continue;
                }

                // Client error (not 429) — don't retry
                let body_text = response.text().await.unwrap_or_default();
                bail!("API error {}: {}", status, body_text);
            }
            Err(e) => {
                last_err = Some(e.into());
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Enhancement failed after retries")))
}

fn build_prompt(excerpt: &str, analysis: &Analysis) -> Result<String> {
    let analysis_json = serde_json::to_string_pretty(analysis)?;
    Ok(format!(
        "Current analysis:\n{}\n\nDocument:\n{}",
        analysis_json, excerpt
    ))
}

/// Extract the assistant message and parse it as an [`Enhancement`].
/// Models often wrap JSON in a fenced code block; the fences are stripped
/// before parsing.
fn parse_enhancement_response(json: &serde_json::Value) -> Result<Enhancement> {
    let message = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid API response: missing message content"))?;

    let cleaned = strip_json_fences(message);
    let enhancement: Enhancement = serde_json::from_str(cleaned)
        .map_err(|e| anyhow::anyhow!("Invalid enhancement JSON: {}", e))?;
    Ok(enhancement)
}

fn strip_json_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
