//! Document parsing: YAML front matter and whole-YAML documents.

use std::path::Path;

use anyhow::{Context, Result};

use crate::models::DocMeta;

/// A parsed source document: author metadata plus the prose body.
#[derive(Debug, Clone, Default)]
pub struct ParsedDoc {
    pub meta: DocMeta,
    pub body: String,
}

/// Parse a document according to its extension. Markdown files may open
/// with a `---` front-matter fence; `.yaml`/`.yml` files are metadata
/// throughout, with no body.
pub fn parse_document(path: &Path, content: &str) -> Result<ParsedDoc> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml");

    if is_yaml {
        let meta: DocMeta = serde_yaml::from_str(content)
            .with_context(|| format!("Failed to parse YAML document: {}", path.display()))?;
        return Ok(ParsedDoc {
            meta,
            body: String::new(),
        });
    }

    match split_front_matter(content) {
        Some((front, body)) => {
            let meta: DocMeta = serde_yaml::from_str(front)
                .with_context(|| format!("Failed to parse front matter: {}", path.display()))?;
            Ok(ParsedDoc {
                meta,
                body: body.to_string(),
            })
        }
        None => Ok(ParsedDoc {
            meta: DocMeta::default(),
            body: content.to_string(),
        }),
    }
}

/// Split a leading `---` fenced front-matter block from the body. Returns
/// `None` when the document has no front matter or the fence never closes;
/// an unclosed fence is treated as plain body text.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest.strip_prefix('\n').or_else(|| {
        rest.strip_prefix("\r\n")
    })?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((front, body));
        }
        offset += line.len();
    }
    None
}

/// Derive a human title from the file name: strip the extension, replace
/// separators with spaces, and capitalize each word.
pub fn title_from_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    stem.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
