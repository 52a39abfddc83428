//! Parsing of untrusted model output into [`ItemMention`]s.
//!
//! The model is asked for a bare JSON array but frequently wraps it in a
//! markdown fence. Fences are stripped, then the text must match the schema
//! exactly: an array of `{"name": string, "code"?: string | null}` objects.

use serde::Deserialize;

use super::error::{ExtractionError, ExtractionResult};
use super::model::ItemMention;

const FENCE: &str = "```";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMention {
    name: String,
    #[serde(default)]
    code: Option<String>,
}

/// Removes a surrounding markdown code fence (with an optional `json` tag).
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        let rest = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
        body = rest.trim_start();
    }

    if let Some(rest) = body.strip_suffix(FENCE) {
        body = rest.trim_end();
    }

    body
}

/// Parses fenced or bare model output against the mention schema.
pub fn parse_mentions(text: &str) -> ExtractionResult<Vec<ItemMention>> {
    let body = strip_code_fences(text);
    let raw: Vec<RawMention> =
        serde_json::from_str(body).map_err(|e| ExtractionError::MalformedOutput {
            reason: e.to_string(),
        })?;

    Ok(raw.into_iter().map(normalize).collect())
}

fn normalize(raw: RawMention) -> ItemMention {
    let code = raw
        .code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    ItemMention {
        name: raw.name.trim().to_string(),
        code,
    }
}
