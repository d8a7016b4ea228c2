//! Lenient JSON recovery for LLM output.
//!
//! Models asked for strict JSON still wrap it in prose or markdown code
//! fences often enough that every JSON-consuming call site goes through
//! this one named policy: direct parse first, then code-fence stripping,
//! then the substring between the first `{` and the last `}`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RagError;

/// Strips a leading/trailing markdown code fence, if present.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if trimmed.starts_with("```") {
        trimmed
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    } else {
        trimmed
    }
}

/// Extracts a JSON object from possibly prose-wrapped model output.
///
/// # Errors
///
/// Returns [`RagError::ResponseParse`] (carrying the raw content) when no
/// parseable object can be recovered.
pub fn extract_json_object(content: &str) -> Result<Value, RagError> {
    let candidate = strip_code_fence(content);

    if let Ok(value) = serde_json::from_str::<Value>(candidate)
        && value.is_object()
    {
        return Ok(value);
    }

    // Best effort: the substring between the first '{' and the last '}'.
    if let (Some(start), Some(end)) = (candidate.find('{'), candidate.rfind('}'))
        && end > start
        && let Ok(value) = serde_json::from_str::<Value>(&candidate[start..=end])
        && value.is_object()
    {
        return Ok(value);
    }

    Err(RagError::ResponseParse {
        message: "no JSON object found in response".to_string(),
        content: content.to_string(),
    })
}

/// Extracts and deserializes a JSON object into `T`.
///
/// # Errors
///
/// Returns [`RagError::ResponseParse`] when no object can be recovered or
/// it does not match `T`.
pub fn parse_lenient<T: DeserializeOwned>(content: &str) -> Result<T, RagError> {
    let value = extract_json_object(content)?;
    serde_json::from_value(value).map_err(|e| RagError::ResponseParse {
        message: e.to_string(),
        content: content.to_string(),
    })
}
