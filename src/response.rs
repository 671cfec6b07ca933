//! Extracts a JSON payload from a raw model reply.

use serde_json::Value;

use crate::error::CookflowError;

/// Parse the model's reply as JSON, tolerating the fenced code block
/// markers generative models commonly wrap JSON in.
///
/// Any parse failure is surfaced to the caller with the underlying
/// serde message; nothing is silently defaulted here.
pub fn parse_model_json(raw: &str) -> Result<Value, CookflowError> {
    let cleaned = strip_code_fences(raw);

    serde_json::from_str(&cleaned).map_err(|e| CookflowError::Parse(e.to_string()))
}

/// Remove ```` ```json ```` and ```` ``` ```` markers anywhere in the text.
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_fenced_json() {
        let value = parse_model_json("```json\n{\"a\":1}\n```").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_parses_bare_fences() {
        let value = parse_model_json("```\n{\"title\": \"Soup\"}\n```").unwrap();
        assert_eq!(value["title"], "Soup");
    }

    #[test]
    fn test_parses_unfenced_json() {
        let value = parse_model_json(r#"{"steps": ["stir"]}"#).unwrap();
        assert_eq!(value["steps"][0], "stir");
    }

    #[test]
    fn test_parse_failure_carries_cause() {
        let err = parse_model_json("I'm sorry, I can't do that.").unwrap_err();
        match err {
            CookflowError::Parse(msg) => assert!(!msg.is_empty()),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }
}
