use crate::error::{snippet, CampaignError, Result};
use crate::repair::repair_json;
use log::{debug, warn};
use serde_json::{Map, Value};

/// Recovers the JSON object from raw model output.
///
/// 1. Strict parse of the trimmed text.
/// 2. Otherwise take the span from the first `{` to the last `}`.
/// 3. Run the repair passes over that span and parse it.
///
/// Surrounding prose is discarded. Repairs are syntactic only, so every key and value
/// in the result was produced by the model.
pub fn extract_json_content(response_text: &str) -> Result<Map<String, Value>> {
    let cleaned = response_text.trim();

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(cleaned) {
        debug!("Response parsed as JSON without repair");
        return Ok(map);
    }

    let span = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end > start => &cleaned[start..=end],
        _ => {
            warn!("No JSON structure found in a {} byte response", cleaned.len());
            return Err(CampaignError::NoJsonStructure {
                response: snippet(cleaned),
            });
        }
    };

    let repaired = repair_json(span);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(Value::Object(map)) => {
            debug!("Response parsed after repair ({} keys)", map.len());
            Ok(map)
        }
        Ok(other) => Err(CampaignError::JsonDecode {
            message: format!("expected a JSON object, found {}", value_kind(&other)),
            repaired: snippet(&repaired),
        }),
        Err(e) => {
            warn!("JSON decode failed after repair: {}", e);
            Err(CampaignError::JsonDecode {
                message: e.to_string(),
                repaired: snippet(&repaired),
            })
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_parse() {
        let content = extract_json_content(r#"{"primary_message": "Test message"}"#).unwrap();
        assert_eq!(content["primary_message"], "Test message");
    }

    #[test]
    fn test_surrounding_prose_and_trailing_comma() {
        let content = extract_json_content(r#"Here is the JSON: {"a": 1,}  more text"#).unwrap();
        assert_eq!(Value::Object(content), json!({"a": 1}));
    }

    #[test]
    fn test_markdown_fence() {
        let raw = "```json\n{\n  \"primary_message\": \"Hello\",\n  \"secondary_message\": \"Call us\"\n}\n```";
        let content = extract_json_content(raw).unwrap();
        assert_eq!(content["secondary_message"], "Call us");
    }

    #[test]
    fn test_no_json_structure() {
        let err = extract_json_content("not json at all").unwrap_err();
        assert!(matches!(err, CampaignError::NoJsonStructure { ref response } if response == "not json at all"));

        assert!(matches!(
            extract_json_content("} backwards {"),
            Err(CampaignError::NoJsonStructure { .. })
        ));
        assert!(matches!(
            extract_json_content(""),
            Err(CampaignError::NoJsonStructure { .. })
        ));
    }

    #[test]
    fn test_unrepairable_json_reports_repaired_text() {
        let err = extract_json_content("Result: {\"a\": 1 \"b\" 2}").unwrap_err();
        match err {
            CampaignError::JsonDecode { repaired, .. } => {
                assert!(repaired.starts_with("{\"a\": 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_top_level_array_is_not_an_object() {
        let err = extract_json_content("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, CampaignError::NoJsonStructure { .. }));
    }

    #[test]
    fn test_multiline_model_output() {
        let raw = "Sure! {\"primary_message\": \"Plan for your \"next chapter\"\nwith confidence\", \"tone_guidelines\": {\"voice\": \"Warm\",},}";
        let content = extract_json_content(raw).unwrap();
        assert_eq!(
            content["primary_message"],
            "Plan for your \"next chapter\" with confidence"
        );
        assert_eq!(content["tone_guidelines"]["voice"], "Warm");
    }
}
