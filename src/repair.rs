//! Syntactic cleanup for JSON written by a text generator.
//!
//! Each pass fixes one known malformation and leaves already-valid JSON unchanged.
//! The passes only touch punctuation and escaping; they never add or remove keys
//! or values.

/// Runs every pass in order: control whitespace, stray backslashes, unescaped inner
/// quotes, trailing commas.
pub fn repair_json(text: &str) -> String {
    let text = collapse_newlines(text);
    let text = escape_stray_backslashes(&text);
    let text = escape_inner_quotes(&text);
    strip_trailing_commas(&text)
}

/// Raw newlines, carriage returns and tabs become spaces. They are insignificant
/// between tokens and illegal inside JSON strings.
pub fn collapse_newlines(text: &str) -> String {
    text.replace("\r\n", " ")
        .chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}

/// Doubles any backslash that does not start a valid JSON escape sequence.
pub fn escape_stray_backslashes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let escape_len = match chars.get(i + 1) {
            Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => 2,
            Some('u') if is_unicode_escape(&chars[i + 2..]) => 6,
            _ => 0,
        };

        if escape_len == 0 {
            out.push_str("\\\\");
            i += 1;
        } else {
            out.extend(&chars[i..i + escape_len]);
            i += escape_len;
        }
    }

    out
}

/// Escapes double quotes that sit inside a string value rather than closing it.
///
/// A quote inside a string is treated as closing only when the next significant
/// character is `:`, `}`, `]`, the end of input, or a comma that is itself followed
/// by the start of another JSON value.
pub fn escape_inner_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string && c == '\\' {
            out.push(c);
            if let Some(&next) = chars.get(i + 1) {
                out.push(next);
            }
            i += 2;
            continue;
        }

        if c == '"' {
            if !in_string {
                in_string = true;
                out.push(c);
            } else if closes_string(&chars, i) {
                in_string = false;
                out.push(c);
            } else {
                out.push_str("\\\"");
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}

/// Drops commas that directly precede a closing `}` or `]`, ignoring string content.
pub fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                }
                i += 1;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' && matches!(next_significant(&chars, i + 1), Some((_, '}' | ']'))) {
            // dropped
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}

fn is_unicode_escape(rest: &[char]) -> bool {
    rest.len() >= 4 && rest[..4].iter().all(|c| c.is_ascii_hexdigit())
}

fn next_significant(chars: &[char], from: usize) -> Option<(usize, char)> {
    chars
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, c)| !c.is_whitespace())
        .map(|(idx, &c)| (idx, c))
}

fn closes_string(chars: &[char], quote_idx: usize) -> bool {
    match next_significant(chars, quote_idx + 1) {
        None => true,
        Some((_, ':' | '}' | ']')) => true,
        Some((comma_idx, ',')) => match next_significant(chars, comma_idx + 1) {
            None => true,
            Some((_, '"' | '{' | '[' | '}' | ']' | '-')) => true,
            Some((idx, c)) => c.is_ascii_digit() || starts_with_literal(&chars[idx..]),
        },
        Some(_) => false,
    }
}

fn starts_with_literal(chars: &[char]) -> bool {
    ["true", "false", "null"].iter().any(|literal| {
        let len = literal.len();
        chars.len() >= len
            && chars[..len].iter().copied().eq(literal.chars())
            && !chars
                .get(len)
                .map_or(false, |c| c.is_alphanumeric() || *c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap_or_else(|e| panic!("{e}: {text}"))
    }

    #[test]
    fn test_valid_json_is_unchanged() {
        let samples = [
            r#"{"a": 1, "b": [1, 2, {"c": null}], "d": "x\"y\\z\n", "e": true}"#,
            r#"{"url": "https:\/\/example.com", "snow": "\u2603"}"#,
            r#"{"list": ["one", "two"], "nested": {"k": "v"}}"#,
        ];
        for sample in samples {
            assert_eq!(repair_json(sample), sample);
        }
    }

    #[test]
    fn test_collapse_newlines() {
        let repaired = repair_json("{\"message\": \"Line one\nLine two\r\nLine\tthree\"}");
        assert_eq!(parse(&repaired)["message"], "Line one Line two Line three");
    }

    #[test]
    fn test_stray_backslashes() {
        assert_eq!(escape_stray_backslashes(r#"C:\Users"#), r#"C:\\Users"#);
        assert_eq!(escape_stray_backslashes(r#"\n\t\\"#), r#"\n\t\\"#);
        assert_eq!(escape_stray_backslashes(r#"\u12"#), r#"\\u12"#);
        assert_eq!(escape_stray_backslashes("end\\"), "end\\\\");

        let repaired = repair_json(r#"{"path": "C:\Docs\offer.pdf"}"#);
        assert_eq!(parse(&repaired)["path"], r#"C:\Docs\offer.pdf"#);
    }

    #[test]
    fn test_inner_quotes() {
        let repaired = repair_json(r#"{"primary_message": "Try our "Smart Saver" account today"}"#);
        assert_eq!(
            parse(&repaired)["primary_message"],
            r#"Try our "Smart Saver" account today"#
        );

        let repaired = repair_json(r#"{"a": "He said "stop", then left", "b": 2}"#);
        let value = parse(&repaired);
        assert_eq!(value["a"], r#"He said "stop", then left"#);
        assert_eq!(value["b"], 2);
    }

    #[test]
    fn test_quote_before_literal_closes() {
        let repaired = repair_json(r#"{"a": ["x", true, "y", null, "z", -1]}"#);
        assert_eq!(parse(&repaired), json!({"a": ["x", true, "y", null, "z", -1]}));
    }

    #[test]
    fn test_trailing_commas() {
        assert_eq!(strip_trailing_commas(r#"{"a": 1,}"#), r#"{"a": 1}"#);
        assert_eq!(strip_trailing_commas("[1, 2 ,  ]"), "[1, 2   ]");
        assert_eq!(
            strip_trailing_commas(r#"{"text": "a,}", "b": [1,],}"#),
            r#"{"text": "a,}", "b": [1]}"#
        );
    }

    #[test]
    fn test_combined_malformations() {
        let raw = "{\n  \"primary_message\": \"Save for \"tomorrow\"\nwith us\",\n  \"tags\": [\"a\", \"b\",],\n}";
        let value = parse(&repair_json(raw));
        assert_eq!(value["primary_message"], r#"Save for "tomorrow" with us"#);
        assert_eq!(value["tags"], json!(["a", "b"]));
    }
}
